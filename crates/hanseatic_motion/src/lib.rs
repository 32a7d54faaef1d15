// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scroll-synchronized motion engine for the Hanseatic site.
//!
//! This crate drives section choreography from scroll position:
//! - Smoothed virtual scrolling
//! - Viewport triggers with enter/leave events and progress
//! - Timelines of eased property segments, played by time or scrubbed
//! - Pinning with layout-preserving placeholders
//! - A session that owns all of the above and tears it down in one call
//!
//! ## Architecture
//!
//! The engine is host-agnostic. A host implements the capabilities in
//! [`host`] (document queries, property writes, a frame source) and the
//! [`MotionSession`] orchestrates everything else:
//! - Declarative [`SectionBinding`]s resolved once at registration
//! - Reduced motion decided once at mount
//! - Deferred [`Commands`] for re-entrant control from event callbacks

pub mod easing;
pub mod error;
pub mod host;
pub mod smoother;
pub mod trigger;
pub mod timeline;
pub mod pin;
pub mod binding;
pub mod presets;
pub mod session;
pub mod config;

#[cfg(test)]
mod testing;

pub use easing::{Easing, Interpolation};
pub use error::{MotionError, Result};
pub use host::{Document, ElementId, FrameSource, FrameSubscription, Host, Property, Rect, RenderTarget};
pub use smoother::{ListenerId, ScrollListener, ScrollSmoother, SmootherConfig, VirtualScrollState};
pub use trigger::{Scrub, ScrollPoint, TriggerConfig, TriggerEvent, TriggerEventKind, TriggerId, TriggerRegistry};
pub use timeline::{Drive, PlaybackState, Position, Sample, Segment, SegmentId, Timeline, TimelineId};
pub use pin::{PinController, PinReservation};
pub use binding::{EventCallback, SectionBinding, SegmentSpec, Target};
pub use presets::{ClipReveal, Crossfade, Reveal};
pub use session::{Command, Commands, HostEvent, MotionMode, MotionSession, Registration, SessionState, SessionStats};
pub use config::{ConfigError, MotionConfig};
