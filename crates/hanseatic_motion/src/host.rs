// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host capabilities injected into the engine.
//!
//! The engine never talks to a concrete document or rendering API. Everything
//! it needs from the embedding view is expressed by three traits:
//! - [`Document`] answers selector and geometry queries
//! - [`RenderTarget`] receives computed property values and pin reservations
//! - [`FrameSource`] provides the per-frame tick subscription and a monotonic clock
//!
//! Any type implementing all three is a [`Host`].

use crate::error::Result;
use crate::pin::PinReservation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Borrowed handle to an element owned by the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element bounds in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Distance from the document top
    pub top: f32,
    /// Distance from the document left edge
    pub left: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rect
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge in document coordinates
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Animatable property of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    /// Opacity; the host hides the element entirely at 0
    Opacity,
    /// Horizontal translation in pixels
    X,
    /// Vertical translation in pixels
    Y,
    /// Uniform scale factor
    Scale,
    /// Bottom clip inset as a percentage of the element height
    ClipInset,
}

impl Property {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
            Self::ClipInset => "clipInset",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Token returned by a frame subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSubscription(pub u64);

/// Selector and geometry queries against the host document
pub trait Document {
    /// Resolve a selector inside `root`, in document order
    fn query(&self, root: ElementId, selector: &str) -> Vec<ElementId>;

    /// Layout-flow bounds of an element.
    ///
    /// For a pinned element this is the bounds of its placeholder, so trigger
    /// positions stay stable while the element itself is held in the viewport.
    fn bounds(&self, element: ElementId) -> Result<Rect>;

    /// Viewport height
    fn viewport_height(&self) -> f32;

    /// Maximum scroll position of the document
    fn scroll_limit(&self) -> f32;

    /// Accessibility preference for reduced motion
    fn prefers_reduced_motion(&self) -> bool;
}

/// Sink for computed values
pub trait RenderTarget {
    /// Apply a property value to an element
    fn apply(&mut self, element: ElementId, property: Property, value: f32);

    /// Hold an element fixed in the viewport and insert its placeholder
    fn pin(&mut self, reservation: &PinReservation);

    /// Return a pinned element to normal flow and remove its placeholder
    fn unpin(&mut self, element: ElementId);
}

/// Per-frame tick provider and monotonic clock
pub trait FrameSource {
    /// Start receiving frame ticks
    fn subscribe_frames(&mut self) -> Result<FrameSubscription>;

    /// Stop receiving frame ticks
    fn unsubscribe_frames(&mut self, subscription: FrameSubscription);

    /// Monotonic time in seconds
    fn now(&self) -> f64;

    /// Whether the input source supports smoothed scrolling
    fn supports_smoothing(&self) -> bool {
        true
    }
}

/// Full set of host capabilities
pub trait Host: Document + RenderTarget + FrameSource {}

impl<T: Document + RenderTarget + FrameSource> Host for T {}
