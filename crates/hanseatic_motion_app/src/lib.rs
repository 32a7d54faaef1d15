// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless Hanseatic landing page.
//!
//! Lays the page out in memory, declares its section choreography against
//! `hanseatic_motion`, and replays a synthetic scroll script frame by frame.

pub mod choreography;
pub mod driver;
pub mod page;

pub use choreography::{register_site, site_bindings, SiteMotion};
pub use driver::{run, DriverError, FrameReport, RunSummary, ScrollScript};
pub use page::HeadlessPage;
