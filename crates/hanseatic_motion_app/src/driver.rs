// SPDX-License-Identifier: MIT OR Apache-2.0
//! Synthetic scroll replay against the headless page.

use crate::choreography::{self, SiteMotion};
use crate::page::{HeadlessPage, ROOT};
use hanseatic_motion::{
    ConfigError, Document, FrameSource, HostEvent, MotionConfig, MotionError, MotionMode, MotionSession, Property,
};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Driver errors
#[derive(Debug, Error)]
pub enum DriverError {
    /// Engine error
    #[error(transparent)]
    Motion(#[from] MotionError),
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Report serialization failed
    #[error("Failed to encode frame report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Scroll script parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollScript {
    /// Frames to simulate
    pub frames: usize,
    /// Raw scroll input per frame; direction flips at either end of the page
    pub scroll_step: f32,
    /// Emit a report every this many frames, 0 for none
    pub sample_every: usize,
    /// Seconds per frame
    pub frame_time: f64,
}

impl Default for ScrollScript {
    fn default() -> Self {
        Self {
            frames: 900,
            scroll_step: 24.0,
            sample_every: 30,
            frame_time: 1.0 / 60.0,
        }
    }
}

/// Snapshot of one simulated frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// Frame index
    pub frame: usize,
    /// Synthetic clock
    pub time: f64,
    /// Smoothed scroll position
    pub position: f32,
    /// Raw scroll position
    pub raw_position: f32,
    /// Registered triggers
    pub triggers: usize,
    /// Engaged pins
    pub pinned: usize,
    /// Tracked property values
    pub values: IndexMap<String, f32>,
}

/// Outcome of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Render mode chosen at mount
    pub mode: String,
    /// Frames simulated
    pub frames: usize,
    /// Timelines created at registration
    pub timelines: usize,
    /// Bindings applied as final states
    pub final_states: usize,
    /// Missing-target warnings
    pub skipped: usize,
    /// Most pins engaged at once
    pub max_pinned: usize,
    /// Property writes issued
    pub writes: u64,
    /// Final smoothed position
    pub final_position: f32,
    /// Whether the second teardown was a no-op
    pub repeat_teardown_ignored: bool,
}

const TRACKED: &[(&str, usize, Property)] = &[
    (".site-header", 0, Property::Opacity),
    (".hero-media img", 0, Property::Scale),
    (".material-card", 0, Property::Opacity),
    (".material-card", 3, Property::Opacity),
    (".process-media", 0, Property::ClipInset),
    (".gallery-panel", 0, Property::Opacity),
    (".gallery-panel", 1, Property::Opacity),
    (".gallery-panel", 2, Property::Opacity),
    (".gallery-item-media img", 0, Property::Y),
    (".cta-inner", 0, Property::Opacity),
];

fn snapshot(frame: usize, page: &HeadlessPage, session: &MotionSession) -> FrameReport {
    let state = session.scroll_state();
    let values = TRACKED
        .iter()
        .filter_map(|(selector, index, property)| {
            page.value_of(selector, *index, *property)
                .map(|value| (format!("{selector}[{index}].{property}"), value))
        })
        .collect();
    FrameReport {
        frame,
        time: page.now(),
        position: state.smoothed_position,
        raw_position: state.raw_position,
        triggers: session.registry().len(),
        pinned: page.pinned_count(),
        values,
    }
}

/// Mount, register the site, replay `script` and tear down.
///
/// `on_report` receives every sampled frame. The session is torn down on
/// every path once mounted, including failed registration and report errors.
pub fn run(
    page: &mut HeadlessPage,
    config: MotionConfig,
    script: &ScrollScript,
    mut on_report: impl FnMut(&FrameReport) -> Result<(), DriverError>,
) -> Result<RunSummary, DriverError> {
    let mut session = MotionSession::on_mount(ROOT, config, page)?;
    let site: SiteMotion = choreography::register_site(&mut session, ROOT, page)?;

    if page.decode_images() {
        session.handle_event(HostEvent::Load, page);
    }

    let replayed = replay(&mut session, page, script, &mut on_report);
    let mode = session.mode();
    let final_position = session.scroll_state().smoothed_position;
    let stats = session.stats();
    session.teardown(page);
    let repeat_teardown_ignored = !session.teardown(page);
    let max_pinned = replayed?;

    let summary = RunSummary {
        mode: mode_name(mode).to_string(),
        frames: script.frames,
        timelines: site.timeline_count(),
        final_states: site.final_state_count(),
        skipped: site.skipped_count(),
        max_pinned,
        writes: page.write_count(),
        final_position,
        repeat_teardown_ignored,
    };
    tracing::info!(
        mode = %summary.mode,
        frames = stats.frames,
        writes = summary.writes,
        deactivated = stats.deactivated,
        "Run complete"
    );
    Ok(summary)
}

/// Bouncing scroll replay; returns the most pins held at once
fn replay(
    session: &mut MotionSession,
    page: &mut HeadlessPage,
    script: &ScrollScript,
    on_report: &mut impl FnMut(&FrameReport) -> Result<(), DriverError>,
) -> Result<usize, DriverError> {
    let mut step = script.scroll_step;
    let mut max_pinned = 0;
    for frame in 0..script.frames {
        page.advance_clock(script.frame_time);

        let raw = session.scroll_state().raw_position;
        if (step > 0.0 && raw >= page.scroll_limit()) || (step < 0.0 && raw <= 0.0) {
            step = -step;
            tracing::debug!(frame, raw, "Scroll direction reversed");
        }
        session.handle_event(HostEvent::Scroll(step), page);
        session.frame(page);

        max_pinned = max_pinned.max(page.pinned_count());
        if script.sample_every > 0 && frame % script.sample_every == 0 {
            on_report(&snapshot(frame, page, session))?;
        }
    }
    Ok(max_pinned)
}

fn mode_name(mode: MotionMode) -> &'static str {
    match mode {
        MotionMode::Animated => "animated",
        MotionMode::ReducedMotion => "reduced-motion",
        MotionMode::Degraded => "degraded",
    }
}
