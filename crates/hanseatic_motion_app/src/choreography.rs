// SPDX-License-Identifier: MIT OR Apache-2.0
//! Motion choreography of the Hanseatic landing page.
//!
//! Each section gets one or more declarative bindings:
//! - Header and hero copy fade in on load
//! - Hero image scale is scrubbed while the hero scrolls away
//! - Materials, process copy, gallery grid and CTA reveal once on enter
//! - Process media opens with a clip reveal
//! - Gallery panels crossfade while the gallery is pinned

use hanseatic_motion::presets::{self, ClipReveal, Crossfade, Reveal};
use hanseatic_motion::{
    Document, ElementId, Host, MotionSession, Position, Property, Registration, Result, Scrub, SectionBinding,
    SegmentSpec, Target, TriggerConfig, TriggerEventKind,
};

/// Result of registering the site
#[derive(Debug, Default)]
pub struct SiteMotion {
    /// Registration per binding, in declaration order
    pub registrations: Vec<(String, Registration)>,
}

impl SiteMotion {
    /// Number of live timelines created
    pub fn timeline_count(&self) -> usize {
        self.registrations
            .iter()
            .filter(|(_, r)| r.timeline.is_some())
            .count()
    }

    /// Number of bindings rendered as final states
    pub fn final_state_count(&self) -> usize {
        self.registrations.iter().filter(|(_, r)| r.final_state).count()
    }

    /// Number of missing-target warnings
    pub fn skipped_count(&self) -> usize {
        self.registrations.iter().map(|(_, r)| r.skipped.len()).sum()
    }
}

/// Entrance fade on load with a short vertical settle
fn load_fade(name: &str, selector: &str, rise: f32, duration: f32, delay: f32) -> SectionBinding {
    SectionBinding::new(name)
        .segment(
            SegmentSpec::new(selector, Property::Opacity, 0.0, 1.0)
                .duration(duration)
                .at(Position::Start(delay)),
        )
        .segment(
            SegmentSpec::new(selector, Property::Y, rise, 0.0)
                .duration(duration)
                .at(Position::Start(delay)),
        )
}

/// Declare every binding of the page
pub fn site_bindings(root: ElementId, document: &impl Document) -> Result<Vec<SectionBinding>> {
    let mut bindings = vec![
        load_fade("header", ".site-header", -10.0, 1.6, 0.05),
        load_fade("hero-copy", ".hero-content", 16.0, 2.1, 0.15),
        presets::scale_scrub(
            "hero-image",
            ".hero",
            ".hero-media img",
            1.02,
            1.12,
            TriggerConfig::starting("top top")?
                .ending("bottom top")?
                .with_scrub(Scrub::Lag(1.2)),
        ),
        presets::fade_up(
            "materials",
            "#materials",
            ".material-card",
            Reveal::fade_up()
                .with_start("top 72%".parse()?)
                .with_stagger(0.12)
                .with_distance(20.0)
                .with_duration(1.7),
        ),
        presets::fade_up(
            "process-copy",
            ".process",
            ".process-copy > *",
            Reveal::fade_up()
                .with_start("top 75%".parse()?)
                .with_stagger(0.08)
                .with_distance(16.0)
                .with_duration(1.7),
        ),
        presets::clip_reveal(
            "process-media",
            ".process",
            ".process-media",
            ClipReveal {
                start: "top 72%".parse()?,
                end: "bottom 55%".parse()?,
                duration: 2.3,
                ..ClipReveal::default()
            },
        ),
    ];

    let panels: Vec<Target> = document
        .query(root, ".gallery-panel")
        .into_iter()
        .map(Target::Element)
        .collect();
    if !panels.is_empty() {
        bindings.push(
            presets::crossfade("gallery", ".gallery", &panels, Crossfade::default()).on_event(|event, _| {
                if matches!(event.kind, TriggerEventKind::Enter | TriggerEventKind::EnterBack) {
                    tracing::debug!(kind = ?event.kind, "Gallery pinned");
                }
            }),
        );
        bindings.push(presets::fade_in(
            "gallery-copy",
            ".gallery",
            ".gallery-copy",
            Reveal::fade_in().with_start("top 90%".parse()?),
        ));
    }

    bindings.push(presets::fade_up(
        "gallery-items",
        ".gallery-grid",
        ".gallery-item",
        Reveal::fade_up()
            .with_start("top 75%".parse()?)
            .with_stagger(0.14)
            .with_distance(32.0)
            .with_scale(0.96)
            .with_duration(1.8),
    ));
    for (index, item) in document.query(root, ".gallery-item").into_iter().enumerate() {
        if let Some(image) = document.query(item, ".gallery-item-media img").first() {
            bindings.push(presets::parallax(
                format!("gallery-item-{index}"),
                item,
                *image,
                20.0,
                Scrub::Lag(1.2),
            ));
        }
    }

    bindings.push(presets::fade_up(
        "cta",
        ".cta",
        ".cta-inner",
        Reveal::fade_up()
            .with_start("top 78%".parse()?)
            .with_distance(14.0)
            .with_duration(1.7),
    ));
    Ok(bindings)
}

/// Register the whole page on a mounted session
pub fn register_site(session: &mut MotionSession, root: ElementId, host: &mut impl Host) -> Result<SiteMotion> {
    let bindings = site_bindings(root, &*host)?;
    register_bindings(session, bindings, host)
}

/// Register `bindings` in order.
///
/// The first failure tears the session down with every registered timeline
/// at its end state, and the error is returned.
pub fn register_bindings(
    session: &mut MotionSession,
    bindings: Vec<SectionBinding>,
    host: &mut impl Host,
) -> Result<SiteMotion> {
    let mut site = SiteMotion::default();
    for binding in bindings {
        let name = binding.name.clone();
        match session.register(binding, host) {
            Ok(registration) => site.registrations.push((name, registration)),
            Err(err) => {
                tracing::error!(binding = %name, %err, "Site registration failed, settling motion");
                session.teardown_to_final_state(host);
                return Err(err);
            }
        }
    }
    tracing::info!(
        bindings = site.registrations.len(),
        timelines = site.timeline_count(),
        skipped = site.skipped_count(),
        "Registered site motion"
    );
    Ok(site)
}
