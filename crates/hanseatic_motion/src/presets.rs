// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ready-made section bindings for recurring motion patterns.

use crate::binding::{SectionBinding, SegmentSpec, Target};
use crate::easing::Easing;
use crate::host::Property;
use crate::timeline::Position;
use crate::trigger::{ScrollPoint, Scrub, TriggerConfig};
use serde::{Deserialize, Serialize};

/// Entrance reveal played once when its trigger enters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reveal {
    /// Trigger start
    pub start: ScrollPoint,
    /// Vertical travel, 0 for a pure fade
    pub distance: f32,
    /// Starting scale, 1 for none
    pub scale: f32,
    /// Per-element duration
    pub duration: f32,
    /// Offset between matched elements
    pub stagger: f32,
    /// Easing curve
    pub easing: Easing,
    /// Fire only on the first enter
    pub once: bool,
}

impl Default for Reveal {
    fn default() -> Self {
        Self::fade_up()
    }
}

impl Reveal {
    /// Fade with a short rise
    pub fn fade_up() -> Self {
        Self {
            start: ScrollPoint::anchor(0.0, 0.8),
            distance: 18.0,
            scale: 1.0,
            duration: 1.6,
            stagger: 0.0,
            easing: Easing::Power2Out,
            once: true,
        }
    }

    /// Opacity only
    pub fn fade_in() -> Self {
        Self {
            start: ScrollPoint::anchor(0.0, 0.85),
            distance: 0.0,
            scale: 1.0,
            duration: 1.8,
            stagger: 0.0,
            easing: Easing::Power1Out,
            once: true,
        }
    }

    /// Set the trigger start
    pub fn with_start(mut self, start: ScrollPoint) -> Self {
        self.start = start;
        self
    }

    /// Set the vertical travel
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Set the starting scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Set the stagger
    pub fn with_stagger(mut self, stagger: f32) -> Self {
        self.stagger = stagger;
        self
    }

    fn trigger(&self) -> TriggerConfig {
        let config = TriggerConfig::new(self.start);
        if self.once {
            config.once()
        } else {
            config
        }
    }
}

/// Clip-path style reveal of a media block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipReveal {
    /// Trigger start
    pub start: ScrollPoint,
    /// Trigger end
    pub end: ScrollPoint,
    /// Duration of the reveal
    pub duration: f32,
    /// Easing curve
    pub easing: Easing,
}

impl Default for ClipReveal {
    fn default() -> Self {
        Self {
            start: ScrollPoint::anchor(0.0, 0.75),
            end: ScrollPoint::anchor(1.0, 0.6),
            duration: 2.2,
            easing: Easing::Power2Out,
        }
    }
}

/// Pinned, scrubbed crossfade through a stack of panels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crossfade {
    /// Hold before each cut
    pub pause: f32,
    /// Outgoing panel fade duration
    pub fade_out: f32,
    /// Incoming panel fade duration
    pub fade_in: f32,
    /// Scale of the first panel at rest
    pub first_scale: f32,
    /// Scale of waiting panels
    pub waiting_scale: f32,
    /// Scale an outgoing panel drifts to
    pub exit_scale: f32,
    /// Easing of every cut
    pub easing: Easing,
    /// Scrub lag
    pub scrub: Scrub,
    /// Minimum pinned scroll distance
    pub min_length: f32,
    /// Pinned scroll distance per panel
    pub length_per_panel: f32,
}

impl Default for Crossfade {
    fn default() -> Self {
        Self {
            pause: 0.35,
            fade_out: 1.1,
            fade_in: 1.2,
            first_scale: 1.01,
            waiting_scale: 1.04,
            exit_scale: 1.02,
            easing: Easing::Power1Out,
            scrub: Scrub::Lag(1.15),
            min_length: 2400.0,
            length_per_panel: 1200.0,
        }
    }
}

impl Crossfade {
    /// Pinned scroll distance for `panels` panels
    pub fn length(&self, panels: usize) -> f32 {
        self.min_length.max(panels as f32 * self.length_per_panel)
    }
}

/// Staggered fade-up of `targets` when `trigger` enters
pub fn fade_up(
    name: impl Into<String>,
    trigger: impl Into<Target>,
    targets: impl Into<Target>,
    reveal: Reveal,
) -> SectionBinding {
    let targets = targets.into();
    let mut binding = SectionBinding::new(name)
        .triggered_by(trigger, reveal.trigger())
        .segment(reveal_segment(targets.clone(), Property::Opacity, 0.0, &reveal));
    if reveal.distance != 0.0 {
        binding = binding.segment(reveal_segment(targets.clone(), Property::Y, reveal.distance, &reveal));
    }
    if reveal.scale != 1.0 {
        binding = binding.segment(reveal_segment(targets, Property::Scale, reveal.scale, &reveal));
    }
    binding
}

/// Opacity fade of `targets` when `trigger` enters
pub fn fade_in(
    name: impl Into<String>,
    trigger: impl Into<Target>,
    targets: impl Into<Target>,
    reveal: Reveal,
) -> SectionBinding {
    fade_up(name, trigger, targets, reveal.with_distance(0.0).with_scale(1.0))
}

fn reveal_segment(target: Target, property: Property, from: f32, reveal: &Reveal) -> SegmentSpec {
    let to = match property {
        Property::Opacity | Property::Scale => 1.0,
        _ => 0.0,
    };
    SegmentSpec::new(target, property, from, to)
        .duration(reveal.duration)
        .easing(reveal.easing)
        .stagger(reveal.stagger)
        .at(Position::Start(0.0))
}

/// Open a bottom clip inset on `target` when `trigger` enters
pub fn clip_reveal(
    name: impl Into<String>,
    trigger: impl Into<Target>,
    target: impl Into<Target>,
    reveal: ClipReveal,
) -> SectionBinding {
    SectionBinding::new(name)
        .triggered_by(trigger, TriggerConfig::new(reveal.start).with_end(reveal.end))
        .segment(
            SegmentSpec::new(target, Property::ClipInset, 100.0, 0.0)
                .duration(reveal.duration)
                .easing(reveal.easing),
        )
}

/// Drift `target` upward by `distance` while `trigger` crosses the viewport
pub fn parallax(
    name: impl Into<String>,
    trigger: impl Into<Target>,
    target: impl Into<Target>,
    distance: f32,
    scrub: Scrub,
) -> SectionBinding {
    let config = TriggerConfig::new(ScrollPoint::anchor(0.0, 1.0))
        .with_end(ScrollPoint::anchor(1.0, 0.0))
        .with_scrub(scrub);
    SectionBinding::new(name)
        .triggered_by(trigger, config)
        .segment(SegmentSpec::new(target, Property::Y, 0.0, -distance).easing(Easing::Linear))
}

/// Linear scale of `target` scrubbed across the `trigger` range
pub fn scale_scrub(
    name: impl Into<String>,
    trigger: impl Into<Target>,
    target: impl Into<Target>,
    from: f32,
    to: f32,
    config: TriggerConfig,
) -> SectionBinding {
    SectionBinding::new(name)
        .triggered_by(trigger, config)
        .segment(SegmentSpec::new(target, Property::Scale, from, to).easing(Easing::Linear))
}

/// Pin `trigger` and crossfade through `panels` in order while scrolling
pub fn crossfade(
    name: impl Into<String>,
    trigger: impl Into<Target>,
    panels: &[Target],
    params: Crossfade,
) -> SectionBinding {
    let config = TriggerConfig::new(ScrollPoint::anchor(0.0, 0.0))
        .with_end(ScrollPoint::AfterStart(params.length(panels.len())))
        .with_scrub(params.scrub)
        .pinned();
    let mut binding = SectionBinding::new(name)
        .triggered_by(trigger, config)
        .easing(params.easing);

    for (index, panel) in panels.iter().enumerate() {
        let (opacity, scale) = if index == 0 {
            (1.0, params.first_scale)
        } else {
            (0.0, params.waiting_scale)
        };
        binding = binding
            .segment(SegmentSpec::set(panel.clone(), Property::Opacity, opacity).at(Position::Start(0.0)))
            .segment(SegmentSpec::set(panel.clone(), Property::Scale, scale).at(Position::Start(0.0)));
    }

    for (index, pair) in panels.windows(2).enumerate() {
        let (outgoing, incoming) = (&pair[0], &pair[1]);
        let resting = if index == 0 { params.first_scale } else { 1.0 };
        binding = binding
            .segment(
                SegmentSpec::new(outgoing.clone(), Property::Opacity, 1.0, 0.0)
                    .duration(params.fade_out)
                    .at(Position::End(params.pause)),
            )
            .segment(
                SegmentSpec::new(outgoing.clone(), Property::Scale, resting, params.exit_scale)
                    .duration(params.fade_out)
                    .at(Position::WithPrevious(0.0)),
            )
            .segment(
                SegmentSpec::new(incoming.clone(), Property::Opacity, 0.0, 1.0)
                    .duration(params.fade_in)
                    .at(Position::WithPrevious(0.0)),
            )
            .segment(
                SegmentSpec::new(incoming.clone(), Property::Scale, params.waiting_scale, 1.0)
                    .duration(params.fade_in)
                    .at(Position::WithPrevious(0.0)),
            );
    }
    binding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ElementId;
    use crate::testing::FakeHost;
    use crate::timeline::{Drive, Sample, Timeline};

    const ROOT: ElementId = ElementId(0);

    fn value(samples: &[Sample], target: ElementId, property: Property) -> f32 {
        samples
            .iter()
            .find(|s| s.target == target && s.property == property)
            .map(|s| s.value)
            .unwrap_or(f32::NAN)
    }

    fn gallery() -> (FakeHost, Vec<ElementId>) {
        let mut host = FakeHost::new(800.0);
        host.block(".intro", 800.0);
        let gallery = host.block(".gallery", 800.0);
        let panels = (0..3)
            .map(|i| host.child(gallery, &format!(".panel-{i}"), 0.0, 800.0))
            .collect();
        host.block(".footer", 800.0);
        (host, panels)
    }

    fn first_step(rows: &[Vec<f32>], from: usize, reached: impl Fn(&[f32]) -> bool) -> Option<usize> {
        (from..rows.len()).find(|step| reached(rows[*step].as_slice()))
    }

    fn timeline(binding: &SectionBinding, host: &FakeHost, drive: Drive) -> Timeline {
        binding
            .resolve(ROOT, host, Easing::Power2Out)
            .build_timeline(drive)
            .unwrap()
    }

    #[test]
    fn test_crossfade_endpoints() {
        let (host, panels) = gallery();
        let targets: Vec<Target> = panels.iter().map(|p| Target::Element(*p)).collect();
        let binding = crossfade("gallery", ".gallery", &targets, Crossfade::default());
        let mut tl = timeline(&binding, &host, Drive::Scrub);

        assert!((tl.duration() - 3.1).abs() < 1e-5);

        tl.seek(0.0);
        let start = tl.sample();
        assert_eq!(value(&start, panels[0], Property::Opacity), 1.0);
        assert_eq!(value(&start, panels[0], Property::Scale), 1.01);
        assert_eq!(value(&start, panels[1], Property::Opacity), 0.0);
        assert_eq!(value(&start, panels[2], Property::Opacity), 0.0);
        assert_eq!(value(&start, panels[2], Property::Scale), 1.04);

        tl.seek(1.0);
        let end = tl.sample();
        assert_eq!(value(&end, panels[0], Property::Opacity), 0.0);
        assert_eq!(value(&end, panels[1], Property::Opacity), 0.0);
        assert_eq!(value(&end, panels[2], Property::Opacity), 1.0);
        assert_eq!(value(&end, panels[2], Property::Scale), 1.0);
        assert_eq!(value(&end, panels[0], Property::Scale), 1.02);
    }

    #[test]
    fn test_crossfade_holds_between_cuts() {
        let (host, panels) = gallery();
        let targets: Vec<Target> = panels.iter().map(|p| Target::Element(*p)).collect();
        let tl = timeline(
            &crossfade("gallery", ".gallery", &targets, Crossfade::default()),
            &host,
            Drive::Scrub,
        );
        // first cut finished, second not started
        let held = tl.sample_at(1.7);
        assert_eq!(value(&held, panels[0], Property::Opacity), 0.0);
        assert_eq!(value(&held, panels[1], Property::Opacity), 1.0);
        assert_eq!(value(&held, panels[2], Property::Opacity), 0.0);
    }

    #[test]
    fn test_crossfade_handoff_sweep() {
        const STEPS: usize = 200;
        const EPS: f32 = 1e-4;
        let (host, panels) = gallery();
        let targets: Vec<Target> = panels.iter().map(|p| Target::Element(*p)).collect();
        let mut tl = timeline(
            &crossfade("gallery", ".gallery", &targets, Crossfade::default()),
            &host,
            Drive::Scrub,
        );

        let opacity: Vec<Vec<f32>> = (0..=STEPS)
            .map(|step| {
                tl.seek(step as f32 / STEPS as f32);
                let samples = tl.sample();
                panels.iter().map(|p| value(&samples, *p, Property::Opacity)).collect()
            })
            .collect();

        for out in 0..panels.len() - 1 {
            let inc = out + 1;
            let start = first_step(&opacity, 0, |o| o[inc] > 0.0).unwrap();
            let faded_in = first_step(&opacity, start, |o| o[inc] >= 1.0 - EPS).unwrap();
            let faded_out = first_step(&opacity, start, |o| o[out] <= EPS).unwrap();
            assert!(faded_out <= faded_in, "panel {out} still visible when panel {inc} completes");

            for step in start..faded_in {
                let (now, next) = (&opacity[step], &opacity[step + 1]);
                assert!(next[out] <= now[out] + 1e-6, "panel {out} brightened at step {step}");
                assert!(next[inc] + 1e-6 >= now[inc], "panel {inc} dimmed at step {step}");
            }
        }

        // the first panel only ever fades out and the last only fades in
        let last = panels.len() - 1;
        for pair in opacity.windows(2) {
            assert!(pair[1][0] <= pair[0][0] + 1e-6);
            assert!(pair[1][last] + 1e-6 >= pair[0][last]);
        }
    }

    #[test]
    fn test_crossfade_trigger_length() {
        let params = Crossfade::default();
        assert_eq!(params.length(1), 2400.0);
        assert_eq!(params.length(3), 3600.0);

        let binding = crossfade("gallery", ".gallery", &[Target::from(".panel-0")], params);
        let trigger = binding.trigger.unwrap().config;
        assert!(trigger.pin);
        assert_eq!(trigger.scrub, Scrub::Lag(1.15));
        assert_eq!(trigger.end, Some(ScrollPoint::AfterStart(2400.0)));
    }

    #[test]
    fn test_fade_up_stagger() {
        let mut host = FakeHost::new(800.0);
        let section = host.block("#materials", 900.0);
        for i in 0..4 {
            host.child(section, ".material-card", i as f32 * 200.0, 180.0);
        }
        let binding = fade_up(
            "materials",
            "#materials",
            ".material-card",
            Reveal::fade_up()
                .with_start("top 72%".parse().unwrap())
                .with_stagger(0.12)
                .with_distance(20.0)
                .with_duration(1.7),
        );
        let resolved = binding.resolve(ROOT, &host, Easing::Power2Out);
        assert_eq!(resolved.segment_count(), 8);
        let tl = resolved.build_timeline(Drive::Time).unwrap();
        assert!((tl.duration() - (0.36 + 1.7)).abs() < 1e-4);

        let config = resolved.trigger.unwrap().1;
        assert!(config.once);
        assert_eq!(config.start, ScrollPoint::anchor(0.0, 0.72));
    }

    #[test]
    fn test_fade_up_with_scale() {
        let binding = fade_up(
            "items",
            ".gallery",
            ".gallery-item",
            Reveal::fade_up().with_distance(32.0).with_scale(0.96),
        );
        assert_eq!(binding.steps.len(), 3);
    }

    #[test]
    fn test_fade_in_has_no_travel() {
        let binding = fade_in("copy", ".gallery", ".gallery-copy", Reveal::fade_in());
        assert_eq!(binding.steps.len(), 1);
        let config = binding.trigger.unwrap().config;
        assert_eq!(config.start, ScrollPoint::anchor(0.0, 0.85));
    }

    #[test]
    fn test_clip_reveal_final_state() {
        let mut host = FakeHost::new(800.0);
        host.block(".process", 1000.0);
        let media = host.block(".process-media", 600.0);
        let binding = clip_reveal("media", ".process", ".process-media", ClipReveal::default());
        let values = binding.resolve(ROOT, &host, Easing::Power2Out).final_values().unwrap();
        assert_eq!(value(&values, media, Property::ClipInset), 0.0);
    }

    #[test]
    fn test_parallax_range() {
        let mut host = FakeHost::new(800.0);
        host.block(".intro", 1000.0);
        let item = host.block(".gallery-item", 400.0);
        let image = host.child(item, ".gallery-item-media img", 0.0, 400.0);
        let resolved = parallax("item", item, image, 20.0, Scrub::Lag(1.2)).resolve(ROOT, &host, Easing::Power2Out);
        let (element, config) = resolved.trigger.unwrap();
        assert_eq!(element, item);
        // top of item at viewport bottom through bottom of item at viewport top
        assert_eq!(config.resolve(crate::host::Rect::new(1000.0, 0.0, 1280.0, 400.0), 800.0).unwrap(), (200.0, 1400.0));
        let mut tl = resolved.build_timeline(Drive::Scrub).unwrap();
        tl.seek(0.5);
        assert_eq!(value(&tl.sample(), image, Property::Y), -10.0);
    }

    #[test]
    fn test_scale_scrub() {
        let mut host = FakeHost::new(800.0);
        let hero = host.block(".hero", 800.0);
        let image = host.child(hero, ".hero-media img", 0.0, 800.0);
        let config = TriggerConfig::starting("top top")
            .unwrap()
            .ending("bottom top")
            .unwrap()
            .with_scrub(Scrub::Lag(1.2));
        let binding = scale_scrub("hero", ".hero", ".hero-media img", 1.02, 1.12, config);
        let mut tl = timeline(&binding, &host, Drive::Scrub);
        tl.seek(0.0);
        assert_eq!(value(&tl.sample(), image, Property::Scale), 1.02);
        tl.seek(1.0);
        assert!((value(&tl.sample(), image, Property::Scale) - 1.12).abs() < 1e-6);
    }
}
