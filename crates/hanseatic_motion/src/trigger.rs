// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewport trigger registry.
//!
//! A trigger binds an element's geometry to a scroll range. Its start and end
//! are authored as scroll points (`"top 80%"` means the element's top crosses
//! 80% of the viewport height) and resolved to absolute scroll positions
//! whenever the registry is refreshed. Every update turns the current virtual
//! scroll position into a clamped progress value plus boundary events.

use crate::error::{MotionError, Result};
use crate::host::{Document, ElementId, Rect};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// End point used when a trigger does not author one
pub const DEFAULT_END: ScrollPoint = ScrollPoint::Anchor {
    element: 1.0,
    viewport: 0.0,
};

/// Unique identifier for a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub Uuid);

impl TriggerId {
    /// Create a new random trigger ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TriggerId {
    fn default() -> Self {
        Self::new()
    }
}

/// A point on the scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScrollPoint {
    /// A fraction of the element's height meets a fraction of the viewport
    Anchor {
        /// 0 = element top, 1 = element bottom
        element: f32,
        /// 0 = viewport top, 1 = viewport bottom
        viewport: f32,
    },
    /// Absolute scroll position
    Absolute(f32),
    /// Distance after the resolved start; only valid as an end point
    AfterStart(f32),
}

impl ScrollPoint {
    /// Anchor point helper
    pub fn anchor(element: f32, viewport: f32) -> Self {
        Self::Anchor { element, viewport }
    }

    /// Resolve against element bounds and the viewport height
    pub fn resolve(&self, bounds: Rect, viewport_height: f32, start: f32) -> f32 {
        match *self {
            Self::Anchor { element, viewport } => {
                bounds.top + element * bounds.height - viewport * viewport_height
            }
            Self::Absolute(position) => position,
            Self::AfterStart(distance) => start + distance,
        }
    }
}

fn parse_edge(token: &str) -> Option<f32> {
    match token {
        "top" => Some(0.0),
        "center" => Some(0.5),
        "bottom" => Some(1.0),
        _ => {
            let percent = token.strip_suffix('%')?;
            percent.parse::<f32>().ok().map(|p| p / 100.0)
        }
    }
}

fn format_edge(fraction: f32) -> String {
    if fraction == 0.0 {
        "top".to_string()
    } else if fraction == 0.5 {
        "center".to_string()
    } else if fraction == 1.0 {
        "bottom".to_string()
    } else {
        format!("{}%", (fraction * 1000.0).round() / 10.0)
    }
}

impl FromStr for ScrollPoint {
    type Err = MotionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(distance) = s.strip_prefix("+=") {
            return distance
                .trim()
                .parse()
                .map(Self::AfterStart)
                .map_err(|_| MotionError::parse("scroll point", s));
        }
        if let Ok(position) = s.parse::<f32>() {
            return Ok(Self::Absolute(position));
        }

        let mut tokens = s.split_whitespace();
        let element = tokens.next().and_then(parse_edge);
        let viewport = tokens.next().and_then(parse_edge);
        match (element, viewport, tokens.next()) {
            (Some(element), Some(viewport), None) => Ok(Self::Anchor { element, viewport }),
            _ => Err(MotionError::parse("scroll point", s)),
        }
    }
}

impl fmt::Display for ScrollPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Anchor { element, viewport } => {
                write!(f, "{} {}", format_edge(element), format_edge(viewport))
            }
            Self::Absolute(position) => write!(f, "{position}"),
            Self::AfterStart(distance) => write!(f, "+={distance}"),
        }
    }
}

impl TryFrom<String> for ScrollPoint {
    type Error = MotionError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScrollPoint> for String {
    fn from(point: ScrollPoint) -> Self {
        point.to_string()
    }
}

/// How a bound timeline follows trigger progress
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Scrub {
    /// Not scrubbed; the timeline plays by time when the trigger enters
    #[default]
    Off,
    /// The timeline position equals trigger progress
    Immediate,
    /// The timeline chases trigger progress, settling in this many time units
    Lag(f32),
}

impl Scrub {
    /// Whether the trigger drives its timeline by progress
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Declarative trigger configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Start point
    pub start: ScrollPoint,
    /// End point, [`DEFAULT_END`] when absent
    pub end: Option<ScrollPoint>,
    /// Unregister after the first enter
    pub once: bool,
    /// Scrub mode
    pub scrub: Scrub,
    /// Pin the element while the trigger is active
    pub pin: bool,
}

impl TriggerConfig {
    /// Create a config starting at a point
    pub fn new(start: ScrollPoint) -> Self {
        Self {
            start,
            end: None,
            once: false,
            scrub: Scrub::Off,
            pin: false,
        }
    }

    /// Create a config from an authored start string
    pub fn starting(start: &str) -> Result<Self> {
        Ok(Self::new(start.parse()?))
    }

    /// Set the end point
    pub fn with_end(mut self, end: ScrollPoint) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the end point from an authored string
    pub fn ending(self, end: &str) -> Result<Self> {
        Ok(self.with_end(end.parse()?))
    }

    /// Fire only the first enter
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Set the scrub mode
    pub fn with_scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }

    /// Pin the element
    pub fn pinned(mut self) -> Self {
        self.pin = true;
        self
    }

    /// Whether the range must be well ordered
    fn requires_ordered_range(&self) -> bool {
        self.pin || self.scrub.is_enabled()
    }

    /// Resolve the scroll range against current geometry
    pub fn resolve(&self, bounds: Rect, viewport_height: f32) -> Result<(f32, f32)> {
        if let ScrollPoint::AfterStart(_) = self.start {
            return Err(MotionError::InvalidScrollPoint(self.start.to_string()));
        }
        let start = self.start.resolve(bounds, viewport_height, 0.0);
        let end = self
            .end
            .unwrap_or(DEFAULT_END)
            .resolve(bounds, viewport_height, start);

        if self.requires_ordered_range() && start > end {
            return Err(MotionError::InvalidRange { start, end });
        }
        Ok((start, end))
    }
}

/// Boundary or progress notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEventKind {
    /// Scrolling forward past the start
    Enter,
    /// Scrolling forward past the end
    Leave,
    /// Scrolling backward past the end
    EnterBack,
    /// Scrolling backward past the start
    LeaveBack,
    /// Progress changed on a scrubbed trigger
    Progress,
}

/// Event emitted by a registry update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerEvent {
    /// Source trigger
    pub trigger: TriggerId,
    /// Event kind
    pub kind: TriggerEventKind,
    /// Progress at the time of the event
    pub progress: f32,
}

/// Where the scroll position sits relative to a trigger range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Before,
    Active,
    After,
}

/// Progress of `position` through `[start, end]`.
///
/// A zero-length range is a step: 0 below start, 1 at or above it.
pub fn compute_progress(position: f32, start: f32, end: f32) -> f32 {
    if end <= start {
        return if position >= start { 1.0 } else { 0.0 };
    }
    ((position - start) / (end - start)).clamp(0.0, 1.0)
}

fn region_of(position: f32, start: f32, end: f32) -> Region {
    if position < start {
        Region::Before
    } else if position < end {
        Region::Active
    } else {
        Region::After
    }
}

fn crossings(from: Region, to: Region) -> &'static [TriggerEventKind] {
    use TriggerEventKind::*;
    match (from, to) {
        (Region::Before, Region::Active) => &[Enter],
        (Region::Before, Region::After) => &[Enter, Leave],
        (Region::Active, Region::After) => &[Leave],
        (Region::After, Region::Active) => &[EnterBack],
        (Region::After, Region::Before) => &[EnterBack, LeaveBack],
        (Region::Active, Region::Before) => &[LeaveBack],
        _ => &[],
    }
}

/// A registered trigger
#[derive(Debug, Clone)]
struct TriggerEntry {
    element: ElementId,
    config: TriggerConfig,
    start: f32,
    end: f32,
    progress: f32,
    /// None until the first update
    region: Option<Region>,
    /// Range moved since the last update
    stale: bool,
}

/// Registry of active triggers
#[derive(Debug, Default)]
pub struct TriggerRegistry {
    entries: IndexMap<TriggerId, TriggerEntry>,
    /// Last position passed to `update`
    position: f32,
}

impl TriggerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger, resolving its range against current geometry
    pub fn register(
        &mut self,
        element: ElementId,
        config: TriggerConfig,
        document: &(impl Document + ?Sized),
    ) -> Result<TriggerId> {
        let bounds = document.bounds(element)?;
        let (start, end) = config.resolve(bounds, document.viewport_height())?;

        let id = TriggerId::new();
        self.entries.insert(
            id,
            TriggerEntry {
                element,
                config,
                start,
                end,
                progress: compute_progress(self.position, start, end),
                region: None,
                stale: false,
            },
        );
        tracing::debug!(?id, %element, start, end, "Registered trigger");
        Ok(id)
    }

    /// Remove a trigger. Unknown handles are ignored.
    pub fn unregister(&mut self, id: TriggerId) -> bool {
        self.entries.shift_remove(&id).is_some()
    }

    /// Remove every trigger
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Re-resolve every range against current geometry.
    ///
    /// Triggers whose geometry can no longer be read, or whose range became
    /// invalid, are deactivated and returned with the reason.
    pub fn refresh(&mut self, document: &(impl Document + ?Sized)) -> Vec<(TriggerId, MotionError)> {
        let viewport_height = document.viewport_height();
        let mut failed = Vec::new();

        for (id, entry) in &mut self.entries {
            let resolved = document
                .bounds(entry.element)
                .and_then(|bounds| entry.config.resolve(bounds, viewport_height));
            match resolved {
                Ok((start, end)) => {
                    entry.start = start;
                    entry.end = end;
                    entry.progress = compute_progress(self.position, start, end);
                    entry.stale = true;
                }
                Err(err) => failed.push((*id, err)),
            }
        }

        for (id, err) in &failed {
            tracing::warn!(?id, %err, "Deactivating trigger after refresh failure");
            self.entries.shift_remove(id);
        }
        failed
    }

    /// Recompute progress for `position` and collect boundary events
    pub fn update(&mut self, position: f32) -> Vec<TriggerEvent> {
        self.position = position;
        let mut events = Vec::new();
        let mut spent = Vec::new();

        for (id, entry) in &mut self.entries {
            let progress = compute_progress(position, entry.start, entry.end);
            let region = region_of(position, entry.start, entry.end);
            let previous = entry.region.unwrap_or(Region::Before);
            let first_update = entry.region.is_none();

            for kind in crossings(previous, region) {
                events.push(TriggerEvent {
                    trigger: *id,
                    kind: *kind,
                    progress,
                });
                if entry.config.once && *kind == TriggerEventKind::Enter {
                    spent.push(*id);
                    break;
                }
            }

            if entry.config.scrub.is_enabled() && (first_update || entry.stale || progress != entry.progress) {
                events.push(TriggerEvent {
                    trigger: *id,
                    kind: TriggerEventKind::Progress,
                    progress,
                });
            }

            entry.progress = progress;
            entry.region = Some(region);
            entry.stale = false;
        }

        for id in spent {
            tracing::trace!(?id, "Once trigger fired, unregistering");
            self.entries.shift_remove(&id);
        }
        events
    }

    /// Current progress of a trigger
    pub fn progress(&self, id: TriggerId) -> Option<f32> {
        self.entries.get(&id).map(|e| e.progress)
    }

    /// Resolved scroll range of a trigger
    pub fn range(&self, id: TriggerId) -> Option<(f32, f32)> {
        self.entries.get(&id).map(|e| (e.start, e.end))
    }

    /// Element observed by a trigger
    pub fn element(&self, id: TriggerId) -> Option<ElementId> {
        self.entries.get(&id).map(|e| e.element)
    }

    /// Configuration of a trigger
    pub fn config(&self, id: TriggerId) -> Option<&TriggerConfig> {
        self.entries.get(&id).map(|e| &e.config)
    }

    /// Whether a trigger is registered
    pub fn contains(&self, id: TriggerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// All registered trigger IDs
    pub fn ids(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.entries.keys().copied()
    }

    /// Number of registered triggers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no triggers are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    fn absolute(start: f32, end: f32) -> TriggerConfig {
        TriggerConfig::new(ScrollPoint::Absolute(start)).with_end(ScrollPoint::Absolute(end))
    }

    fn kinds(events: &[TriggerEvent]) -> Vec<TriggerEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_parse_scroll_points() {
        assert_eq!(
            "top 80%".parse::<ScrollPoint>().unwrap(),
            ScrollPoint::anchor(0.0, 0.8)
        );
        assert_eq!(
            "bottom top".parse::<ScrollPoint>().unwrap(),
            ScrollPoint::anchor(1.0, 0.0)
        );
        assert_eq!(
            "center center".parse::<ScrollPoint>().unwrap(),
            ScrollPoint::anchor(0.5, 0.5)
        );
        assert_eq!("1200".parse::<ScrollPoint>().unwrap(), ScrollPoint::Absolute(1200.0));
        assert_eq!("+=2400".parse::<ScrollPoint>().unwrap(), ScrollPoint::AfterStart(2400.0));
        assert!("top".parse::<ScrollPoint>().is_err());
        assert!("top middle".parse::<ScrollPoint>().is_err());
        assert!("+=far".parse::<ScrollPoint>().is_err());
        assert_eq!(ScrollPoint::anchor(0.0, 0.72).to_string(), "top 72%");
    }

    #[test]
    fn test_resolve_anchor() {
        let bounds = Rect::new(1000.0, 0.0, 800.0, 600.0);
        let point: ScrollPoint = "top 80%".parse().unwrap();
        assert_eq!(point.resolve(bounds, 1000.0, 0.0), 200.0);
        assert_eq!(DEFAULT_END.resolve(bounds, 1000.0, 0.0), 1600.0);
    }

    #[test]
    fn test_progress_scenario() {
        let mut host = FakeHost::new(800.0);
        let el = host.block(".section", 400.0);
        let mut registry = TriggerRegistry::new();
        let id = registry.register(el, absolute(100.0, 300.0), &host).unwrap();

        registry.update(200.0);
        assert_eq!(registry.progress(id), Some(0.5));
    }

    #[test]
    fn test_progress_clamped_and_monotonic() {
        let mut host = FakeHost::new(800.0);
        let el = host.block(".section", 400.0);
        let mut registry = TriggerRegistry::new();
        let id = registry.register(el, absolute(100.0, 300.0), &host).unwrap();

        registry.update(0.0);
        assert_eq!(registry.progress(id), Some(0.0));
        registry.update(99.9);
        assert_eq!(registry.progress(id), Some(0.0));

        let mut previous = 0.0;
        for step in 0..=400 {
            registry.update(step as f32);
            let progress = registry.progress(id).unwrap();
            assert!(progress >= previous);
            previous = progress;
        }
        registry.update(300.0);
        assert_eq!(registry.progress(id), Some(1.0));
        registry.update(1000.0);
        assert_eq!(registry.progress(id), Some(1.0));
    }

    #[test]
    fn test_zero_length_is_step() {
        let mut host = FakeHost::new(800.0);
        let el = host.block(".section", 400.0);
        let mut registry = TriggerRegistry::new();
        let config = absolute(150.0, 150.0).with_scrub(Scrub::Immediate);
        let id = registry.register(el, config, &host).unwrap();

        registry.update(149.0);
        assert_eq!(registry.progress(id), Some(0.0));
        registry.update(150.0);
        assert_eq!(registry.progress(id), Some(1.0));
        assert!(registry.progress(id).unwrap().is_finite());
    }

    #[test]
    fn test_rejects_inverted_scrub_range() {
        let mut host = FakeHost::new(800.0);
        let el = host.block(".section", 400.0);
        let mut registry = TriggerRegistry::new();

        let scrubbed = absolute(300.0, 100.0).with_scrub(Scrub::Lag(1.0));
        let err = registry.register(el, scrubbed, &host).unwrap_err();
        assert!(matches!(err, MotionError::InvalidRange { .. }));

        let pinned = absolute(300.0, 100.0).pinned();
        assert!(registry.register(el, pinned, &host).unwrap_err().is_configuration());

        // Plain toggle triggers tolerate it
        assert!(registry.register(el, absolute(300.0, 100.0), &host).is_ok());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rejects_relative_start() {
        let mut host = FakeHost::new(800.0);
        let el = host.block(".section", 400.0);
        let mut registry = TriggerRegistry::new();
        let config = TriggerConfig::new(ScrollPoint::AfterStart(10.0));
        assert!(matches!(
            registry.register(el, config, &host),
            Err(MotionError::InvalidScrollPoint(_))
        ));
    }

    #[test]
    fn test_relative_end() {
        let mut host = FakeHost::new(800.0);
        let _above = host.block(".above", 500.0);
        let el = host.block(".gallery", 800.0);
        let mut registry = TriggerRegistry::new();
        let config = TriggerConfig::starting("top top")
            .unwrap()
            .ending("+=2400")
            .unwrap();
        let id = registry.register(el, config, &host).unwrap();
        assert_eq!(registry.range(id), Some((500.0, 2900.0)));
    }

    #[test]
    fn test_boundary_events() {
        let mut host = FakeHost::new(800.0);
        let el = host.block(".section", 400.0);
        let mut registry = TriggerRegistry::new();
        registry.register(el, absolute(100.0, 300.0), &host).unwrap();

        assert!(registry.update(50.0).is_empty());
        assert_eq!(kinds(&registry.update(150.0)), vec![TriggerEventKind::Enter]);
        assert!(registry.update(200.0).is_empty());
        assert_eq!(kinds(&registry.update(350.0)), vec![TriggerEventKind::Leave]);
        assert_eq!(kinds(&registry.update(250.0)), vec![TriggerEventKind::EnterBack]);
        assert_eq!(kinds(&registry.update(10.0)), vec![TriggerEventKind::LeaveBack]);
        assert_eq!(
            kinds(&registry.update(500.0)),
            vec![TriggerEventKind::Enter, TriggerEventKind::Leave]
        );
        assert_eq!(
            kinds(&registry.update(0.0)),
            vec![TriggerEventKind::EnterBack, TriggerEventKind::LeaveBack]
        );
    }

    #[test]
    fn test_once_fires_enter_exactly_once() {
        let mut host = FakeHost::new(800.0);
        let el = host.block(".section", 400.0);
        let mut registry = TriggerRegistry::new();
        let id = registry
            .register(el, absolute(100.0, 300.0).once(), &host)
            .unwrap();

        let mut enters = 0;
        for position in [0.0, 150.0, 0.0, 150.0, 400.0, 0.0, 200.0, 500.0] {
            enters += registry
                .update(position)
                .iter()
                .filter(|e| e.kind == TriggerEventKind::Enter)
                .count();
        }
        assert_eq!(enters, 1);
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_scrub_progress_stream() {
        let mut host = FakeHost::new(800.0);
        let el = host.block(".section", 400.0);
        let mut registry = TriggerRegistry::new();
        let id = registry
            .register(el, absolute(100.0, 300.0).with_scrub(Scrub::Immediate), &host)
            .unwrap();

        let events = registry.update(0.0);
        assert_eq!(kinds(&events), vec![TriggerEventKind::Progress]);
        assert!(registry.update(0.0).is_empty());

        let events = registry.update(200.0);
        let progress: Vec<_> = events
            .iter()
            .filter(|e| e.kind == TriggerEventKind::Progress)
            .map(|e| (e.trigger, e.progress))
            .collect();
        assert_eq!(progress, vec![(id, 0.5)]);
    }

    #[test]
    fn test_refresh_idempotent() {
        let mut host = FakeHost::new(800.0);
        let _spacer = host.block(".spacer", 900.0);
        let el = host.block(".section", 600.0);
        let mut registry = TriggerRegistry::new();
        let config = TriggerConfig::starting("top 80%")
            .unwrap()
            .ending("bottom 20%")
            .unwrap()
            .with_scrub(Scrub::Immediate);
        let id = registry.register(el, config, &host).unwrap();

        registry.update(700.0);
        let first = registry.progress(id).unwrap();
        assert!(registry.refresh(&host).is_empty());
        registry.update(700.0);
        assert!(registry.refresh(&host).is_empty());
        registry.update(700.0);
        assert_eq!(registry.progress(id).unwrap().to_bits(), first.to_bits());
    }

    #[test]
    fn test_refresh_tracks_geometry() {
        let mut host = FakeHost::new(800.0);
        let spacer = host.block(".spacer", 900.0);
        let el = host.block(".section", 600.0);
        let mut registry = TriggerRegistry::new();
        let id = registry
            .register(el, TriggerConfig::starting("top top").unwrap(), &host)
            .unwrap();
        assert_eq!(registry.range(id), Some((900.0, 1500.0)));

        host.resize(spacer, 1200.0);
        registry.refresh(&host);
        assert_eq!(registry.range(id), Some((1200.0, 1800.0)));
    }

    #[test]
    fn test_refresh_reports_moved_progress() {
        let mut host = FakeHost::new(800.0);
        let spacer = host.block(".spacer", 1000.0);
        let el = host.block(".section", 800.0);
        let mut registry = TriggerRegistry::new();
        let config = TriggerConfig::starting("top top")
            .unwrap()
            .ending("bottom top")
            .unwrap()
            .with_scrub(Scrub::Immediate);
        let id = registry.register(el, config, &host).unwrap();

        registry.update(1400.0);
        assert_eq!(registry.progress(id), Some(0.5));
        assert!(registry.update(1400.0).is_empty());

        host.resize(spacer, 800.0);
        registry.refresh(&host);
        let events = registry.update(1400.0);
        assert_eq!(kinds(&events), vec![TriggerEventKind::Progress]);
        assert_eq!(events[0].progress, 0.75);
        assert!(registry.update(1400.0).is_empty());
    }

    #[test]
    fn test_refresh_deactivates_detached() {
        let mut host = FakeHost::new(800.0);
        let a = host.block(".a", 400.0);
        let b = host.block(".b", 400.0);
        let mut registry = TriggerRegistry::new();
        let ta = registry.register(a, absolute(0.0, 100.0), &host).unwrap();
        let tb = registry.register(b, absolute(0.0, 100.0), &host).unwrap();

        host.detach(a);
        let failed = registry.refresh(&host);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, ta);
        assert!(matches!(failed[0].1, MotionError::Detached(_)));
        assert!(!registry.contains(ta));
        assert!(registry.contains(tb));
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut registry = TriggerRegistry::new();
        assert!(!registry.unregister(TriggerId::new()));
        assert!(registry.is_empty());
    }
}
