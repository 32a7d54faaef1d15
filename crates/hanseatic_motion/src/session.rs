// SPDX-License-Identifier: MIT OR Apache-2.0
//! Motion session lifecycle and per-frame orchestration.
//!
//! A session moves through `Uninitialized -> Active -> TornDown`. Mounting
//! decides once whether motion runs at all:
//! - reduced motion, or a host without a frame source, applies every binding's
//!   final values directly and never builds a timeline
//! - otherwise the smoother, trigger registry, timelines and pins are wired up
//!
//! Every frame runs in a fixed order: smoother, registry, event dispatch,
//! scrub seeks, time-driven playback, rendering, pins, then queued commands.

use crate::binding::{EventCallback, ResolvedBinding, SectionBinding};
use crate::config::MotionConfig;
use crate::easing::Interpolation;
use crate::error::{MotionError, Result};
use crate::host::{ElementId, FrameSubscription, Host};
use crate::pin::PinController;
use crate::smoother::{ListenerId, ScrollListener, ScrollSmoother, VirtualScrollState};
use crate::timeline::{Drive, Timeline, TimelineId};
use crate::trigger::{Scrub, TriggerEventKind, TriggerId, TriggerRegistry};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Scrub followers closer than this snap to their target
const SCRUB_EPSILON: f32 = 1e-4;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Created, not mounted
    #[default]
    Uninitialized,
    /// Mounted and running
    Active,
    /// Torn down; terminal
    TornDown,
}

/// How an active session renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionMode {
    /// Full animation runtime
    #[default]
    Animated,
    /// User prefers reduced motion; final states only
    ReducedMotion,
    /// Host lacks a frame source; final states only
    Degraded,
}

impl MotionMode {
    /// Whether bindings collapse to their final values
    pub fn is_final_state(&self) -> bool {
        !matches!(self, Self::Animated)
    }
}

/// Host events besides frame ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Raw scroll input. Trigger progress follows on the next `frame`.
    Scroll(f32),
    /// Viewport or layout size changed
    Resize,
    /// Document finished loading
    Load,
}

/// Deferred session operation requested from inside a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play a timeline forward
    Play(TimelineId),
    /// Play a timeline backward
    Reverse(TimelineId),
    /// Kill a timeline and its trigger
    Kill(TimelineId),
    /// Unregister a trigger
    Unregister(TriggerId),
    /// Tear the whole session down
    Teardown,
}

/// Queue of deferred operations
#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    /// Queue a play
    pub fn play(&mut self, timeline: TimelineId) {
        self.queue.push(Command::Play(timeline));
    }

    /// Queue a reverse
    pub fn reverse(&mut self, timeline: TimelineId) {
        self.queue.push(Command::Reverse(timeline));
    }

    /// Queue a kill
    pub fn kill(&mut self, timeline: TimelineId) {
        self.queue.push(Command::Kill(timeline));
    }

    /// Queue an unregister
    pub fn unregister(&mut self, trigger: TriggerId) {
        self.queue.push(Command::Unregister(trigger));
    }

    /// Queue a teardown
    pub fn teardown(&mut self) {
        self.queue.push(Command::Teardown);
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }
}

/// Outcome of registering a binding
#[derive(Debug, Default)]
pub struct Registration {
    /// Created timeline, if any
    pub timeline: Option<TimelineId>,
    /// Registered trigger, if any
    pub trigger: Option<TriggerId>,
    /// Missing-target warnings
    pub skipped: Vec<MotionError>,
    /// Whether final values were applied instead of animating
    pub final_state: bool,
}

/// Counters exposed for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames stepped
    pub frames: u64,
    /// Property writes issued
    pub writes: u64,
    /// Targets skipped as missing
    pub skipped_targets: u64,
    /// Triggers or timelines deactivated after per-frame errors
    pub deactivated: u64,
}

/// A timeline owned by the session
struct BoundTimeline {
    timeline: Timeline,
    trigger: Option<TriggerId>,
    scrub: Scrub,
    /// Trigger progress the scrub follower chases
    scrub_target: f32,
    /// Progress currently applied to the timeline
    scrub_current: f32,
    pinned: bool,
    on_event: Option<EventCallback>,
}

/// Top-level orchestrator owning every trigger and timeline
pub struct MotionSession {
    config: MotionConfig,
    state: SessionState,
    mode: MotionMode,
    root: Option<ElementId>,
    smoother: ScrollSmoother,
    registry: TriggerRegistry,
    pins: PinController,
    timelines: IndexMap<TimelineId, BoundTimeline>,
    by_trigger: HashMap<TriggerId, TimelineId>,
    subscription: Option<FrameSubscription>,
    last_frame: Option<f64>,
    commands: Commands,
    stats: SessionStats,
}

impl MotionSession {
    /// Create an unmounted session
    pub fn new(config: MotionConfig) -> Self {
        Self {
            smoother: ScrollSmoother::new(config.smoother),
            config,
            state: SessionState::Uninitialized,
            mode: MotionMode::Animated,
            root: None,
            registry: TriggerRegistry::new(),
            pins: PinController::new(),
            timelines: IndexMap::new(),
            by_trigger: HashMap::new(),
            subscription: None,
            last_frame: None,
            commands: Commands::default(),
            stats: SessionStats::default(),
        }
    }

    /// Create and mount a session on `root`
    pub fn on_mount(root: ElementId, config: MotionConfig, host: &mut impl Host) -> Result<Self> {
        let mut session = Self::new(config);
        session.mount(root, host)?;
        Ok(session)
    }

    /// Enter the active state. Reduced motion is decided here, once.
    pub fn mount(&mut self, root: ElementId, host: &mut impl Host) -> Result<()> {
        match self.state {
            SessionState::Active => return Ok(()),
            SessionState::TornDown => return Err(MotionError::TornDown),
            SessionState::Uninitialized => {}
        }

        self.root = Some(root);
        self.state = SessionState::Active;

        if host.prefers_reduced_motion() {
            self.mode = MotionMode::ReducedMotion;
            tracing::info!(%root, "Motion session active with reduced motion");
            return Ok(());
        }

        match host.subscribe_frames() {
            Ok(subscription) => self.subscription = Some(subscription),
            Err(err) => {
                tracing::warn!(%err, "Frame source unavailable, rendering final states");
                self.mode = MotionMode::Degraded;
                return Ok(());
            }
        }

        if !host.supports_smoothing() {
            tracing::warn!("Smooth scrolling unsupported, following raw scroll input");
            self.smoother.disable();
        }
        self.smoother.set_limit(host.scroll_limit());
        self.last_frame = Some(host.now());
        tracing::info!(%root, smoothing = self.smoother.is_enabled(), "Motion session active");
        Ok(())
    }

    /// Lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Render mode
    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    /// Whether reduced motion was chosen at mount
    pub fn is_reduced_motion(&self) -> bool {
        self.mode == MotionMode::ReducedMotion
    }

    /// Configuration
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Diagnostic counters
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Register a section binding
    pub fn register(&mut self, mut binding: SectionBinding, host: &mut impl Host) -> Result<Registration> {
        let root = match self.state {
            SessionState::Active => self.root.unwrap_or(ElementId(0)),
            SessionState::Uninitialized => {
                return Err(MotionError::EnvironmentUnavailable(
                    "motion session is not mounted".into(),
                ))
            }
            SessionState::TornDown => return Err(MotionError::TornDown),
        };

        let resolved = binding.resolve(root, &*host, self.config.default_easing);
        self.stats.skipped_targets += resolved.skipped.len() as u64;

        if self.mode.is_final_state() || resolved.trigger_missing {
            return self.apply_final_state(resolved, host);
        }

        let (scrub, pinned) = resolved
            .trigger
            .map(|(_, config)| (config.scrub, config.pin))
            .unwrap_or((Scrub::Off, false));
        let drive = if scrub.is_enabled() { Drive::Scrub } else { Drive::Time };
        let mut timeline = resolved.build_timeline(drive)?;

        let trigger = match resolved.trigger {
            Some((element, config)) => {
                let id = self.registry.register(element, config, &*host)?;
                if config.pin {
                    let start = self.registry.range(id).map_or(0.0, |(start, _)| start);
                    self.pins.track(id, element, start);
                }
                timeline.bind(id);
                Some(id)
            }
            None => {
                timeline.play();
                None
            }
        };

        let initial = trigger
            .and_then(|id| self.registry.progress(id))
            .unwrap_or(0.0);
        if drive == Drive::Scrub {
            timeline.seek(initial);
        }
        for sample in timeline.sample() {
            host.apply(sample.target, sample.property, sample.value);
            self.stats.writes += 1;
        }

        let id = timeline.id;
        tracing::debug!(
            binding = %resolved.name,
            ?id,
            segments = resolved.segment_count(),
            duration = timeline.duration(),
            "Registered timeline"
        );
        if let Some(trigger) = trigger {
            self.by_trigger.insert(trigger, id);
        }
        self.timelines.insert(
            id,
            BoundTimeline {
                timeline,
                trigger,
                scrub,
                scrub_target: initial,
                scrub_current: initial,
                pinned,
                on_event: binding.on_event.take(),
            },
        );

        Ok(Registration {
            timeline: Some(id),
            trigger,
            skipped: resolved.skipped,
            final_state: false,
        })
    }

    fn apply_final_state(&mut self, resolved: ResolvedBinding, host: &mut impl Host) -> Result<Registration> {
        let values = resolved.final_values()?;
        for sample in &values {
            host.apply(sample.target, sample.property, sample.value);
        }
        self.stats.writes += values.len() as u64;
        tracing::debug!(binding = %resolved.name, writes = values.len(), "Applied final state");
        Ok(Registration {
            timeline: None,
            trigger: None,
            skipped: resolved.skipped,
            final_state: true,
        })
    }

    /// Dispatch a host event
    pub fn handle_event(&mut self, event: HostEvent, host: &mut impl Host) {
        match event {
            HostEvent::Scroll(delta) => {
                self.scroll(delta);
            }
            HostEvent::Resize => self.refresh(host),
            HostEvent::Load => {
                if self.config.refresh_on_load {
                    self.refresh(host);
                }
            }
        }
    }

    /// Feed raw scroll input; returns the virtual position.
    ///
    /// Triggers and timelines are not touched here; they catch up on the next `frame`.
    pub fn scroll(&mut self, delta: f32) -> f32 {
        if !self.is_animating() {
            return self.smoother.position();
        }
        self.smoother.update(delta)
    }

    /// Scroll to an absolute position
    pub fn scroll_to(&mut self, position: f32, immediate: bool) {
        if self.is_animating() {
            self.smoother.scroll_to(position, immediate);
        }
    }

    /// Virtual scroll state
    pub fn scroll_state(&self) -> VirtualScrollState {
        self.smoother.state()
    }

    /// Subscribe to virtual scroll changes
    pub fn subscribe_scroll(&mut self, listener: ScrollListener) -> Option<ListenerId> {
        if self.state == SessionState::TornDown {
            return None;
        }
        Some(self.smoother.subscribe(listener))
    }

    /// Remove a scroll listener
    pub fn unsubscribe_scroll(&mut self, id: ListenerId) -> bool {
        self.smoother.unsubscribe(id)
    }

    /// Re-resolve trigger geometry and pin reservations.
    ///
    /// Must be called after anything that changes layout.
    pub fn refresh(&mut self, host: &mut impl Host) {
        if !self.is_animating() {
            return;
        }
        self.smoother.set_limit(host.scroll_limit());

        for (trigger, err) in self.registry.refresh(&*host) {
            self.deactivate_trigger(trigger, &err, host);
        }
        let ranges: Vec<_> = self
            .registry
            .ids()
            .filter_map(|id| self.registry.range(id).map(|(start, _)| (id, start)))
            .collect();
        for (id, start) in ranges {
            self.pins.set_start(id, start);
        }
        for (trigger, err) in self.pins.invalidate(host) {
            self.deactivate_trigger(trigger, &err, host);
        }
        tracing::debug!(triggers = self.registry.len(), "Refreshed trigger geometry");
        self.step(0.0, host);
    }

    /// Per-frame tick driven by the host frame source
    pub fn frame(&mut self, host: &mut impl Host) {
        if !self.is_animating() {
            return;
        }
        let now = host.now();
        let dt = self
            .last_frame
            .map_or(0.0, |last| (now - last).max(0.0) as f32);
        self.last_frame = Some(now);
        self.step(dt, host);
    }

    fn is_animating(&self) -> bool {
        self.state == SessionState::Active && self.mode == MotionMode::Animated
    }

    /// One ordered frame step
    fn step(&mut self, dt: f32, host: &mut impl Host) {
        self.stats.frames += 1;

        self.smoother.advance(dt);
        let events = self.registry.update(self.smoother.position());

        for event in &events {
            let Some(id) = self.by_trigger.get(&event.trigger).copied() else {
                continue;
            };
            let Some(bound) = self.timelines.get_mut(&id) else {
                continue;
            };
            match event.kind {
                TriggerEventKind::Enter if bound.timeline.drive() == Drive::Time => {
                    bound.timeline.play();
                }
                TriggerEventKind::Progress => bound.scrub_target = event.progress,
                _ => {}
            }
            if let Some(callback) = bound.on_event.as_mut() {
                callback(event, &mut self.commands);
            }
        }
        self.forget_spent_triggers(host);

        for bound in self.timelines.values_mut() {
            if bound.timeline.is_killed() {
                continue;
            }
            let changed = match bound.scrub {
                Scrub::Off => bound.timeline.advance(dt),
                Scrub::Immediate => follow(bound, 1.0),
                Scrub::Lag(lag) => {
                    let factor = Interpolation::decay_factor(Interpolation::decay_rate_for(lag), dt);
                    follow(bound, factor)
                }
            };
            if changed {
                for sample in bound.timeline.sample() {
                    host.apply(sample.target, sample.property, sample.value);
                    self.stats.writes += 1;
                }
            }
        }

        let pinned: Vec<TriggerId> = self
            .timelines
            .values()
            .filter(|b| b.pinned)
            .filter_map(|b| b.trigger)
            .collect();
        for trigger in pinned {
            let Some(progress) = self.registry.progress(trigger) else {
                continue;
            };
            if let Err(err) = self.pins.sync(trigger, progress, host) {
                self.deactivate_trigger(trigger, &err, host);
            }
        }

        self.apply_commands(host);
        tracing::trace!(position = self.smoother.position(), dt, "Frame stepped");
    }

    /// Drop bindings of triggers the registry has retired, such as spent `once` triggers
    fn forget_spent_triggers(&mut self, host: &mut impl Host) {
        let spent: Vec<TriggerId> = self
            .by_trigger
            .keys()
            .copied()
            .filter(|trigger| !self.registry.contains(*trigger))
            .collect();
        for trigger in spent {
            self.pins.untrack(trigger, host);
            if let Some(id) = self.by_trigger.remove(&trigger) {
                if let Some(bound) = self.timelines.get_mut(&id) {
                    bound.trigger = None;
                    bound.timeline.unbind();
                }
            }
        }
    }

    fn apply_commands(&mut self, host: &mut impl Host) {
        for command in self.commands.drain() {
            match command {
                Command::Play(id) => {
                    if let Some(bound) = self.timelines.get_mut(&id) {
                        bound.timeline.play();
                    }
                }
                Command::Reverse(id) => {
                    if let Some(bound) = self.timelines.get_mut(&id) {
                        bound.timeline.reverse();
                    }
                }
                Command::Kill(id) => {
                    self.kill(id, host);
                }
                Command::Unregister(trigger) => {
                    self.unregister(trigger, host);
                }
                Command::Teardown => {
                    self.teardown(host);
                    return;
                }
            }
        }
    }

    fn deactivate_trigger(&mut self, trigger: TriggerId, err: &MotionError, host: &mut impl Host) {
        tracing::warn!(?trigger, %err, "Deactivating trigger and its timeline");
        self.stats.deactivated += 1;
        self.registry.unregister(trigger);
        self.pins.untrack(trigger, host);
        if let Some(id) = self.by_trigger.remove(&trigger) {
            if let Some(mut bound) = self.timelines.shift_remove(&id) {
                bound.timeline.kill();
            }
        }
    }

    /// Kill a timeline, releasing its trigger and pin. Unknown handles are ignored.
    pub fn kill(&mut self, id: TimelineId, host: &mut impl Host) -> bool {
        let Some(mut bound) = self.timelines.shift_remove(&id) else {
            return false;
        };
        bound.timeline.kill();
        if let Some(trigger) = bound.trigger {
            self.by_trigger.remove(&trigger);
            self.registry.unregister(trigger);
            self.pins.untrack(trigger, host);
        }
        tracing::debug!(?id, "Killed timeline");
        true
    }

    /// Unregister a trigger. Its timeline stays alive but is no longer driven.
    pub fn unregister(&mut self, trigger: TriggerId, host: &mut impl Host) -> bool {
        let removed = self.registry.unregister(trigger);
        self.pins.untrack(trigger, host);
        if let Some(id) = self.by_trigger.remove(&trigger) {
            if let Some(bound) = self.timelines.get_mut(&id) {
                bound.trigger = None;
                bound.timeline.unbind();
            }
        }
        removed
    }

    /// Release everything the session holds. Safe to call repeatedly.
    ///
    /// Returns false if the session was already torn down.
    pub fn teardown(&mut self, host: &mut impl Host) -> bool {
        if self.state == SessionState::TornDown {
            tracing::debug!("Motion session already torn down");
            return false;
        }

        for bound in self.timelines.values_mut() {
            bound.timeline.kill();
        }
        let timelines = self.timelines.len();
        self.timelines.clear();
        self.by_trigger.clear();
        self.registry.clear();
        let pins = self.pins.release_all(host);
        self.smoother.clear_listeners();
        if let Some(subscription) = self.subscription.take() {
            host.unsubscribe_frames(subscription);
        }
        self.commands.drain();
        self.state = SessionState::TornDown;
        tracing::info!(timelines, pins, "Motion session torn down");
        true
    }

    /// Write every live timeline's end state, then tear down.
    ///
    /// For setups that fail partway: content touched by earlier registrations is
    /// left visible instead of frozen at its starting values.
    pub fn teardown_to_final_state(&mut self, host: &mut impl Host) -> bool {
        if self.state == SessionState::TornDown {
            return false;
        }
        for bound in self.timelines.values() {
            for sample in bound.timeline.final_values() {
                host.apply(sample.target, sample.property, sample.value);
                self.stats.writes += 1;
            }
        }
        self.teardown(host)
    }

    /// Get a timeline
    pub fn timeline(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(&id).map(|b| &b.timeline)
    }

    /// Number of live timelines
    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    /// Trigger registry
    pub fn registry(&self) -> &TriggerRegistry {
        &self.registry
    }

    /// Pin controller
    pub fn pins(&self) -> &PinController {
        &self.pins
    }

    /// Whether the session holds a frame subscription
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}

/// Move a scrub follower toward its target by `factor` and seek. Returns true if it moved.
fn follow(bound: &mut BoundTimeline, factor: f32) -> bool {
    let previous = bound.scrub_current;
    let gap = bound.scrub_target - previous;
    bound.scrub_current = if gap.abs() <= SCRUB_EPSILON || factor >= 1.0 {
        bound.scrub_target
    } else {
        previous + gap * factor
    };
    if bound.scrub_current == previous {
        return false;
    }
    bound.timeline.seek(bound.scrub_current);
    true
}
