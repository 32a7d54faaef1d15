// SPDX-License-Identifier: MIT OR Apache-2.0
//! Virtual scroll smoothing.
//!
//! Raw scroll deltas are integrated into a raw position; every frame the
//! smoothed position decays exponentially toward it, so motion keeps coasting
//! after input stops. With smoothing disabled the smoothed position simply
//! mirrors the raw one.

use crate::easing::Interpolation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smoothing configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    /// Whether smoothing is enabled
    pub enabled: bool,
    /// Time for the smoothed position to cover 99.9% of a jump
    pub settle_time: f32,
    /// Distance below which the smoothed position snaps to the raw one
    pub epsilon: f32,
    /// Largest frame delta fed into one decay step
    pub max_frame_delta: f32,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            settle_time: 1.18,
            epsilon: 0.5,
            max_frame_delta: 0.1,
        }
    }
}

impl SmootherConfig {
    /// Config with smoothing turned off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Exponential decay rate derived from the settle time
    pub fn decay_rate(&self) -> f32 {
        Interpolation::decay_rate_for(self.settle_time)
    }
}

/// Snapshot of the virtual scroll position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VirtualScrollState {
    /// Integrated raw input position
    pub raw_position: f32,
    /// Smoothed position read by triggers
    pub smoothed_position: f32,
    /// Smoothed velocity in units per second
    pub velocity: f32,
    /// Whether the smoothed position is still converging
    pub is_settling: bool,
}

/// Identifier of a scroll listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    /// Create a new random listener ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Callback receiving virtual scroll changes
pub type ScrollListener = Box<dyn FnMut(&VirtualScrollState)>;

/// Converts raw scroll input into a smoothed virtual position
pub struct ScrollSmoother {
    /// Current state
    state: VirtualScrollState,
    /// Configuration
    config: SmootherConfig,
    /// Cached decay rate
    decay_rate: f32,
    /// Upper scroll bound
    limit: f32,
    /// Change listeners
    listeners: IndexMap<ListenerId, ScrollListener>,
}

impl ScrollSmoother {
    /// Create a new smoother
    pub fn new(config: SmootherConfig) -> Self {
        Self {
            state: VirtualScrollState::default(),
            config,
            decay_rate: config.decay_rate(),
            limit: f32::INFINITY,
            listeners: IndexMap::new(),
        }
    }

    /// Whether smoothing is active
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Turn smoothing off, snapping to the raw position
    pub fn disable(&mut self) {
        if !self.config.enabled {
            return;
        }
        self.config.enabled = false;
        self.snap();
    }

    /// Current state
    pub fn state(&self) -> VirtualScrollState {
        self.state
    }

    /// Current smoothed position
    pub fn position(&self) -> f32 {
        self.state.smoothed_position
    }

    /// Set the maximum scroll position
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.state.raw_position = self.state.raw_position.min(self.limit);
        if self.state.smoothed_position > self.limit {
            self.state.smoothed_position = self.limit;
        }
        self.refresh_settling();
    }

    /// Integrate a raw scroll delta and return the new virtual position
    pub fn update(&mut self, raw_delta: f32) -> f32 {
        if !raw_delta.is_finite() {
            return self.state.smoothed_position;
        }
        self.state.raw_position = (self.state.raw_position + raw_delta).clamp(0.0, self.limit);
        if self.config.enabled {
            self.refresh_settling();
        } else {
            self.state.smoothed_position = self.state.raw_position;
            self.state.velocity = 0.0;
            self.state.is_settling = false;
        }
        self.notify();
        self.state.smoothed_position
    }

    /// Jump or glide to an absolute position
    pub fn scroll_to(&mut self, position: f32, immediate: bool) {
        self.state.raw_position = position.clamp(0.0, self.limit);
        if immediate || !self.config.enabled {
            self.snap();
        } else {
            self.refresh_settling();
        }
        self.notify();
    }

    /// Advance the decay by one frame. Returns true if the position moved.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.state.is_settling {
            if self.state.velocity != 0.0 {
                self.state.velocity = 0.0;
            }
            return false;
        }

        let dt = dt.clamp(0.0, self.config.max_frame_delta);
        if dt == 0.0 {
            return false;
        }

        let previous = self.state.smoothed_position;
        let factor = Interpolation::decay_factor(self.decay_rate, dt);
        let target = self.state.raw_position;
        self.state.smoothed_position = Interpolation::lerp(previous, target, factor);
        if (target - self.state.smoothed_position).abs() <= self.config.epsilon {
            self.state.smoothed_position = target;
        }
        self.state.velocity = (self.state.smoothed_position - previous) / dt;
        self.refresh_settling();
        self.notify();
        true
    }

    /// Subscribe to position changes
    pub fn subscribe(&mut self, listener: ScrollListener) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.insert(id, listener);
        id
    }

    /// Remove a listener
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.shift_remove(&id).is_some()
    }

    /// Remove every listener
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn snap(&mut self) {
        self.state.smoothed_position = self.state.raw_position;
        self.state.velocity = 0.0;
        self.state.is_settling = false;
    }

    fn refresh_settling(&mut self) {
        let gap = (self.state.raw_position - self.state.smoothed_position).abs();
        self.state.is_settling = self.config.enabled && gap > self.config.epsilon;
    }

    fn notify(&mut self) {
        let state = self.state;
        for listener in self.listeners.values_mut() {
            listener(&state);
        }
    }
}

impl Default for ScrollSmoother {
    fn default() -> Self {
        Self::new(SmootherConfig::default())
    }
}
