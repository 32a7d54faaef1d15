// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin controller.
//!
//! While a pinned trigger is strictly inside its range the element is held
//! at a fixed viewport offset and a placeholder with the element's exact flow
//! bounds takes its place, so content below does not move. Reaching either end
//! of the range releases the element back into normal flow.
//!
//! Reservations are measured at engagement and only re-measured by an explicit
//! [`PinController::invalidate`] after geometry changes.

use crate::error::{MotionError, Result};
use crate::host::{Document, ElementId, Rect, RenderTarget};
use crate::trigger::TriggerId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Space reserved for a pinned element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinReservation {
    /// Pinned element
    pub element: ElementId,
    /// Flow bounds the placeholder occupies
    pub placeholder: Rect,
    /// Offset from the viewport top at which the element is held
    pub viewport_top: f32,
}

#[derive(Debug, Clone)]
struct PinEntry {
    element: ElementId,
    /// Scroll position at which the pin engages
    start: f32,
    reservation: Option<PinReservation>,
}

/// Tracks pinned triggers and their reservations
#[derive(Debug, Default)]
pub struct PinController {
    pins: IndexMap<TriggerId, PinEntry>,
}

impl PinController {
    /// Create an empty controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a pinned trigger
    pub fn track(&mut self, trigger: TriggerId, element: ElementId, start: f32) {
        self.pins.insert(
            trigger,
            PinEntry {
                element,
                start,
                reservation: None,
            },
        );
    }

    /// Update the engagement scroll position after a refresh
    pub fn set_start(&mut self, trigger: TriggerId, start: f32) {
        if let Some(entry) = self.pins.get_mut(&trigger) {
            entry.start = start;
        }
    }

    /// Stop tracking a trigger, releasing it if engaged
    pub fn untrack(&mut self, trigger: TriggerId, target: &mut (impl RenderTarget + ?Sized)) -> bool {
        self.release(trigger, target);
        self.pins.shift_remove(&trigger).is_some()
    }

    /// Hold the element in place and insert its placeholder
    pub fn engage(
        &mut self,
        trigger: TriggerId,
        host: &mut (impl Document + RenderTarget + ?Sized),
    ) -> Result<PinReservation> {
        let entry = self
            .pins
            .get_mut(&trigger)
            .ok_or_else(|| MotionError::MissingTarget(format!("pin for trigger {:?}", trigger.0)))?;
        if let Some(reservation) = entry.reservation {
            return Ok(reservation);
        }

        let bounds = host.bounds(entry.element)?;
        let reservation = PinReservation {
            element: entry.element,
            placeholder: bounds,
            viewport_top: bounds.top - entry.start,
        };
        host.pin(&reservation);
        entry.reservation = Some(reservation);
        tracing::debug!(?trigger, element = %entry.element, height = bounds.height, "Pin engaged");
        Ok(reservation)
    }

    /// Return the element to normal flow. Returns false if it was not engaged.
    pub fn release(&mut self, trigger: TriggerId, target: &mut (impl RenderTarget + ?Sized)) -> bool {
        let Some(entry) = self.pins.get_mut(&trigger) else {
            return false;
        };
        match entry.reservation.take() {
            Some(reservation) => {
                target.unpin(reservation.element);
                tracing::debug!(?trigger, element = %reservation.element, "Pin released");
                true
            }
            None => false,
        }
    }

    /// Engage or release according to trigger progress
    pub fn sync(
        &mut self,
        trigger: TriggerId,
        progress: f32,
        host: &mut (impl Document + RenderTarget + ?Sized),
    ) -> Result<()> {
        let inside = progress > 0.0 && progress < 1.0;
        match (inside, self.is_engaged(trigger)) {
            (true, false) => self.engage(trigger, host).map(|_| ()),
            (false, true) => {
                self.release(trigger, host);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Re-measure every engaged reservation after a geometry change
    pub fn invalidate(
        &mut self,
        host: &mut (impl Document + RenderTarget + ?Sized),
    ) -> Vec<(TriggerId, MotionError)> {
        let mut failed = Vec::new();
        for (trigger, entry) in &mut self.pins {
            let Some(reservation) = entry.reservation.as_mut() else {
                continue;
            };
            match host.bounds(entry.element) {
                Ok(bounds) => {
                    reservation.placeholder = bounds;
                    reservation.viewport_top = bounds.top - entry.start;
                    host.pin(reservation);
                }
                Err(err) => failed.push((*trigger, err)),
            }
        }
        for (trigger, err) in &failed {
            tracing::warn!(?trigger, %err, "Dropping pin after invalidation failure");
            if let Some(entry) = self.pins.shift_remove(trigger) {
                if let Some(reservation) = entry.reservation {
                    host.unpin(reservation.element);
                }
            }
        }
        failed
    }

    /// Release every engaged pin and forget all triggers
    pub fn release_all(&mut self, target: &mut (impl RenderTarget + ?Sized)) -> usize {
        let mut released = 0;
        for entry in self.pins.values_mut() {
            if let Some(reservation) = entry.reservation.take() {
                target.unpin(reservation.element);
                released += 1;
            }
        }
        self.pins.clear();
        released
    }

    /// Whether a trigger's pin is engaged
    pub fn is_engaged(&self, trigger: TriggerId) -> bool {
        self.pins
            .get(&trigger)
            .is_some_and(|e| e.reservation.is_some())
    }

    /// Current reservation of an engaged pin
    pub fn reservation(&self, trigger: TriggerId) -> Option<PinReservation> {
        self.pins.get(&trigger).and_then(|e| e.reservation)
    }

    /// Whether a trigger is tracked
    pub fn is_tracked(&self, trigger: TriggerId) -> bool {
        self.pins.contains_key(&trigger)
    }

    /// Number of engaged pins
    pub fn engaged_count(&self) -> usize {
        self.pins.values().filter(|e| e.reservation.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    fn setup() -> (FakeHost, ElementId, ElementId, PinController, TriggerId) {
        let mut host = FakeHost::new(800.0);
        let _intro = host.block(".intro", 600.0);
        let gallery = host.block(".gallery", 800.0);
        let below = host.block(".cta", 400.0);
        let mut pins = PinController::new();
        let trigger = TriggerId::new();
        pins.track(trigger, gallery, 600.0);
        (host, gallery, below, pins, trigger)
    }

    #[test]
    fn test_engage_preserves_sibling_position() {
        let (mut host, gallery, below, mut pins, trigger) = setup();
        let before = host.bounds(below).unwrap().top;

        let reservation = pins.engage(trigger, &mut host).unwrap();
        assert_eq!(reservation.placeholder, Rect::new(600.0, 0.0, 1280.0, 800.0));
        assert_eq!(reservation.viewport_top, 0.0);
        assert!(host.is_pinned(gallery));
        assert_eq!(host.bounds(below).unwrap().top, before);
    }

    #[test]
    fn test_engage_is_idempotent() {
        let (mut host, _gallery, _below, mut pins, trigger) = setup();
        pins.engage(trigger, &mut host).unwrap();
        pins.engage(trigger, &mut host).unwrap();
        assert_eq!(host.pin_calls, 1);
        assert_eq!(pins.engaged_count(), 1);
    }

    #[test]
    fn test_sync_follows_progress() {
        let (mut host, gallery, _below, mut pins, trigger) = setup();

        pins.sync(trigger, 0.0, &mut host).unwrap();
        assert!(!pins.is_engaged(trigger));
        pins.sync(trigger, 0.4, &mut host).unwrap();
        assert!(pins.is_engaged(trigger));
        pins.sync(trigger, 0.9, &mut host).unwrap();
        assert_eq!(host.pin_calls, 1);
        pins.sync(trigger, 1.0, &mut host).unwrap();
        assert!(!pins.is_engaged(trigger));
        assert!(!host.is_pinned(gallery));
        pins.sync(trigger, 0.5, &mut host).unwrap();
        pins.sync(trigger, 0.0, &mut host).unwrap();
        assert!(!pins.is_engaged(trigger));
        assert_eq!(host.unpin_calls, 2);
    }

    #[test]
    fn test_invalidate_remeasures() {
        let (mut host, gallery, below, mut pins, trigger) = setup();
        pins.engage(trigger, &mut host).unwrap();

        host.resize(gallery, 900.0);
        let failed = pins.invalidate(&mut host);
        assert!(failed.is_empty());
        assert_eq!(pins.reservation(trigger).unwrap().placeholder.height, 900.0);
        assert_eq!(host.bounds(below).unwrap().top, 1500.0);
    }

    #[test]
    fn test_release_all() {
        let (mut host, gallery, _below, mut pins, trigger) = setup();
        pins.engage(trigger, &mut host).unwrap();
        assert_eq!(pins.release_all(&mut host), 1);
        assert!(!host.is_pinned(gallery));
        assert!(!pins.is_tracked(trigger));
        assert_eq!(pins.release_all(&mut host), 0);
        assert!(!pins.release(trigger, &mut host));
    }
}
