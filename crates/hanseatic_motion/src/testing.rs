// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory host used by unit tests.

use crate::error::{MotionError, Result};
use crate::host::{Document, ElementId, FrameSource, FrameSubscription, Property, Rect, RenderTarget};
use crate::pin::PinReservation;
use indexmap::IndexMap;
use std::collections::HashMap;

const PAGE_WIDTH: f32 = 1280.0;

#[derive(Debug, Clone)]
enum Placement {
    /// Stacked in document flow
    Block,
    /// Positioned inside a parent at an offset
    Child { parent: ElementId, offset: f32 },
}

#[derive(Debug, Clone)]
struct FakeElement {
    selector: String,
    height: f32,
    placement: Placement,
    detached: bool,
}

/// Document with vertical flow layout and recorded writes
pub(crate) struct FakeHost {
    elements: IndexMap<ElementId, FakeElement>,
    next_id: u64,
    viewport: f32,
    pub reduced_motion: bool,
    pub frames_available: bool,
    pub smoothing: bool,
    pub time: f64,
    pub writes: Vec<(ElementId, Property, f32)>,
    values: HashMap<(ElementId, Property), f32>,
    pins: IndexMap<ElementId, PinReservation>,
    pub pin_calls: usize,
    pub unpin_calls: usize,
    pub subscriptions: Vec<FrameSubscription>,
    pub unsubscribe_calls: usize,
}

impl FakeHost {
    pub fn new(viewport: f32) -> Self {
        Self {
            elements: IndexMap::new(),
            next_id: 1,
            viewport,
            reduced_motion: false,
            frames_available: true,
            smoothing: true,
            time: 0.0,
            writes: Vec::new(),
            values: HashMap::new(),
            pins: IndexMap::new(),
            pin_calls: 0,
            unpin_calls: 0,
            subscriptions: Vec::new(),
            unsubscribe_calls: 0,
        }
    }

    fn insert(&mut self, selector: &str, height: f32, placement: Placement) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            FakeElement {
                selector: selector.to_string(),
                height,
                placement,
                detached: false,
            },
        );
        id
    }

    /// Append a block to the document flow
    pub fn block(&mut self, selector: &str, height: f32) -> ElementId {
        self.insert(selector, height, Placement::Block)
    }

    /// Add an element positioned inside `parent`
    pub fn child(&mut self, parent: ElementId, selector: &str, offset: f32, height: f32) -> ElementId {
        self.insert(selector, height, Placement::Child { parent, offset })
    }

    pub fn resize(&mut self, id: ElementId, height: f32) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.height = height;
        }
    }

    pub fn detach(&mut self, id: ElementId) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.detached = true;
        }
    }

    pub fn advance_clock(&mut self, dt: f64) {
        self.time += dt;
    }

    pub fn value(&self, id: ElementId, property: Property) -> Option<f32> {
        self.values.get(&(id, property)).copied()
    }

    pub fn is_pinned(&self, id: ElementId) -> bool {
        self.pins.contains_key(&id)
    }

    fn flow_top(&self, id: ElementId) -> Option<f32> {
        let mut top = 0.0;
        for (candidate, element) in &self.elements {
            if !matches!(element.placement, Placement::Block) || element.detached {
                continue;
            }
            if *candidate == id {
                return Some(top);
            }
            top += match self.pins.get(candidate) {
                Some(reservation) => reservation.placeholder.height,
                None => element.height,
            };
        }
        None
    }
}

impl Document for FakeHost {
    fn query(&self, _root: ElementId, selector: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|(_, e)| e.selector == selector && !e.detached)
            .map(|(id, _)| *id)
            .collect()
    }

    fn bounds(&self, element: ElementId) -> Result<Rect> {
        let entry = self
            .elements
            .get(&element)
            .filter(|e| !e.detached)
            .ok_or(MotionError::Detached(element))?;
        let top = match entry.placement {
            Placement::Block => self.flow_top(element).ok_or(MotionError::Detached(element))?,
            Placement::Child { parent, offset } => self.bounds(parent)?.top + offset,
        };
        Ok(Rect::new(top, 0.0, PAGE_WIDTH, entry.height))
    }

    fn viewport_height(&self) -> f32 {
        self.viewport
    }

    fn scroll_limit(&self) -> f32 {
        let total: f32 = self
            .elements
            .values()
            .filter(|e| matches!(e.placement, Placement::Block) && !e.detached)
            .map(|e| e.height)
            .sum();
        (total - self.viewport).max(0.0)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

impl RenderTarget for FakeHost {
    fn apply(&mut self, element: ElementId, property: Property, value: f32) {
        self.writes.push((element, property, value));
        self.values.insert((element, property), value);
    }

    fn pin(&mut self, reservation: &PinReservation) {
        self.pin_calls += 1;
        self.pins.insert(reservation.element, *reservation);
    }

    fn unpin(&mut self, element: ElementId) {
        self.unpin_calls += 1;
        self.pins.shift_remove(&element);
    }
}

impl FrameSource for FakeHost {
    fn subscribe_frames(&mut self) -> Result<FrameSubscription> {
        if !self.frames_available {
            return Err(MotionError::EnvironmentUnavailable("no frame source".into()));
        }
        let subscription = FrameSubscription(self.subscriptions.len() as u64 + 1);
        self.subscriptions.push(subscription);
        Ok(subscription)
    }

    fn unsubscribe_frames(&mut self, subscription: FrameSubscription) {
        self.unsubscribe_calls += 1;
        self.subscriptions.retain(|s| *s != subscription);
    }

    fn now(&self) -> f64 {
        self.time
    }

    fn supports_smoothing(&self) -> bool {
        self.smoothing
    }
}
