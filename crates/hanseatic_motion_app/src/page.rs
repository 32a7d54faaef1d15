// SPDX-License-Identifier: MIT OR Apache-2.0
//! Simulated Hanseatic landing page.
//!
//! A [`HeadlessPage`] lays sections out top to bottom, positions their
//! children at fixed offsets, records every property write, and keeps a
//! synthetic clock the driver advances once per frame.

use hanseatic_motion::{
    Crossfade, Document, ElementId, FrameSource, FrameSubscription, MotionError, PinReservation, Property, Rect,
    RenderTarget,
};
use indexmap::IndexMap;

/// Root element every section hangs under
pub const ROOT: ElementId = ElementId(0);

/// Page width
const PAGE_WIDTH: f32 = 1440.0;

/// Height the process section gains once its image decodes
const PROCESS_IMAGE_GROWTH: f32 = 200.0;

/// A node of the page
#[derive(Debug, Clone)]
struct PageElement {
    selector: String,
    parent: Option<ElementId>,
    offset: f32,
    height: f32,
}

/// In-memory page implementing the engine's host capabilities
#[derive(Debug)]
pub struct HeadlessPage {
    elements: IndexMap<ElementId, PageElement>,
    next_id: u64,
    viewport: f32,
    reduced_motion: bool,
    frame_source: bool,
    clock: f64,
    styles: IndexMap<(ElementId, Property), f32>,
    pins: IndexMap<ElementId, PinReservation>,
    subscriptions: Vec<FrameSubscription>,
    next_subscription: u64,
    writes: u64,
    images_decoded: bool,
}

impl HeadlessPage {
    /// Create an empty page
    pub fn new(viewport: f32) -> Self {
        Self {
            elements: IndexMap::new(),
            next_id: ROOT.0 + 1,
            viewport,
            reduced_motion: false,
            frame_source: true,
            clock: 0.0,
            styles: IndexMap::new(),
            pins: IndexMap::new(),
            subscriptions: Vec::new(),
            next_subscription: 1,
            writes: 0,
            images_decoded: false,
        }
    }

    /// The Hanseatic landing page with images not yet decoded
    pub fn hanseatic(viewport: f32) -> Self {
        let mut page = Self::new(viewport);

        page.section(".site-header", 88.0);

        let hero = page.section(".hero", 900.0);
        page.child(hero, ".hero-media img", 0.0, 900.0);
        page.child(hero, ".hero-content", 320.0, 220.0);

        let materials = page.section("#materials", 1100.0);
        for i in 0..4 {
            page.child(materials, ".material-card", 220.0 + i as f32 * 210.0, 190.0);
        }

        let process = page.section(".process", 900.0);
        for i in 0..3 {
            page.child(process, ".process-copy > *", 160.0 + i as f32 * 70.0, 56.0);
        }
        page.child(process, ".process-media", 180.0, 400.0);

        let gallery = page.section(".gallery", 900.0);
        for _ in 0..3 {
            page.child(gallery, ".gallery-panel", 0.0, 900.0);
        }
        page.child(gallery, ".gallery-copy", 640.0, 160.0);
        // pin spacing reserved for the pinned crossfade
        page.section(".gallery-spacer", Crossfade::default().length(3));

        let grid = page.section(".gallery-grid", 1200.0);
        for i in 0..3 {
            let item = page.child(grid, ".gallery-item", 140.0 + i as f32 * 340.0, 300.0);
            page.child(item, ".gallery-item-media img", 0.0, 300.0);
        }

        let cta = page.section(".cta", 600.0);
        page.child(cta, ".cta-inner", 180.0, 240.0);

        page.section(".site-footer", 320.0);
        page
    }

    /// Append a section to the document flow
    pub fn section(&mut self, selector: &str, height: f32) -> ElementId {
        self.insert(selector, None, 0.0, height)
    }

    /// Add an element positioned inside `parent`
    pub fn child(&mut self, parent: ElementId, selector: &str, offset: f32, height: f32) -> ElementId {
        self.insert(selector, Some(parent), offset, height)
    }

    fn insert(&mut self, selector: &str, parent: Option<ElementId>, offset: f32, height: f32) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            PageElement {
                selector: selector.to_string(),
                parent,
                offset,
                height,
            },
        );
        id
    }

    /// Prefer reduced motion
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Remove the frame source
    pub fn without_frame_source(mut self) -> Self {
        self.frame_source = false;
        self
    }

    /// Grow image-bearing sections to their decoded size. Returns false if already decoded.
    pub fn decode_images(&mut self) -> bool {
        if self.images_decoded {
            return false;
        }
        self.images_decoded = true;
        for element in self.elements.values_mut() {
            if matches!(element.selector.as_str(), ".process" | ".process-media") {
                element.height += PROCESS_IMAGE_GROWTH;
            }
        }
        tracing::debug!("Images decoded, layout changed");
        true
    }

    /// Change the viewport height
    pub fn resize_viewport(&mut self, viewport: f32) {
        self.viewport = viewport;
    }

    /// Advance the synthetic clock
    pub fn advance_clock(&mut self, dt: f64) {
        self.clock += dt;
    }

    /// Last value written to an element property
    pub fn value(&self, element: ElementId, property: Property) -> Option<f32> {
        self.styles.get(&(element, property)).copied()
    }

    /// Last value written to the `index`th element matching `selector`
    pub fn value_of(&self, selector: &str, index: usize, property: Property) -> Option<f32> {
        let element = *self.query(ROOT, selector).get(index)?;
        self.value(element, property)
    }

    /// Whether an element is held by a pin
    pub fn is_pinned(&self, element: ElementId) -> bool {
        self.pins.contains_key(&element)
    }

    /// Number of engaged pins
    pub fn pinned_count(&self) -> usize {
        self.pins.len()
    }

    /// Number of live frame subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Total property writes
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    fn contains(&self, ancestor: ElementId, element: ElementId) -> bool {
        if ancestor == ROOT {
            return true;
        }
        let mut current = self.elements.get(&element).and_then(|e| e.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.elements.get(&parent).and_then(|e| e.parent);
        }
        false
    }

    fn flow_top(&self, element: ElementId) -> Option<f32> {
        let mut top = 0.0;
        for (id, candidate) in &self.elements {
            if candidate.parent.is_some() {
                continue;
            }
            if *id == element {
                return Some(top);
            }
            top += self
                .pins
                .get(id)
                .map_or(candidate.height, |reservation| reservation.placeholder.height);
        }
        None
    }
}

impl Document for HeadlessPage {
    fn query(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|(id, element)| element.selector == selector && self.contains(root, **id))
            .map(|(id, _)| *id)
            .collect()
    }

    fn bounds(&self, element: ElementId) -> hanseatic_motion::Result<Rect> {
        let entry = self.elements.get(&element).ok_or(MotionError::Detached(element))?;
        let top = match entry.parent {
            None => self.flow_top(element).ok_or(MotionError::Detached(element))?,
            Some(parent) => self.bounds(parent)?.top + entry.offset,
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
            .filter(|e| e.parent.is_none())
            .map(|e| e.height)
            .sum();
        (total - self.viewport).max(0.0)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

impl RenderTarget for HeadlessPage {
    fn apply(&mut self, element: ElementId, property: Property, value: f32) {
        self.writes += 1;
        self.styles.insert((element, property), value);
    }

    fn pin(&mut self, reservation: &PinReservation) {
        self.pins.insert(reservation.element, *reservation);
    }

    fn unpin(&mut self, element: ElementId) {
        self.pins.shift_remove(&element);
    }
}

impl FrameSource for HeadlessPage {
    fn subscribe_frames(&mut self) -> hanseatic_motion::Result<FrameSubscription> {
        if !self.frame_source {
            return Err(MotionError::EnvironmentUnavailable(
                "headless page has no frame source".into(),
            ));
        }
        let subscription = FrameSubscription(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(subscription);
        Ok(subscription)
    }

    fn unsubscribe_frames(&mut self, subscription: FrameSubscription) {
        self.subscriptions.retain(|s| *s != subscription);
    }

    fn now(&self) -> f64 {
        self.clock
    }
}
