// SPDX-License-Identifier: MIT OR Apache-2.0
//! Declarative section bindings.
//!
//! A [`SectionBinding`] is pure data: an optional trigger plus a list of
//! segment specs addressed by selector or element. Selectors are resolved once,
//! at registration, into a [`ResolvedBinding`] that can either build a
//! [`Timeline`] or compute final values directly.

use crate::easing::Easing;
use crate::error::{MotionError, Result};
use crate::host::{Document, ElementId, Property};
use crate::session::Commands;
use crate::timeline::{Drive, Layout, Position, Sample, Segment, Timeline};
use crate::trigger::{TriggerConfig, TriggerEvent};
use indexmap::IndexMap;

/// Element reference in a binding
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Resolved against the session root at registration
    Selector(String),
    /// A known element
    Element(ElementId),
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<ElementId> for Target {
    fn from(element: ElementId) -> Self {
        Self::Element(element)
    }
}

impl Target {
    /// Resolve to elements present in the document
    pub fn resolve(&self, root: ElementId, document: &(impl Document + ?Sized)) -> Result<Vec<ElementId>> {
        let elements = match self {
            Self::Selector(selector) => document.query(root, selector),
            Self::Element(element) => {
                if document.bounds(*element).is_ok() {
                    vec![*element]
                } else {
                    Vec::new()
                }
            }
        };
        if elements.is_empty() {
            return Err(MotionError::MissingTarget(self.describe()));
        }
        Ok(elements)
    }

    fn describe(&self) -> String {
        match self {
            Self::Selector(selector) => selector.clone(),
            Self::Element(element) => element.to_string(),
        }
    }
}

/// Authoring form of a segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSpec {
    /// Target selector or element
    pub target: Target,
    /// Animated property
    pub property: Property,
    /// Start value
    pub from: f32,
    /// End value
    pub to: f32,
    /// Duration per element
    pub duration: f32,
    /// Easing; the binding default when absent
    pub easing: Option<Easing>,
    /// Insertion position of the first element
    pub position: Position,
    /// Start offset between consecutive matched elements
    pub stagger: f32,
}

impl SegmentSpec {
    /// Create a spec with a one-unit duration
    pub fn new(target: impl Into<Target>, property: Property, from: f32, to: f32) -> Self {
        Self {
            target: target.into(),
            property,
            from,
            to,
            duration: 1.0,
            easing: None,
            position: Position::default(),
            stagger: 0.0,
        }
    }

    /// Zero-duration spec that sets a value
    pub fn set(target: impl Into<Target>, property: Property, value: f32) -> Self {
        Self::new(target, property, value, value).duration(0.0)
    }

    /// Set the duration
    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    /// Set the easing
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Set the insertion position
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the stagger between matched elements
    pub fn stagger(mut self, stagger: f32) -> Self {
        self.stagger = stagger.max(0.0);
        self
    }

    /// Expand into one segment per element
    fn expand(&self, elements: &[ElementId], default_easing: Easing) -> Vec<Segment> {
        let easing = self.easing.unwrap_or(default_easing);
        elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let position = if index == 0 {
                    self.position.clone()
                } else {
                    Position::WithPrevious(self.stagger)
                };
                Segment::new(*element, self.property, self.from, self.to)
                    .with_duration(self.duration)
                    .with_easing(easing)
                    .at(position)
            })
            .collect()
    }
}

/// One authoring step of a binding
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Animate a property
    Segment(SegmentSpec),
    /// Mark a label
    Label(String, Position),
}

/// Trigger part of a binding
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerSpec {
    /// Observed element
    pub target: Target,
    /// Range and behaviour
    pub config: TriggerConfig,
}

/// Callback invoked for every event of a binding's trigger
pub type EventCallback = Box<dyn FnMut(&TriggerEvent, &mut Commands)>;

/// Declaration of one section's motion
pub struct SectionBinding {
    /// Name used in logs
    pub name: String,
    /// Optional trigger; untriggered bindings play on mount
    pub trigger: Option<TriggerSpec>,
    /// Segments and labels in authoring order
    pub steps: Vec<Step>,
    /// Easing for segments without one
    pub default_easing: Option<Easing>,
    /// Trigger event callback
    pub on_event: Option<EventCallback>,
}

impl SectionBinding {
    /// Create an empty binding
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger: None,
            steps: Vec::new(),
            default_easing: None,
            on_event: None,
        }
    }

    /// Attach a trigger
    pub fn triggered_by(mut self, target: impl Into<Target>, config: TriggerConfig) -> Self {
        self.trigger = Some(TriggerSpec {
            target: target.into(),
            config,
        });
        self
    }

    /// Append a segment spec
    pub fn segment(mut self, spec: SegmentSpec) -> Self {
        self.steps.push(Step::Segment(spec));
        self
    }

    /// Append a label
    pub fn label(mut self, name: impl Into<String>, position: Position) -> Self {
        self.steps.push(Step::Label(name.into(), position));
        self
    }

    /// Set the default easing
    pub fn easing(mut self, easing: Easing) -> Self {
        self.default_easing = Some(easing);
        self
    }

    /// Set the trigger event callback
    pub fn on_event(mut self, callback: impl FnMut(&TriggerEvent, &mut Commands) + 'static) -> Self {
        self.on_event = Some(Box::new(callback));
        self
    }

    /// Resolve every selector once against the document.
    ///
    /// Segments whose targets are missing are dropped and reported in
    /// [`ResolvedBinding::skipped`]. A missing trigger target is reported the
    /// same way and leaves `trigger` empty.
    pub fn resolve(
        &self,
        root: ElementId,
        document: &(impl Document + ?Sized),
        fallback_easing: Easing,
    ) -> ResolvedBinding {
        let default_easing = self.default_easing.unwrap_or(fallback_easing);
        let mut skipped = Vec::new();
        let mut steps = Vec::new();

        let trigger = self.trigger.as_ref().and_then(|spec| {
            match spec.target.resolve(root, document) {
                Ok(elements) => Some((elements[0], spec.config)),
                Err(err) => {
                    skipped.push(err);
                    None
                }
            }
        });

        for step in &self.steps {
            match step {
                Step::Segment(spec) => match spec.target.resolve(root, document) {
                    Ok(elements) => steps.extend(
                        spec.expand(&elements, default_easing)
                            .into_iter()
                            .map(ResolvedStep::Segment),
                    ),
                    Err(err) => skipped.push(err),
                },
                Step::Label(name, position) => {
                    steps.push(ResolvedStep::Label(name.clone(), position.clone()));
                }
            }
        }

        for err in &skipped {
            tracing::warn!(binding = %self.name, %err, "Skipping missing target");
        }

        ResolvedBinding {
            name: self.name.clone(),
            trigger_missing: self.trigger.is_some() && trigger.is_none(),
            trigger,
            steps,
            skipped,
        }
    }
}

impl std::fmt::Debug for SectionBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionBinding")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("steps", &self.steps)
            .field("default_easing", &self.default_easing)
            .field("on_event", &self.on_event.is_some())
            .finish()
    }
}

/// Step with elements resolved
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedStep {
    /// Concrete segment
    Segment(Segment),
    /// Label
    Label(String, Position),
}

/// Binding with every selector resolved
#[derive(Debug, Clone)]
pub struct ResolvedBinding {
    /// Binding name
    pub name: String,
    /// Trigger element and configuration
    pub trigger: Option<(ElementId, TriggerConfig)>,
    /// Whether a trigger was declared but its target is missing
    pub trigger_missing: bool,
    /// Steps in authoring order
    pub steps: Vec<ResolvedStep>,
    /// Missing-target warnings raised during resolution
    pub skipped: Vec<MotionError>,
}

impl ResolvedBinding {
    /// Number of concrete segments
    pub fn segment_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, ResolvedStep::Segment(_)))
            .count()
    }

    /// Build a timeline from the resolved steps
    pub fn build_timeline(&self, drive: Drive) -> Result<Timeline> {
        let mut timeline = match drive {
            Drive::Time => Timeline::new(self.name.clone()),
            Drive::Scrub => Timeline::scrubbed(self.name.clone()),
        };
        for step in &self.steps {
            match step {
                ResolvedStep::Segment(segment) => {
                    timeline.add(segment.clone())?;
                }
                ResolvedStep::Label(name, position) => {
                    timeline.add_label(name.clone(), position.clone())?;
                }
            }
        }
        Ok(timeline)
    }

    /// End-of-timeline value of every element property, without building a timeline
    pub fn final_values(&self) -> Result<Vec<Sample>> {
        let mut layout = Layout::new();
        let mut placed = Vec::new();
        for step in &self.steps {
            match step {
                ResolvedStep::Segment(segment) => {
                    let start = layout.place(&segment.position, segment.duration)?;
                    placed.push((start, segment));
                }
                ResolvedStep::Label(name, position) => {
                    layout.add_label(name.clone(), position)?;
                }
            }
        }
        placed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut values: IndexMap<(ElementId, Property), f32> = IndexMap::new();
        for (_, segment) in placed {
            values.insert((segment.target, segment.property), segment.to);
        }
        Ok(values
            .into_iter()
            .map(|((target, property), value)| Sample {
                target,
                property,
                value,
            })
            .collect())
    }
}
