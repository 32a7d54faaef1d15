// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timelines of property segments.
//!
//! A timeline places segments (and nested timelines) on a local time axis.
//! Every insertion position is relative: to the end of the content so far, to
//! the previous item, to the timeline start, or to a label. Positions are
//! resolved once at insertion, so later insertions never move earlier ones.
//!
//! Timelines are driven in one of two ways:
//! - by time, advancing at wall-clock rate once played
//! - by scrub, where [`Timeline::seek`] with a progress value is the only input

use crate::easing::{Easing, Interpolation};
use crate::error::{MotionError, Result};
use crate::host::{ElementId, Property};
use crate::trigger::TriggerId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineId(pub Uuid);

impl TimelineId {
    /// Create a new random timeline ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TimelineId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub Uuid);

impl SegmentId {
    /// Create a new random segment ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Insertion position of a timeline item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    /// Offset from the end of all content so far (`"+=0.35"`, `"-=0.2"`)
    End(f32),
    /// Offset from the end of the previously inserted item (`">"`, `">0.1"`)
    AfterPrevious(f32),
    /// Offset from the start of the previously inserted item (`"<"`, `"<0.1"`)
    WithPrevious(f32),
    /// Offset from the timeline start (`"0.15"`)
    Start(f32),
    /// Offset from a label (`"reveal"`, `"reveal+=0.5"`)
    Label(String, f32),
}

impl Default for Position {
    fn default() -> Self {
        Self::End(0.0)
    }
}

fn parse_offset(s: &str) -> Option<f32> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    if let Some(rest) = s.strip_prefix("+=") {
        return rest.trim().parse().ok();
    }
    if let Some(rest) = s.strip_prefix("-=") {
        return rest.trim().parse::<f32>().ok().map(|v| -v);
    }
    s.parse().ok()
}

impl FromStr for Position {
    type Err = MotionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let err = || MotionError::parse("position", s);

        if let Some(rest) = s.strip_prefix('<') {
            return parse_offset(rest).map(Self::WithPrevious).ok_or_else(err);
        }
        if let Some(rest) = s.strip_prefix('>') {
            return parse_offset(rest).map(Self::AfterPrevious).ok_or_else(err);
        }
        if s.starts_with("+=") || s.starts_with("-=") {
            return parse_offset(s).map(Self::End).ok_or_else(err);
        }
        if let Ok(time) = s.parse::<f32>() {
            return Ok(Self::Start(time));
        }

        let split = s.find("+=").or_else(|| s.find("-="));
        let (label, offset) = match split {
            Some(index) => (&s[..index], parse_offset(&s[index..]).ok_or_else(err)?),
            None => (s, 0.0),
        };
        let label = label.trim();
        if label.is_empty() || !label.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(err());
        }
        Ok(Self::Label(label.to_string(), offset))
    }
}

fn format_offset(offset: f32) -> String {
    if offset < 0.0 {
        format!("-={}", -offset)
    } else {
        format!("+={offset}")
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::End(offset) => f.write_str(&format_offset(*offset)),
            Self::AfterPrevious(offset) if *offset == 0.0 => f.write_str(">"),
            Self::AfterPrevious(offset) => write!(f, ">{offset}"),
            Self::WithPrevious(offset) if *offset == 0.0 => f.write_str("<"),
            Self::WithPrevious(offset) => write!(f, "<{offset}"),
            Self::Start(time) => write!(f, "{time}"),
            Self::Label(label, offset) if *offset == 0.0 => f.write_str(label),
            Self::Label(label, offset) => write!(f, "{label}{}", format_offset(*offset)),
        }
    }
}

impl TryFrom<String> for Position {
    type Error = MotionError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.to_string()
    }
}

/// Interpolation of one property of one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Unique segment ID
    pub id: SegmentId,
    /// Target element
    pub target: ElementId,
    /// Animated property
    pub property: Property,
    /// Value at local progress 0
    pub from: f32,
    /// Value at local progress 1
    pub to: f32,
    /// Duration in time units; 0 applies `to` immediately at the start
    pub duration: f32,
    /// Easing curve
    pub easing: Easing,
    /// Insertion position
    pub position: Position,
}

impl Segment {
    /// Create a new segment with a one-unit duration
    pub fn new(target: ElementId, property: Property, from: f32, to: f32) -> Self {
        Self {
            id: SegmentId::new(),
            target,
            property,
            from,
            to,
            duration: 1.0,
            easing: Easing::default(),
            position: Position::default(),
        }
    }

    /// Zero-duration segment that sets `value`
    pub fn set(target: ElementId, property: Property, value: f32) -> Self {
        Self::new(target, property, value, value).with_duration(0.0)
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    /// Set the easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the insertion position
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Value at local progress
    pub fn value_at(&self, local: f32) -> f32 {
        Interpolation::ease(self.from, self.to, local, self.easing)
    }

    /// Local progress at `time` for a segment starting at `start`
    fn local_progress(&self, time: f32, start: f32) -> f32 {
        if self.duration <= 0.0 {
            return if time >= start { 1.0 } else { 0.0 };
        }
        ((time - start) / self.duration).clamp(0.0, 1.0)
    }
}

/// Computed value for one element property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Target element
    pub target: ElementId,
    /// Property
    pub property: Property,
    /// Value
    pub value: f32,
}

/// Resolves insertion positions on a time axis
#[derive(Debug, Clone, Default)]
pub struct Layout {
    labels: IndexMap<String, f32>,
    duration: f32,
    last_start: f32,
    last_end: f32,
}

impl Layout {
    /// Create an empty layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a position to a start time without placing anything
    pub fn resolve(&self, position: &Position) -> Result<f32> {
        let time = match position {
            Position::End(offset) => self.duration + offset,
            Position::AfterPrevious(offset) => self.last_end + offset,
            Position::WithPrevious(offset) => self.last_start + offset,
            Position::Start(time) => *time,
            Position::Label(label, offset) => {
                let at = self
                    .labels
                    .get(label)
                    .ok_or_else(|| MotionError::UnknownLabel(label.clone()))?;
                at + offset
            }
        };
        Ok(time.max(0.0))
    }

    /// Place an item of `span` at `position`, returning its start
    pub fn place(&mut self, position: &Position, span: f32) -> Result<f32> {
        let start = self.resolve(position)?;
        self.last_start = start;
        self.last_end = start + span.max(0.0);
        self.duration = self.duration.max(self.last_end);
        Ok(start)
    }

    /// Add a label at `position`
    pub fn add_label(&mut self, name: impl Into<String>, position: &Position) -> Result<f32> {
        let at = self.resolve(position)?;
        self.labels.insert(name.into(), at);
        Ok(at)
    }

    /// Time of a label
    pub fn label(&self, name: &str) -> Option<f32> {
        self.labels.get(name).copied()
    }

    /// End of all placed content
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not advancing
    #[default]
    Stopped,
    /// Playing forward
    Playing,
    /// Paused
    Paused,
    /// Playing in reverse
    Reverse,
    /// Killed; the timeline never changes again
    Killed,
}

/// How a timeline moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Drive {
    /// Advances by wall-clock time once played
    #[default]
    Time,
    /// Position is set from trigger progress
    Scrub,
}

#[derive(Debug, Clone)]
enum Item {
    Segment(Segment),
    Nested(Timeline),
}

#[derive(Debug, Clone)]
struct Placed {
    start: f32,
    item: Item,
}

/// An ordered, nestable sequence of segments
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Unique timeline ID
    pub id: TimelineId,
    /// Timeline name
    pub name: String,
    /// Playback speed multiplier
    pub time_scale: f32,
    items: Vec<Placed>,
    layout: Layout,
    time: f32,
    state: PlaybackState,
    drive: Drive,
    trigger: Option<TriggerId>,
}

impl Timeline {
    /// Create a new time-driven timeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TimelineId::new(),
            name: name.into(),
            time_scale: 1.0,
            items: Vec::new(),
            layout: Layout::new(),
            time: 0.0,
            state: PlaybackState::Stopped,
            drive: Drive::Time,
            trigger: None,
        }
    }

    /// Create a new scrub-driven timeline
    pub fn scrubbed(name: impl Into<String>) -> Self {
        let mut timeline = Self::new(name);
        timeline.drive = Drive::Scrub;
        timeline
    }

    /// Add a segment at its authored position
    pub fn add(&mut self, segment: Segment) -> Result<SegmentId> {
        let start = self.layout.place(&segment.position, segment.duration)?;
        let id = segment.id;
        self.items.push(Placed {
            start,
            item: Item::Segment(segment),
        });
        Ok(id)
    }

    /// Nest a timeline at `position`
    pub fn add_timeline(&mut self, child: Timeline, position: Position) -> Result<TimelineId> {
        let start = self.layout.place(&position, child.duration())?;
        let id = child.id;
        self.items.push(Placed {
            start,
            item: Item::Nested(child),
        });
        Ok(id)
    }

    /// Add a label at `position`
    pub fn add_label(&mut self, name: impl Into<String>, position: Position) -> Result<f32> {
        self.layout.add_label(name, &position)
    }

    /// Time of a label
    pub fn label(&self, name: &str) -> Option<f32> {
        self.layout.label(name)
    }

    /// Resolved start of a segment
    pub fn segment_start(&self, id: SegmentId) -> Option<f32> {
        self.items.iter().find_map(|placed| match &placed.item {
            Item::Segment(segment) if segment.id == id => Some(placed.start),
            _ => None,
        })
    }

    /// Get a segment by ID
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.items.iter().find_map(|placed| match &placed.item {
            Item::Segment(segment) if segment.id == id => Some(segment),
            _ => None,
        })
    }

    /// Number of direct items
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total duration honoring insertion offsets
    pub fn duration(&self) -> f32 {
        self.layout.duration()
    }

    /// Current local time
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current normalized progress
    pub fn progress(&self) -> f32 {
        let duration = self.duration();
        if duration <= 0.0 {
            return 1.0;
        }
        (self.time / duration).clamp(0.0, 1.0)
    }

    /// Playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Drive mode
    pub fn drive(&self) -> Drive {
        self.drive
    }

    /// Bound trigger
    pub fn trigger(&self) -> Option<TriggerId> {
        self.trigger
    }

    /// Bind to a trigger. Segments are untouched.
    pub fn bind(&mut self, trigger: TriggerId) {
        self.trigger = Some(trigger);
    }

    /// Remove the trigger binding
    pub fn unbind(&mut self) -> Option<TriggerId> {
        self.trigger.take()
    }

    /// Whether the timeline was killed
    pub fn is_killed(&self) -> bool {
        self.state == PlaybackState::Killed
    }

    /// Whether the timeline is advancing by time
    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing | PlaybackState::Reverse)
    }

    /// Whether playback reached the end
    pub fn is_complete(&self) -> bool {
        self.state == PlaybackState::Stopped && self.time >= self.duration() && self.duration() > 0.0
    }

    /// Play forward from the current position
    pub fn play(&mut self) {
        if !self.is_killed() {
            self.state = PlaybackState::Playing;
        }
    }

    /// Play backward from the current position
    pub fn reverse(&mut self) {
        if !self.is_killed() {
            self.state = PlaybackState::Reverse;
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.is_playing() {
            self.state = PlaybackState::Paused;
        }
    }

    /// Jump to the start and play
    pub fn restart(&mut self) {
        if !self.is_killed() {
            self.time = 0.0;
            self.state = PlaybackState::Playing;
        }
    }

    /// Stop permanently
    pub fn kill(&mut self) {
        self.state = PlaybackState::Killed;
    }

    /// Seek to normalized progress
    pub fn seek(&mut self, progress: f32) {
        self.seek_time(progress.clamp(0.0, 1.0) * self.duration());
    }

    /// Seek to a local time
    pub fn seek_time(&mut self, time: f32) {
        if !self.is_killed() && time.is_finite() {
            self.time = time.clamp(0.0, self.duration());
        }
    }

    /// Advance a playing timeline by `dt`. Returns true if time moved.
    pub fn advance(&mut self, dt: f32) -> bool {
        let step = dt.max(0.0) * self.time_scale;
        let previous = self.time;
        let duration = self.duration();

        match self.state {
            PlaybackState::Playing => {
                self.time = (self.time + step).min(duration);
                if self.time >= duration {
                    self.state = PlaybackState::Stopped;
                }
            }
            PlaybackState::Reverse => {
                self.time = (self.time - step).max(0.0);
                if self.time <= 0.0 {
                    self.state = PlaybackState::Stopped;
                }
            }
            PlaybackState::Stopped | PlaybackState::Paused | PlaybackState::Killed => return false,
        }
        self.time != previous || duration <= 0.0
    }

    fn collect<'a>(&'a self, offset: f32, out: &mut Vec<(f32, &'a Segment)>) {
        for placed in &self.items {
            let start = offset + placed.start;
            match &placed.item {
                Item::Segment(segment) => out.push((start, segment)),
                Item::Nested(child) => child.collect(start, out),
            }
        }
    }

    /// Segments flattened to absolute start times, ordered by start
    fn flattened(&self) -> Vec<(f32, &Segment)> {
        let mut segments = Vec::new();
        self.collect(0.0, &mut segments);
        segments.sort_by(|a, b| a.0.total_cmp(&b.0));
        segments
    }

    /// Values at an arbitrary local time.
    ///
    /// Segments render in start order. A segment that has started writes its
    /// interpolated value, overriding earlier segments on the same property.
    /// Before it starts, only the first segment of each element property
    /// writes, and it writes its `from` value.
    pub fn sample_at(&self, time: f32) -> Vec<Sample> {
        let mut values: IndexMap<(ElementId, Property), f32> = IndexMap::new();
        let mut seen = HashSet::new();

        for (start, segment) in self.flattened() {
            let key = (segment.target, segment.property);
            let first = seen.insert(key);
            if time >= start {
                values.insert(key, segment.value_at(segment.local_progress(time, start)));
            } else if first {
                values.insert(key, segment.from);
            }
        }

        values
            .into_iter()
            .map(|((target, property), value)| Sample {
                target,
                property,
                value,
            })
            .collect()
    }

    /// Values at the current time
    pub fn sample(&self) -> Vec<Sample> {
        self.sample_at(self.time)
    }

    /// Values at the end of the timeline
    pub fn final_values(&self) -> Vec<Sample> {
        self.sample_at(self.duration())
    }
}
