// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the motion engine.

use crate::host::ElementId;
use thiserror::Error;

/// Errors raised while declaring or running motion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    /// Trigger start resolves after its end while scrubbing or pinning
    #[error("Invalid trigger range: start {start} resolves after end {end}")]
    InvalidRange {
        /// Resolved start scroll position
        start: f32,
        /// Resolved end scroll position
        end: f32,
    },

    /// A start-relative point was used where an absolute point is required
    #[error("Scroll point {0:?} cannot be used as a trigger start")]
    InvalidScrollPoint(String),

    /// Insertion relative to a label that was never added
    #[error("Unknown timeline label: {0}")]
    UnknownLabel(String),

    /// Malformed authoring string
    #[error("Cannot parse {kind} from {input:?}")]
    Parse {
        /// What was being parsed
        kind: &'static str,
        /// Offending input
        input: String,
    },

    /// A selector or element is not present in the document
    #[error("Missing target: {0}")]
    MissingTarget(String),

    /// No frame source, clock or smoothing support on the host
    #[error("Environment unavailable: {0}")]
    EnvironmentUnavailable(String),

    /// Geometry read failed because the element left the document
    #[error("Element {0:?} is detached from the document")]
    Detached(ElementId),

    /// The session was already torn down
    #[error("Motion session is torn down")]
    TornDown,
}

impl MotionError {
    pub(crate) fn parse(kind: &'static str, input: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            input: input.into(),
        }
    }

    /// Whether this error is a registration-time configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. }
                | Self::InvalidScrollPoint(_)
                | Self::UnknownLabel(_)
                | Self::Parse { .. }
        )
    }
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
