// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves and interpolation helpers.
//!
//! Every curve maps normalized time `[0, 1]` onto `[0, 1]` with `f(0) = 0` and
//! `f(1) = 1`. Inputs outside the unit range are clamped.

use crate::error::MotionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fraction of the initial distance left when a decay counts as settled
const SETTLE_RESIDUAL: f32 = 0.001;

/// Easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    /// No easing
    Linear,
    /// Quadratic ease-in
    Power1In,
    /// Quadratic ease-out
    Power1Out,
    /// Quadratic ease-in-out
    Power1InOut,
    /// Cubic ease-in
    Power2In,
    /// Cubic ease-out
    #[default]
    Power2Out,
    /// Cubic ease-in-out
    Power2InOut,
    /// Quartic ease-in
    Power3In,
    /// Quartic ease-out
    Power3Out,
    /// Quartic ease-in-out
    Power3InOut,
    /// Sinusoidal ease-in-out
    SineInOut,
    /// Exponential ease-out
    ExpoOut,
}

impl Easing {
    /// Evaluate the curve at normalized time `t`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1In => power_in(t, 2),
            Self::Power1Out => power_out(t, 2),
            Self::Power1InOut => power_in_out(t, 2),
            Self::Power2In => power_in(t, 3),
            Self::Power2Out => power_out(t, 3),
            Self::Power2InOut => power_in_out(t, 3),
            Self::Power3In => power_in(t, 4),
            Self::Power3Out => power_out(t, 4),
            Self::Power3InOut => power_in_out(t, 4),
            Self::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
            Self::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
        }
    }

    /// Get the authoring name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "none",
            Self::Power1In => "power1.in",
            Self::Power1Out => "power1.out",
            Self::Power1InOut => "power1.inOut",
            Self::Power2In => "power2.in",
            Self::Power2Out => "power2.out",
            Self::Power2InOut => "power2.inOut",
            Self::Power3In => "power3.in",
            Self::Power3Out => "power3.out",
            Self::Power3InOut => "power3.inOut",
            Self::SineInOut => "sine.inOut",
            Self::ExpoOut => "expo.out",
        }
    }

    /// Get all curves
    pub fn all() -> &'static [Easing] {
        &[
            Easing::Linear,
            Easing::Power1In,
            Easing::Power1Out,
            Easing::Power1InOut,
            Easing::Power2In,
            Easing::Power2Out,
            Easing::Power2InOut,
            Easing::Power3In,
            Easing::Power3Out,
            Easing::Power3InOut,
            Easing::SineInOut,
            Easing::ExpoOut,
        ]
    }
}

fn power_in(t: f32, exponent: i32) -> f32 {
    t.powi(exponent)
}

fn power_out(t: f32, exponent: i32) -> f32 {
    1.0 - (1.0 - t).powi(exponent)
}

fn power_in_out(t: f32, exponent: i32) -> f32 {
    if t < 0.5 {
        power_in(t * 2.0, exponent) / 2.0
    } else {
        1.0 - power_in((1.0 - t) * 2.0, exponent) / 2.0
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let easing = match s.trim() {
            "none" | "linear" => Self::Linear,
            "power1.in" => Self::Power1In,
            "power1" | "power1.out" => Self::Power1Out,
            "power1.inOut" => Self::Power1InOut,
            "power2.in" => Self::Power2In,
            "power2" | "power2.out" | "cubic.out" => Self::Power2Out,
            "power2.inOut" => Self::Power2InOut,
            "power3.in" => Self::Power3In,
            "power3" | "power3.out" => Self::Power3Out,
            "power3.inOut" => Self::Power3InOut,
            "sine.inOut" => Self::SineInOut,
            "expo.out" => Self::ExpoOut,
            other => return Err(MotionError::parse("easing", other)),
        };
        Ok(easing)
    }
}

impl TryFrom<String> for Easing {
    type Error = MotionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name().to_string()
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats, exact at both ends
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a * (1.0 - t) + b * t
    }

    /// Eased interpolation between two floats
    pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
        Self::lerp(a, b, easing.apply(t))
    }

    /// Fraction of the remaining distance covered by an exponential decay step
    pub fn decay_factor(rate: f32, dt: f32) -> f32 {
        if rate <= 0.0 || dt <= 0.0 {
            return 0.0;
        }
        1.0 - (-rate * dt).exp()
    }

    /// Decay rate that leaves less than 0.1% of the distance after `settle_time`
    pub fn decay_rate_for(settle_time: f32) -> f32 {
        if settle_time <= 0.0 {
            return f32::INFINITY;
        }
        -SETTLE_RESIDUAL.ln() / settle_time
    }
}
