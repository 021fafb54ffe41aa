// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interpolation curves used by animated variables.

use serde::{Deserialize, Serialize};

/// How an animated value moves from its start to its end value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationCurve {
    /// Constant speed
    #[default]
    Linear,
    /// Smoothstep eased
    Spline,
}

impl AnimationCurve {
    /// Decode the `mode` selector property
    pub fn from_property(value: f32) -> Self {
        if value.round() as i32 == 1 {
            Self::Spline
        } else {
            Self::Linear
        }
    }

    /// Value after `elapsed` of `duration` (both in the same unit)
    pub fn sample(self, start: f32, end: f32, duration: f32, elapsed: f32) -> f32 {
        let delta = end - start;
        let linear = if duration > 0.0 {
            start + delta * (elapsed / duration)
        } else {
            end
        };

        match self {
            Self::Linear => linear,
            Self::Spline if delta == 0.0 => start,
            Self::Spline => start + delta * Interpolation::smoothstep(start, end, linear),
        }
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Hermite smoothstep of `x` between two edges; edges may be given in either order
    pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
        if edge0 == edge1 {
            return if x < edge0 { 0.0 } else { 1.0 };
        }
        let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }

    /// Reflect an incident vector about a unit normal
    pub fn reflect(incident: [f32; 2], normal: [f32; 2]) -> [f32; 2] {
        let dot = incident[0] * normal[0] + incident[1] * normal[1];
        [
            incident[0] - 2.0 * dot * normal[0],
            incident[1] - 2.0 * dot * normal[1],
        ]
    }
}
