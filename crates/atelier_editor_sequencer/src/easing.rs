// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves shared by keyframes and camera paths.

use serde::{Deserialize, Serialize};

/// Remapping applied to an interpolation fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Easing {
    /// Identity
    #[default]
    Linear,
    /// Accelerating (quadratic)
    EaseIn,
    /// Decelerating (quadratic)
    EaseOut,
    /// Accelerate then decelerate, symmetric around 0.5
    EaseInOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::EaseIn => "Ease In",
            Self::EaseOut => "Ease Out",
            Self::EaseInOut => "Ease In/Out",
        }
    }

    /// All easing curves
    pub fn all() -> &'static [Easing] {
        &[Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in Easing::all() {
            assert_eq!(easing.apply(0.0), 0.0, "{}", easing.name());
            assert_eq!(easing.apply(1.0), 1.0, "{}", easing.name());
        }
    }

    #[test]
    fn test_shapes() {
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert!(Easing::EaseInOut.apply(0.25) < 0.25);
        assert!(Easing::EaseInOut.apply(0.75) > 0.75);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::EaseOut.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseIn.apply(3.0), 1.0);
    }
}
