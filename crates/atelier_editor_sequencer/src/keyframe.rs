// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for the sequencer.

use crate::easing::Easing;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time tolerance under which two keyframes count as the same instant
pub const TIME_EPSILON: f32 = 0.001;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Property a keyframe animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimatableProperty {
    /// Object position
    Position,
    /// Object rotation (euler degrees)
    Rotation,
    /// Object scale
    Scale,
    /// Camera eye position
    CameraPosition,
    /// Camera look-at point
    CameraTarget,
}

impl AnimatableProperty {
    /// Properties captured for scene objects
    pub const OBJECT: [AnimatableProperty; 3] = [Self::Position, Self::Rotation, Self::Scale];

    /// Properties captured for the camera
    pub const CAMERA: [AnimatableProperty; 2] = [Self::CameraPosition, Self::CameraTarget];

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Position => "Position",
            Self::Rotation => "Rotation",
            Self::Scale => "Scale",
            Self::CameraPosition => "Camera Position",
            Self::CameraTarget => "Camera Target",
        }
    }

    /// Check if this property belongs to the camera
    pub fn is_camera(&self) -> bool {
        matches!(self, Self::CameraPosition | Self::CameraTarget)
    }
}

/// A keyframe in a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Time in seconds
    pub time: f32,
    /// Animated property
    pub property: AnimatableProperty,
    /// Value at this keyframe
    pub value: [f32; 3],
    /// Easing of the segment that ends at this keyframe
    pub easing: Easing,
}

impl Keyframe {
    /// Create a new linear keyframe; negative times are clamped to zero
    pub fn new(time: f32, property: AnimatableProperty, value: [f32; 3]) -> Self {
        Self {
            id: KeyframeId::new(),
            time: time.max(0.0),
            property,
            value,
            easing: Easing::Linear,
        }
    }

    /// Set the easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Check if the keyframe sits at `time` within `TIME_EPSILON`
    pub fn is_at(&self, time: f32) -> bool {
        (self.time - time).abs() < TIME_EPSILON
    }
}

/// Edit applied by `AnimationTrack::update_keyframe`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframePatch {
    /// New time
    pub time: Option<f32>,
    /// New value
    pub value: Option<[f32; 3]>,
    /// New easing
    pub easing: Option<Easing>,
}

impl KeyframePatch {
    /// Merge into a keyframe
    pub fn apply(&self, keyframe: &mut Keyframe) {
        if let Some(time) = self.time {
            keyframe.time = time.max(0.0);
        }
        if let Some(value) = self.value {
            keyframe.value = value;
        }
        if let Some(easing) = self.easing {
            keyframe.easing = easing;
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

    /// Interpolate Vec3
    pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }

    /// Cubic Hermite interpolation
    pub fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
    }

    /// Cubic Hermite interpolation per component
    pub fn hermite_vec3(p0: [f32; 3], m0: [f32; 3], p1: [f32; 3], m1: [f32; 3], t: f32) -> [f32; 3] {
        [
            Self::hermite(p0[0], m0[0], p1[0], m1[0], t),
            Self::hermite(p0[1], m0[1], p1[1], m1[1], t),
            Self::hermite(p0[2], m0[2], p1[2], m1[2], t),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_time_is_clamped() {
        let kf = Keyframe::new(-2.0, AnimatableProperty::Position, [0.0; 3]);
        assert_eq!(kf.time, 0.0);
    }

    #[test]
    fn test_hermite_endpoints() {
        assert_eq!(Interpolation::hermite(1.0, 5.0, 3.0, -5.0, 0.0), 1.0);
        assert_eq!(Interpolation::hermite(1.0, 5.0, 3.0, -5.0, 1.0), 3.0);
    }

    #[test]
    fn test_patch() {
        let mut kf = Keyframe::new(1.0, AnimatableProperty::Scale, [1.0; 3]);
        KeyframePatch {
            time: Some(4.0),
            easing: Some(Easing::EaseOut),
            ..Default::default()
        }
        .apply(&mut kf);
        assert_eq!(kf.time, 4.0);
        assert_eq!(kf.value, [1.0; 3]);
        assert_eq!(kf.easing, Easing::EaseOut);
    }
}
