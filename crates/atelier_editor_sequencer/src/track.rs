// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe tracks.
//!
//! A track holds every keyframe of one target, kept sorted by time. Each
//! property forms its own curve: position and rotation keyframes on the same
//! track never interpolate against each other.

use crate::binding::TrackTarget;
use crate::easing::Easing;
use crate::keyframe::{AnimatableProperty, Interpolation, Keyframe, KeyframeId, KeyframePatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// Values produced by evaluating a track at one instant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackValues {
    values: BTreeMap<AnimatableProperty, [f32; 3]>,
}

impl TrackValues {
    /// Value for a property; `None` means "leave unchanged"
    pub fn get(&self, property: AnimatableProperty) -> Option<[f32; 3]> {
        self.values.get(&property).copied()
    }

    /// Iterate over evaluated properties
    pub fn iter(&self) -> impl Iterator<Item = (AnimatableProperty, [f32; 3])> + '_ {
        self.values.iter().map(|(p, v)| (*p, *v))
    }

    /// Check if no property produced a value
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of evaluated properties
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// An animation track bound to one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationTrack {
    /// Unique track ID
    pub id: TrackId,
    /// Animated target
    pub target: TrackTarget,
    /// Keyframes sorted by time
    keyframes: Vec<Keyframe>,
}

impl AnimationTrack {
    /// Create a new empty track
    pub fn new(target: TrackTarget) -> Self {
        Self {
            id: TrackId::new(),
            target,
            keyframes: Vec::new(),
        }
    }

    /// Add a keyframe
    pub fn add_keyframe(&mut self, keyframe: Keyframe) -> KeyframeId {
        let id = keyframe.id;
        self.keyframes.push(keyframe);
        self.sort_keyframes();
        id
    }

    /// Remove a keyframe
    pub fn remove_keyframe(&mut self, keyframe_id: KeyframeId) -> Option<Keyframe> {
        let idx = self.keyframes.iter().position(|k| k.id == keyframe_id)?;
        Some(self.keyframes.remove(idx))
    }

    /// Edit a keyframe in place and re-sort
    pub fn update_keyframe(&mut self, keyframe_id: KeyframeId, patch: &KeyframePatch) -> bool {
        let Some(kf) = self.keyframes.iter_mut().find(|k| k.id == keyframe_id) else {
            return false;
        };
        patch.apply(kf);
        self.sort_keyframes();
        true
    }

    /// Insert a keyframe, or overwrite the one already at `time` for this property
    pub fn upsert_keyframe(
        &mut self,
        time: f32,
        property: AnimatableProperty,
        value: [f32; 3],
        easing: Easing,
    ) -> KeyframeId {
        if let Some(kf) = self
            .keyframes
            .iter_mut()
            .find(|k| k.property == property && k.is_at(time))
        {
            kf.value = value;
            kf.easing = easing;
            return kf.id;
        }
        self.add_keyframe(Keyframe::new(time, property, value).with_easing(easing))
    }

    /// Sort keyframes by time; stable so equal times keep insertion order
    fn sort_keyframes(&mut self) {
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Restore time ordering, e.g. after deserializing foreign data
    pub fn normalize(&mut self) {
        for kf in &mut self.keyframes {
            kf.time = kf.time.max(0.0);
        }
        self.sort_keyframes();
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Keyframes of a single property, in time order
    pub fn keyframes_for(&self, property: AnimatableProperty) -> impl Iterator<Item = &Keyframe> {
        self.keyframes.iter().filter(move |k| k.property == property)
    }

    /// Get keyframe by ID
    pub fn keyframe(&self, keyframe_id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == keyframe_id)
    }

    /// Get the keyframe of `property` at `time` (if exists)
    pub fn keyframe_at(&self, property: AnimatableProperty, time: f32) -> Option<&Keyframe> {
        self.keyframes_for(property).find(|k| k.is_at(time))
    }

    /// Distinct properties present in this track
    pub fn properties(&self) -> Vec<AnimatableProperty> {
        let mut properties: Vec<_> = self.keyframes.iter().map(|k| k.property).collect();
        properties.sort();
        properties.dedup();
        properties
    }

    /// Get the duration (time of last keyframe)
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map(|k| k.time).unwrap_or(0.0)
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Evaluate one property at `time`
    pub fn evaluate_property(&self, property: AnimatableProperty, time: f32) -> Option<[f32; 3]> {
        let keys: Vec<&Keyframe> = self.keyframes_for(property).collect();
        evaluate_channel(&keys, time)
    }

    /// Evaluate every property present in the track at `time`
    pub fn evaluate(&self, time: f32) -> TrackValues {
        let values = self
            .properties()
            .into_iter()
            .filter_map(|p| Some((p, self.evaluate_property(p, time)?)))
            .collect();
        TrackValues { values }
    }
}

/// Evaluate a time-sorted channel.
///
/// Values hold outside the keyed range. Between two keyframes the fraction
/// is shaped by the easing of the keyframe being approached.
fn evaluate_channel(keys: &[&Keyframe], time: f32) -> Option<[f32; 3]> {
    let first = keys.first()?;
    let last = keys.last()?;
    if time <= first.time {
        return Some(first.value);
    }
    if time >= last.time {
        return Some(last.value);
    }

    // first.time < time < last.time, so 1 <= next_idx < len
    let next_idx = keys.iter().position(|k| k.time > time)?;
    let a = keys[next_idx - 1];
    let b = keys[next_idx];
    let span = b.time - a.time;
    if span < 0.0001 {
        return Some(b.value);
    }
    let t = b.easing.apply((time - a.time) / span);
    Some(Interpolation::lerp_vec3(a.value, b.value, t))
}
