// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation engine: keyframe tracks plus a playhead.

use crate::binding::TrackTarget;
use crate::easing::Easing;
use crate::keyframe::{AnimatableProperty, Keyframe, KeyframeId, KeyframePatch};
use crate::playback::{PlaybackController, PlaybackState};
use crate::track::{AnimationTrack, TrackId, TrackValues};
use atelier_editor_scene::{ObjectId, Transform};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default timeline length in seconds
pub const DEFAULT_DURATION: f32 = 10.0;

/// Shortest allowed timeline
pub const MIN_DURATION: f32 = 0.1;

/// Slowest playback multiplier
pub const MIN_SPEED: f32 = 0.1;

/// Fastest playback multiplier
pub const MAX_SPEED: f32 = 4.0;

/// Object state handed to `AnimationEngine::capture_scene_keyframe`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedObject {
    /// Object to key
    pub id: ObjectId,
    /// Its current transform
    pub transform: Transform,
}

impl TrackedObject {
    fn value(&self, property: AnimatableProperty) -> Option<[f32; 3]> {
        match property {
            AnimatableProperty::Position => Some(self.transform.position),
            AnimatableProperty::Rotation => Some(self.transform.rotation),
            AnimatableProperty::Scale => Some(self.transform.scale),
            AnimatableProperty::CameraPosition | AnimatableProperty::CameraTarget => None,
        }
    }
}

/// Serializable animation content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    /// All tracks
    pub tracks: Vec<AnimationTrack>,
    /// Timeline length
    pub duration: f32,
    /// Whether playback wraps
    pub looping: bool,
}

impl Default for AnimationData {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            duration: DEFAULT_DURATION,
            looping: false,
        }
    }
}

/// Keyframe tracks with playback
#[derive(Debug, Clone)]
pub struct AnimationEngine {
    tracks: IndexMap<TrackId, AnimationTrack>,
    playback: PlaybackController,
    duration: f32,
    looping: bool,
}

impl AnimationEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self {
            tracks: IndexMap::new(),
            playback: PlaybackController::new(),
            duration: DEFAULT_DURATION,
            looping: false,
        }
    }

    // ------------------------------------------------------------------
    // Tracks
    // ------------------------------------------------------------------

    /// Create a track for `target`, or return the one it already has
    pub fn add_track(&mut self, target: TrackTarget) -> TrackId {
        if let Some(track) = self.track_for(target) {
            return track.id;
        }
        let track = AnimationTrack::new(target);
        let id = track.id;
        self.tracks.insert(id, track);
        id
    }

    /// Remove a track
    pub fn remove_track(&mut self, track_id: TrackId) -> Option<AnimationTrack> {
        self.tracks.shift_remove(&track_id)
    }

    /// Remove every track targeting `object_id`
    pub fn remove_tracks_for_object(&mut self, object_id: &ObjectId) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|_, t| t.target.object().as_ref() != Some(object_id));
        before - self.tracks.len()
    }

    /// Get a track
    pub fn track(&self, track_id: TrackId) -> Option<&AnimationTrack> {
        self.tracks.get(&track_id)
    }

    /// Get the track bound to `target`
    pub fn track_for(&self, target: TrackTarget) -> Option<&AnimationTrack> {
        self.tracks.values().find(|t| t.target == target)
    }

    /// Get the camera track
    pub fn camera_track(&self) -> Option<&AnimationTrack> {
        self.track_for(TrackTarget::Camera)
    }

    /// Check if a camera track with at least one keyframe exists
    pub fn has_camera_track(&self) -> bool {
        self.camera_track().is_some_and(|t| t.keyframe_count() > 0)
    }

    /// Get all tracks
    pub fn tracks(&self) -> impl Iterator<Item = &AnimationTrack> {
        self.tracks.values()
    }

    /// Get track count
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Time of the last keyframe across all tracks
    pub fn content_duration(&self) -> f32 {
        self.tracks.values().map(AnimationTrack::duration).fold(0.0, f32::max)
    }

    // ------------------------------------------------------------------
    // Keyframes
    // ------------------------------------------------------------------

    /// Add a keyframe to a track.
    ///
    /// Returns `None` for an unknown track or a property that does not
    /// belong to the track's target (camera properties on objects or the
    /// reverse).
    pub fn add_keyframe(
        &mut self,
        track_id: TrackId,
        time: f32,
        property: AnimatableProperty,
        value: [f32; 3],
        easing: Easing,
    ) -> Option<KeyframeId> {
        let track = self.tracks.get_mut(&track_id)?;
        if property.is_camera() != track.target.is_camera() {
            tracing::debug!("Ignoring {} keyframe on {:?}", property.name(), track.target);
            return None;
        }
        Some(track.add_keyframe(Keyframe::new(time, property, value).with_easing(easing)))
    }

    /// Edit a keyframe in place
    pub fn update_keyframe(&mut self, track_id: TrackId, keyframe_id: KeyframeId, patch: &KeyframePatch) -> bool {
        self.tracks
            .get_mut(&track_id)
            .is_some_and(|t| t.update_keyframe(keyframe_id, patch))
    }

    /// Remove a keyframe
    pub fn remove_keyframe(&mut self, track_id: TrackId, keyframe_id: KeyframeId) -> bool {
        self.tracks
            .get_mut(&track_id)
            .and_then(|t| t.remove_keyframe(keyframe_id))
            .is_some()
    }

    /// Key the camera and every supplied object at `time` (default: the
    /// playhead). Existing keyframes at the same time are overwritten.
    ///
    /// Returns the time that was keyed.
    pub fn capture_scene_keyframe(
        &mut self,
        camera_position: [f32; 3],
        camera_target: [f32; 3],
        objects: &[TrackedObject],
        time: Option<f32>,
        easing: Option<Easing>,
    ) -> f32 {
        let time = time.unwrap_or(self.playback.time).max(0.0);
        let easing = easing.unwrap_or_default();

        let camera_id = self.add_track(TrackTarget::Camera);
        if let Some(track) = self.tracks.get_mut(&camera_id) {
            track.upsert_keyframe(time, AnimatableProperty::CameraPosition, camera_position, easing);
            track.upsert_keyframe(time, AnimatableProperty::CameraTarget, camera_target, easing);
        }

        for object in objects {
            let track_id = self.add_track(TrackTarget::Object(object.id));
            let Some(track) = self.tracks.get_mut(&track_id) else {
                continue;
            };
            for property in AnimatableProperty::OBJECT {
                if let Some(value) = object.value(property) {
                    track.upsert_keyframe(time, property, value, easing);
                }
            }
        }

        tracing::debug!("Captured keyframe at {:.3}s for {} objects", time, objects.len());
        time
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Evaluate one track at `time`
    pub fn evaluate_track(&self, track_id: TrackId, time: f32) -> Option<TrackValues> {
        self.tracks.get(&track_id).map(|t| t.evaluate(time))
    }

    /// Evaluate all tracks at `time`, skipping tracks with no values
    pub fn evaluate_all(&self, time: f32) -> Vec<(TrackTarget, TrackValues)> {
        self.tracks
            .values()
            .map(|t| (t.target, t.evaluate(time)))
            .filter(|(_, values)| !values.is_empty())
            .collect()
    }

    /// Evaluate all tracks at the playhead
    pub fn evaluate_current(&self) -> Vec<(TrackTarget, TrackValues)> {
        self.evaluate_all(self.playback.time)
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    /// Start or resume playback
    pub fn play(&mut self) {
        if self.playback.time >= self.duration {
            self.playback.time = 0.0;
        }
        self.playback.play();
        tracing::debug!("Animation playing from {:.3}s", self.playback.time);
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.playback.pause();
    }

    /// Stop and rewind
    pub fn stop(&mut self) {
        self.playback.stop();
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        if self.playback.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the playhead, clamped to [0, duration]
    pub fn set_current_time(&mut self, time: f32) {
        self.playback.seek(time, self.duration);
    }

    /// Set the timeline length (at least `MIN_DURATION`)
    pub fn set_duration(&mut self, duration: f32) {
        self.duration = if duration.is_finite() { duration.max(MIN_DURATION) } else { DEFAULT_DURATION };
        self.playback.time = self.playback.time.min(self.duration);
    }

    /// Set the playback speed, clamped to [`MIN_SPEED`, `MAX_SPEED`]
    pub fn set_playback_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.playback.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        }
    }

    /// Enable or disable looping
    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Advance the playhead by one frame
    pub fn advance(&mut self, delta_time: f32) -> bool {
        self.playback.advance(delta_time, self.duration, self.looping)
    }

    /// Current playhead time
    pub fn current_time(&self) -> f32 {
        self.playback.time
    }

    /// Timeline length
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Playback speed multiplier
    pub fn playback_speed(&self) -> f32 {
        self.playback.speed
    }

    /// Whether playback wraps
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Playback state
    pub fn state(&self) -> PlaybackState {
        self.playback.state
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Copy out the serializable content
    pub fn export(&self) -> AnimationData {
        AnimationData {
            tracks: self.tracks.values().cloned().collect(),
            duration: self.duration,
            looping: self.looping,
        }
    }

    /// Replace all content. Playback is stopped; a second track for an
    /// already bound target is dropped.
    pub fn import(&mut self, data: AnimationData) {
        self.tracks.clear();
        for mut track in data.tracks {
            if self.track_for(track.target).is_some() {
                tracing::warn!("Dropping duplicate track for {:?}", track.target);
                continue;
            }
            track.normalize();
            self.tracks.insert(track.id, track);
        }
        self.looping = data.looping;
        self.set_duration(data.duration);
        self.stop();
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new()
    }
}
