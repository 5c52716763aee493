// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cinematic camera paths.
//!
//! A path is an ordered list of control points, each with a camera
//! position, a look-at target, a time and a tension. Evaluation remaps time
//! through the path easing and then samples position and target on two
//! independent splines.
//!
//! Camera path playback is separate from the animation timeline and is not
//! part of undo.

use crate::easing::Easing;
use crate::playback::{PlaybackController, PlaybackState};
use crate::spline::{self, SplineKnot};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default path length in seconds
pub const DEFAULT_PATH_DURATION: f32 = 10.0;

/// Shortest allowed path
pub const MIN_PATH_DURATION: f32 = 0.1;

/// Default control point tension
pub const DEFAULT_TENSION: f32 = 0.5;

/// Time between a new control point and the previous last one
pub const POINT_SPACING: f32 = 2.0;

/// Distance from the origin of newly added control points
const NEW_POINT_RADIUS: f32 = 8.0;

/// Height of newly added control points
const NEW_POINT_HEIGHT: f32 = 3.0;

/// Clamp a tension to 0..1; `None` for NaN or infinite input
fn sanitize_tension(tension: f32) -> Option<f32> {
    tension.is_finite().then(|| tension.clamp(0.0, 1.0))
}

/// Unique identifier for a camera path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathId(pub Uuid);

impl PathId {
    /// Create a new random path ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PathId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a control point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointId(pub Uuid);

impl PointId {
    /// Create a new random point ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PointId {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera placement produced by evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position
    pub position: [f32; 3],
    /// Look-at point
    pub look_at: [f32; 3],
}

/// A waypoint on a camera path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Unique point ID
    pub id: PointId,
    /// Camera position
    pub position: [f32; 3],
    /// Look-at target
    pub target: [f32; 3],
    /// Time along the path (0..duration)
    pub time: f32,
    /// Spline tension (0..1)
    pub tension: f32,
}

impl ControlPoint {
    /// Create a control point with default tension
    pub fn new(position: [f32; 3], target: [f32; 3], time: f32) -> Self {
        Self {
            id: PointId::new(),
            position,
            target,
            time,
            tension: DEFAULT_TENSION,
        }
    }
}

/// Edit applied by `CameraPathEngine::update_path`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathPatch {
    /// New name
    pub name: Option<String>,
    /// New duration
    pub duration: Option<f32>,
    /// New easing
    pub easing: Option<Easing>,
    /// New loop flag
    pub looping: Option<bool>,
}

/// Edit applied by `CameraPathEngine::update_point`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointPatch {
    /// New position
    pub position: Option<[f32; 3]>,
    /// New look-at target
    pub target: Option<[f32; 3]>,
    /// New time
    pub time: Option<f32>,
    /// New tension
    pub tension: Option<f32>,
}

/// A named cinematic camera path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPath {
    /// Unique path ID
    pub id: PathId,
    /// Display name
    pub name: String,
    /// Total length in seconds
    pub duration: f32,
    /// Whether playback wraps
    pub looping: bool,
    /// Path-level time remapping
    pub easing: Easing,
    /// Control points sorted by time
    points: Vec<ControlPoint>,
}

impl CameraPath {
    /// Create an empty path
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PathId::new(),
            name: name.into(),
            duration: DEFAULT_PATH_DURATION,
            looping: false,
            easing: Easing::Linear,
            points: Vec::new(),
        }
    }

    /// Control points in time order
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Get a control point
    pub fn point(&self, point_id: PointId) -> Option<&ControlPoint> {
        self.points.iter().find(|p| p.id == point_id)
    }

    /// Check if the path has enough points to move the camera
    pub fn is_playable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Insert a control point; time and tension are clamped
    pub fn add_point(&mut self, mut point: ControlPoint) -> PointId {
        point.time = if point.time.is_finite() { point.time.max(0.0) } else { 0.0 };
        point.tension = sanitize_tension(point.tension).unwrap_or(DEFAULT_TENSION);
        if point.time > self.duration {
            self.duration = point.time;
        }
        let id = point.id;
        self.points.push(point);
        self.sort_points();
        id
    }

    /// Remove a control point
    pub fn remove_point(&mut self, point_id: PointId) -> Option<ControlPoint> {
        let idx = self.points.iter().position(|p| p.id == point_id)?;
        Some(self.points.remove(idx))
    }

    /// Edit a control point in place and re-sort
    pub fn update_point(&mut self, point_id: PointId, patch: &PointPatch) -> bool {
        let duration = self.duration;
        let Some(point) = self.points.iter_mut().find(|p| p.id == point_id) else {
            return false;
        };
        if let Some(position) = patch.position {
            point.position = position;
        }
        if let Some(target) = patch.target {
            point.target = target;
        }
        if let Some(time) = patch.time.filter(|t| t.is_finite()) {
            point.time = time.clamp(0.0, duration);
        }
        if let Some(tension) = patch.tension.and_then(sanitize_tension) {
            point.tension = tension;
        }
        self.sort_points();
        true
    }

    /// Apply a path-level edit
    pub fn apply(&mut self, patch: &PathPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(duration) = patch.duration {
            self.set_duration(duration);
        }
        if let Some(easing) = patch.easing {
            self.easing = easing;
        }
        if let Some(looping) = patch.looping {
            self.looping = looping;
        }
    }

    /// Set the length; points beyond it are pulled back onto the end
    pub fn set_duration(&mut self, duration: f32) {
        if !duration.is_finite() {
            return;
        }
        self.duration = duration.max(MIN_PATH_DURATION);
        for point in &mut self.points {
            point.time = point.time.min(self.duration);
        }
        self.sort_points();
    }

    /// Restore point ordering and ranges, e.g. after deserializing
    pub fn normalize(&mut self) {
        self.duration = if self.duration.is_finite() {
            self.duration.max(MIN_PATH_DURATION)
        } else {
            DEFAULT_PATH_DURATION
        };
        for point in &mut self.points {
            point.time = if point.time.is_finite() { point.time.clamp(0.0, self.duration) } else { 0.0 };
            point.tension = sanitize_tension(point.tension).unwrap_or(DEFAULT_TENSION);
        }
        self.sort_points();
    }

    fn sort_points(&mut self) {
        self.points.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Map playback time onto the path's local (eased) time
    pub fn local_time(&self, time: f32) -> f32 {
        let duration = self.duration.max(MIN_PATH_DURATION);
        let t = if self.looping {
            time.rem_euclid(duration)
        } else {
            time.clamp(0.0, duration)
        };
        self.easing.apply(t / duration) * duration
    }

    /// Evaluate the camera pose at `time`.
    ///
    /// Returns `None` with fewer than two control points.
    pub fn evaluate(&self, time: f32) -> Option<CameraPose> {
        if !self.is_playable() {
            return None;
        }
        let t = self.local_time(time);

        let positions: Vec<SplineKnot> = self
            .points
            .iter()
            .map(|p| SplineKnot { time: p.time, value: p.position, tension: p.tension })
            .collect();
        let targets: Vec<SplineKnot> = self
            .points
            .iter()
            .map(|p| SplineKnot { time: p.time, value: p.target, tension: p.tension })
            .collect();

        Some(CameraPose {
            position: spline::sample(&positions, t)?,
            look_at: spline::sample(&targets, t)?,
        })
    }
}

/// Camera path playback state
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPathPlayback {
    clock: PlaybackController,
    /// Whether scrubbing drives the viewport camera
    pub preview_enabled: bool,
}

impl Default for CameraPathPlayback {
    fn default() -> Self {
        Self {
            clock: PlaybackController::new(),
            preview_enabled: true,
        }
    }
}

/// Camera paths with an active path and independent playback
#[derive(Debug, Clone, Default)]
pub struct CameraPathEngine {
    paths: IndexMap<PathId, CameraPath>,
    active_path_id: Option<PathId>,
    selected_point_id: Option<PointId>,
    playback: CameraPathPlayback,
    next_path_number: u32,
}

impl CameraPathEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------

    /// Create a path ("Camera Path N" when unnamed) and make it active
    pub fn add_path(&mut self, name: Option<String>) -> PathId {
        self.next_path_number += 1;
        let name = name.unwrap_or_else(|| format!("Camera Path {}", self.next_path_number));
        let path = CameraPath::new(name);
        let id = path.id;
        tracing::debug!("Added camera path {}", path.name);
        self.paths.insert(id, path);
        self.set_active_path(Some(id));
        id
    }

    /// Remove a path; playback stops if it was active
    pub fn remove_path(&mut self, path_id: PathId) -> Option<CameraPath> {
        let removed = self.paths.shift_remove(&path_id)?;
        if self.active_path_id == Some(path_id) {
            let next = self.paths.keys().next().copied();
            self.set_active_path(next);
        }
        Some(removed)
    }

    /// Apply a path-level edit
    pub fn update_path(&mut self, path_id: PathId, patch: &PathPatch) -> bool {
        let Some(path) = self.paths.get_mut(&path_id) else {
            return false;
        };
        path.apply(patch);
        if self.active_path_id == Some(path_id) {
            let duration = path.duration;
            self.playback.clock.seek(self.playback.clock.time, duration);
        }
        true
    }

    /// Get a path
    pub fn path(&self, path_id: PathId) -> Option<&CameraPath> {
        self.paths.get(&path_id)
    }

    /// Get all paths
    pub fn paths(&self) -> impl Iterator<Item = &CameraPath> {
        self.paths.values()
    }

    /// Get path count
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// The path being edited and played
    pub fn active_path(&self) -> Option<&CameraPath> {
        self.active_path_id.and_then(|id| self.paths.get(&id))
    }

    /// ID of the active path
    pub fn active_path_id(&self) -> Option<PathId> {
        self.active_path_id
    }

    /// Change the active path; switching stops playback
    pub fn set_active_path(&mut self, path_id: Option<PathId>) {
        let path_id = path_id.filter(|id| self.paths.contains_key(id));
        if path_id != self.active_path_id {
            self.playback.clock.stop();
            self.selected_point_id = None;
        }
        self.active_path_id = path_id;
    }

    // ------------------------------------------------------------------
    // Control points
    // ------------------------------------------------------------------

    /// Append a control point with default placement and select it.
    ///
    /// New points orbit the origin looking at it, one `POINT_SPACING`
    /// after the current last point.
    pub fn add_point(&mut self, path_id: PathId) -> Option<PointId> {
        let path = self.paths.get_mut(&path_id)?;
        let count = path.points.len();
        let time = path.points.last().map_or(0.0, |p| p.time + POINT_SPACING);
        let angle = (count as f32) * std::f32::consts::FRAC_PI_4;
        let position = [
            NEW_POINT_RADIUS * angle.cos(),
            NEW_POINT_HEIGHT,
            NEW_POINT_RADIUS * angle.sin(),
        ];
        let id = path.add_point(ControlPoint::new(position, [0.0; 3], time));
        self.selected_point_id = Some(id);
        Some(id)
    }

    /// Remove a control point
    pub fn remove_point(&mut self, path_id: PathId, point_id: PointId) -> bool {
        let removed = self
            .paths
            .get_mut(&path_id)
            .and_then(|p| p.remove_point(point_id))
            .is_some();
        if removed && self.selected_point_id == Some(point_id) {
            self.selected_point_id = None;
        }
        if removed && self.active_path().is_some_and(|p| !p.is_playable()) {
            self.playback.clock.stop();
        }
        removed
    }

    /// Edit a control point
    pub fn update_point(&mut self, path_id: PathId, point_id: PointId, patch: &PointPatch) -> bool {
        self.paths
            .get_mut(&path_id)
            .is_some_and(|p| p.update_point(point_id, patch))
    }

    /// Focus a control point for editing
    pub fn select_point(&mut self, point_id: Option<PointId>) {
        self.selected_point_id = point_id;
    }

    /// Focused control point
    pub fn selected_point_id(&self) -> Option<PointId> {
        self.selected_point_id
    }

    // ------------------------------------------------------------------
    // Evaluation and playback
    // ------------------------------------------------------------------

    /// Evaluate a path at `time`
    pub fn evaluate_path(&self, path_id: PathId, time: f32) -> Option<CameraPose> {
        self.paths.get(&path_id)?.evaluate(time)
    }

    /// Start playing the active path; needs at least two points
    pub fn play(&mut self) -> bool {
        let Some(path) = self.active_path() else {
            return false;
        };
        if !path.is_playable() {
            tracing::debug!("Camera path {} needs two points to play", path.name);
            return false;
        }
        if self.playback.clock.time >= path.duration {
            self.playback.clock.time = 0.0;
        }
        self.playback.clock.play();
        true
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.playback.clock.pause();
    }

    /// Stop and rewind to zero
    pub fn stop(&mut self) {
        self.playback.clock.stop();
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) -> bool {
        if self.is_playing() {
            self.pause();
            true
        } else {
            self.play()
        }
    }

    /// Scrub to `time` (clamped to the active path) and return the preview pose
    pub fn set_playback_time(&mut self, time: f32) -> Option<CameraPose> {
        let path = self.active_path_id.and_then(|id| self.paths.get(&id))?;
        self.playback.clock.seek(time, path.duration);
        if !self.playback.preview_enabled {
            return None;
        }
        path.evaluate(self.playback.clock.time)
    }

    /// Advance playback by one frame and return the new pose
    pub fn advance(&mut self, delta_time: f32) -> Option<CameraPose> {
        if !self.is_playing() {
            return None;
        }
        let Some(path) = self.active_path_id.and_then(|id| self.paths.get(&id)) else {
            self.playback.clock.stop();
            return None;
        };
        if !path.is_playable() {
            self.playback.clock.stop();
            return None;
        }
        self.playback.clock.advance(delta_time, path.duration, path.looping);
        path.evaluate(self.playback.clock.time)
    }

    /// Current playback time
    pub fn playback_time(&self) -> f32 {
        self.playback.clock.time
    }

    /// Playback state
    pub fn state(&self) -> PlaybackState {
        self.playback.clock.state
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.playback.clock.is_playing()
    }

    /// Whether scrubbing drives the viewport camera
    pub fn preview_enabled(&self) -> bool {
        self.playback.preview_enabled
    }

    /// Enable or disable scrub preview
    pub fn set_preview_enabled(&mut self, enabled: bool) {
        self.playback.preview_enabled = enabled;
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Copy out all paths
    pub fn export(&self) -> Vec<CameraPath> {
        self.paths.values().cloned().collect()
    }

    /// Replace all paths; the first one becomes active
    pub fn import(&mut self, paths: Vec<CameraPath>) {
        self.paths = paths
            .into_iter()
            .map(|mut p| {
                p.normalize();
                (p.id, p)
            })
            .collect();
        self.next_path_number = self.paths.len() as u32;
        self.active_path_id = None;
        let first = self.paths.keys().next().copied();
        self.set_active_path(first);
        self.playback.clock.stop();
    }
}
