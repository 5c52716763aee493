// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session context.
//!
//! `EditorDocument` owns the scene store, the animation engine and the
//! camera path engine. It is the value a host passes to the frame driver,
//! command dispatch and serialization; there is no global instance.

use crate::document::SceneDocument;
use crate::settings::EditorSettings;
use atelier_editor_scene::{ObjectId, SceneStore};
use atelier_editor_sequencer::camera_path::DEFAULT_PATH_DURATION;
use atelier_editor_sequencer::{
    AnimationEngine, CameraPathEngine, CameraPose, Easing, PathId, PathPatch, TrackTarget,
    TrackedObject,
};

/// Scene, animation and camera paths of one editing session
#[derive(Debug, Clone)]
pub struct EditorDocument {
    /// Scene graph with undo/redo
    pub scene: SceneStore,
    /// Keyframe animation
    pub animation: AnimationEngine,
    /// Cinematic camera paths
    pub camera_paths: CameraPathEngine,
    path_duration: f32,
}

impl Default for EditorDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorDocument {
    /// Create an empty document with default settings
    pub fn new() -> Self {
        Self {
            scene: SceneStore::new(),
            animation: AnimationEngine::new(),
            camera_paths: CameraPathEngine::new(),
            path_duration: DEFAULT_PATH_DURATION,
        }
    }

    /// Create an empty document configured from settings
    pub fn with_settings(settings: &EditorSettings) -> Self {
        let mut animation = AnimationEngine::new();
        animation.set_duration(settings.animation.duration);
        animation.set_playback_speed(settings.animation.speed);
        animation.set_loop(settings.animation.looping);

        Self {
            scene: SceneStore::with_config(settings.scene_config()),
            animation,
            camera_paths: CameraPathEngine::new(),
            path_duration: settings.camera_path.duration,
        }
    }

    /// Snapshot the whole session as a serializable document
    pub fn export_document(&self) -> SceneDocument {
        let mut document = SceneDocument::from_objects(self.scene.objects().cloned().collect());
        document.animation = self.animation.export();
        document.camera_paths = self.camera_paths.export();
        document
    }

    /// Replace the whole session with a document.
    ///
    /// Scene history restarts, playback stops, and tracks bound to objects
    /// the document does not contain are dropped.
    pub fn import_document(&mut self, document: SceneDocument) {
        self.scene.load_scene(document.objects);
        self.animation.import(document.animation);
        self.camera_paths.import(document.camera_paths);
        let dropped = self.prune_orphan_tracks();
        if dropped > 0 {
            tracing::warn!("Dropped {} tracks bound to missing objects", dropped);
        }
    }

    /// Remove tracks whose object is no longer in the scene
    pub fn prune_orphan_tracks(&mut self) -> usize {
        let orphans: Vec<ObjectId> = self
            .animation
            .tracks()
            .filter_map(|t| t.target.object())
            .filter(|id| !self.scene.contains(id))
            .collect();
        orphans
            .iter()
            .map(|id| self.animation.remove_tracks_for_object(id))
            .sum()
    }

    /// Delete an object with its descendants and their animation tracks
    pub fn delete_object(&mut self, id: &ObjectId) -> Vec<ObjectId> {
        let removed = self.scene.remove_object(id);
        self.drop_tracks(&removed);
        removed
    }

    /// Delete the selection with descendants and their animation tracks
    pub fn delete_selected(&mut self) -> Vec<ObjectId> {
        let removed = self.scene.remove_selected();
        self.drop_tracks(&removed);
        removed
    }

    fn drop_tracks(&mut self, removed: &[ObjectId]) {
        let tracks: usize = removed
            .iter()
            .map(|id| self.animation.remove_tracks_for_object(id))
            .sum();
        if tracks > 0 {
            tracing::debug!("Removed {} tracks with {} deleted objects", tracks, removed.len());
        }
    }

    /// Key the camera and every scene object at `time` (default: playhead)
    pub fn capture_keyframe(&mut self, camera: CameraPose, time: Option<f32>, easing: Option<Easing>) -> f32 {
        let objects: Vec<TrackedObject> = self
            .scene
            .objects()
            .map(|o| TrackedObject { id: o.id, transform: o.transform })
            .collect();
        self.animation
            .capture_scene_keyframe(camera.position, camera.look_at, &objects, time, easing)
    }

    /// Create a camera path with the configured default duration
    pub fn add_camera_path(&mut self, name: Option<String>) -> PathId {
        let id = self.camera_paths.add_path(name);
        self.camera_paths.update_path(
            id,
            &PathPatch {
                duration: Some(self.path_duration),
                ..Default::default()
            },
        );
        id
    }

    /// Check if animation currently owns the viewport camera
    pub fn animation_drives_camera(&self) -> bool {
        self.animation.is_playing() && self.animation.has_camera_track()
    }

    /// Check if an object is animated
    pub fn is_animated(&self, id: &ObjectId) -> bool {
        self.animation
            .track_for(TrackTarget::Object(*id))
            .is_some_and(|t| t.keyframe_count() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_editor_scene::ObjectKind;
    use atelier_editor_sequencer::AnimatableProperty;

    fn camera() -> CameraPose {
        CameraPose {
            position: [0.0, 5.0, 10.0],
            look_at: [0.0; 3],
        }
    }

    #[test]
    fn test_settings_are_applied() {
        let mut settings = EditorSettings::default();
        settings.animation.duration = 4.0;
        settings.animation.looping = true;
        settings.camera_path.duration = 6.0;
        settings.history.capacity = 2;

        let mut doc = EditorDocument::with_settings(&settings);
        assert_eq!(doc.animation.duration(), 4.0);
        assert!(doc.animation.looping());
        assert_eq!(doc.scene.history_stats().max_depth, 2);

        let path = doc.add_camera_path(None);
        assert_eq!(doc.camera_paths.path(path).map(|p| p.duration), Some(6.0));
    }

    #[test]
    fn test_delete_selected_drops_tracks() {
        let mut doc = EditorDocument::new();
        let parent = doc.scene.add_object(ObjectKind::Box);
        let child = doc.scene.add_object(ObjectKind::Sphere);
        let other = doc.scene.add_object(ObjectKind::Cone);
        doc.scene.set_parent(&child, Some(parent));
        doc.capture_keyframe(camera(), Some(0.0), None);
        assert_eq!(doc.animation.track_count(), 4);

        doc.scene.select_object(Some(parent));
        let removed = doc.delete_selected();
        assert_eq!(removed.len(), 2);
        assert_eq!(doc.animation.track_count(), 2);
        assert!(doc.is_animated(&other));
        assert!(!doc.is_animated(&child));
        assert!(doc.animation.has_camera_track());
    }

    #[test]
    fn test_capture_keys_every_object() {
        let mut doc = EditorDocument::new();
        let id = doc.scene.add_object(ObjectKind::Box);
        let time = doc.capture_keyframe(camera(), Some(2.0), Some(Easing::EaseIn));
        assert_eq!(time, 2.0);

        let track = doc.animation.track_for(TrackTarget::Object(id)).unwrap();
        assert_eq!(track.keyframe_count(), 3);
        let kf = track.keyframe_at(AnimatableProperty::Scale, 2.0).unwrap();
        assert_eq!(kf.value, [1.0; 3]);
        assert_eq!(kf.easing, Easing::EaseIn);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut doc = EditorDocument::new();
        let a = doc.scene.add_object(ObjectKind::Box);
        let b = doc.scene.add_object(ObjectKind::Torus);
        doc.scene.set_parent(&b, Some(a));
        doc.capture_keyframe(camera(), Some(1.0), None);
        let path = doc.add_camera_path(Some("Intro".to_string()));
        doc.camera_paths.add_point(path);
        doc.camera_paths.add_point(path);

        let exported = doc.export_document();
        let mut restored = EditorDocument::new();
        restored.import_document(exported.clone());

        assert_eq!(restored.export_document(), exported);
        assert_eq!(restored.scene.children(&a).len(), 1);
        assert!(!restored.scene.can_undo());
        assert_eq!(restored.camera_paths.active_path().map(|p| p.name.as_str()), Some("Intro"));
    }

    #[test]
    fn test_import_drops_orphan_tracks() {
        let mut doc = EditorDocument::new();
        let id = doc.scene.add_object(ObjectKind::Box);
        doc.capture_keyframe(camera(), Some(0.0), None);
        let mut exported = doc.export_document();
        exported.objects.retain(|o| o.id != id);

        let mut restored = EditorDocument::new();
        restored.import_document(exported);
        assert_eq!(restored.animation.track_count(), 1);
        assert!(restored.animation.camera_track().is_some());
    }
}
