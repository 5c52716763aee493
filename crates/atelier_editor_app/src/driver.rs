// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-frame playback driver.
//!
//! Once per frame the driver advances whichever time engines are playing
//! and writes their output back: animated transforms go into the scene
//! store without touching history, camera poses go to a `CameraController`.
//! Animation wins the camera when it is playing with a camera track; camera
//! path playback still advances that frame but does not write.

use crate::editor::EditorDocument;
use atelier_editor_scene::Transform;
use atelier_editor_sequencer::{AnimatableProperty, CameraPose, TrackTarget};

/// Receiver of evaluated camera poses (the viewport camera)
pub trait CameraController {
    /// Current camera pose
    fn pose(&self) -> CameraPose;

    /// Move the camera
    fn set_pose(&mut self, pose: CameraPose);
}

/// Which engine wrote the camera this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSource {
    /// Animation camera track
    Animation,
    /// Active camera path
    CameraPath,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// Delta actually applied
    pub delta: f32,
    /// Objects whose transform was written
    pub objects_written: usize,
    /// Engine that moved the camera, if any
    pub camera: Option<CameraSource>,
}

/// Replace non-finite or negative frame deltas with zero
pub fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() && delta > 0.0 {
        delta
    } else {
        0.0
    }
}

/// Drives playback once per frame
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    frame: u64,
}

impl FrameDriver {
    /// Create a new driver
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames ticked so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance playing engines by `delta` seconds and write their output
    pub fn tick(
        &mut self,
        document: &mut EditorDocument,
        camera: &mut dyn CameraController,
        delta: f32,
    ) -> FrameReport {
        self.frame += 1;
        let delta = sanitize_delta(delta);
        let mut report = FrameReport {
            delta,
            ..Default::default()
        };

        let animation_owns_camera = document.animation_drives_camera();
        if document.animation.is_playing() {
            document.animation.advance(delta);
            let (written, camera_written) = apply_animation(document, camera);
            report.objects_written = written;
            if camera_written {
                report.camera = Some(CameraSource::Animation);
            }
        }

        if document.camera_paths.is_playing() {
            let pose = document.camera_paths.advance(delta);
            if let Some(pose) = pose.filter(|_| !animation_owns_camera) {
                camera.set_pose(pose);
                report.camera = Some(CameraSource::CameraPath);
            }
        }

        report
    }

    /// Move the animation playhead and apply the pose at that time
    pub fn scrub_animation(
        &mut self,
        document: &mut EditorDocument,
        camera: &mut dyn CameraController,
        time: f32,
    ) -> FrameReport {
        document.animation.set_current_time(time);
        let (objects_written, camera_written) = apply_animation(document, camera);
        FrameReport {
            delta: 0.0,
            objects_written,
            camera: camera_written.then_some(CameraSource::Animation),
        }
    }

    /// Move the camera path playhead and apply the preview pose
    pub fn scrub_camera_path(
        &mut self,
        document: &mut EditorDocument,
        camera: &mut dyn CameraController,
        time: f32,
    ) -> FrameReport {
        let pose = document.camera_paths.set_playback_time(time);
        if let Some(pose) = pose {
            camera.set_pose(pose);
        }
        FrameReport {
            delta: 0.0,
            objects_written: 0,
            camera: pose.map(|_| CameraSource::CameraPath),
        }
    }
}

/// Write the animation state at the playhead into the scene and camera.
///
/// Properties without keyframes leave the current value untouched.
fn apply_animation(document: &mut EditorDocument, camera: &mut dyn CameraController) -> (usize, bool) {
    let mut written = 0;
    let mut camera_written = false;

    for (target, values) in document.animation.evaluate_current() {
        match target {
            TrackTarget::Object(id) => {
                let Some(object) = document.scene.object(&id) else {
                    continue;
                };
                let current = object.transform;
                let transform = Transform {
                    position: values.get(AnimatableProperty::Position).unwrap_or(current.position),
                    rotation: values.get(AnimatableProperty::Rotation).unwrap_or(current.rotation),
                    scale: values.get(AnimatableProperty::Scale).unwrap_or(current.scale),
                };
                if document.scene.apply_animated_transform(&id, transform) {
                    written += 1;
                }
            }
            TrackTarget::Camera => {
                let current = camera.pose();
                camera.set_pose(CameraPose {
                    position: values
                        .get(AnimatableProperty::CameraPosition)
                        .unwrap_or(current.position),
                    look_at: values
                        .get(AnimatableProperty::CameraTarget)
                        .unwrap_or(current.look_at),
                });
                camera_written = true;
            }
        }
    }

    (written, camera_written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_editor_scene::ObjectKind;
    use atelier_editor_sequencer::{Easing, PlaybackState};

    #[derive(Debug, Default)]
    struct TestCamera {
        pose: Option<CameraPose>,
        writes: usize,
    }

    impl CameraController for TestCamera {
        fn pose(&self) -> CameraPose {
            self.pose.unwrap_or(CameraPose {
                position: [0.0; 3],
                look_at: [0.0; 3],
            })
        }

        fn set_pose(&mut self, pose: CameraPose) {
            self.pose = Some(pose);
            self.writes += 1;
        }
    }

    fn animated_document() -> (EditorDocument, atelier_editor_scene::ObjectId) {
        let mut doc = EditorDocument::new();
        let id = doc.scene.add_object(ObjectKind::Box);
        let track = doc.animation.add_track(TrackTarget::Object(id));
        doc.animation
            .add_keyframe(track, 0.0, AnimatableProperty::Position, [0.0; 3], Easing::Linear);
        doc.animation
            .add_keyframe(track, 2.0, AnimatableProperty::Position, [4.0, 0.0, 0.0], Easing::Linear);
        (doc, id)
    }

    fn path_document(doc: &mut EditorDocument) {
        let path = doc.add_camera_path(None);
        doc.camera_paths.add_point(path);
        doc.camera_paths.add_point(path);
    }

    #[test]
    fn test_sanitize_delta() {
        assert_eq!(sanitize_delta(0.016), 0.016);
        assert_eq!(sanitize_delta(-1.0), 0.0);
        assert_eq!(sanitize_delta(f32::NAN), 0.0);
        assert_eq!(sanitize_delta(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_animation_writes_transforms_without_history() {
        let (mut doc, id) = animated_document();
        let mut camera = TestCamera::default();
        let mut driver = FrameDriver::new();
        let entries = doc.scene.history_stats().entries;

        doc.animation.play();
        let report = driver.tick(&mut doc, &mut camera, 1.0);
        assert_eq!(report.objects_written, 1);
        assert_eq!(report.camera, None);
        assert_eq!(doc.scene.object(&id).map(|o| o.transform.position), Some([2.0, 0.0, 0.0]));
        assert_eq!(doc.scene.object(&id).map(|o| o.transform.scale), Some([1.0; 3]));
        assert_eq!(doc.scene.history_stats().entries, entries);
        assert_eq!(driver.frame(), 1);
    }

    #[test]
    fn test_bad_delta_does_not_move_playhead() {
        let (mut doc, _) = animated_document();
        let mut camera = TestCamera::default();
        let mut driver = FrameDriver::new();
        doc.animation.play();
        driver.tick(&mut doc, &mut camera, f32::NAN);
        driver.tick(&mut doc, &mut camera, -3.0);
        assert_eq!(doc.animation.current_time(), 0.0);
        assert_eq!(doc.animation.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_camera_path_drives_camera() {
        let mut doc = EditorDocument::new();
        path_document(&mut doc);
        let mut camera = TestCamera::default();
        let mut driver = FrameDriver::new();

        assert!(doc.camera_paths.play());
        let report = driver.tick(&mut doc, &mut camera, 0.5);
        assert_eq!(report.camera, Some(CameraSource::CameraPath));
        assert_eq!(camera.pose, doc.camera_paths.active_path().and_then(|p| p.evaluate(0.5)));
    }

    #[test]
    fn test_animation_camera_takes_priority() {
        let mut doc = EditorDocument::new();
        path_document(&mut doc);
        let pose = CameraPose {
            position: [1.0, 2.0, 3.0],
            look_at: [0.0; 3],
        };
        doc.capture_keyframe(pose, Some(0.0), None);
        let mut camera = TestCamera::default();
        let mut driver = FrameDriver::new();

        doc.animation.play();
        doc.camera_paths.play();
        let report = driver.tick(&mut doc, &mut camera, 0.5);
        assert_eq!(report.camera, Some(CameraSource::Animation));
        assert_eq!(camera.pose, Some(pose));
        assert_eq!(camera.writes, 1);
        assert_eq!(doc.camera_paths.playback_time(), 0.5);
    }

    #[test]
    fn test_animation_without_camera_track_leaves_camera_to_path() {
        let (mut doc, _) = animated_document();
        path_document(&mut doc);
        let mut camera = TestCamera::default();
        let mut driver = FrameDriver::new();

        doc.animation.play();
        doc.camera_paths.play();
        let report = driver.tick(&mut doc, &mut camera, 0.5);
        assert_eq!(report.objects_written, 1);
        assert_eq!(report.camera, Some(CameraSource::CameraPath));
    }

    #[test]
    fn test_scrub_applies_without_playing() {
        let (mut doc, id) = animated_document();
        let mut camera = TestCamera::default();
        let mut driver = FrameDriver::new();

        let report = driver.scrub_animation(&mut doc, &mut camera, 0.5);
        assert_eq!(report.objects_written, 1);
        assert_eq!(doc.scene.object(&id).map(|o| o.transform.position), Some([1.0, 0.0, 0.0]));
        assert_eq!(doc.animation.state(), PlaybackState::Stopped);

        path_document(&mut doc);
        let report = driver.scrub_camera_path(&mut doc, &mut camera, 1.0);
        assert_eq!(report.camera, Some(CameraSource::CameraPath));
        assert!(camera.pose.is_some());
    }
}
