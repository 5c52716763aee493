// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless playback preview.
//!
//! Runs the frame driver at a fixed frame rate without a window and logs
//! the camera pose and animated objects as it goes.

use crate::driver::{CameraController, CameraSource, FrameDriver};
use crate::editor::EditorDocument;
use crate::settings::EditorSettings;
use atelier_editor_scene::{ObjectKind, ObjectPatch};
use atelier_editor_sequencer::{
    AnimatableProperty, CameraPose, Easing, PathPatch, PointPatch, TrackTarget,
};

/// Camera that only remembers its pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessCamera {
    /// Last pose written
    pub pose: CameraPose,
}

impl Default for HeadlessCamera {
    fn default() -> Self {
        Self {
            pose: CameraPose {
                position: [0.0, 5.0, 10.0],
                look_at: [0.0; 3],
            },
        }
    }
}

impl CameraController for HeadlessCamera {
    fn pose(&self) -> CameraPose {
        self.pose
    }

    fn set_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
    }
}

/// Which engine a preview runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    /// Animation timeline
    Animation,
    /// Active camera path
    CameraPath,
}

/// Result of a preview run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSummary {
    /// Engine that was played
    pub mode: PreviewMode,
    /// Frames simulated
    pub frames: u64,
    /// Frames in which the camera moved
    pub camera_frames: u64,
    /// Final camera pose
    pub final_pose: CameraPose,
}

/// Start whichever engine has content: animation first, then camera path
pub fn start_preview(document: &mut EditorDocument) -> Option<PreviewMode> {
    if document.animation.track_count() > 0 {
        document.animation.stop();
        document.animation.play();
        return Some(PreviewMode::Animation);
    }
    document.camera_paths.stop();
    document.camera_paths.play().then_some(PreviewMode::CameraPath)
}

/// Play the document for `seconds` at the configured frame rate.
///
/// Returns `None` if there is nothing to play. Stops early once playback
/// reaches a non-looping end.
pub fn run_preview(
    document: &mut EditorDocument,
    settings: &EditorSettings,
    seconds: f32,
) -> Option<PreviewSummary> {
    let mode = start_preview(document)?;
    let delta = settings.frame_delta();
    let total = (seconds.max(0.0) / delta).ceil() as u64;
    let log_every = u64::from(settings.preview.log_every.max(1));

    tracing::info!("Previewing {:?} for {} frames at {} fps", mode, total, settings.preview.frame_rate);

    let mut camera = HeadlessCamera::default();
    let mut driver = FrameDriver::new();
    let mut camera_frames = 0;

    for _ in 0..total {
        let report = driver.tick(document, &mut camera, delta);
        if report.camera.is_some() {
            camera_frames += 1;
        }
        if driver.frame() % log_every == 0 {
            log_frame(document, &camera, mode, report.camera);
        }
        let playing = match mode {
            PreviewMode::Animation => document.animation.is_playing(),
            PreviewMode::CameraPath => document.camera_paths.is_playing(),
        };
        if !playing {
            tracing::info!("Playback finished after {} frames", driver.frame());
            break;
        }
    }

    Some(PreviewSummary {
        mode,
        frames: driver.frame(),
        camera_frames,
        final_pose: camera.pose,
    })
}

fn log_frame(
    document: &EditorDocument,
    camera: &HeadlessCamera,
    mode: PreviewMode,
    source: Option<CameraSource>,
) {
    let time = match mode {
        PreviewMode::Animation => document.animation.current_time(),
        PreviewMode::CameraPath => document.camera_paths.playback_time(),
    };
    let [x, y, z] = camera.pose.position;
    let [tx, ty, tz] = camera.pose.look_at;
    tracing::info!(
        "t={:6.3}s camera=({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2}) source={:?}",
        time,
        x,
        y,
        z,
        tx,
        ty,
        tz,
        source
    );
    for object in document.scene.objects().filter(|o| document.is_animated(&o.id)) {
        let [px, py, pz] = object.transform.position;
        tracing::debug!("  {} at ({:.2}, {:.2}, {:.2})", object.name, px, py, pz);
    }
}

/// Small scene with an animated object and a camera path
pub fn demo_document(settings: &EditorSettings) -> EditorDocument {
    let mut document = EditorDocument::with_settings(settings);

    let ground = document.scene.add_object(ObjectKind::Plane);
    document.scene.update_object(
        &ground,
        &ObjectPatch {
            scale: Some([10.0, 1.0, 10.0]),
            ..Default::default()
        },
    );
    let cube = document.scene.add_object(ObjectKind::Box);
    let moon = document.scene.add_object(ObjectKind::Sphere);
    document.scene.set_parent(&moon, Some(cube));

    let track = document.animation.add_track(TrackTarget::Object(cube));
    let keys = [
        (0.0, [0.0, 0.5, 0.0], Easing::Linear),
        (2.0, [3.0, 0.5, 0.0], Easing::EaseInOut),
        (4.0, [3.0, 2.0, 3.0], Easing::EaseOut),
    ];
    for (time, value, easing) in keys {
        document
            .animation
            .add_keyframe(track, time, AnimatableProperty::Position, value, easing);
    }
    document.animation.set_duration(4.0);

    let path = document.add_camera_path(Some("Orbit".to_string()));
    for _ in 0..4 {
        document.camera_paths.add_point(path);
    }
    document.camera_paths.update_path(
        path,
        &PathPatch {
            looping: Some(true),
            easing: Some(Easing::EaseInOut),
            ..Default::default()
        },
    );
    if let Some(first) = document.camera_paths.active_path().and_then(|p| p.points().first()).map(|p| p.id) {
        document.camera_paths.update_point(
            path,
            first,
            &PointPatch {
                tension: Some(0.3),
                ..Default::default()
            },
        );
    }

    document
}
