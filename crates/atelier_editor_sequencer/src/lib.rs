// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline/sequencer for Atelier Editor.
//!
//! This crate provides the time-based side of a scene document:
//! - Keyframe animation tracks for scene objects and the camera
//! - Per-keyframe easing
//! - Cinematic camera paths on timed cardinal splines
//! - Playback control
//!
//! ## Architecture
//!
//! The sequencer is built on:
//! - `AnimationTrack`s keyed by `TrackTarget`, one track per target
//! - A `PlaybackController` clock shared by both engines
//! - `spline::sample` for camera path evaluation
//!
//! Neither engine touches the scene directly; evaluation returns values
//! and the host decides where to write them.

pub mod animation;
pub mod binding;
pub mod camera_path;
pub mod easing;
pub mod keyframe;
pub mod playback;
pub mod spline;
pub mod track;

pub use animation::{AnimationData, AnimationEngine, TrackedObject};
pub use binding::TrackTarget;
pub use camera_path::{
    CameraPath, CameraPathEngine, CameraPose, ControlPoint, PathId, PathPatch, PointId, PointPatch,
};
pub use easing::Easing;
pub use keyframe::{AnimatableProperty, Interpolation, Keyframe, KeyframeId, KeyframePatch};
pub use playback::{PlaybackController, PlaybackState};
pub use spline::SplineKnot;
pub use track::{AnimationTrack, TrackId, TrackValues};
