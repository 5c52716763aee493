// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback clock shared by the animation and camera path engines.

use serde::{Deserialize, Serialize};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Stopped at the start
    #[default]
    Stopped,
    /// Playing forward
    Playing,
    /// Paused
    Paused,
}

/// Playback clock.
///
/// Transitions: stopped → playing → {paused, stopped}, paused → {playing,
/// stopped}. The clock knows nothing about what it drives; duration and
/// looping are passed to `advance` by the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackController {
    /// Current playback time
    pub time: f32,
    /// Playback state
    pub state: PlaybackState,
    /// Playback speed multiplier
    pub speed: f32,
}

impl PlaybackController {
    /// Create a new playback controller
    pub fn new() -> Self {
        Self {
            time: 0.0,
            state: PlaybackState::Stopped,
            speed: 1.0,
        }
    }

    /// Advance by `delta_time` seconds.
    ///
    /// On reaching `duration` the clock wraps when `looping`, otherwise it
    /// clamps to `duration` and stops. Returns true if the time moved.
    pub fn advance(&mut self, delta_time: f32, duration: f32, looping: bool) -> bool {
        if self.state != PlaybackState::Playing || !delta_time.is_finite() {
            return false;
        }

        self.time += delta_time * self.speed;
        if self.time >= duration {
            if looping && duration > 0.0 {
                self.time %= duration;
            } else {
                self.time = duration.max(0.0);
                self.state = PlaybackState::Stopped;
                tracing::debug!("Playback reached end at {:.3}s", self.time);
            }
        }
        true
    }

    /// Play from current position
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop and reset to beginning
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Seek to a time clamped to [0, duration]; non-finite times are ignored
    pub fn seek(&mut self, time: f32, duration: f32) {
        if !time.is_finite() {
            return;
        }
        self.time = time.clamp(0.0, duration.max(0.0));
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}
