// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings.
//!
//! Settings live in a RON file next to the documents they apply to:
//! - Log filter directive
//! - Undo history depth
//! - Animation and camera path defaults
//! - Duplicate and paste offsets
//! - Headless preview frame rate

use atelier_editor_scene::{SceneConfig, DUPLICATE_OFFSET, MAX_HISTORY, PASTE_OFFSET};
use atelier_editor_sequencer::animation::{DEFAULT_DURATION, MAX_SPEED, MIN_DURATION, MIN_SPEED};
use atelier_editor_sequencer::camera_path::DEFAULT_PATH_DURATION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "atelier.ron";

/// Error type for settings I/O
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// File was written by a newer editor
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },
}

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of history entries
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { capacity: MAX_HISTORY }
    }
}

/// Animation timeline defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Timeline length for new documents
    pub duration: f32,
    /// Playback speed multiplier
    pub speed: f32,
    /// Whether playback wraps
    pub looping: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            speed: 1.0,
            looping: false,
        }
    }
}

/// Camera path defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPathSettings {
    /// Length of newly created paths
    pub duration: f32,
}

impl Default for CameraPathSettings {
    fn default() -> Self {
        Self { duration: DEFAULT_PATH_DURATION }
    }
}

/// Duplicate and paste placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardSettings {
    /// Offset applied to duplicates
    pub duplicate_offset: [f32; 3],
    /// Offset applied to pasted objects
    pub paste_offset: [f32; 3],
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self {
            duplicate_offset: DUPLICATE_OFFSET,
            paste_offset: PASTE_OFFSET,
        }
    }
}

/// Headless preview settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Simulated frames per second
    pub frame_rate: u32,
    /// Log every Nth frame
    pub log_every: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            log_every: 15,
        }
    }
}

/// Complete editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Settings format version
    pub version: u32,
    /// Default `tracing` filter directive
    pub log_filter: String,
    /// Undo history
    pub history: HistorySettings,
    /// Animation timeline
    pub animation: AnimationSettings,
    /// Camera paths
    pub camera_path: CameraPathSettings,
    /// Duplicate and paste
    pub clipboard: ClipboardSettings,
    /// Headless preview
    pub preview: PreviewSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            log_filter: "atelier_editor_app=info".to_string(),
            history: HistorySettings::default(),
            animation: AnimationSettings::default(),
            camera_path: CameraPathSettings::default(),
            clipboard: ClipboardSettings::default(),
            preview: PreviewSettings::default(),
        }
    }
}

impl EditorSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: EditorSettings = ron::from_str(&content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings.sanitized())
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the settings file path for a directory
    pub fn settings_file_path(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE_NAME)
    }

    /// Clamp values a hand-edited file may have pushed out of range
    pub fn sanitized(mut self) -> Self {
        self.history.capacity = self.history.capacity.max(1);
        if !self.animation.duration.is_finite() || self.animation.duration < MIN_DURATION {
            self.animation.duration = DEFAULT_DURATION;
        }
        if !self.animation.speed.is_finite() {
            self.animation.speed = 1.0;
        }
        self.animation.speed = self.animation.speed.clamp(MIN_SPEED, MAX_SPEED);
        if !self.camera_path.duration.is_finite() || self.camera_path.duration <= 0.0 {
            self.camera_path.duration = DEFAULT_PATH_DURATION;
        }
        self.preview.frame_rate = self.preview.frame_rate.clamp(1, 240);
        self.preview.log_every = self.preview.log_every.max(1);
        self
    }

    /// Scene store configuration derived from these settings
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            history_capacity: self.history.capacity.max(1),
            duplicate_offset: self.clipboard.duplicate_offset,
            paste_offset: self.clipboard.paste_offset,
        }
    }

    /// Seconds per preview frame
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.preview.frame_rate.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.history.capacity, MAX_HISTORY);
        assert_eq!(settings.scene_config(), SceneConfig::default());
    }

    #[test]
    fn test_serialization() {
        let mut settings = EditorSettings::default();
        settings.history.capacity = 25;
        settings.clipboard.paste_offset = [2.0, 0.0, 0.0];
        let ron_str = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: EditorSettings = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded: EditorSettings = ron::from_str("(history: (capacity: 10))").unwrap();
        assert_eq!(loaded.history.capacity, 10);
        assert_eq!(loaded.preview, PreviewSettings::default());
        assert_eq!(loaded.log_filter, EditorSettings::default().log_filter);
    }

    #[test]
    fn test_sanitized_clamps() {
        let mut settings = EditorSettings::default();
        settings.history.capacity = 0;
        settings.animation.speed = 50.0;
        settings.animation.duration = f32::NAN;
        settings.preview.frame_rate = 0;
        let settings = settings.sanitized();
        assert_eq!(settings.history.capacity, 1);
        assert_eq!(settings.animation.speed, MAX_SPEED);
        assert_eq!(settings.animation.duration, DEFAULT_DURATION);
        assert_eq!(settings.preview.frame_rate, 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("atelier-settings-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = EditorSettings::settings_file_path(&dir);

        assert_eq!(EditorSettings::load_or_default(&path).unwrap(), EditorSettings::default());

        let mut settings = EditorSettings::default();
        settings.log_filter = "debug".to_string();
        settings.save(&path).unwrap();
        assert_eq!(EditorSettings::load(&path).unwrap(), settings);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let dir = std::env::temp_dir().join(format!("atelier-settings-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "(version: 99)").unwrap();

        let result = EditorSettings::load(&path);
        assert!(matches!(result, Err(SettingsError::UnsupportedVersion { found: 99, .. })));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
