// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene document serialization.
//!
//! A `SceneDocument` is the persisted form of an editing session: objects
//! (with hierarchy and model assets), animation tracks and camera paths.
//! It can be written as pretty JSON, RON or compact bincode; the format is
//! chosen from the file extension.

use atelier_editor_scene::SceneObject;
use atelier_editor_sequencer::{AnimationData, CameraPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current document format version
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// Error type for document encoding and I/O
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RON text could not be parsed
    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    /// RON encoding failed
    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    /// Binary encoding or decoding failed
    #[error("Binary error: {0}")]
    Binary(#[from] bincode::Error),

    /// Text document was not UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Document was written by a newer editor
    #[error("Document version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the document
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },

    /// File extension does not name a known format
    #[error("Unknown document format: {0}")]
    UnknownFormat(PathBuf),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// On-disk encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Pretty-printed JSON (`.json`)
    Json,
    /// Rusty Object Notation (`.ron`)
    Ron,
    /// bincode (`.atelier`, `.bin`)
    Binary,
}

impl DocumentFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "ron" => Some(Self::Ron),
            "atelier" | "bin" => Some(Self::Binary),
            _ => None,
        }
    }
}

/// Persisted scene, animation and camera paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Document format version
    pub version: u32,
    /// Objects in scene order
    pub objects: Vec<SceneObject>,
    /// Animation tracks and timeline settings
    #[serde(default)]
    pub animation: AnimationData,
    /// Camera paths
    #[serde(default)]
    pub camera_paths: Vec<CameraPath>,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self::from_objects(Vec::new())
    }
}

impl SceneDocument {
    /// Document holding only objects
    pub fn from_objects(objects: Vec<SceneObject>) -> Self {
        Self {
            version: DOCUMENT_FORMAT_VERSION,
            objects,
            animation: AnimationData::default(),
            camera_paths: Vec::new(),
        }
    }

    /// Take the objects out of the document
    pub fn into_objects(self) -> Vec<SceneObject> {
        self.objects
    }

    fn check_version(self) -> Result<Self> {
        if self.version > DOCUMENT_FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: self.version,
                supported: DOCUMENT_FORMAT_VERSION,
            });
        }
        Ok(self)
    }

    /// Encode as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str::<Self>(text)?.check_version()
    }

    /// Encode as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Decode from RON
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str::<Self>(text)?.check_version()
    }

    /// Encode with bincode
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize::<Self>(bytes)?.check_version()
    }

    /// Encode in the given format
    pub fn encode(&self, format: DocumentFormat) -> Result<Vec<u8>> {
        match format {
            DocumentFormat::Json => Ok(self.to_json()?.into_bytes()),
            DocumentFormat::Ron => Ok(self.to_ron()?.into_bytes()),
            DocumentFormat::Binary => self.to_bytes(),
        }
    }

    /// Decode from the given format
    pub fn decode(format: DocumentFormat, bytes: &[u8]) -> Result<Self> {
        match format {
            DocumentFormat::Json => Self::from_json(std::str::from_utf8(bytes)?),
            DocumentFormat::Ron => Self::from_ron(std::str::from_utf8(bytes)?),
            DocumentFormat::Binary => Self::from_bytes(bytes),
        }
    }

    /// Load a document, choosing the format from the extension
    pub fn load(path: &Path) -> Result<Self> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| DocumentError::UnknownFormat(path.to_path_buf()))?;
        let bytes = std::fs::read(path)?;
        let document = Self::decode(format, &bytes)?;
        tracing::info!(
            "Loaded {} ({} objects, {} tracks, {} camera paths)",
            path.display(),
            document.objects.len(),
            document.animation.tracks.len(),
            document.camera_paths.len()
        );
        Ok(document)
    }

    /// Save a document, choosing the format from the extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| DocumentError::UnknownFormat(path.to_path_buf()))?;
        std::fs::write(path, self.encode(format)?)?;
        tracing::info!("Saved {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_editor_scene::{ModelAsset, ModelFormat, ObjectKind};
    use atelier_editor_sequencer::{
        AnimatableProperty, AnimationTrack, ControlPoint, Easing, Keyframe, TrackTarget,
    };

    fn sample_document() -> SceneDocument {
        let parent = SceneObject::new(ObjectKind::Box, "Box 1");
        let mut child = SceneObject::new(ObjectKind::Model, "Chair").with_asset(ModelAsset {
            uri: "blob:chair.glb".to_string(),
            format: ModelFormat::Glb,
        });
        child.parent = Some(parent.id);
        child.transform.position = [1.0, 2.0, 3.0];

        let mut track = AnimationTrack::new(TrackTarget::Object(parent.id));
        track.add_keyframe(
            Keyframe::new(1.5, AnimatableProperty::Position, [4.0, 0.0, 0.0]).with_easing(Easing::EaseOut),
        );

        let mut path = CameraPath::new("Flyby");
        path.looping = true;
        path.add_point(ControlPoint::new([0.0, 2.0, 5.0], [0.0; 3], 0.0));
        path.add_point(ControlPoint::new([5.0, 2.0, 0.0], [0.0; 3], 4.0));

        let mut document = SceneDocument::from_objects(vec![parent, child]);
        document.animation.tracks.push(track);
        document.camera_paths.push(path);
        document
    }

    #[test]
    fn test_every_encoding_round_trips() {
        let document = sample_document();

        let json = document.to_json().unwrap();
        assert_eq!(SceneDocument::from_json(&json).unwrap(), document);

        let ron_text = document.to_ron().unwrap();
        assert_eq!(SceneDocument::from_ron(&ron_text).unwrap(), document);

        let bytes = document.to_bytes().unwrap();
        assert_eq!(SceneDocument::from_bytes(&bytes).unwrap(), document);
    }

    #[test]
    fn test_model_without_asset_deserializes() {
        let id = uuid::Uuid::new_v4();
        let json = format!(
            r#"{{
                "version": 1,
                "objects": [{{
                    "id": "{id}",
                    "name": "Model 1",
                    "kind": "Model",
                    "transform": {{ "position": [0,0,0], "rotation": [0,0,0], "scale": [1,1,1] }},
                    "material": {},
                    "visible": true,
                    "locked": false
                }}]
            }}"#,
            serde_json::to_string(&atelier_editor_scene::Material::default()).unwrap()
        );
        let document = SceneDocument::from_json(&json).unwrap();
        assert_eq!(document.objects.len(), 1);
        assert_eq!(document.objects[0].asset, None);
        assert_eq!(document.objects[0].parent, None);
        assert!(document.animation.tracks.is_empty());
        assert!(document.camera_paths.is_empty());
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let mut document = SceneDocument::default();
        document.version = DOCUMENT_FORMAT_VERSION + 1;
        let json = serde_json::to_string(&document).unwrap();
        assert!(matches!(
            SceneDocument::from_json(&json),
            Err(DocumentError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("a/scene.JSON")), Some(DocumentFormat::Json));
        assert_eq!(DocumentFormat::from_path(Path::new("scene.ron")), Some(DocumentFormat::Ron));
        assert_eq!(DocumentFormat::from_path(Path::new("scene.atelier")), Some(DocumentFormat::Binary));
        assert_eq!(DocumentFormat::from_path(Path::new("scene.txt")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("scene")), None);
    }

    #[test]
    fn test_save_and_load_by_extension() {
        let dir = std::env::temp_dir().join(format!("atelier-doc-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let document = sample_document();

        for name in ["scene.json", "scene.ron", "scene.atelier"] {
            let path = dir.join(name);
            document.save(&path).unwrap();
            assert_eq!(SceneDocument::load(&path).unwrap(), document);
        }
        assert!(matches!(
            document.save(&dir.join("scene.txt")),
            Err(DocumentError::UnknownFormat(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
