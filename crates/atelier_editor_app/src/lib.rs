// SPDX-License-Identifier: MIT OR Apache-2.0
//! Atelier Editor application layer.
//!
//! Composes the scene store and the sequencer engines into an editing
//! session and provides everything a host needs around it:
//! - `EditorDocument` session context
//! - Per-frame playback driver
//! - Menu command dispatch
//! - Scene document serialization (JSON, RON, bincode)
//! - RON editor settings
//! - Headless preview

pub mod commands;
pub mod document;
pub mod driver;
pub mod editor;
pub mod preview;
pub mod settings;

pub use commands::{dispatch, EditorCommand};
pub use document::{DocumentError, DocumentFormat, SceneDocument, DOCUMENT_FORMAT_VERSION};
pub use driver::{sanitize_delta, CameraController, CameraSource, FrameDriver, FrameReport};
pub use editor::EditorDocument;
pub use preview::{demo_document, run_preview, HeadlessCamera, PreviewMode, PreviewSummary};
pub use settings::{EditorSettings, SettingsError, SETTINGS_FILE_NAME};
