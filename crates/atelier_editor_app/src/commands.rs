// SPDX-License-Identifier: MIT OR Apache-2.0
//! Menu commands.
//!
//! Commands map one-to-one onto document operations. Hosts resolve a
//! menu entry or their own key binding to an `EditorCommand` and call
//! `dispatch`.

use crate::editor::EditorDocument;

/// A command that can be triggered from a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    /// Undo the last scene edit
    Undo,
    /// Redo the last undone edit
    Redo,
    /// Duplicate selected objects
    Duplicate,
    /// Delete selected objects
    Delete,
    /// Select every object
    SelectAll,
    /// Clear the selection
    Deselect,
    /// Copy selected objects
    Copy,
    /// Paste copied objects
    Paste,
    /// Play or pause the animation timeline
    TogglePlayback,
    /// Play or pause the active camera path
    ToggleCameraPath,
}

impl EditorCommand {
    /// Every command, in menu order
    pub const ALL: [EditorCommand; 10] = [
        Self::Undo,
        Self::Redo,
        Self::Duplicate,
        Self::Delete,
        Self::SelectAll,
        Self::Deselect,
        Self::Copy,
        Self::Paste,
        Self::TogglePlayback,
        Self::ToggleCameraPath,
    ];

    /// Stable identifier (e.g. "edit.undo")
    pub fn id(&self) -> &'static str {
        match self {
            Self::Undo => "edit.undo",
            Self::Redo => "edit.redo",
            Self::Duplicate => "edit.duplicate",
            Self::Delete => "edit.delete",
            Self::SelectAll => "edit.select_all",
            Self::Deselect => "edit.deselect",
            Self::Copy => "edit.copy",
            Self::Paste => "edit.paste",
            Self::TogglePlayback => "timeline.toggle_playback",
            Self::ToggleCameraPath => "camera_path.toggle_playback",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Duplicate => "Duplicate",
            Self::Delete => "Delete",
            Self::SelectAll => "Select All",
            Self::Deselect => "Deselect",
            Self::Copy => "Copy",
            Self::Paste => "Paste",
            Self::TogglePlayback => "Play/Pause Timeline",
            Self::ToggleCameraPath => "Play/Pause Camera Path",
        }
    }

    /// Look up a command by its identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// Execute a command against a document.
///
/// Returns true if the command changed anything.
pub fn dispatch(document: &mut EditorDocument, command: EditorCommand) -> bool {
    tracing::debug!("Dispatching {}", command.id());
    match command {
        EditorCommand::Undo => document.scene.undo(),
        EditorCommand::Redo => document.scene.redo(),
        EditorCommand::Duplicate => !document.scene.duplicate_selected().is_empty(),
        EditorCommand::Delete => !document.delete_selected().is_empty(),
        EditorCommand::SelectAll => {
            let before = document.scene.selection().len();
            document.scene.select_all();
            document.scene.selection().len() != before
        }
        EditorCommand::Deselect => {
            let had_selection = !document.scene.selection().is_empty();
            document.scene.deselect_all();
            had_selection
        }
        EditorCommand::Copy => document.scene.copy_selected() > 0,
        EditorCommand::Paste => !document.scene.paste_clipboard().is_empty(),
        EditorCommand::TogglePlayback => {
            document.animation.toggle_playback();
            true
        }
        EditorCommand::ToggleCameraPath => document.camera_paths.toggle_playback(),
    }
}
