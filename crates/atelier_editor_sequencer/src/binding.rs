// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track targets.

use atelier_editor_scene::ObjectId;
use serde::{Deserialize, Serialize};

/// What an animation track drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackTarget {
    /// A scene object
    Object(ObjectId),
    /// The viewport camera
    Camera,
}

impl TrackTarget {
    /// Get the target object, if any
    pub fn object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            Self::Camera => None,
        }
    }

    /// Check if this is the camera
    pub fn is_camera(&self) -> bool {
        matches!(self, Self::Camera)
    }
}

impl From<ObjectId> for TrackTarget {
    fn from(id: ObjectId) -> Self {
        Self::Object(id)
    }
}
