// SPDX-License-Identifier: MIT OR Apache-2.0
//! Object selection state.

use crate::object::ObjectId;
use indexmap::IndexSet;

/// Multi-selection with an anchor.
///
/// The anchor is the most recently touched object and is always a member of
/// the set, or `None` when the set is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    anchor: Option<ObjectId>,
    ids: IndexSet<ObjectId>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the anchor (last touched) object
    pub fn anchor(&self) -> Option<ObjectId> {
        self.anchor
    }

    /// Check if an object is selected
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.ids.contains(id)
    }

    /// Replace the selection with a single object
    pub fn set(&mut self, id: ObjectId) {
        self.ids.clear();
        self.ids.insert(id);
        self.anchor = Some(id);
    }

    /// Replace the selection with `ids`; the anchor becomes the last one
    pub fn set_many(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        self.ids = ids.into_iter().collect();
        self.anchor = self.ids.last().copied();
    }

    /// Add an object (idempotent) and make it the anchor
    pub fn add(&mut self, id: ObjectId) {
        self.ids.insert(id);
        self.anchor = Some(id);
    }

    /// Remove an object; the anchor becomes the last remaining member
    pub fn remove(&mut self, id: &ObjectId) {
        if self.ids.shift_remove(id) {
            self.anchor = self.ids.last().copied();
        }
    }

    /// Toggle an object in the selection
    pub fn toggle(&mut self, id: ObjectId) {
        if self.contains(&id) {
            self.remove(&id);
        } else {
            self.add(id);
        }
    }

    /// Drop every id rejected by `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&ObjectId) -> bool) {
        self.ids.retain(|id| keep(id));
        if self.anchor.is_some_and(|a| !self.ids.contains(&a)) {
            self.anchor = None;
        }
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.ids.clear();
        self.anchor = None;
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Get the number of selected objects
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Iterate over selected objects in selection order
    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.ids.iter()
    }
}
