// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene graph store.
//!
//! The store is the single source of truth for the object list, selection
//! and clipboard. Every mutating operation records a snapshot in the
//! undo/redo history; selection and clipboard changes on their own do not.
//!
//! Objects are held as `Arc<SceneObject>` so snapshots share unchanged
//! objects with the live state. Edits go through `Arc::make_mut`, which
//! copies an object only when a snapshot still references it.

use crate::history::{History, HistoryStats, MAX_HISTORY};
use crate::object::{ModelAsset, ModelFormat, ObjectId, ObjectKind, ObjectPatch, SceneObject, Transform};
use crate::selection::Selection;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Object map shared between live state and snapshots
pub type ObjectMap = IndexMap<ObjectId, Arc<SceneObject>>;

/// Offset applied to a duplicated object
pub const DUPLICATE_OFFSET: [f32; 3] = [1.0, 0.0, 0.0];

/// Offset applied to pasted objects
pub const PASTE_OFFSET: [f32; 3] = [0.5, 0.0, 0.5];

/// Store configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Maximum undo history depth
    pub history_capacity: usize,
    /// Offset applied by `duplicate_object` / `duplicate_selected`
    pub duplicate_offset: [f32; 3],
    /// Offset applied by `paste_clipboard`
    pub paste_offset: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            history_capacity: MAX_HISTORY,
            duplicate_offset: DUPLICATE_OFFSET,
            paste_offset: PASTE_OFFSET,
        }
    }
}

/// Immutable copy of the undoable state
#[derive(Debug, Clone, Default)]
pub struct SceneSnapshot {
    /// Objects in array order
    pub objects: ObjectMap,
    /// Selection at the time of the snapshot
    pub selection: Selection,
}

/// Change notification drained by the host with `SceneStore::take_events`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// Objects were created
    Added(Vec<ObjectId>),
    /// Objects were deleted
    Removed(Vec<ObjectId>),
    /// An object's fields changed
    Updated(ObjectId),
    /// An object's parent changed
    Reparented {
        /// The child whose parent changed
        child: ObjectId,
        /// The new parent
        parent: Option<ObjectId>,
    },
    /// Selection changed
    SelectionChanged,
    /// Clipboard contents changed
    ClipboardChanged,
    /// State was replaced wholesale (undo, redo, load)
    Restored,
}

/// Scene graph store with undo/redo
#[derive(Debug, Clone)]
pub struct SceneStore {
    objects: ObjectMap,
    selection: Selection,
    clipboard: Vec<SceneObject>,
    history: History<SceneSnapshot>,
    config: SceneConfig,
    revision: u64,
    pending_events: Vec<SceneEvent>,
}

impl SceneStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty store with custom configuration
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            objects: IndexMap::new(),
            selection: Selection::new(),
            clipboard: Vec::new(),
            history: History::with_max_depth(SceneSnapshot::default(), config.history_capacity),
            config,
            revision: 0,
            pending_events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Get an object by ID
    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.get(id).map(Arc::as_ref)
    }

    /// Iterate over all objects in array order
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values().map(Arc::as_ref)
    }

    /// Number of objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Check if an object exists
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Number of objects on the clipboard
    pub fn clipboard_len(&self) -> usize {
        self.clipboard.len()
    }

    /// Direct children of `parent`, in array order
    pub fn children(&self, parent: &ObjectId) -> Vec<&SceneObject> {
        self.objects()
            .filter(|o| o.parent.as_ref() == Some(parent))
            .collect()
    }

    /// All objects without a parent
    pub fn root_objects(&self) -> Vec<&SceneObject> {
        self.objects().filter(|o| o.parent.is_none()).collect()
    }

    /// All transitive descendants of `id`, excluding `id` itself
    pub fn descendants(&self, id: &ObjectId) -> Vec<ObjectId> {
        let mut found = Vec::new();
        let mut visited = HashSet::from([*id]);
        let mut frontier = vec![*id];

        while let Some(current) = frontier.pop() {
            for object in self.objects.values() {
                if object.parent == Some(current) && visited.insert(object.id) {
                    found.push(object.id);
                    frontier.push(object.id);
                }
            }
        }

        found
    }

    /// Parent chain of `id`, nearest first
    pub fn ancestors(&self, id: &ObjectId) -> Vec<ObjectId> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([*id]);
        let mut current = self.objects.get(id).and_then(|o| o.parent);

        while let Some(parent) = current {
            if !visited.insert(parent) {
                break;
            }
            chain.push(parent);
            current = self.objects.get(&parent).and_then(|o| o.parent);
        }

        chain
    }

    /// Check whether `ancestor` appears in the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: &ObjectId, id: &ObjectId) -> bool {
        self.ancestors(id).contains(ancestor)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Get history statistics
    pub fn history_stats(&self) -> HistoryStats {
        self.history.stats()
    }

    /// Monotonic counter bumped by every observable change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Take pending change events
    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Add a primitive object, select it and record history
    pub fn add_object(&mut self, kind: ObjectKind) -> ObjectId {
        let name = self.next_name(kind);
        self.insert_new(SceneObject::new(kind, name))
    }

    /// Add an externally loaded model, select it and record history
    pub fn add_model_object(
        &mut self,
        name: impl Into<String>,
        uri: impl Into<String>,
        format: Option<ModelFormat>,
    ) -> ObjectId {
        let uri = uri.into();
        let format = format
            .or_else(|| ModelFormat::from_extension(&uri))
            .unwrap_or_default();
        let object = SceneObject::new(ObjectKind::Model, name).with_asset(ModelAsset { uri, format });
        self.insert_new(object)
    }

    fn insert_new(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id;
        tracing::debug!("Added {} ({})", object.name, id);
        self.objects.insert(id, Arc::new(object));
        self.selection.set(id);
        self.emit(SceneEvent::Added(vec![id]));
        self.emit(SceneEvent::SelectionChanged);
        self.commit();
        id
    }

    /// Next free "<Kind> N" name; N is one past the highest number in use
    fn next_name(&self, kind: ObjectKind) -> String {
        let prefix = kind.display_name();
        let highest = self
            .objects
            .values()
            .filter(|o| o.kind == kind)
            .filter_map(|o| o.name.strip_prefix(prefix)?.strip_prefix(' ')?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{prefix} {}", highest + 1)
    }

    // ------------------------------------------------------------------
    // Removal and updates
    // ------------------------------------------------------------------

    /// Remove an object and all of its descendants
    pub fn remove_object(&mut self, id: &ObjectId) -> Vec<ObjectId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let removed = self.remove_cascade(std::iter::once(*id));
        self.commit();
        removed
    }

    /// Remove every selected object and their descendants
    pub fn remove_selected(&mut self) -> Vec<ObjectId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let roots: Vec<ObjectId> = self.selection.iter().copied().collect();
        let removed = self.remove_cascade(roots);
        if !removed.is_empty() {
            self.commit();
        }
        removed
    }

    fn remove_cascade(&mut self, roots: impl IntoIterator<Item = ObjectId>) -> Vec<ObjectId> {
        let mut doomed: Vec<ObjectId> = Vec::new();
        let mut seen = HashSet::new();
        for root in roots {
            if !self.contains(&root) || !seen.insert(root) {
                continue;
            }
            doomed.push(root);
            for descendant in self.descendants(&root) {
                if seen.insert(descendant) {
                    doomed.push(descendant);
                }
            }
        }

        self.objects.retain(|id, _| !seen.contains(id));
        let before = self.selection.len();
        self.selection.retain(|id| !seen.contains(id));

        tracing::debug!("Removed {} objects", doomed.len());
        self.emit(SceneEvent::Removed(doomed.clone()));
        if self.selection.len() != before {
            self.emit(SceneEvent::SelectionChanged);
        }
        doomed
    }

    /// Merge `patch` into an object and record history.
    ///
    /// Returns false without touching history if the object does not exist.
    pub fn update_object(&mut self, id: &ObjectId, patch: &ObjectPatch) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        patch.apply(Arc::make_mut(object));
        self.emit(SceneEvent::Updated(*id));
        self.commit();
        true
    }

    /// Write an evaluated transform without recording history.
    ///
    /// Used by playback; animation state is not part of undo.
    pub fn apply_animated_transform(&mut self, id: &ObjectId, transform: Transform) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        if object.transform != transform {
            Arc::make_mut(object).transform = transform;
            self.emit(SceneEvent::Updated(*id));
        }
        true
    }

    /// Set or clear an object's parent.
    ///
    /// Rejected when either object is missing or the assignment would make
    /// the child its own ancestor.
    pub fn set_parent(&mut self, child: &ObjectId, parent: Option<ObjectId>) -> bool {
        if !self.contains(child) {
            return false;
        }
        if let Some(parent) = parent {
            if !self.contains(&parent) || parent == *child || self.is_ancestor(child, &parent) {
                tracing::warn!("Rejected reparent of {} under {}: would create a cycle", child, parent);
                return false;
            }
        }
        if let Some(object) = self.objects.get_mut(child) {
            Arc::make_mut(object).parent = parent;
        }
        self.emit(SceneEvent::Reparented { child: *child, parent });
        self.commit();
        true
    }

    // ------------------------------------------------------------------
    // Duplication and clipboard
    // ------------------------------------------------------------------

    /// Duplicate a single object and select the copy
    pub fn duplicate_object(&mut self, id: &ObjectId) -> Option<ObjectId> {
        let source = self.object(id)?;
        let copy = self.make_duplicate(source);
        let copy_id = copy.id;
        self.objects.insert(copy_id, Arc::new(copy));
        self.selection.set(copy_id);
        self.emit(SceneEvent::Added(vec![copy_id]));
        self.emit(SceneEvent::SelectionChanged);
        self.commit();
        Some(copy_id)
    }

    /// Duplicate every selected object and select the copies
    pub fn duplicate_selected(&mut self) -> Vec<ObjectId> {
        let sources: Vec<SceneObject> = self
            .selection
            .iter()
            .filter_map(|id| self.object(id))
            .cloned()
            .collect();
        if sources.is_empty() {
            return Vec::new();
        }

        let copies: Vec<SceneObject> = sources.iter().map(|o| self.make_duplicate(o)).collect();
        let copies = remap_parents(&sources, copies, |id| self.contains(id));
        let ids = self.insert_copies(copies);
        self.commit();
        ids
    }

    fn make_duplicate(&self, source: &SceneObject) -> SceneObject {
        let mut copy = source.clone_with_new_id();
        copy.name = format!("{} (copy)", source.name);
        copy.transform = copy.transform.offset(self.config.duplicate_offset);
        copy
    }

    /// Copy the selected objects to the clipboard
    pub fn copy_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        self.clipboard = self
            .selection
            .iter()
            .filter_map(|id| self.object(id))
            .cloned()
            .collect();
        self.emit(SceneEvent::ClipboardChanged);
        self.clipboard.len()
    }

    /// Instantiate fresh copies of the clipboard and select them
    pub fn paste_clipboard(&mut self) -> Vec<ObjectId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }

        let offset = self.config.paste_offset;
        let copies: Vec<SceneObject> = self
            .clipboard
            .iter()
            .map(|o| {
                let mut copy = o.clone_with_new_id();
                copy.transform = copy.transform.offset(offset);
                copy
            })
            .collect();
        let copies = remap_parents(&self.clipboard, copies, |id| self.contains(id));
        let ids = self.insert_copies(copies);
        self.commit();
        ids
    }

    fn insert_copies(&mut self, copies: Vec<SceneObject>) -> Vec<ObjectId> {
        let ids: Vec<ObjectId> = copies.iter().map(|o| o.id).collect();
        for copy in copies {
            self.objects.insert(copy.id, Arc::new(copy));
        }
        self.selection.set_many(ids.iter().copied());
        self.emit(SceneEvent::Added(ids.clone()));
        self.emit(SceneEvent::SelectionChanged);
        ids
    }

    // ------------------------------------------------------------------
    // Selection (not undoable)
    // ------------------------------------------------------------------

    /// Select a single object, or clear the selection with `None`
    pub fn select_object(&mut self, id: Option<ObjectId>) {
        match id {
            Some(id) if self.contains(&id) => self.selection.set(id),
            Some(_) => return,
            None => self.selection.clear(),
        }
        self.emit(SceneEvent::SelectionChanged);
    }

    /// Add or remove an object from the selection
    pub fn toggle_select_object(&mut self, id: ObjectId) {
        if !self.contains(&id) {
            return;
        }
        self.selection.toggle(id);
        self.emit(SceneEvent::SelectionChanged);
    }

    /// Select the inclusive array-order range between two objects
    pub fn select_range(&mut self, from: &ObjectId, to: &ObjectId) {
        let (Some(a), Some(b)) = (self.objects.get_index_of(from), self.objects.get_index_of(to)) else {
            return;
        };
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let ids: Vec<ObjectId> = self.objects.keys().skip(start).take(end - start + 1).copied().collect();
        self.selection.set_many(ids);
        self.emit(SceneEvent::SelectionChanged);
    }

    /// Select every object
    pub fn select_all(&mut self) {
        let ids: Vec<ObjectId> = self.objects.keys().copied().collect();
        self.selection.set_many(ids);
        self.emit(SceneEvent::SelectionChanged);
    }

    /// Clear the selection
    pub fn deselect_all(&mut self) {
        self.selection.clear();
        self.emit(SceneEvent::SelectionChanged);
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Restore the previous snapshot
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        tracing::debug!("Undo ({} objects)", snapshot.objects.len());
        self.restore(snapshot);
        true
    }

    /// Restore the next snapshot
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        tracing::debug!("Redo ({} objects)", snapshot.objects.len());
        self.restore(snapshot);
        true
    }

    /// Replace the whole scene.
    ///
    /// Parents that do not resolve, or that would form a cycle, are dropped.
    /// Selection and clipboard are cleared and history restarts from the
    /// loaded state.
    pub fn load_scene(&mut self, objects: impl IntoIterator<Item = SceneObject>) {
        self.objects = objects.into_iter().map(|o| (o.id, Arc::new(o))).collect();

        let ids: Vec<ObjectId> = self.objects.keys().copied().collect();
        for id in ids {
            let Some(parent) = self.objects.get(&id).and_then(|o| o.parent) else {
                continue;
            };
            if parent == id || !self.contains(&parent) || self.ancestors(&parent).contains(&id) {
                tracing::warn!("Dropping invalid parent {} of {}", parent, id);
                if let Some(object) = self.objects.get_mut(&id) {
                    Arc::make_mut(object).parent = None;
                }
            }
        }

        self.selection.clear();
        self.clipboard.clear();
        self.history.clear(self.snapshot());
        tracing::info!("Loaded scene with {} objects", self.objects.len());
        self.emit(SceneEvent::Restored);
    }

    fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            objects: self.objects.clone(),
            selection: self.selection.clone(),
        }
    }

    fn restore(&mut self, snapshot: SceneSnapshot) {
        self.objects = snapshot.objects;
        self.selection = snapshot.selection;
        self.emit(SceneEvent::Restored);
    }

    fn commit(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    fn emit(&mut self, event: SceneEvent) {
        self.revision += 1;
        self.pending_events.push(event);
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Point copies at the copies of their parents when both were copied
/// together; otherwise keep the original parent if it still exists.
fn remap_parents(
    sources: &[SceneObject],
    mut copies: Vec<SceneObject>,
    exists: impl Fn(&ObjectId) -> bool,
) -> Vec<SceneObject> {
    let mapping: std::collections::HashMap<ObjectId, ObjectId> =
        sources.iter().zip(&copies).map(|(s, c)| (s.id, c.id)).collect();
    for copy in &mut copies {
        copy.parent = match copy.parent {
            Some(parent) => mapping.get(&parent).copied().or(exists(&parent).then_some(parent)),
            None => None,
        };
    }
    copies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(store: &SceneStore) -> Vec<String> {
        store.objects().map(|o| o.name.clone()).collect()
    }

    #[test]
    fn test_sequential_names_per_kind() {
        let mut store = SceneStore::new();
        store.add_object(ObjectKind::Box);
        store.add_object(ObjectKind::Sphere);
        let second_box = store.add_object(ObjectKind::Box);
        assert_eq!(names(&store), ["Box 1", "Sphere 1", "Box 2"]);

        store.remove_object(&second_box);
        store.add_object(ObjectKind::Box);
        assert_eq!(store.objects().last().map(|o| o.name.as_str()), Some("Box 2"));
    }

    #[test]
    fn test_add_selects_exclusively() {
        let mut store = SceneStore::new();
        let a = store.add_object(ObjectKind::Box);
        let b = store.add_object(ObjectKind::Box);
        assert!(!store.selection().contains(&a));
        assert!(store.selection().contains(&b));
        assert_eq!(store.selection().anchor(), Some(b));
    }

    #[test]
    fn test_add_model_object() {
        let mut store = SceneStore::new();
        let id = store.add_model_object("Robot", "assets/robot.gltf", None);
        let object = store.object(&id).unwrap();
        assert_eq!(object.kind, ObjectKind::Model);
        assert_eq!(object.asset.as_ref().map(|a| a.format), Some(ModelFormat::Gltf));
        assert!(store.can_undo());
    }

    #[test]
    fn test_mutations_then_undo_returns_to_empty() {
        let mut store = SceneStore::new();
        let a = store.add_object(ObjectKind::Box);
        let b = store.add_object(ObjectKind::Sphere);
        store.update_object(&a, &ObjectPatch::position([1.0, 2.0, 3.0]));
        store.set_parent(&b, Some(a));
        store.duplicate_object(&a);

        for _ in 0..5 {
            assert!(store.undo());
        }
        assert!(!store.undo());
        assert_eq!(store.object_count(), 0);
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_redo_restores_exact_state() {
        let mut store = SceneStore::new();
        let a = store.add_object(ObjectKind::Box);
        store.update_object(&a, &ObjectPatch::name("Crate"));
        let before: Vec<SceneObject> = store.objects().cloned().collect();
        let selection_before = store.selection().clone();

        store.undo();
        assert_eq!(store.object(&a).map(|o| o.name.as_str()), Some("Box 1"));
        store.redo();

        let after: Vec<SceneObject> = store.objects().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(&selection_before, store.selection());
    }

    #[test]
    fn test_mutation_after_undo_discards_redo() {
        let mut store = SceneStore::new();
        store.add_object(ObjectKind::Box);
        store.add_object(ObjectKind::Box);
        store.undo();
        assert!(store.can_redo());

        store.add_object(ObjectKind::Cone);
        assert!(!store.can_redo());
        assert!(!store.redo());
    }

    #[test]
    fn test_history_capacity() {
        let mut store = SceneStore::with_config(SceneConfig {
            history_capacity: 5,
            ..Default::default()
        });
        for _ in 0..20 {
            store.add_object(ObjectKind::Box);
            assert!(store.history_stats().entries <= 5);
        }

        let mut undos = 0;
        while store.undo() {
            undos += 1;
        }
        assert_eq!(undos, 4);
        assert_eq!(store.object_count(), 16);
        assert!(store.can_redo());
    }

    #[test]
    fn test_snapshots_are_independent_of_live_state() {
        let mut store = SceneStore::new();
        let a = store.add_object(ObjectKind::Box);
        let entries = store.history_stats().entries;

        store.apply_animated_transform(&a, Transform::default().offset([9.0, 9.0, 9.0]));
        assert_eq!(store.object(&a).map(|o| o.transform.position), Some([9.0, 9.0, 9.0]));
        assert_eq!(store.history_stats().entries, entries);

        store.undo();
        assert_eq!(store.object_count(), 0);
        store.redo();
        assert_eq!(store.object(&a).map(|o| o.transform.position), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_update_missing_object_skips_history() {
        let mut store = SceneStore::new();
        store.add_object(ObjectKind::Box);
        let entries = store.history_stats().entries;
        assert!(!store.update_object(&ObjectId::new(), &ObjectPatch::name("ghost")));
        assert_eq!(store.history_stats().entries, entries);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut store = SceneStore::new();
        let a = store.add_object(ObjectKind::Box);
        let b = store.add_object(ObjectKind::Box);
        let c = store.add_object(ObjectKind::Box);

        assert!(store.set_parent(&a, Some(b)));
        assert!(!store.set_parent(&b, Some(a)));
        assert_eq!(store.object(&a).and_then(|o| o.parent), Some(b));
        assert_eq!(store.object(&b).and_then(|o| o.parent), None);

        assert!(store.set_parent(&b, Some(c)));
        assert!(!store.set_parent(&c, Some(a)));
        assert!(!store.set_parent(&c, Some(c)));
        assert!(!store.set_parent(&c, Some(ObjectId::new())));

        assert!(store.set_parent(&a, None));
        assert_eq!(store.object(&a).and_then(|o| o.parent), None);
    }

    #[test]
    fn test_remove_cascades_to_descendants_only() {
        let mut store = SceneStore::new();
        let root = store.add_object(ObjectKind::Box);
        let child = store.add_object(ObjectKind::Box);
        let grandchild = store.add_object(ObjectKind::Box);
        let sibling = store.add_object(ObjectKind::Box);
        store.set_parent(&child, Some(root));
        store.set_parent(&grandchild, Some(child));
        store.select_all();

        let mut removed = store.remove_object(&root);
        removed.sort();
        let mut expected = vec![root, child, grandchild];
        expected.sort();
        assert_eq!(removed, expected);

        assert_eq!(store.object_count(), 1);
        assert!(store.contains(&sibling));
        assert_eq!(store.selection().len(), 1);
        assert_eq!(store.selection().anchor(), Some(sibling));
    }

    #[test]
    fn test_remove_clears_anchor() {
        let mut store = SceneStore::new();
        let a = store.add_object(ObjectKind::Box);
        let b = store.add_object(ObjectKind::Box);
        store.select_all();
        store.remove_object(&b);
        assert!(store.selection().contains(&a));
        assert_eq!(store.selection().anchor(), None);
    }

    #[test]
    fn test_toggle_off_after_delete_restores_anchor() {
        let mut store = SceneStore::new();
        let a = store.add_object(ObjectKind::Box);
        let b = store.add_object(ObjectKind::Box);
        let c = store.add_object(ObjectKind::Box);
        store.select_all();
        store.remove_object(&c);
        assert_eq!(store.selection().anchor(), None);

        store.toggle_select_object(b);
        assert_eq!(store.selection().len(), 1);
        assert_eq!(store.selection().anchor(), Some(a));
    }

    #[test]
    fn test_select_range_is_array_order_inclusive() {
        let mut store = SceneStore::new();
        let box1 = store.add_object(ObjectKind::Box);
        let box2 = store.add_object(ObjectKind::Box);
        let box3 = store.add_object(ObjectKind::Box);
        assert_eq!(names(&store), ["Box 1", "Box 2", "Box 3"]);

        store.select_range(&box1, &box3);
        let selected: Vec<ObjectId> = store.selection().iter().copied().collect();
        assert_eq!(selected, [box1, box2, box3]);

        store.select_range(&box3, &box2);
        assert_eq!(store.selection().len(), 2);
        assert!(!store.selection().contains(&box1));
    }

    #[test]
    fn test_selection_changes_are_not_undoable() {
        let mut store = SceneStore::new();
        let a = store.add_object(ObjectKind::Box);
        let entries = store.history_stats().entries;
        store.select_all();
        store.deselect_all();
        store.toggle_select_object(a);
        store.select_object(None);
        assert_eq!(store.history_stats().entries, entries);
    }

    #[test]
    fn test_duplicate_then_undo_redo() {
        let mut store = SceneStore::new();
        let a = store.add_object(ObjectKind::Box);
        let copy = store.duplicate_object(&a).unwrap();

        let duplicate = store.object(&copy).unwrap();
        assert_eq!(duplicate.name, "Box 1 (copy)");
        assert_eq!(duplicate.transform.position, DUPLICATE_OFFSET);
        assert_eq!(store.selection().anchor(), Some(copy));

        store.undo();
        assert_eq!(store.object_count(), 1);
        store.redo();
        assert_eq!(store.object_count(), 2);
        assert!(store.contains(&copy));
    }

    #[test]
    fn test_duplicate_missing_is_noop() {
        let mut store = SceneStore::new();
        assert_eq!(store.duplicate_object(&ObjectId::new()), None);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_batch_operations_on_empty_selection_are_noops() {
        let mut store = SceneStore::new();
        store.add_object(ObjectKind::Box);
        store.deselect_all();
        let entries = store.history_stats().entries;

        assert!(store.remove_selected().is_empty());
        assert!(store.duplicate_selected().is_empty());
        assert!(store.paste_clipboard().is_empty());
        assert_eq!(store.history_stats().entries, entries);
    }

    #[test]
    fn test_copy_with_empty_selection_keeps_clipboard() {
        let mut store = SceneStore::new();
        store.add_object(ObjectKind::Box);
        assert_eq!(store.copy_selected(), 1);
        store.deselect_all();
        assert_eq!(store.copy_selected(), 0);
        assert_eq!(store.clipboard_len(), 1);
    }

    #[test]
    fn test_duplicate_selected_keeps_hierarchy() {
        let mut store = SceneStore::new();
        let parent = store.add_object(ObjectKind::Box);
        let child = store.add_object(ObjectKind::Sphere);
        store.set_parent(&child, Some(parent));
        store.select_all();

        let copies = store.duplicate_selected();
        assert_eq!(copies.len(), 2);
        let child_copy = store.object(&copies[1]).unwrap();
        assert_eq!(child_copy.parent, Some(copies[0]));
        assert_eq!(store.selection().len(), 2);
    }

    #[test]
    fn test_copy_paste() {
        let mut store = SceneStore::new();
        let a = store.add_object(ObjectKind::Torus);
        let entries = store.history_stats().entries;
        assert_eq!(store.copy_selected(), 1);
        assert_eq!(store.history_stats().entries, entries);

        let pasted = store.paste_clipboard();
        assert_eq!(pasted.len(), 1);
        assert_ne!(pasted[0], a);
        let copy = store.object(&pasted[0]).unwrap();
        assert_eq!(copy.name, "Torus 1");
        assert_eq!(copy.transform.position, PASTE_OFFSET);
        assert!(store.selection().contains(&pasted[0]));

        // Pasting twice yields fresh ids again
        let again = store.paste_clipboard();
        assert_ne!(again[0], pasted[0]);
        assert_eq!(store.object_count(), 3);
    }

    #[test]
    fn test_paste_drops_parent_that_no_longer_exists() {
        let mut store = SceneStore::new();
        let parent = store.add_object(ObjectKind::Box);
        let child = store.add_object(ObjectKind::Box);
        store.set_parent(&child, Some(parent));
        store.select_object(Some(child));
        store.copy_selected();
        store.remove_object(&parent);

        let pasted = store.paste_clipboard();
        assert_eq!(store.object(&pasted[0]).and_then(|o| o.parent), None);
    }

    #[test]
    fn test_children_query() {
        let mut store = SceneStore::new();
        let parent = store.add_object(ObjectKind::Box);
        let a = store.add_object(ObjectKind::Box);
        let b = store.add_object(ObjectKind::Box);
        store.set_parent(&a, Some(parent));
        store.set_parent(&b, Some(parent));

        let children: Vec<ObjectId> = store.children(&parent).iter().map(|o| o.id).collect();
        assert_eq!(children, [a, b]);
        assert_eq!(store.root_objects().len(), 1);
        assert_eq!(store.ancestors(&a), [parent]);
    }

    #[test]
    fn test_load_scene_resets_history_and_drops_bad_parents() {
        let mut store = SceneStore::new();
        store.add_object(ObjectKind::Box);

        let mut a = SceneObject::new(ObjectKind::Box, "A");
        let mut b = SceneObject::new(ObjectKind::Box, "B");
        a.parent = Some(b.id);
        b.parent = Some(a.id);
        let mut orphan = SceneObject::new(ObjectKind::Plane, "Orphan");
        orphan.parent = Some(ObjectId::new());
        store.load_scene([a.clone(), b.clone(), orphan.clone()]);

        assert_eq!(store.object_count(), 3);
        assert!(!store.can_undo());
        assert_eq!(store.object(&orphan.id).and_then(|o| o.parent), None);
        // One link of the cycle is broken
        let a_parent = store.object(&a.id).and_then(|o| o.parent);
        let b_parent = store.object(&b.id).and_then(|o| o.parent);
        assert!(a_parent.is_none() || b_parent.is_none());
    }

    #[test]
    fn test_events_are_drained() {
        let mut store = SceneStore::new();
        let revision = store.revision();
        let id = store.add_object(ObjectKind::Box);
        let events = store.take_events();
        assert_eq!(events[0], SceneEvent::Added(vec![id]));
        assert!(store.revision() > revision);
        assert!(store.take_events().is_empty());
    }
}
