// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene document model for Atelier Editor.
//!
//! This crate provides the editable scene:
//! - Scene objects with transform, material and optional model asset
//! - Parent/child hierarchy with cycle rejection
//! - Multi-selection with an anchor, clipboard
//! - Linear undo/redo over structurally shared snapshots
//!
//! ## Architecture
//!
//! `SceneStore` owns all state and is passed around explicitly; there is
//! no global instance. Every mutating operation pushes a `SceneSnapshot`
//! into a generic `History`, and hosts observe changes by draining
//! `SceneEvent`s or comparing `SceneStore::revision`.

pub mod history;
pub mod object;
pub mod selection;
pub mod store;

pub use history::{History, HistoryStats, MAX_HISTORY};
pub use object::{
    Material, MaterialKind, ModelAsset, ModelFormat, ObjectId, ObjectKind, ObjectPatch,
    SceneObject, Transform,
};
pub use selection::Selection;
pub use store::{SceneConfig, SceneEvent, SceneSnapshot, SceneStore, DUPLICATE_OFFSET, PASTE_OFFSET};
