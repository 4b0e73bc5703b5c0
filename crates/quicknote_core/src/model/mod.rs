//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record owned by the note store.
//! - Define the edit-selection state shared with the UI collaborator.
//!
//! # Invariants
//! - Every note is identified by a stable, non-empty `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
pub mod selection;
