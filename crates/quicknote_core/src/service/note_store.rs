//! Note store: the authoritative collection and edit selection.
//!
//! # Responsibility
//! - Own the ordered note collection and the single edit selection.
//! - Apply create/update/delete and notify one observer per committed
//!   mutation.
//!
//! # Invariants
//! - Exactly one note per id; generated ids never collide.
//! - Insertion order is preserved; edits never reorder.
//! - `update` only applies while the target id is the active selection.
//! - Deleting the selected note clears the selection.
//! - No-op operations never notify the observer.

use crate::clock::Clock;
use crate::model::note::{Note, NoteId};
use crate::model::selection::EditSelection;
use log::{debug, warn};
use std::collections::HashSet;

/// Kind of committed mutation delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    Created(NoteId),
    Updated(NoteId),
    Deleted(NoteId),
}

impl MutationKind {
    pub fn note_id(&self) -> &NoteId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => id,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Created(_) => "create",
            Self::Updated(_) => "update",
            Self::Deleted(_) => "delete",
        }
    }
}

/// Hook invoked once per committed mutation with the resulting snapshot.
pub trait MutationObserver: Send {
    fn on_mutation(&mut self, kind: &MutationKind, snapshot: &[Note]);
}

/// Observer for stores that do not persist.
impl MutationObserver for () {
    fn on_mutation(&mut self, _kind: &MutationKind, _snapshot: &[Note]) {}
}

/// Owned note store with an injected observer and time source.
pub struct NoteStore {
    notes: Vec<Note>,
    selection: EditSelection,
    observer: Box<dyn MutationObserver>,
    clock: Box<dyn Clock>,
}

impl NoteStore {
    /// Creates a store from the startup collection.
    ///
    /// Later duplicates of an id are dropped so the uniqueness invariant
    /// holds even for hand-built collections.
    pub fn new(
        initial: Vec<Note>,
        observer: Box<dyn MutationObserver>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut seen = HashSet::with_capacity(initial.len());
        let mut notes = Vec::with_capacity(initial.len());
        for note in initial {
            if seen.insert(note.id().clone()) {
                notes.push(note);
            } else {
                warn!(
                    "event=store_init module=store status=warn duplicate_id={}",
                    note.id()
                );
            }
        }

        Self {
            notes,
            selection: EditSelection::NoSelection,
            observer,
            clock,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id() == id)
    }

    pub fn selection(&self) -> &EditSelection {
        &self.selection
    }

    /// Returns the note the input form should be prefilled with.
    pub fn editing_note(&self) -> Option<&Note> {
        self.selection.editing_id().and_then(|id| self.get(id))
    }

    /// Appends a new note and returns its id.
    pub fn create(&mut self, text: impl Into<String>) -> NoteId {
        let id = self.fresh_id();
        let note = Note::created(id.clone(), text.into(), self.clock.now());
        self.notes.push(note);
        self.commit(MutationKind::Created(id.clone()));
        id
    }

    /// Selects `id` for editing, replacing any prior selection.
    ///
    /// Returns `false` without changing the selection when `id` is unknown.
    pub fn begin_edit(&mut self, id: &NoteId) -> bool {
        if self.get(id).is_none() {
            debug!("event=note_begin_edit module=store status=noop reason=not_found note_id={id}");
            return false;
        }
        self.selection = EditSelection::Editing(id.clone());
        true
    }

    /// Clears the selection without mutating any note.
    pub fn cancel_edit(&mut self) {
        self.selection = EditSelection::NoSelection;
    }

    /// Replaces the text of `id` while it is the active selection.
    ///
    /// Returns whether a note was changed. The selection is cleared whenever
    /// `id` was selected, even if the note disappeared in the meantime.
    pub fn update(&mut self, id: &NoteId, text: impl Into<String>) -> bool {
        if !self.selection.is_editing(id) {
            debug!("event=note_update module=store status=noop reason=not_selected note_id={id}");
            return false;
        }
        self.selection = EditSelection::NoSelection;

        let now = self.clock.now();
        let Some(note) = self.notes.iter_mut().find(|note| note.id() == id) else {
            debug!("event=note_update module=store status=noop reason=not_found note_id={id}");
            return false;
        };
        note.apply_edit(text.into(), now);
        self.commit(MutationKind::Updated(id.clone()));
        true
    }

    /// Applies `text` to the currently selected note, if any.
    pub fn commit_edit(&mut self, text: impl Into<String>) -> bool {
        match self.selection.editing_id().cloned() {
            Some(id) => self.update(&id, text),
            None => false,
        }
    }

    /// Removes the note with `id`; returns whether it existed.
    pub fn delete(&mut self, id: &NoteId) -> bool {
        if self.selection.is_editing(id) {
            self.selection = EditSelection::NoSelection;
        }

        let Some(position) = self.notes.iter().position(|note| note.id() == id) else {
            debug!("event=note_delete module=store status=noop reason=not_found note_id={id}");
            return false;
        };
        self.notes.remove(position);
        self.commit(MutationKind::Deleted(id.clone()));
        true
    }

    fn fresh_id(&self) -> NoteId {
        loop {
            let candidate = NoteId::generate();
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn commit(&mut self, kind: MutationKind) {
        debug!(
            "event=note_{} module=store status=ok note_id={} count={}",
            kind.label(),
            kind.note_id(),
            self.notes.len()
        );
        self.observer.on_mutation(&kind, &self.notes);
    }
}
