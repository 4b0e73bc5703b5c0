//! Edit-selection state machine.
//!
//! States are `NoSelection` and `Editing(id)`. At most one note is selected
//! at any time; the note store is the only writer.

use crate::model::note::NoteId;

/// The note currently opened in the input form, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSelection {
    #[default]
    NoSelection,
    Editing(NoteId),
}

impl EditSelection {
    /// Returns the selected id while editing.
    pub fn editing_id(&self) -> Option<&NoteId> {
        match self {
            Self::NoSelection => None,
            Self::Editing(id) => Some(id),
        }
    }

    /// Returns whether `id` is the active selection.
    pub fn is_editing(&self, id: &NoteId) -> bool {
        self.editing_id() == Some(id)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Editing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::EditSelection;
    use crate::model::note::NoteId;

    #[test]
    fn default_is_no_selection() {
        let selection = EditSelection::default();
        assert!(!selection.is_active());
        assert_eq!(selection.editing_id(), None);
    }

    #[test]
    fn editing_matches_only_its_own_id() {
        let selection = EditSelection::Editing(NoteId::from("a"));
        assert!(selection.is_editing(&NoteId::from("a")));
        assert!(!selection.is_editing(&NoteId::from("b")));
    }
}
