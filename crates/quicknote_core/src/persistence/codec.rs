//! Wire codec for the `notes` slot.
//!
//! The slot holds a JSON array of `{id, text, createdAt, updatedAt?}`
//! records. Encoding is deterministic: identical collections produce
//! identical bytes.

use crate::model::note::{Note, NoteId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug)]
pub enum CodecError {
    /// Malformed JSON, wrong shape, bad timestamp or invalid record.
    Json(serde_json::Error),
    /// The same id appears more than once.
    DuplicateId(NoteId),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid notes encoding: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate note id in encoding: {id}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Encodes the full collection in order.
pub fn encode_notes(notes: &[Note]) -> CodecResult<String> {
    Ok(serde_json::to_string(notes)?)
}

/// Decodes a stored collection, validating every record.
///
/// # Errors
/// - `Json` for malformed input or records failing `Note::validate`.
/// - `DuplicateId` when two records share an id.
pub fn decode_notes(raw: &str) -> CodecResult<Vec<Note>> {
    let notes: Vec<Note> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(notes.len());
    for note in &notes {
        if !seen.insert(note.id()) {
            return Err(CodecError::DuplicateId(note.id().clone()));
        }
    }
    Ok(notes)
}
