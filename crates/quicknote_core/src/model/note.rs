//! Note record and its wire shape.
//!
//! # Responsibility
//! - Define the single entity stored by the application.
//! - Own timestamp encoding for the durable slot (RFC 3339, UTC).
//!
//! # Invariants
//! - `id` is non-empty and immutable after construction.
//! - `created_at` is set exactly once and never mutated.
//! - `updated_at` is absent until the first edit and is never cleared.
//! - `updated_at`, when present, is `>= created_at`.
//! - Both timestamps fall in years `0..=9999`, the range RFC 3339 can carry.
//! - Deserialization runs the same validation as `Note::with_id`.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// UTC timestamp used for `created_at` / `updated_at`.
pub type Timestamp = DateTime<Utc>;

const MAX_WIRE_YEAR: i32 = 9999;

/// Opaque note identifier.
///
/// Generated ids are UUID v4 strings. Ids loaded from storage keep whatever
/// non-empty shape they were written with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Validation errors for note invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyId,
    UpdatedBeforeCreated {
        created_at: Timestamp,
        updated_at: Timestamp,
    },
    /// Year outside `0..=9999`; such a value would not survive a reload.
    TimestampOutOfRange(Timestamp),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "note id must not be empty"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updatedAt ({}) must be >= createdAt ({})",
                format_timestamp(updated_at),
                format_timestamp(created_at)
            ),
            Self::TimestampOutOfRange(value) => write!(
                f,
                "timestamp {} is outside the storable year range 0..={MAX_WIRE_YEAR}",
                format_timestamp(value)
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// A single user-authored text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "NoteWire")]
pub struct Note {
    id: NoteId,
    text: String,
    #[serde(serialize_with = "serialize_timestamp")]
    created_at: Timestamp,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_timestamp"
    )]
    updated_at: Option<Timestamp>,
}

impl Note {
    /// Creates a never-edited note with a caller-provided id.
    ///
    /// Used by import paths where identity already exists.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    pub fn with_id(
        id: impl Into<NoteId>,
        text: impl Into<String>,
        created_at: Timestamp,
    ) -> Result<Self, NoteValidationError> {
        Self::from_parts(id, text, created_at, None)
    }

    /// Rebuilds a note from all of its persisted parts.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    /// - `UpdatedBeforeCreated` when `updated_at < created_at`.
    /// - `TimestampOutOfRange` when a year falls outside `0..=9999`.
    pub fn from_parts(
        id: impl Into<NoteId>,
        text: impl Into<String>,
        created_at: Timestamp,
        updated_at: Option<Timestamp>,
    ) -> Result<Self, NoteValidationError> {
        let note = Self {
            id: id.into(),
            text: text.into(),
            created_at,
            updated_at,
        };
        note.validate()?;
        Ok(note)
    }

    /// Store-side constructor; the store guarantees a fresh non-empty id.
    pub(crate) fn created(id: NoteId, text: String, created_at: Timestamp) -> Self {
        Self {
            id,
            text,
            created_at,
            updated_at: None,
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    /// Returns whether the note was edited at least once.
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }

    /// Checks note invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.is_empty() {
            return Err(NoteValidationError::EmptyId);
        }
        for value in std::iter::once(self.created_at).chain(self.updated_at) {
            if !(0..=MAX_WIRE_YEAR).contains(&value.year()) {
                return Err(NoteValidationError::TimestampOutOfRange(value));
            }
        }
        if let Some(updated_at) = self.updated_at {
            if updated_at < self.created_at {
                return Err(NoteValidationError::UpdatedBeforeCreated {
                    created_at: self.created_at,
                    updated_at,
                });
            }
        }
        Ok(())
    }

    /// Replaces text and stamps `updated_at`.
    ///
    /// `updated_at` is clamped to `created_at` so a clock stepping backwards
    /// cannot break ordering.
    pub(crate) fn apply_edit(&mut self, text: String, now: Timestamp) {
        self.text = text;
        self.updated_at = Some(now.max(self.created_at));
    }
}

/// Decoding shape; converted into `Note` through validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteWire {
    id: NoteId,
    text: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    created_at: Timestamp,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    updated_at: Option<Timestamp>,
}

impl TryFrom<NoteWire> for Note {
    type Error = NoteValidationError;

    fn try_from(value: NoteWire) -> Result<Self, Self::Error> {
        Note::from_parts(value.id, value.text, value.created_at, value.updated_at)
    }
}

/// Formats a timestamp the way it is written to the durable slot.
pub fn format_timestamp(value: &Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses an RFC 3339 timestamp with any offset into UTC.
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw.trim()).map(|value| value.with_timezone(&Utc))
}

fn serialize_timestamp<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(value))
}

fn serialize_optional_timestamp<S: Serializer>(
    value: &Option<Timestamp>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serialize_timestamp(value, serializer),
        None => serializer.serialize_none(),
    }
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(|err| D::Error::custom(format!("invalid timestamp `{raw}`: {err}")))
}

fn deserialize_optional_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .map_err(|err| D::Error::custom(format!("invalid timestamp `{raw}`: {err}"))),
        None => Ok(None),
    }
}
