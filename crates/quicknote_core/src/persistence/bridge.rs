//! Load/save of the note collection through a key-value repository.

use crate::model::note::Note;
use crate::persistence::codec::{decode_notes, encode_notes};
use crate::persistence::PersistenceResult;
use crate::repo::kv_repo::KvRepository;
use log::{debug, error, info, warn};
use std::time::Instant;

/// Durable slot holding the encoded collection.
pub const NOTES_SLOT_KEY: &str = "notes";

/// Durable mirror of the note collection.
///
/// Never owns notes: it reads once at startup and writes snapshots handed
/// to it afterwards.
pub struct PersistenceBridge<R: KvRepository> {
    repo: R,
    slot_key: String,
}

impl<R: KvRepository> PersistenceBridge<R> {
    /// Creates a bridge over the default `notes` slot.
    pub fn new(repo: R) -> Self {
        Self::with_slot(repo, NOTES_SLOT_KEY)
    }

    pub fn with_slot(repo: R, slot_key: impl Into<String>) -> Self {
        Self {
            repo,
            slot_key: slot_key.into(),
        }
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Loads the stored collection, surfacing read and decode errors.
    ///
    /// An absent slot is a first run and yields an empty collection.
    pub fn try_load(&self) -> PersistenceResult<Vec<Note>> {
        match self.repo.get(&self.slot_key)? {
            Some(raw) => Ok(decode_notes(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Loads the stored collection, falling back to empty on any failure.
    ///
    /// # Side effects
    /// - Emits `notes_load` events; failures are logged at `error`.
    pub fn load(&self) -> Vec<Note> {
        let started_at = Instant::now();
        match self.try_load() {
            Ok(notes) => {
                info!(
                    "event=notes_load module=persistence status=ok slot={} count={} duration_ms={}",
                    self.slot_key,
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                notes
            }
            Err(err) => {
                error!(
                    "event=notes_load module=persistence status=error slot={} fallback=empty duration_ms={} error={}",
                    self.slot_key,
                    started_at.elapsed().as_millis(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Encodes `notes` and replaces the slot contents.
    ///
    /// # Side effects
    /// - Emits `notes_save` events; failures are logged at `warn`, callers
    ///   decide whether to retry.
    pub fn save(&self, notes: &[Note]) -> PersistenceResult<()> {
        let started_at = Instant::now();
        let result = self.write_slot(notes);

        match &result {
            Ok(()) => debug!(
                "event=notes_save module=persistence status=ok slot={} count={} duration_ms={}",
                self.slot_key,
                notes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=notes_save module=persistence status=error slot={} count={} duration_ms={} error={}",
                self.slot_key,
                notes.len(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn write_slot(&self, notes: &[Note]) -> PersistenceResult<()> {
        let encoded = encode_notes(notes)?;
        self.repo.set(&self.slot_key, &encoded)?;
        Ok(())
    }
}
