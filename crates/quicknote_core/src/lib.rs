//! Core domain logic for QuickNote.
//! This crate is the single source of truth for note identity, edit state
//! and durable persistence.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, NoteValidationError, Timestamp};
pub use model::selection::EditSelection;
pub use persistence::bridge::{PersistenceBridge, NOTES_SLOT_KEY};
pub use persistence::codec::{decode_notes, encode_notes, CodecError};
pub use persistence::worker::{SaveQueue, SaveWorker};
pub use persistence::{PersistenceError, PersistenceResult};
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use repo::memory_kv_repo::MemoryKvRepository;
pub use service::note_store::{MutationKind, MutationObserver, NoteStore};
pub use service::session::{NoteSession, SessionError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
