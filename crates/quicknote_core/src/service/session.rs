//! Application session bootstrap.
//!
//! # Responsibility
//! - Open durable storage and load the collection exactly once.
//! - Wire the note store to the save worker before any mutation.
//!
//! # Invariants
//! - The store does not exist until startup load completes.
//! - Every committed mutation is handed to the save worker in order.

use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::model::note::{Note, NoteId};
use crate::model::selection::EditSelection;
use crate::persistence::bridge::PersistenceBridge;
use crate::persistence::worker::SaveWorker;
use crate::persistence::{PersistenceError, PersistenceResult};
use crate::repo::kv_repo::{KvRepository, RepoError, SqliteKvRepository};
use crate::service::note_store::NoteStore;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SessionError {
    /// Durable storage could not be opened.
    Repo(RepoError),
    Persistence(PersistenceError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "failed to open note storage: {err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PersistenceError> for SessionError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// Loaded note store plus its background save worker.
pub struct NoteSession {
    store: NoteStore,
    worker: SaveWorker,
}

impl NoteSession {
    /// Opens the SQLite-backed session described by `config`.
    pub fn open(config: &CoreConfig) -> Result<Self, SessionError> {
        let repo = SqliteKvRepository::open(&config.db_path)?;
        info!(
            "event=session_open module=session status=start db_path={}",
            config.db_path.display()
        );
        Self::with_repository(repo, config.save_attempts, Box::new(SystemClock))
    }

    /// Opens a session over any key-value repository.
    pub fn with_repository<R>(
        repo: R,
        save_attempts: u32,
        clock: Box<dyn Clock>,
    ) -> Result<Self, SessionError>
    where
        R: KvRepository + Send + 'static,
    {
        let bridge = PersistenceBridge::new(repo);
        let initial = bridge.load();
        let worker = SaveWorker::spawn(bridge, save_attempts)?;
        let store = NoteStore::new(initial, Box::new(worker.queue()), clock);
        info!(
            "event=session_open module=session status=ok count={}",
            store.len()
        );
        Ok(Self { store, worker })
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    pub fn selection(&self) -> &EditSelection {
        self.store.selection()
    }

    pub fn editing_note(&self) -> Option<&Note> {
        self.store.editing_note()
    }

    pub fn create(&mut self, text: impl Into<String>) -> NoteId {
        self.store.create(text)
    }

    pub fn begin_edit(&mut self, id: &NoteId) -> bool {
        self.store.begin_edit(id)
    }

    pub fn update(&mut self, id: &NoteId, text: impl Into<String>) -> bool {
        self.store.update(id, text)
    }

    pub fn commit_edit(&mut self, text: impl Into<String>) -> bool {
        self.store.commit_edit(text)
    }

    pub fn cancel_edit(&mut self) {
        self.store.cancel_edit();
    }

    pub fn delete(&mut self, id: &NoteId) -> bool {
        self.store.delete(id)
    }

    /// Waits until every mutation so far is durably handled.
    pub fn flush(&self) -> PersistenceResult<()> {
        self.worker.flush()
    }
}
