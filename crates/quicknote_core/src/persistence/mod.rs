//! Persistence bridge between the note store and the durable slot.
//!
//! # Responsibility
//! - Encode/decode the full note collection for the `notes` slot.
//! - Load once at startup with an empty-collection fallback.
//! - Apply saves in mutation order on a single background writer.
//!
//! # Invariants
//! - Only this module touches the durable slot.
//! - Load and save failures are logged, never fatal.
//! - A stale snapshot never overwrites a newer one.

pub mod bridge;
pub mod codec;
pub mod worker;

use crate::persistence::codec::CodecError;
use crate::repo::kv_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors raised while mirroring the collection durably.
#[derive(Debug)]
pub enum PersistenceError {
    Repo(RepoError),
    Codec(CodecError),
    /// The save worker could not be started.
    WorkerSpawn(std::io::Error),
    /// The save worker is no longer accepting snapshots.
    WorkerStopped,
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::WorkerSpawn(err) => write!(f, "failed to start save worker: {err}"),
            Self::WorkerStopped => write!(f, "save worker stopped"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::WorkerSpawn(err) => Some(err),
            Self::WorkerStopped => None,
        }
    }
}

impl From<RepoError> for PersistenceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CodecError> for PersistenceError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}
