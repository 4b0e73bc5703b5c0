//! Single in-flight save queue.
//!
//! # Responsibility
//! - Apply snapshot writes off the caller's thread.
//! - Preserve submission order so a stale snapshot never lands last.
//!
//! # Invariants
//! - Exactly one write runs at a time, in FIFO order.
//! - Each snapshot is attempted at most `save_attempts` times.
//! - Failed writes are logged and skipped; in-memory state is untouched.

use crate::model::note::Note;
use crate::persistence::bridge::PersistenceBridge;
use crate::persistence::{PersistenceError, PersistenceResult};
use crate::repo::kv_repo::KvRepository;
use crate::service::note_store::{MutationKind, MutationObserver};
use log::{debug, error, info};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

const WORKER_THREAD_NAME: &str = "quicknote-save";

enum SaveCommand {
    Save(Vec<Note>),
    Flush(Sender<()>),
    Shutdown,
}

/// Cloneable submission handle for the save worker.
///
/// Installed as the note store's mutation observer.
#[derive(Clone)]
pub struct SaveQueue {
    sender: Sender<SaveCommand>,
}

impl SaveQueue {
    /// Enqueues a snapshot; returns immediately.
    pub fn submit(&self, notes: Vec<Note>) -> PersistenceResult<()> {
        self.sender
            .send(SaveCommand::Save(notes))
            .map_err(|_| PersistenceError::WorkerStopped)
    }

    /// Blocks until every snapshot submitted before this call was handled.
    pub fn flush(&self) -> PersistenceResult<()> {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.sender
            .send(SaveCommand::Flush(ack_tx))
            .map_err(|_| PersistenceError::WorkerStopped)?;
        ack_rx.recv().map_err(|_| PersistenceError::WorkerStopped)
    }
}

impl MutationObserver for SaveQueue {
    fn on_mutation(&mut self, kind: &MutationKind, snapshot: &[Note]) {
        if let Err(err) = self.submit(snapshot.to_vec()) {
            error!(
                "event=notes_save_enqueue module=persistence status=error note_id={} error={}",
                kind.note_id(),
                err
            );
        }
    }
}

/// Owner of the background writer thread.
///
/// Dropping the worker drains queued snapshots and joins the thread.
pub struct SaveWorker {
    queue: SaveQueue,
    handle: Option<JoinHandle<()>>,
}

impl SaveWorker {
    /// Moves `bridge` onto a dedicated writer thread.
    ///
    /// `save_attempts` is clamped to at least one attempt per snapshot.
    pub fn spawn<R>(bridge: PersistenceBridge<R>, save_attempts: u32) -> PersistenceResult<Self>
    where
        R: KvRepository + Send + 'static,
    {
        let attempts = save_attempts.max(1);
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(bridge, receiver, attempts))
            .map_err(PersistenceError::WorkerSpawn)?;

        info!("event=save_worker_start module=persistence status=ok attempts={attempts}");
        Ok(Self {
            queue: SaveQueue { sender },
            handle: Some(handle),
        })
    }

    /// Returns a new submission handle.
    pub fn queue(&self) -> SaveQueue {
        self.queue.clone()
    }

    pub fn flush(&self) -> PersistenceResult<()> {
        self.queue.flush()
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        let _ = self.queue.sender.send(SaveCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("event=save_worker_stop module=persistence status=error reason=panicked");
            }
        }
    }
}

fn run_worker<R: KvRepository>(
    bridge: PersistenceBridge<R>,
    receiver: Receiver<SaveCommand>,
    attempts: u32,
) {
    // Numbered here so every queue handle shares one sequence.
    let mut seq: u64 = 0;
    for command in receiver {
        match command {
            SaveCommand::Save(notes) => {
                seq += 1;
                write_snapshot(&bridge, seq, &notes, attempts);
            }
            SaveCommand::Flush(ack) => {
                let _ = ack.send(());
            }
            SaveCommand::Shutdown => break,
        }
    }
    info!("event=save_worker_stop module=persistence status=ok");
}

fn write_snapshot<R: KvRepository>(
    bridge: &PersistenceBridge<R>,
    seq: u64,
    notes: &[Note],
    attempts: u32,
) {
    for attempt in 1..=attempts {
        match bridge.save(notes) {
            Ok(()) => {
                debug!(
                    "event=notes_persist module=persistence status=ok seq={seq} attempt={attempt}"
                );
                return;
            }
            Err(err) if attempt == attempts => {
                error!(
                    "event=notes_persist module=persistence status=error seq={seq} attempts={attempts} error={err}"
                );
            }
            Err(_) => {}
        }
    }
}
