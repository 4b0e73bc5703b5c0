use chrono::{Duration, TimeZone, Utc};
use quicknote_core::{
    decode_notes, CoreConfig, EditSelection, KvRepository, ManualClock, MemoryKvRepository,
    NoteSession, PersistenceBridge, RepoResult, NOTES_SLOT_KEY,
};
use std::sync::{Arc, Mutex};
use std::thread;

/// Repository recording every written value, with uneven write latency.
#[derive(Clone, Default)]
struct SlowRecordingRepo {
    inner: MemoryKvRepository,
    writes: Arc<Mutex<Vec<String>>>,
}

impl KvRepository for SlowRecordingRepo {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        let mut writes = self.writes.lock().unwrap();
        // Earlier writes are slower, so a reordering queue would be exposed.
        let delay = 20u64.saturating_sub(writes.len() as u64 * 5);
        thread::sleep(std::time::Duration::from_millis(delay));
        writes.push(value.to_string());
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> RepoResult<bool> {
        self.inner.remove(key)
    }
}

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
}

#[test]
fn create_edit_delete_scenario_round_trips_through_storage() {
    let repo = MemoryKvRepository::new();
    let clock = clock();
    let mut session =
        NoteSession::with_repository(repo.clone(), 1, Box::new(clock.clone())).unwrap();
    assert!(session.notes().is_empty());

    let id = session.create("Buy milk");
    assert_eq!(session.notes().len(), 1);
    assert_eq!(session.notes()[0].text(), "Buy milk");

    clock.advance(Duration::minutes(1));
    assert!(session.begin_edit(&id));
    assert!(session.commit_edit("Buy milk and eggs"));
    let note = &session.notes()[0];
    assert_eq!(note.text(), "Buy milk and eggs");
    assert!(note.updated_at().is_some());
    assert_eq!(session.selection(), &EditSelection::NoSelection);

    assert!(session.delete(&id));
    assert!(session.notes().is_empty());
    session.flush().unwrap();

    assert_eq!(repo.get(NOTES_SLOT_KEY).unwrap().as_deref(), Some("[]"));
    assert!(PersistenceBridge::new(repo).try_load().unwrap().is_empty());
}

#[test]
fn saves_land_in_mutation_order() {
    let repo = SlowRecordingRepo::default();
    let mut session = NoteSession::with_repository(repo.clone(), 1, Box::new(clock())).unwrap();

    let ids: Vec<_> = (0..5).map(|i| session.create(format!("n{i}"))).collect();
    session.delete(&ids[0]);
    session.flush().unwrap();

    let writes = repo.writes.lock().unwrap().clone();
    let lengths: Vec<usize> = writes
        .iter()
        .map(|raw| decode_notes(raw).unwrap().len())
        .collect();
    assert_eq!(lengths, vec![1, 2, 3, 4, 5, 4]);

    let durable = decode_notes(&repo.inner.get(NOTES_SLOT_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(durable, session.notes().to_vec());
}

#[test]
fn selection_changes_do_not_trigger_saves() {
    let repo = SlowRecordingRepo::default();
    let mut session = NoteSession::with_repository(repo.clone(), 1, Box::new(clock())).unwrap();
    let id = session.create("a");

    session.begin_edit(&id);
    session.cancel_edit();
    session.flush().unwrap();

    assert_eq!(repo.writes.lock().unwrap().len(), 1);
}

#[test]
fn reopened_file_session_sees_previous_notes() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        db_path: dir.path().join("notes.sqlite3"),
        ..CoreConfig::default()
    };

    let (first, second) = {
        let mut session = NoteSession::open(&config).unwrap();
        let first = session.create("first");
        let second = session.create("second");
        session.begin_edit(&second);
        session.commit_edit("second, edited");
        session.flush().unwrap();
        (first, second)
    };

    let session = NoteSession::open(&config).unwrap();
    let notes = session.notes();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id(), &first);
    assert_eq!(notes[0].updated_at(), None);
    assert_eq!(notes[1].id(), &second);
    assert_eq!(notes[1].text(), "second, edited");
    assert!(notes[1].updated_at().is_some());
    assert_eq!(session.selection(), &EditSelection::NoSelection);
}

#[test]
fn dropping_session_drains_pending_saves() {
    let repo = SlowRecordingRepo::default();
    {
        let mut session =
            NoteSession::with_repository(repo.clone(), 1, Box::new(clock())).unwrap();
        session.create("a");
        session.create("b");
    }

    assert_eq!(repo.writes.lock().unwrap().len(), 2);
}

#[test]
fn corrupt_storage_starts_empty_and_recovers_on_next_save() {
    let repo = MemoryKvRepository::new();
    repo.set(NOTES_SLOT_KEY, "{{{").unwrap();

    let mut session = NoteSession::with_repository(repo.clone(), 1, Box::new(clock())).unwrap();
    assert!(session.notes().is_empty());

    session.create("fresh start");
    session.flush().unwrap();

    let durable = decode_notes(&repo.get(NOTES_SLOT_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(durable.len(), 1);
    assert_eq!(durable[0].text(), "fresh start");
}
