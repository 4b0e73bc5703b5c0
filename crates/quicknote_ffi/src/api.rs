//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the note list/editor intents to Dart via FRB.
//! - Own the process-wide note session behind a mutex.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Mutating calls are rejected until `notes_init` succeeded.
//! - Form text is trimmed before it reaches the store.

use log::error;
use once_cell::sync::OnceCell;
use quicknote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, Note, NoteId, NoteSession,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

static SESSION: OnceCell<FfiSession> = OnceCell::new();

struct FfiSession {
    db_path: PathBuf,
    session: Mutex<NoteSession>,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Blank `level` uses `QUICKNOTE_LOG_LEVEL`, then the build default.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let config = CoreConfig::from_env();
    let level = config.effective_log_level(&level);
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One note as rendered by the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
    /// Unix epoch milliseconds; `None` until the first edit.
    pub updated_at_ms: Option<i64>,
}

/// Full render state: collection plus edit selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesSnapshot {
    pub ok: bool,
    pub items: Vec<NoteItem>,
    /// Id of the note currently loaded in the input form.
    pub editing_id: Option<String>,
    pub message: String,
}

/// Result envelope for note intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    /// Whether the intent changed state.
    pub ok: bool,
    pub note_id: Option<String>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: Option<String>) -> Self {
        Self {
            ok: true,
            note_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Opens the note session and performs the one-time startup load.
///
/// Input semantics:
/// - `db_path`: SQLite file path; blank uses `QUICKNOTE_DB_PATH` or the
///   default temp location.
///
/// # FFI contract
/// - Idempotent for the same resolved path; other paths are rejected.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_init(db_path: String) -> String {
    let mut config = CoreConfig::from_env();
    let trimmed = db_path.trim();
    if !trimmed.is_empty() {
        config.db_path = PathBuf::from(trimmed);
    }

    let result = SESSION.get_or_try_init(|| {
        NoteSession::open(&config)
            .map(|session| FfiSession {
                db_path: config.db_path.clone(),
                session: Mutex::new(session),
            })
            .map_err(|err| format!("notes_init failed: {err}"))
    });

    match result {
        Ok(state) if state.db_path == config.db_path => String::new(),
        Ok(state) => format!(
            "notes already initialized at `{}`; refusing to switch to `{}`",
            state.db_path.display(),
            config.db_path.display()
        ),
        Err(err) => err,
    }
}

/// Returns the current collection and edit selection.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_snapshot() -> NotesSnapshot {
    match with_session(|session| {
        let items = session.notes().iter().map(to_note_item).collect::<Vec<_>>();
        let editing_id = session
            .selection()
            .editing_id()
            .map(|id| id.as_str().to_string());
        (items, editing_id)
    }) {
        Ok((items, editing_id)) => NotesSnapshot {
            ok: true,
            message: format!("{} note(s).", items.len()),
            items,
            editing_id,
        },
        Err(err) => NotesSnapshot {
            ok: false,
            items: Vec::new(),
            editing_id: None,
            message: format!("notes_snapshot failed: {err}"),
        },
    }
}

/// Adds a note from the input form.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create(text: String) -> NoteActionResponse {
    match with_session(|session| session.create(text.trim())) {
        Ok(id) => NoteActionResponse::success("Note created.", Some(id.to_string())),
        Err(err) => NoteActionResponse::failure(format!("note_create failed: {err}")),
    }
}

/// Loads a note into the input form.
#[flutter_rust_bridge::frb(sync)]
pub fn note_begin_edit(note_id: String) -> NoteActionResponse {
    let id = NoteId::from(note_id);
    match with_session(|session| session.begin_edit(&id)) {
        Ok(true) => NoteActionResponse::success("Editing note.", Some(id.to_string())),
        Ok(false) => NoteActionResponse::failure(format!("note not found: {id}")),
        Err(err) => NoteActionResponse::failure(format!("note_begin_edit failed: {err}")),
    }
}

/// Saves the form text into the note being edited.
#[flutter_rust_bridge::frb(sync)]
pub fn note_commit_edit(text: String) -> NoteActionResponse {
    let outcome = with_session(|session| {
        let id = session.selection().editing_id().cloned();
        let applied = session.commit_edit(text.trim());
        (id, applied)
    });
    match outcome {
        Ok((Some(id), true)) => NoteActionResponse::success("Note updated.", Some(id.to_string())),
        Ok((Some(id), false)) => NoteActionResponse::failure(format!("note not found: {id}")),
        Ok((None, _)) => NoteActionResponse::failure("no note is being edited"),
        Err(err) => NoteActionResponse::failure(format!("note_commit_edit failed: {err}")),
    }
}

/// Leaves edit mode without saving.
#[flutter_rust_bridge::frb(sync)]
pub fn note_cancel_edit() -> NoteActionResponse {
    match with_session(|session| session.cancel_edit()) {
        Ok(()) => NoteActionResponse::success("Edit cancelled.", None),
        Err(err) => NoteActionResponse::failure(format!("note_cancel_edit failed: {err}")),
    }
}

/// Deletes a note; deleting the edited note also leaves edit mode.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: String) -> NoteActionResponse {
    let id = NoteId::from(note_id);
    match with_session(|session| session.delete(&id)) {
        Ok(true) => NoteActionResponse::success("Note deleted.", Some(id.to_string())),
        Ok(false) => NoteActionResponse::failure(format!("note not found: {id}")),
        Err(err) => NoteActionResponse::failure(format!("note_delete failed: {err}")),
    }
}

/// Blocks until pending saves are written; call before app suspension.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_flush() -> NoteActionResponse {
    match with_session(|session| session.flush()) {
        Ok(Ok(())) => NoteActionResponse::success("Notes saved.", None),
        Ok(Err(err)) => NoteActionResponse::failure(format!("notes_flush failed: {err}")),
        Err(err) => NoteActionResponse::failure(format!("notes_flush failed: {err}")),
    }
}

fn with_session<T>(f: impl FnOnce(&mut NoteSession) -> T) -> Result<T, String> {
    let state = SESSION
        .get()
        .ok_or_else(|| "notes not initialized; call notes_init first".to_string())?;
    let mut guard = lock_session(&state.session);
    Ok(f(&mut guard))
}

fn lock_session(session: &Mutex<NoteSession>) -> MutexGuard<'_, NoteSession> {
    session.lock().unwrap_or_else(|poisoned| {
        error!("event=ffi_session_lock module=ffi status=error reason=poisoned");
        poisoned.into_inner()
    })
}

fn to_note_item(note: &Note) -> NoteItem {
    NoteItem {
        id: note.id().to_string(),
        text: note.text().to_string(),
        created_at_ms: note.created_at().timestamp_millis(),
        updated_at_ms: note.updated_at().map(|value| value.timestamp_millis()),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, note_begin_edit, note_cancel_edit, note_commit_edit,
        note_create, note_delete, notes_flush, notes_init, notes_snapshot, ping,
    };
    use once_cell::sync::Lazy;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // The session and its edit selection are process-wide.
    static SERIAL: Mutex<()> = Mutex::new(());
    static DB_PATH: Lazy<PathBuf> = Lazy::new(|| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "quicknote-ffi-{}-{nanos}.sqlite3",
            std::process::id()
        ))
    });

    fn init() -> std::sync::MutexGuard<'static, ()> {
        let guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let error = notes_init(DB_PATH.to_string_lossy().into_owned());
        assert!(error.is_empty(), "{error}");
        guard
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_with_blank_level_uses_configured_level() {
        // Level resolution passes, so only the relative directory is refused.
        let error = init_logging("   ".to_string(), "tmp/logs".to_string());
        assert!(error.contains("log_dir must be an absolute path"), "{error}");
    }

    #[test]
    fn notes_init_is_idempotent_and_rejects_other_paths() {
        let _guard = init();
        assert!(notes_init(DB_PATH.to_string_lossy().into_owned()).is_empty());

        let error = notes_init("/tmp/some-other-quicknote.sqlite3".to_string());
        assert!(error.contains("refusing to switch"), "{error}");
    }

    #[test]
    fn create_trims_form_text() {
        let _guard = init();
        let created = note_create("  Buy milk \n".to_string());
        assert!(created.ok, "{}", created.message);
        let id = created.note_id.unwrap();

        let snapshot = notes_snapshot();
        let item = snapshot.items.iter().find(|item| item.id == id).unwrap();
        assert_eq!(item.text, "Buy milk");
        assert_eq!(item.updated_at_ms, None);
    }

    #[test]
    fn edit_flow_updates_note_and_clears_selection() {
        let _guard = init();
        let id = note_create("draft".to_string()).note_id.unwrap();

        let begin = note_begin_edit(id.clone());
        assert!(begin.ok, "{}", begin.message);
        assert_eq!(notes_snapshot().editing_id.as_deref(), Some(id.as_str()));

        let commit = note_commit_edit(" final ".to_string());
        assert!(commit.ok, "{}", commit.message);
        assert_eq!(commit.note_id.as_deref(), Some(id.as_str()));

        let snapshot = notes_snapshot();
        assert_eq!(snapshot.editing_id, None);
        let item = snapshot.items.iter().find(|item| item.id == id).unwrap();
        assert_eq!(item.text, "final");
        assert!(item.updated_at_ms.unwrap() >= item.created_at_ms);
    }

    #[test]
    fn commit_without_selection_and_unknown_ids_fail_softly() {
        let _guard = init();
        note_cancel_edit();

        assert!(!note_commit_edit("x".to_string()).ok);
        assert!(!note_begin_edit("missing".to_string()).ok);
        assert!(!note_delete("missing".to_string()).ok);
    }

    #[test]
    fn deleting_edited_note_leaves_edit_mode() {
        let _guard = init();
        let id = note_create("to delete".to_string()).note_id.unwrap();
        note_begin_edit(id.clone());

        let deleted = note_delete(id.clone());
        assert!(deleted.ok, "{}", deleted.message);

        let snapshot = notes_snapshot();
        assert_eq!(snapshot.editing_id, None);
        assert!(snapshot.items.iter().all(|item| item.id != id));
        assert!(notes_flush().ok);
    }
}
