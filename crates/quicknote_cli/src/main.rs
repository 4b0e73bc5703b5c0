//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `quicknote_core` linkage without the Flutter/FFI runtime.
//! - Report what the durable `notes` slot currently holds.
//!
//! Reads `QUICKNOTE_DB_PATH`; never writes to the slot.

use quicknote_core::{core_version, ping, CoreConfig, PersistenceBridge, SqliteKvRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("quicknote_core ping={}", ping());
    println!("quicknote_core version={}", core_version());

    let config = CoreConfig::from_env();
    let repo = match SqliteKvRepository::open(&config.db_path) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("db_open failed path={} error={err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    match PersistenceBridge::new(repo).try_load() {
        Ok(notes) => {
            let edited = notes.iter().filter(|note| note.is_edited()).count();
            println!(
                "notes path={} count={} edited={}",
                config.db_path.display(),
                notes.len(),
                edited
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("notes_load failed path={} error={err}", config.db_path.display());
            ExitCode::FAILURE
        }
    }
}
