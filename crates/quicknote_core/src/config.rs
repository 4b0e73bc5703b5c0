//! Core runtime configuration.
//!
//! Defaults can be overridden through environment variables:
//! - `QUICKNOTE_DB_PATH`: SQLite file backing the key-value store.
//! - `QUICKNOTE_SAVE_ATTEMPTS`: attempts per snapshot write (1..=5).
//! - `QUICKNOTE_LOG_LEVEL`: `trace|debug|info|warn|error`.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "QUICKNOTE_DB_PATH";
pub const SAVE_ATTEMPTS_ENV: &str = "QUICKNOTE_SAVE_ATTEMPTS";
pub const LOG_LEVEL_ENV: &str = "QUICKNOTE_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "quicknote.sqlite3";
const DEFAULT_SAVE_ATTEMPTS: u32 = 2;
const MAX_SAVE_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub save_attempts: u32,
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            save_attempts: DEFAULT_SAVE_ATTEMPTS,
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Builds a config from process environment over defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// Blank values fall back to defaults; unparsable attempt counts too.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(attempts) = read(SAVE_ATTEMPTS_ENV).and_then(|raw| raw.parse::<u32>().ok()) {
            config.save_attempts = attempts.clamp(1, MAX_SAVE_ATTEMPTS);
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        config
    }

    /// Returns `requested` unless it is blank, else the configured level.
    pub fn effective_log_level<'a>(&'a self, requested: &'a str) -> &'a str {
        let requested = requested.trim();
        if requested.is_empty() {
            self.log_level.as_str()
        } else {
            requested
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_LEVEL_ENV, SAVE_ATTEMPTS_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn overrides_apply_and_attempts_are_clamped() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, " /data/notes.sqlite3 "),
            (SAVE_ATTEMPTS_ENV, "42"),
            (LOG_LEVEL_ENV, "warn"),
        ]));

        assert_eq!(config.db_path, PathBuf::from("/data/notes.sqlite3"));
        assert_eq!(config.save_attempts, 5);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn blank_and_invalid_values_keep_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, "   "),
            (SAVE_ATTEMPTS_ENV, "many"),
        ]));

        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn blank_requested_level_falls_back_to_configured_level() {
        let config = CoreConfig::from_lookup(lookup_from(&[(LOG_LEVEL_ENV, "error")]));

        assert_eq!(config.effective_log_level("  "), "error");
        assert_eq!(config.effective_log_level(" trace "), "trace");
    }

    #[test]
    fn zero_attempts_clamp_to_one() {
        let config = CoreConfig::from_lookup(lookup_from(&[(SAVE_ATTEMPTS_ENV, "0")]));
        assert_eq!(config.save_attempts, 1);
    }
}
