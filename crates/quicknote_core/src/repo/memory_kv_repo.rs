//! In-memory key-value repository.
//!
//! Clones share one map, so a caller can keep a handle for inspection while
//! the save worker owns another.

use crate::repo::kv_repo::{KvRepository, RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct MemoryKvRepository {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> RepoResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl KvRepository for MemoryKvRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<bool> {
        Ok(self.entries()?.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKvRepository;
    use crate::repo::kv_repo::KvRepository;

    #[test]
    fn clones_observe_each_others_writes() {
        let repo = MemoryKvRepository::new();
        let view = repo.clone();

        repo.set("notes", "[]").unwrap();

        assert_eq!(view.get("notes").unwrap().as_deref(), Some("[]"));
    }
}
