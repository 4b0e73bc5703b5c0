//! Durable key-value storage contracts and implementations.
//!
//! # Responsibility
//! - Define the key-value port the persistence bridge writes through.
//! - Isolate SQLite details from persistence/business orchestration.
//!
//! # Invariants
//! - `set` fully replaces the previous value of a key.
//! - Reads never observe a partially written value.

pub mod kv_repo;
pub mod memory_kv_repo;
