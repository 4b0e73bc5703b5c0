//! Core use-case services.
//!
//! # Responsibility
//! - Own note state and edit selection for UI/FFI callers.
//! - Bootstrap sessions: storage open, startup load, save worker wiring.

pub mod note_store;
pub mod session;
