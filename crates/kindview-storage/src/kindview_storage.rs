//! Local persistence for kindview
//!
//! A single SQLite key/value table holds the client-local state:
//! the last encoded query state (the shareable location) and the cached
//! list of kind names.

mod local_storage;

#[cfg(test)]
mod local_storage_tests;

pub use local_storage::{KINDS_KEY, LocalStorage, STATE_KEY};
