//! Seams to the outside world: the remote store service and client-local persistence

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{Query, Record, Result};

/// Request/response contract of the remote store service.
///
/// Every operation fails with the same taxonomy (see [`crate::KindviewError`]):
/// `AuthRequired` on a 403 carrying a login redirect, `Remote` on any other
/// non-success status, `Timeout` when the bounded wait expires. Nothing is
/// retried.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Names of all kinds known to the store
    async fn list_kinds(&self) -> Result<Vec<String>>;

    /// Records matching the query. An embedded `{error}` answer fails with
    /// `LogicalQuery`.
    async fn query(&self, query: &Query) -> Result<Vec<Record>>;

    /// Number of matching records, without fetching them
    async fn count(&self, query: &Query) -> Result<u64>;

    /// Delete matching records, returning how many were removed.
    ///
    /// A server that ignores the filter parameters deletes every entity of
    /// the kind (or under the ancestor), so check the service's parameter
    /// names before deleting with filters.
    async fn delete(&self, query: &Query) -> Result<u64>;
}

/// Slot holding the last encoded query state (the shareable location).
pub trait StateStore: Send + Sync {
    fn load_state(&self) -> Result<Option<String>>;

    fn save_state(&self, encoded: &str) -> Result<()>;
}

/// Best-effort cache of the last fetched kind names.
///
/// Reads are a convenience only; a missing entry is `Ok(None)`, not an error.
pub trait KindCache: Send + Sync {
    fn load_kinds(&self) -> Result<Option<Vec<String>>>;

    fn store_kinds(&self, kinds: &[String]) -> Result<()>;
}

/// In-process [`StateStore`], for tests and one-shot sessions
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<Option<String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(encoded: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(Some(encoded.into())),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn load_state(&self) -> Result<Option<String>> {
        Ok(self.state.lock().clone())
    }

    fn save_state(&self, encoded: &str) -> Result<()> {
        *self.state.lock() = Some(encoded.to_string());
        Ok(())
    }
}
