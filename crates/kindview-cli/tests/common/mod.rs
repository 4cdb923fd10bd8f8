//! Common test utilities: a scripted StoreClient

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use kindview_cli::Controller;
use kindview_core::{Cell, KindviewError, Query, Record, Result, StoreClient};
use kindview_storage::LocalStorage;
use parking_lot::Mutex;

/// Which operation a recorded call was
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListKinds,
    Query(Query),
    Count(Query),
    Delete(Query),
}

/// StoreClient that replays queued answers and records every call
#[derive(Default)]
pub struct MockStore {
    kinds: Mutex<VecDeque<Result<Vec<String>>>>,
    records: Mutex<VecDeque<Result<Vec<Record>>>>,
    counts: Mutex<VecDeque<Result<u64>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_kinds(&self, answer: Result<Vec<String>>) {
        self.kinds.lock().push_back(answer);
    }

    pub fn push_records(&self, answer: Result<Vec<Record>>) {
        self.records.lock().push_back(answer);
    }

    /// Answers for both count and delete
    pub fn push_count(&self, answer: Result<u64>) {
        self.counts.lock().push_back(answer);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn unscripted<T>() -> Result<T> {
        Err(KindviewError::Transport("no scripted answer".to_string()))
    }
}

#[async_trait]
impl StoreClient for MockStore {
    async fn list_kinds(&self) -> Result<Vec<String>> {
        self.calls.lock().push(Call::ListKinds);
        self.kinds.lock().pop_front().unwrap_or_else(Self::unscripted)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Record>> {
        self.calls.lock().push(Call::Query(query.clone()));
        self.records.lock().pop_front().unwrap_or_else(Self::unscripted)
    }

    async fn count(&self, query: &Query) -> Result<u64> {
        self.calls.lock().push(Call::Count(query.clone()));
        self.counts.lock().pop_front().unwrap_or_else(Self::unscripted)
    }

    async fn delete(&self, query: &Query) -> Result<u64> {
        self.calls.lock().push(Call::Delete(query.clone()));
        self.counts.lock().pop_front().unwrap_or_else(Self::unscripted)
    }
}

/// A controller over a mock store and in-memory storage
pub fn controller() -> (Controller, Arc<MockStore>, Arc<LocalStorage>) {
    let store = Arc::new(MockStore::new());
    let storage = Arc::new(LocalStorage::in_memory().unwrap());
    let controller = Controller::new(store.clone(), storage.clone(), storage.clone());
    (controller, store, storage)
}

pub fn record(pairs: &[(&str, &str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(name, value, value_type)| (name.to_string(), Cell::new(*value, *value_type)))
        .collect()
}
