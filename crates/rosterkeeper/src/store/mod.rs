//! Persistence layer for rosterkeeper.
//!
//! The [`Store`] trait abstracts over two backends: a local JSON blob
//! (one serialized array per collection, rewritten whole on every change)
//! and a SQLite-backed document collection addressed by stable identifier.
//! Both support push-style updates through [`Store::subscribe`].

pub mod document;
pub mod local;
pub mod migrations;
pub mod schema;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{Backend, Config};
use crate::employee::Employee;
use crate::error::Result;
use crate::query::Criteria;

pub use document::DocumentStore;
pub use local::LocalStore;

/// The persistence abstraction behind the roster.
///
/// A store never auto-refreshes a non-subscribed caller: after `add` or
/// `remove`, the display surface re-lists (or is covered by an active
/// subscription).
#[async_trait::async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// List the employees matching the criteria, in criteria order.
    async fn list(&self, criteria: &Criteria) -> Result<Vec<Employee>>;

    /// Persist a new employee and return the assigned identifier.
    ///
    /// The record's own `id` field is ignored; the store assigns a fresh
    /// identifier that is immutable from then on.
    async fn add(&self, employee: &Employee) -> Result<String>;

    /// Remove the employee with the given identifier.
    ///
    /// Returns `true` if a record was removed, `false` if none matched.
    /// All other records, including their relative order, are untouched.
    async fn remove(&self, id: &str) -> Result<bool>;

    /// Subscribe to the visible set for the given criteria.
    ///
    /// An initial snapshot is delivered immediately, then a fresh one
    /// after every change to the collection. Delivery stops when the
    /// returned handle is cancelled or dropped, or when the receiver
    /// goes away.
    fn subscribe(
        &self,
        criteria: Criteria,
        tx: mpsc::Sender<Vec<Employee>>,
    ) -> Result<Subscription>;
}

/// Handle for one live subscription.
///
/// Dropping the handle cancels delivery; [`Subscription::cancel`] does the
/// same explicitly. Cancellation is what lets a session guarantee at most
/// one active delivery stream.
#[derive(Debug)]
pub struct Subscription {
    task: tokio::task::JoinHandle<()>,
}

impl Subscription {
    pub(crate) fn new(task: tokio::task::JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Stop delivering snapshots.
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Whether the delivery task is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Open the store selected by the configuration.
///
/// # Errors
///
/// Returns an error if the document database cannot be opened.
pub fn open(config: &Config) -> Result<Arc<dyn Store>> {
    match config.store.backend {
        Backend::Local => Ok(Arc::new(LocalStore::new(config.blob_path()))),
        Backend::Document => Ok(Arc::new(DocumentStore::open(config.database_path())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.store.data_dir = Some(dir.path().to_path_buf());

        let store = open(&config).unwrap();
        assert!(store.list(&Criteria::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_document_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.store.backend = Backend::Document;
        config.store.database_path = Some(dir.path().join("roster.db"));

        let store = open(&config).unwrap();
        assert!(store.list(&Criteria::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_cancel() {
        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        let subscription = Subscription::new(task);

        assert!(subscription.is_active());
        subscription.cancel();
    }
}
