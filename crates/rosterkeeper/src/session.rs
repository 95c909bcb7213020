//! One viewer's stateful handle on the roster.
//!
//! A [`Session`] owns the current [`Criteria`] and at most one live
//! subscription against the store. Changing the criteria while watching
//! cancels the old subscription before installing the replacement, so a
//! watcher never receives snapshots for stale criteria.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::employee::Employee;
use crate::error::Result;
use crate::query::Criteria;
use crate::store::{Store, Subscription};

/// Capacity of the snapshot channel handed to the store.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// A viewer session over a store.
#[derive(Debug)]
pub struct Session {
    store: Arc<dyn Store>,
    criteria: Criteria,
    subscription: Option<Subscription>,
    watch_tx: Option<mpsc::Sender<Vec<Employee>>>,
}

impl Session {
    /// Create a session with no filters and no active subscription.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            criteria: Criteria::default(),
            subscription: None,
            watch_tx: None,
        }
    }

    /// The criteria currently in effect.
    #[must_use]
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Whether a live subscription is currently installed.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replace the criteria.
    ///
    /// If a subscription is active it is cancelled first and a fresh one
    /// installed for the new criteria, delivering to the same receiver.
    ///
    /// # Errors
    ///
    /// Returns an error if the replacement subscription cannot be created.
    pub fn set_criteria(&mut self, criteria: Criteria) -> Result<()> {
        if criteria == self.criteria {
            return Ok(());
        }

        // Cancel before installing so there is never a moment with two
        // active delivery streams.
        if let Some(old) = self.subscription.take() {
            debug!("Criteria changed; replacing live subscription");
            old.cancel();
        }
        self.criteria = criteria;

        if let Some(tx) = &self.watch_tx {
            let subscription = self.store.subscribe(self.criteria.clone(), tx.clone())?;
            self.subscription = Some(subscription);
        }
        Ok(())
    }

    /// Start watching the visible set.
    ///
    /// Returns a receiver that gets an initial snapshot immediately and a
    /// fresh one after every collection change. Any previous subscription
    /// is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription cannot be created.
    pub fn watch(&mut self) -> Result<mpsc::Receiver<Vec<Employee>>> {
        if let Some(old) = self.subscription.take() {
            old.cancel();
        }

        let (tx, rx) = mpsc::channel(SNAPSHOT_CHANNEL_CAPACITY);
        let subscription = self.store.subscribe(self.criteria.clone(), tx.clone())?;
        self.subscription = Some(subscription);
        self.watch_tx = Some(tx);
        Ok(rx)
    }

    /// Stop watching. A no-op when no subscription is active.
    pub fn unwatch(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.watch_tx = None;
    }

    /// One-shot query of the visible set under the current criteria.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn visible(&self) -> Result<Vec<Employee>> {
        self.store.list(&self.criteria).await
    }

    /// Access the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::Sex;
    use crate::store::LocalStore;
    use chrono::NaiveDate;

    fn test_session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = Arc::new(LocalStore::new(dir.path().join("employees.json")));
        (dir, Session::new(store))
    }

    fn test_employee(first: &str) -> Employee {
        Employee {
            id: None,
            first_name: first.to_string(),
            last_name: "Tester".to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            sex: Sex::Unspecified,
            birthdate: NaiveDate::from_ymd_opt(1990, 1, 5).unwrap(),
            profile_photo: String::new(),
        }
    }

    #[tokio::test]
    async fn test_visible_uses_current_criteria() {
        let (_dir, mut session) = test_session();
        session.store().add(&test_employee("Anna")).await.unwrap();
        session.store().add(&test_employee("Bob")).await.unwrap();

        assert_eq!(session.visible().await.unwrap().len(), 2);

        session
            .set_criteria(Criteria::default().with_name_contains(Some("ann".to_string())))
            .unwrap();
        let visible = session.visible().await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].first_name, "Anna");
    }

    #[tokio::test]
    async fn test_watch_delivers_snapshots() {
        let (_dir, mut session) = test_session();
        session.store().add(&test_employee("Anna")).await.unwrap();

        let mut rx = session.watch().unwrap();
        assert!(session.is_watching());
        assert_eq!(rx.recv().await.unwrap().len(), 1);

        session.store().add(&test_employee("Bob")).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_set_criteria_replaces_subscription() {
        let (_dir, mut session) = test_session();
        session.store().add(&test_employee("Anna")).await.unwrap();
        session.store().add(&test_employee("Bob")).await.unwrap();

        let mut rx = session.watch().unwrap();
        assert_eq!(rx.recv().await.unwrap().len(), 2);

        session
            .set_criteria(Criteria::default().with_name_contains(Some("bob".to_string())))
            .unwrap();
        assert!(session.is_watching());

        // The replacement subscription delivers a snapshot for the new
        // criteria on the same receiver.
        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].first_name, "Bob");
    }

    #[tokio::test]
    async fn test_set_criteria_without_watch_does_not_subscribe() {
        let (_dir, mut session) = test_session();

        session
            .set_criteria(Criteria::default().with_name_contains(Some("x".to_string())))
            .unwrap();
        assert!(!session.is_watching());
    }

    #[tokio::test]
    async fn test_unwatch_stops_delivery() {
        let (_dir, mut session) = test_session();

        let mut rx = session.watch().unwrap();
        let _ = rx.recv().await.unwrap();

        session.unwatch();
        assert!(!session.is_watching());

        session.store().add(&test_employee("Anna")).await.unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_same_criteria_keeps_subscription() {
        let (_dir, mut session) = test_session();

        let mut rx = session.watch().unwrap();
        let _ = rx.recv().await.unwrap();

        session.set_criteria(Criteria::default()).unwrap();
        assert!(session.is_watching());

        session.store().add(&test_employee("Anna")).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().len(), 1);
    }
}
