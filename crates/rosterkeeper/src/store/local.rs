//! Local blob store: the "browser local storage" backend.
//!
//! The whole collection lives in one JSON-serialized array file. Every
//! operation reads the blob, mutates the array in memory, and rewrites
//! the file. Last writer wins; there is no partial-write recovery and no
//! concurrent-writer protection. Criteria are evaluated client-side over
//! the full set.

use std::path::{Path, PathBuf};

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::employee::Employee;
use crate::error::{Error, Result};
use crate::query::{self, Criteria};

use super::{Store, Subscription};

/// Capacity of the internal change-notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// JSON-blob-backed employee store.
#[derive(Debug)]
pub struct LocalStore {
    /// Path to the collection blob.
    path: PathBuf,
    /// Change notifications for live subscriptions.
    changes: broadcast::Sender<()>,
}

impl LocalStore {
    /// Create a store over the given blob path.
    ///
    /// The file is created lazily on the first write; a missing blob reads
    /// as an empty collection.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let path = path.into();
        debug!(path = %path.display(), "Opened local blob store");
        Self { path, changes }
    }

    /// Get the path to the blob file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_all(&self, employees: &[Employee]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| Error::DirectoryCreate {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        let blob = serde_json::to_vec_pretty(employees)?;
        tokio::fs::write(&self.path, blob)
            .await
            .map_err(|source| Error::BlobWrite {
                path: self.path.clone(),
                source,
            })
    }

    fn notify_change(&self) {
        // No receivers is fine; nobody is watching.
        let _ = self.changes.send(());
    }
}

/// Read the full collection from a blob path.
///
/// A missing file is an empty collection, matching a never-written
/// key-value slot.
async fn load(path: &Path) -> Result<Vec<Employee>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(Error::BlobRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[async_trait::async_trait]
impl Store for LocalStore {
    async fn list(&self, criteria: &Criteria) -> Result<Vec<Employee>> {
        let all = load(&self.path).await?;
        Ok(query::apply(criteria, all))
    }

    async fn add(&self, employee: &Employee) -> Result<String> {
        let mut all = load(&self.path).await?;

        let id = Uuid::new_v4().to_string();
        let mut record = employee.clone();
        record.id = Some(id.clone());
        all.push(record);

        self.write_all(&all).await?;
        info!(%id, "Added employee to blob store");
        self.notify_change();
        Ok(id)
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let mut all = load(&self.path).await?;

        let Some(position) = all.iter().position(|e| e.id.as_deref() == Some(id)) else {
            debug!(%id, "No employee to remove");
            return Ok(false);
        };
        all.remove(position);

        self.write_all(&all).await?;
        info!(%id, "Removed employee from blob store");
        self.notify_change();
        Ok(true)
    }

    fn subscribe(
        &self,
        criteria: Criteria,
        tx: mpsc::Sender<Vec<Employee>>,
    ) -> Result<Subscription> {
        let path = self.path.clone();
        let mut changes = self.changes.subscribe();

        let task = tokio::spawn(async move {
            loop {
                let snapshot = match load(&path).await {
                    Ok(all) => query::apply(&criteria, all),
                    Err(e) => {
                        warn!(error = %e, "Live query failed; ending subscription");
                        break;
                    }
                };

                if tx.send(snapshot).await.is_err() {
                    break;
                }

                match changes.recv().await {
                    // A lagged receiver still wants the latest snapshot.
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(Subscription::new(task))
    }
}
