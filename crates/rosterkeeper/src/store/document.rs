//! Document store: the "remote document collection" backend.
//!
//! Each employee is one document row addressed by a stable string
//! identifier. Criteria are translated into SQL equality/range predicates
//! plus an ORDER BY clause and issued as a single query; no client-side
//! re-filtering happens afterwards. Range bounds translate to `>=`/`<=`,
//! inclusive on both ends like the client-side path. The name filter goes
//! through a registered scalar function so substring matching and case
//! folding agree exactly with the client-side path (LIKE would treat `%`
//! and `_` as wildcards, and SQLite's `LOWER()` only folds ASCII).

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::employee::{Employee, Sex};
use crate::error::{Error, Result};
use crate::query::{Criteria, PhotoFilter, SortKey};

use super::{Store, Subscription};

/// Capacity of the internal change-notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 16;

const SELECT_COLUMNS: &str =
    "SELECT id, first_name, last_name, email, sex, birthdate, profile_photo FROM employees";

/// SQLite-backed document collection of employees.
#[derive(Debug)]
pub struct DocumentStore {
    /// Path to the database file.
    path: PathBuf,
    /// Shared connection; subscriptions query through their own clone.
    conn: Arc<Mutex<Connection>>,
    /// Change notifications for live subscriptions.
    changes: broadcast::Sender<()>,
}

impl DocumentStore {
    /// Open or create a document store at the given path.
    ///
    /// Creates the parent directories and database file if they don't
    /// exist, and initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps concurrent readers out of the writers' way.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        register_functions(&conn)?;
        super::migrations::initialize_schema(&conn)?;
        info!("Database opened successfully at {}", path.display());

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
            changes,
        })
    }

    /// Create an in-memory document store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        register_functions(&conn)?;
        super::migrations::initialize_schema(&conn)?;

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
            changes,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify_change(&self) {
        // No receivers is fine; nobody is watching.
        let _ = self.changes.send(());
    }

    /// Translate criteria into one SQL query and run it.
    fn query_visible(conn: &Connection, criteria: &Criteria) -> Result<Vec<Employee>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(needle) = &criteria.name_contains {
            params.push(needle.clone());
            clauses.push(format!(
                "name_contains(first_name || ' ' || last_name, ?{})",
                params.len()
            ));
        }
        if let Some(sex) = criteria.sex {
            params.push(sex.to_string());
            clauses.push(format!("sex = ?{}", params.len()));
        }
        if let Some(start) = criteria.born_after {
            params.push(start.to_string());
            clauses.push(format!("birthdate >= ?{}", params.len()));
        }
        if let Some(end) = criteria.born_before {
            params.push(end.to_string());
            clauses.push(format!("birthdate <= ?{}", params.len()));
        }
        match criteria.photo {
            Some(PhotoFilter::HasPhoto) => clauses.push("profile_photo <> ''".to_string()),
            Some(PhotoFilter::NoPhoto) => clauses.push("profile_photo = ''".to_string()),
            None => {}
        }

        let mut sql = SELECT_COLUMNS.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        match criteria.sort {
            // Youngest first is the latest birthdate first.
            Some(SortKey::AgeAscending) => sql.push_str(" ORDER BY birthdate DESC"),
            Some(SortKey::AgeDescending) => sql.push_str(" ORDER BY birthdate ASC"),
            Some(SortKey::Name) => sql.push_str(" ORDER BY first_name || ' ' || last_name ASC"),
            None => sql.push_str(" ORDER BY rowid ASC"),
        }

        let mut stmt = conn.prepare(&sql)?;
        let employees = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), Self::row_to_employee)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(employees)
    }

    /// Convert a database row to an Employee struct.
    fn row_to_employee(row: &rusqlite::Row) -> rusqlite::Result<Employee> {
        let id: String = row.get(0)?;
        let first_name: String = row.get(1)?;
        let last_name: String = row.get(2)?;
        let email: String = row.get(3)?;
        let sex_str: String = row.get(4)?;
        let birthdate_str: String = row.get(5)?;
        let profile_photo: String = row.get(6)?;

        let sex = sex_str.parse::<Sex>().unwrap_or_else(|_| {
            warn!("Unknown sex value: {}, defaulting to unspecified", sex_str);
            Sex::Unspecified
        });

        let birthdate = NaiveDate::parse_from_str(&birthdate_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Employee {
            id: Some(id),
            first_name,
            last_name,
            email,
            sex,
            birthdate,
            profile_photo,
        })
    }
}

/// Register the scalar functions the criteria translation relies on.
///
/// `name_contains(haystack, needle)` is a case-insensitive substring test
/// with full Unicode folding, so it matches records exactly as the
/// client-side evaluation does.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "name_contains",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack: String = ctx.get(0)?;
            let needle: String = ctx.get(1)?;
            Ok(haystack.to_lowercase().contains(&needle.to_lowercase()))
        },
    )?;
    Ok(())
}

#[async_trait::async_trait]
impl Store for DocumentStore {
    async fn list(&self, criteria: &Criteria) -> Result<Vec<Employee>> {
        let conn = self.lock();
        Self::query_visible(&conn, criteria)
    }

    async fn add(&self, employee: &Employee) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        {
            let conn = self.lock();
            conn.execute(
                r"
                INSERT INTO employees (id, first_name, last_name, email, sex, birthdate, profile_photo)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
                rusqlite::params![
                    id,
                    employee.first_name,
                    employee.last_name,
                    employee.email,
                    employee.sex.to_string(),
                    employee.birthdate.to_string(),
                    employee.profile_photo,
                ],
            )?;
        }

        info!(%id, "Added employee document");
        self.notify_change();
        Ok(id)
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let affected = {
            let conn = self.lock();
            conn.execute("DELETE FROM employees WHERE id = ?1", [id])?
        };

        if affected > 0 {
            info!(%id, "Removed employee document");
            self.notify_change();
        } else {
            debug!(%id, "No employee document to remove");
        }
        Ok(affected > 0)
    }

    fn subscribe(
        &self,
        criteria: Criteria,
        tx: mpsc::Sender<Vec<Employee>>,
    ) -> Result<Subscription> {
        let conn = Arc::clone(&self.conn);
        let mut changes = self.changes.subscribe();

        let task = tokio::spawn(async move {
            loop {
                let snapshot = {
                    let conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
                    Self::query_visible(&conn, &criteria)
                };

                match snapshot {
                    Ok(visible) => {
                        if tx.send(visible).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Live query failed; ending subscription");
                        break;
                    }
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
