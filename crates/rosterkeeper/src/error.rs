//! Error types for rosterkeeper.
//!
//! Business-rule violations are *not* errors: the validator collects those
//! into a [`crate::validation::ValidationReport`] and never returns `Err`.
//! This module covers the fallible rest: persistence, configuration, photo
//! encoding, and I/O.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rosterkeeper operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Document store errors ===
    /// Failed to open or create the document database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Local blob store errors ===
    /// Failed to read the collection blob.
    #[error("failed to read collection blob at {path}: {source}")]
    BlobRead {
        /// Path to the blob file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the collection blob.
    #[error("failed to write collection blob at {path}: {source}")]
    BlobWrite {
        /// Path to the blob file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Photo errors ===
    /// Failed to read a profile photo file.
    ///
    /// Callers recover from this by substituting the placeholder photo;
    /// it never blocks record creation.
    #[error("failed to read photo {path}: {source}")]
    PhotoRead {
        /// Path to the photo file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for rosterkeeper operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error came from persistence (database or blob I/O).
    ///
    /// The display surface shows these distinctly from user-correctable
    /// input problems.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::DatabaseMigration { .. }
                | Self::BlobRead { .. }
                | Self::BlobWrite { .. }
        )
    }
}
