//! `SQLite` schema for the document-backed employee collection.

/// SQL statement to create the employees table.
///
/// Each row is one document, addressed by a stable string identifier.
pub const CREATE_EMPLOYEES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS employees (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    sex TEXT NOT NULL,
    birthdate TEXT NOT NULL,
    profile_photo TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on birthdate for range queries and
/// age ordering.
pub const CREATE_BIRTHDATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_employees_birthdate ON employees(birthdate)
";

/// SQL statement to create an index on sex for equality filtering.
pub const CREATE_SEX_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_employees_sex ON employees(sex)
";

/// SQL statement to create an index on the name columns for ordering.
pub const CREATE_NAME_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_employees_name ON employees(first_name, last_name)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_EMPLOYEES_TABLE,
    CREATE_BIRTHDATE_INDEX,
    CREATE_SEX_INDEX,
    CREATE_NAME_INDEX,
    CREATE_METADATA_TABLE,
];
