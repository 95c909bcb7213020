//! Configuration management for rosterkeeper.
//!
//! Configuration is loaded with figment from TOML config files,
//! environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "rosterkeeper";

/// Default database file name for the document backend.
const DATABASE_FILE_NAME: &str = "roster.db";

/// Which persistence backend the store uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// One JSON array blob per collection, rewritten whole on every change.
    #[default]
    Local,
    /// SQLite-backed document collection addressed by stable identifier.
    Document,
}

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ROSTERKEEPER_`)
/// 2. TOML config file at `~/.config/rosterkeeper/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store configuration.
    pub store: StoreConfig,
    /// Validation configuration.
    pub validation: ValidationConfig,
}

/// Store-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Which backend persists the roster.
    pub backend: Backend,
    /// Collection name: the blob file stem (local) or table namespace key
    /// (document).
    pub collection: String,
    /// Directory for the local blob.
    /// Defaults to `~/.local/share/rosterkeeper`.
    pub data_dir: Option<PathBuf>,
    /// Path to the document database file.
    /// Defaults to `~/.local/share/rosterkeeper/roster.db`.
    pub database_path: Option<PathBuf>,
}

/// Validation-related configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Require a profile photo on new records.
    pub require_photo: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            collection: "employees".to_string(),
            data_dir: None,
            database_path: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("ROSTERKEEPER_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.store.collection.is_empty() {
            return Err(Error::ConfigValidation {
                message: "collection name must not be empty".to_string(),
            });
        }

        let well_formed = self
            .store
            .collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            return Err(Error::ConfigValidation {
                message: format!(
                    "collection name '{}' may only contain letters, digits, '-' and '_'",
                    self.store.collection
                ),
            });
        }

        Ok(())
    }

    /// Path of the local collection blob, resolving defaults if not set.
    #[must_use]
    pub fn blob_path(&self) -> PathBuf {
        self.store
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
            .join(format!("{}.json", self.store.collection))
    }

    /// Path of the document database, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.store
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.store.backend, Backend::Local);
        assert_eq!(config.store.collection, "employees");
        assert!(config.store.data_dir.is_none());
        assert!(!config.validation.require_photo);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_collection() {
        let mut config = Config::default();
        config.store.collection = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("collection name"));
    }

    #[test]
    fn test_validate_bad_collection_chars() {
        let mut config = Config::default();
        config.store.collection = "employees/2024".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blob_path_uses_collection_name() {
        let mut config = Config::default();
        config.store.data_dir = Some(PathBuf::from("/data"));
        config.store.collection = "staff".to_string();

        assert_eq!(config.blob_path(), PathBuf::from("/data/staff.json"));
    }

    #[test]
    fn test_blob_path_default_dir() {
        let config = Config::default();
        assert!(config
            .blob_path()
            .to_string_lossy()
            .contains("employees.json"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config
            .database_path()
            .to_string_lossy()
            .contains("roster.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.store.database_path = Some(PathBuf::from("/custom/roster.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/roster.sqlite")
        );
    }

    #[test]
    fn test_backend_wire_names() {
        assert_eq!(
            serde_json::to_string(&Backend::Document).unwrap(),
            "\"document\""
        );
        assert_eq!(
            serde_json::from_str::<Backend>("\"local\"").unwrap(),
            Backend::Local
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("rosterkeeper"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[store]\nbackend = \"document\"\ncollection = \"crew\"\n\n[validation]\nrequire_photo = true\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.store.backend, Backend::Document);
        assert_eq!(config.store.collection, "crew");
        assert!(config.validation.require_photo);
    }

    #[test]
    fn test_load_rejects_invalid_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\ncollection = \"\"\n").unwrap();

        assert!(Config::load_from(Some(path)).is_err());
    }
}
