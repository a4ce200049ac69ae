//! Process configuration read from the environment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::geo::{PostalCodeDirectory, PostalCodeLookup};
use crate::llm::{CompletionClient, LlmError, OpenAiClientBuilder};

/// Settings for opening the store and its collaborators.
///
/// Completion-client settings (`OPENAI_*`) are read by
/// [`OpenAiClientBuilder`] itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub postal_codes_path: Option<PathBuf>,
}

impl Config {
    /// Reads `COSTNAV_DB_PATH` and `COSTNAV_POSTAL_CODES`.
    ///
    /// # Errors
    ///
    /// Returns an error if no database path is set and the platform data
    /// directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        let database_path = match non_empty_env("COSTNAV_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };
        let postal_codes_path = non_empty_env("COSTNAV_POSTAL_CODES").map(PathBuf::from);

        Ok(Self {
            database_path,
            postal_codes_path,
        })
    }

    /// Loads the postal code directory, or an empty one if none is configured.
    pub fn postal_codes(&self) -> Result<Arc<dyn PostalCodeLookup>> {
        let directory = match &self.postal_codes_path {
            Some(path) => PostalCodeDirectory::load(path)?,
            None => {
                warn!("COSTNAV_POSTAL_CODES not set; radius filtering will be skipped");
                PostalCodeDirectory::new()
            }
        };
        Ok(Arc::new(directory))
    }
}

/// Builds the completion client from the environment, if one is configured.
///
/// A missing API key is the normal "no model" setup and yields `None`. Other
/// configuration errors are logged and also yield `None`.
pub fn completion_client_from_env() -> Option<Arc<dyn CompletionClient>> {
    match OpenAiClientBuilder::new().build() {
        Ok(client) => {
            info!(model = client.model(), "completion client configured");
            let client: Arc<dyn CompletionClient> = Arc::new(client);
            Some(client)
        }
        Err(LlmError::MissingApiKey) => {
            info!("OPENAI_API_KEY not set; only template questions will be answered");
            None
        }
        Err(error) => {
            warn!(%error, "completion client misconfigured; continuing without it");
            None
        }
    }
}

/// Gets the cross-platform database path.
///
/// Returns the path as `{data_dir}/costnav/costnav.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
pub fn default_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("costnav").join("costnav.db"))
}

/// Ensures the parent directory of the database file exists.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn clear_env() {
        unsafe {
            std::env::remove_var("COSTNAV_DB_PATH");
            std::env::remove_var("COSTNAV_POSTAL_CODES");
            std::env::remove_var("OPENAI_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn database_path_comes_from_environment() {
        clear_env();
        unsafe {
            std::env::set_var("COSTNAV_DB_PATH", "/tmp/costnav-test.db");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/costnav-test.db"));
        assert_eq!(config.postal_codes_path, None);

        clear_env();
    }

    #[test]
    #[serial]
    fn blank_postal_code_path_is_ignored() {
        clear_env();
        unsafe {
            std::env::set_var("COSTNAV_DB_PATH", "/tmp/costnav-test.db");
            std::env::set_var("COSTNAV_POSTAL_CODES", "  ");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.postal_codes_path, None);

        clear_env();
    }

    #[test]
    fn default_path_ends_with_app_directory() {
        if let Ok(path) = default_database_path() {
            assert!(path.ends_with("costnav/costnav.db"));
        }
    }

    #[test]
    fn missing_postal_code_file_is_an_error() {
        let config = Config {
            database_path: PathBuf::from("unused.db"),
            postal_codes_path: Some(PathBuf::from("/no/such/US.txt")),
        };
        assert!(config.postal_codes().is_err());
    }

    #[test]
    fn unconfigured_postal_codes_resolve_nothing() {
        let config = Config {
            database_path: PathBuf::from("unused.db"),
            postal_codes_path: None,
        };
        let lookup = config.postal_codes().unwrap();
        assert!(lookup.resolve("10001").is_none());
    }

    #[test]
    #[serial]
    fn completion_client_absent_without_api_key() {
        clear_env();
        assert!(completion_client_from_env().is_none());
    }

    #[test]
    fn ensure_database_directory_creates_parents() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("deeper").join("costnav.db");

        ensure_database_directory(&db_path).unwrap();
        assert!(db_path.parent().unwrap().is_dir());
    }
}
