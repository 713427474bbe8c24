//! Configuration for the verdant engine.
//!
//! Settings are loaded from a TOML file (by default
//! `~/.verdant/config.toml`) and cover where data lives and whether the
//! engine runs against persistent or in-memory storage. Every field has a
//! default, so a missing file is not an error.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/verdant"
//! ephemeral = false
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Root engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Storage location settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Override for the data directory. Defaults to `VERDANT_HOME` or
    /// `~/.verdant/` when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Run entirely in memory, with nothing persisted to disk.
    #[serde(default)]
    pub ephemeral: bool,
}

impl Config {
    /// Loads configuration from the given TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Loads configuration from the default location, falling back to
    /// defaults when the file does not exist.
    ///
    /// A file that exists but fails to parse is reported via `tracing` and
    /// ignored rather than aborting engine startup.
    pub fn load_or_default() -> Self {
        let Ok(path) = paths::get_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Ignoring unreadable config");
                Self::default()
            },
        }
    }

    /// Resolves the effective data directory for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and no
    /// override is configured.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::get_data_dir(),
        }
    }

    /// Path of the history slot database under the effective data dir.
    pub fn history_db_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("history.redb"))
    }

    /// Path of the image payload database under the effective data dir.
    pub fn images_db_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("images.redb"))
    }
}
