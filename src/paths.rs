//! Path resolution for verdant data files.
//!
//! Provides centralized path resolution for everything the engine persists:
//!
//! - [`get_data_dir`] - `~/.verdant/` (base directory for all verdant data)
//! - [`get_history_db_path`] - `~/.verdant/history.redb` (metadata slot store)
//! - [`get_images_db_path`] - `~/.verdant/images.redb` (image payload store)
//! - [`get_config_path`] - `~/.verdant/config.toml` (engine settings)

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::constants::DATA_DIR_NAME;

/// Get the verdant base directory.
///
/// Resolution order:
/// 1. `VERDANT_HOME` environment variable (if set and non-empty)
/// 2. `~/.verdant/` (default)
///
/// CI systems and tests can relocate all data by setting `VERDANT_HOME`.
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("VERDANT_HOME")
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }

    let home = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Get the history slot database path: `~/.verdant/history.redb`
pub fn get_history_db_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("history.redb"))
}

/// Get the image payload database path: `~/.verdant/images.redb`
pub fn get_images_db_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("images.redb"))
}

/// Get the engine config path: `~/.verdant/config.toml`
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: tests for the VERDANT_HOME override are not included because
    // Rust 2024 requires unsafe blocks for std::env::set_var/remove_var,
    // and this crate uses #![deny(unsafe_code)]. The override is covered
    // by integration tests that set the variable before spawning.

    #[test]
    fn test_derived_paths_structure() {
        if std::env::var("VERDANT_HOME").is_err() {
            let home = dirs::home_dir().expect("home directory should exist");
            let data_dir = get_data_dir().unwrap();
            assert_eq!(data_dir, home.join(DATA_DIR_NAME));

            assert!(get_history_db_path().unwrap().starts_with(&data_dir));
            assert!(get_images_db_path().unwrap().starts_with(&data_dir));
            assert!(get_config_path().unwrap().starts_with(&data_dir));
        }
    }

    #[test]
    fn test_path_extensions() {
        let history = get_history_db_path().unwrap();
        assert_eq!(history.extension().and_then(|e| e.to_str()), Some("redb"));

        let images = get_images_db_path().unwrap();
        assert_eq!(images.extension().and_then(|e| e.to_str()), Some("redb"));

        let config = get_config_path().unwrap();
        assert_eq!(config.extension().and_then(|e| e.to_str()), Some("toml"));
    }

    #[test]
    fn test_db_files_are_distinct() {
        assert_ne!(
            get_history_db_path().unwrap(),
            get_images_db_path().unwrap()
        );
    }
}
