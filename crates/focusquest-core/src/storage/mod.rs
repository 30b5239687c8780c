mod config;
pub mod database;
pub mod records;

pub use config::{ChatConfig, Config, TimerConfig};
pub use database::Database;
pub use records::{Preferences, RecordKey, Theme};

use std::path::PathBuf;

use crate::error::DatabaseError;

/// Returns the directory holding `focusquest.db` and `config.toml`.
///
/// `FOCUSQUEST_DATA_DIR` wins when set. Otherwise `~/.config/focusquest`,
/// or `~/.config/focusquest-dev` when `FOCUSQUEST_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, DatabaseError> {
    let dir = match std::env::var_os("FOCUSQUEST_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("FOCUSQUEST_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("focusquest-dev")
            } else {
                base_dir.join("focusquest")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(DatabaseError::DataDir)?;
    Ok(dir)
}
