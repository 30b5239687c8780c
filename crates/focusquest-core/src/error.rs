//! Core error types for focusquest-core.
//!
//! Store operations on unknown ids are not errors; they are silent no-ops.
//! Errors here cover the places where something outside the in-memory model
//! can fail: the SQLite file, the config file, user input and the chat service.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusquest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Chat service errors
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Could not encode a record before writing it
    #[error("Failed to encode record '{key}': {message}")]
    EncodeFailed { key: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Time block whose end is not after its start
    #[error("Invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange {
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    },

    /// Required text was empty or whitespace
    #[error("'{field}' must not be empty")]
    Empty { field: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Trimmed `value`, or [`ValidationError::Empty`] if nothing is left.
    pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: field.to_string(),
            });
        }
        Ok(trimmed)
    }
}

/// Chat service errors.
///
/// None of these touch stored state; the caller shows a generic notice.
#[derive(Error, Debug)]
pub enum ChatError {
    /// No API key in the environment or keyring
    #[error("Chat API key is not configured (set ${env_var} or run `chat set-key`)")]
    MissingApiKey { env_var: String },

    /// Prompt was empty
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// Transport failure
    #[error("Chat request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Chat service returned HTTP {status}")]
    Status { status: u16 },

    /// Response body had no usable candidate
    #[error("Invalid response from chat service")]
    MalformedReply,

    /// Endpoint could not be turned into a request URL
    #[error("Invalid chat endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// OS keyring failure
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_sqlite_error_maps_to_locked() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        );
        assert!(matches!(DatabaseError::from(err), DatabaseError::Locked));
    }

    #[test]
    fn missing_key_message_names_env_var() {
        let err = ChatError::MissingApiKey {
            env_var: "GEMINI_API_KEY".into(),
        };
        assert!(err.to_string().contains("$GEMINI_API_KEY"));
    }

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(ValidationError::require_text("title", "  Read  ").unwrap(), "Read");
        let err = ValidationError::require_text("title", " \t ").unwrap_err();
        assert!(matches!(&err, ValidationError::Empty { field } if field == "title"));
        assert_eq!(err.to_string(), "'title' must not be empty");
    }
}
