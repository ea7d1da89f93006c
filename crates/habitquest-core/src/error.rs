//! Core error types for habitquest-core.
//!
//! The streak engine itself is total; everything that can fail lives at
//! the store, configuration and suggestion seams and reports through
//! [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitquest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The habit id does not resolve for the acting user.
    #[error("Habit not found: {habit_id}")]
    NotFound { habit_id: String },

    /// No active session. Raised before any engine operation runs.
    #[error("Not signed in. Run `habitquest auth login <user>` first.")]
    Unauthenticated,

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Habit suggestion errors
    #[error("Suggestion error: {0}")]
    Suggestion(#[from] SuggestionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn not_found(habit_id: impl Into<String>) -> Self {
        CoreError::NotFound {
            habit_id: habit_id.into(),
        }
    }

    /// Whether the failure is worth showing as a generic "try again" message.
    ///
    /// Store and network failures are transient; lookups and validation are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CoreError::Database(_) | CoreError::Io(_) | CoreError::Suggestion(_)
        )
    }
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

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be decoded
    #[error("Corrupt row in '{table}': {message}")]
    CorruptRow { table: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Empty required field
    #[error("'{0}' must not be empty")]
    Empty(String),

    /// Date key not in `YYYY-MM-DD` form
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Habit suggestion errors.
#[derive(Error, Debug)]
pub enum SuggestionError {
    /// The model answered but produced nothing usable
    #[error("The AI wizard is resting. Please try again later.")]
    Empty,

    /// No API key in the environment or keyring
    #[error("No API key configured. Set GEMINI_API_KEY or run `habitquest auth set-key`.")]
    MissingApiKey,

    /// Transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Suggestion API error (HTTP {status}): {body}")]
    Http { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Malformed suggestion response: {0}")]
    Malformed(String),

    /// Keyring access failed
    #[error("Credential store error: {0}")]
    Keyring(String),
}

impl SuggestionError {
    /// The message shown to users in place of transport details.
    pub fn user_message(&self) -> &'static str {
        match self {
            SuggestionError::Empty => "The AI wizard is resting. Please try again later.",
            SuggestionError::MissingApiKey => {
                "No API key configured. Set GEMINI_API_KEY or run `habitquest auth set-key`."
            }
            _ => "Failed to get suggestions. The AI may be experiencing issues. Please try again.",
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
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
