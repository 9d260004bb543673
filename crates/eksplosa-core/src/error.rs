//! Core error types for eksplosa-core.
//!
//! This module defines the error hierarchy using thiserror. The quiz and
//! browsing flows surface `MissingParameter`, `NotFound`, `NetworkFailure`
//! and `InvalidState` to the caller; storage and configuration keep their
//! own enums and convert into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for eksplosa-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A required identifier was absent from the request context.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// A referenced province, language, level or question set does not exist
    /// in the fetched data.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Transport or HTTP failure reported by the data gateway.
    #[error("{}", network_message(.endpoint, .status, .message))]
    NetworkFailure {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    /// The payload of an endpoint could not be decoded.
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// The operation is not valid in the current engine state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn network_message(endpoint: &str, status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Error fetching {endpoint}: HTTP error! status: {code}"),
        None => format!("Error fetching {endpoint}: {message}"),
    }
}

impl CoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// True for failures a user can retry by re-selecting the action.
    pub fn is_network(&self) -> bool {
        matches!(self, CoreError::NetworkFailure { .. })
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
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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
