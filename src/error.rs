//! Error types for Priorit
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// All error types that can occur in Priorit
#[derive(Debug, Error)]
pub enum PrioritError {
    /// Backing directory cannot be created or is not a directory
    #[error("Storage unavailable at {path}: {reason}")]
    StorageUnavailable { path: PathBuf, reason: String },

    /// One or more existing records could not be read or decoded
    #[error("Failed to load {failures} record(s), first at {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        failures: usize,
        #[source]
        source: Box<PrioritError>,
    },

    /// A record could not be written
    #[error("Failed to persist item {id}: {source}")]
    PersistFailed {
        id: String,
        #[source]
        source: Box<PrioritError>,
    },

    /// An item with this id is already stored
    #[error("Duplicate item id: {0}")]
    DuplicateId(String),

    /// Id is empty or unusable as a file name
    #[error("Invalid item id: {0:?}")]
    InvalidId(String),

    /// Record file name does not match the id it holds
    #[error("Record {path} holds item {id:?}")]
    MisnamedRecord { path: PathBuf, id: String },

    /// Search pattern does not compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Priority text does not name one of the five levels
    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    /// Record encoding/decoding error
    #[error("Codec error: {0}")]
    Codec(String),

    /// Store lock was poisoned by a panicking holder
    #[error("Lock error: {0}")]
    Lock(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PrioritError {
    fn from(err: serde_json::Error) -> Self {
        PrioritError::Codec(err.to_string())
    }
}

impl From<serde_yaml::Error> for PrioritError {
    fn from(err: serde_yaml::Error) -> Self {
        PrioritError::Codec(err.to_string())
    }
}

/// Result type alias for Priorit operations
pub type Result<T> = std::result::Result<T, PrioritError>;
