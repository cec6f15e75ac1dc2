//! Error types for the record store.
//!
//! Errors are classified by how the caller should react:
//! - Storage/initialization failures are fatal to the session (reopen to retry).
//! - Validation and import failures abort the operation with no partial state change.
//! - Not-found errors surface a bad id instead of silently doing nothing.

use thiserror::Error;

/// Errors surfaced by [`crate::db::ProspectDb`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to encode or decode a JSON column: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Prospect not found: {0}")]
    ProspectNotFound(String),

    #[error("Action {action_id} not found on prospect {prospect_id}")]
    ActionNotFound {
        prospect_id: String,
        action_id: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl StoreError {
    /// True when retrying the same call cannot succeed without user input
    /// (bad id, bad payload). Storage errors may clear on reopen.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            StoreError::Validation(_)
                | StoreError::Import(_)
                | StoreError::ProspectNotFound(_)
                | StoreError::ActionNotFound { .. }
        )
    }
}
