// ABOUTME: Error type shared by introspection, CRUD execution and the session layer.
// ABOUTME: Read failures surface as Query, write failures as Persistence.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Failed to persist changes: {0}")]
    Persistence(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Invalid value '{value}' for column '{column}': {reason}")]
    InvalidValue {
        column: String,
        value: String,
        reason: String,
    },

    #[error("No table loaded")]
    NoTableLoaded,

    #[error("Select a row first")]
    NoRowSelected,

    #[error("Row index {index} is out of range ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("No row with id {0}")]
    RowNotFound(i64),

    #[error("Read-only session: modifications are not allowed")]
    ReadOnly,

    #[error("No active session")]
    NoSession,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn query(err: impl std::fmt::Display) -> Self {
        Error::Query(err.to_string())
    }

    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Error::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
