//! Tabula database error types

use tabula_core::SheetError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database task failed: {0}")]
    Task(String),

    #[error("Schema error: {0}")]
    SchemaError(String),
}

impl From<DbError> for SheetError {
    fn from(e: DbError) -> Self {
        SheetError::Storage(e.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
