use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table is full")]
    Full,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type TableResult<T> = Result<T, TableError>;
