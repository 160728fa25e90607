use std::io;
use thiserror::Error;

use super::PageId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Page {requested} is out of bounds (max {max})")]
    PageOutOfBounds { requested: PageId, max: usize },

    #[error("Tried to flush page {0}, which was never loaded")]
    FlushUnloaded(PageId),
}

pub type StorageResult<T> = Result<T, StorageError>;
