mod error;
mod pager;

pub use error::{StorageError, StorageResult};
pub use pager::Pager;

/// Page size in bytes. Matches the virtual-memory page size on most systems,
/// so the OS moves pages in and out of memory as a whole.
pub const PAGE_SIZE: usize = 4096;

/// Hard upper bound on the number of pages a single database file may span.
/// Arbitrary limit while the pager uses a flat slot array.
pub const TABLE_MAX_PAGES: usize = 100;

/// Page ID type
pub type PageId = usize;
