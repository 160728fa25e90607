mod error;
mod row;
mod table;

pub use error::{TableError, TableResult};
pub use row::Row;
pub use table::{Rows, Table, row_slot};

use crate::storage::{PAGE_SIZE, TABLE_MAX_PAGES};

/// Maximum width of the task field in bytes
pub const TASK_SIZE: usize = 32;
/// Width of the hours field (little-endian f32)
pub const HOURS_SIZE: usize = size_of::<f32>();
/// Maximum width of the date field in bytes
pub const DATE_SIZE: usize = 32;

// Fields are concatenated in declaration order with no padding; these
// offsets are the on-disk contract.
pub const TASK_OFFSET: usize = 0;
pub const HOURS_OFFSET: usize = TASK_OFFSET + TASK_SIZE;
pub const DATE_OFFSET: usize = HOURS_OFFSET + HOURS_SIZE;

/// Serialized row size (68 bytes)
pub const ROW_SIZE: usize = TASK_SIZE + HOURS_SIZE + DATE_SIZE;

/// Whole rows per page; the remaining tail bytes of a page are never used
pub const ROWS_PER_PAGE: usize = PAGE_SIZE / ROW_SIZE;

/// Maximum number of rows a table can hold
pub const TABLE_MAX_ROWS: usize = ROWS_PER_PAGE * TABLE_MAX_PAGES;
