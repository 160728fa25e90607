pub mod command;
pub mod database;
pub mod repl;
pub mod storage;
pub mod table;

pub use command::{PrepareError, Statement, prepare};
pub use database::Database;
pub use storage::{PAGE_SIZE, PageId, Pager, StorageError, StorageResult, TABLE_MAX_PAGES};
pub use table::{
    ROW_SIZE, ROWS_PER_PAGE, Row, Rows, TABLE_MAX_ROWS, Table, TableError, TableResult, row_slot,
};
