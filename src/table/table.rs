use std::path::Path;

use super::error::{TableError, TableResult};
use super::row::Row;
use super::{ROW_SIZE, ROWS_PER_PAGE, TABLE_MAX_ROWS};
use crate::storage::{PAGE_SIZE, PageId, Pager};

/// Map a logical row index to a page index and an in-page byte offset.
/// Pure arithmetic, no I/O.
pub fn row_slot(row_index: usize) -> (PageId, usize) {
    let page_id = row_index / ROWS_PER_PAGE;
    let byte_offset = (row_index % ROWS_PER_PAGE) * ROW_SIZE;
    (page_id, byte_offset)
}

/// Append-only table over a single paged file.
///
/// Owns the [`Pager`] and tracks the count of logically valid rows,
/// derived at open time from the file length.
pub struct Table {
    pager: Pager,
    num_rows: usize,
}

impl Table {
    /// Open (or create) the database file and derive the row count from
    /// its length.
    ///
    /// Any trailing bytes shorter than one full row are excluded from
    /// the logical row count. They stay in the file but are unreachable
    /// through row addressing, and future appends overwrite them.
    pub fn open<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let pager = Pager::open(path)?;
        let num_rows = (pager.file_length() / ROW_SIZE as u64) as usize;

        Ok(Self { pager, num_rows })
    }

    /// Number of logically valid rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Append a row at the next free slot
    pub fn insert(&mut self, row: &Row) -> TableResult<()> {
        if self.num_rows >= TABLE_MAX_ROWS {
            return Err(TableError::Full);
        }

        let (page_id, byte_offset) = row_slot(self.num_rows);
        let page = self.pager.page(page_id)?;
        row.serialize(page, byte_offset);
        self.num_rows += 1;

        Ok(())
    }

    /// Read the row at a logical index
    pub fn row(&mut self, row_index: usize) -> TableResult<Row> {
        let (page_id, byte_offset) = row_slot(row_index);
        let page = self.pager.page(page_id)?;
        Ok(Row::deserialize(page, byte_offset))
    }

    /// Lazy iterator over all rows in insertion order. This is the
    /// contract the aggregation and printing glue consumes.
    pub fn rows(&mut self) -> Rows<'_> {
        Rows {
            table: self,
            next_row: 0,
        }
    }

    /// Flush committed pages and close the database.
    ///
    /// Full pages are written at page size and the trailing partial page
    /// at exactly the bytes its rows occupy; slots never touched this
    /// session are skipped. This is the only persistence point: inserts
    /// made in a session that never closes are lost.
    pub fn close(mut self) -> TableResult<()> {
        let num_full_pages = self.num_rows / ROWS_PER_PAGE;
        for page_id in 0..num_full_pages {
            if !self.pager.is_loaded(page_id) {
                continue;
            }
            self.pager.flush(page_id, PAGE_SIZE)?;
            self.pager.release(page_id);
        }

        let trailing_rows = self.num_rows % ROWS_PER_PAGE;
        if trailing_rows > 0 {
            let page_id = num_full_pages;
            if self.pager.is_loaded(page_id) {
                self.pager.flush(page_id, trailing_rows * ROW_SIZE)?;
                self.pager.release(page_id);
            }
        }

        // Remaining slots and the file handle are released when the
        // pager drops
        Ok(())
    }
}

/// Iterator over a table's rows, deserializing each on demand
pub struct Rows<'a> {
    table: &'a mut Table,
    next_row: usize,
}

impl Iterator for Rows<'_> {
    type Item = TableResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row >= self.table.num_rows {
            return None;
        }

        let row_index = self.next_row;
        self.next_row += 1;
        Some(self.table.row(row_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn test_row(task: &str, hours: f32) -> Row {
        Row::new(task, hours, "Thu Aug 28 10:30:00 2026")
    }

    #[test]
    fn test_row_slot_arithmetic() {
        assert_eq!(row_slot(0), (0, 0));
        assert_eq!(row_slot(1), (0, ROW_SIZE));
        assert_eq!(row_slot(ROWS_PER_PAGE - 1), (0, (ROWS_PER_PAGE - 1) * ROW_SIZE));
        assert_eq!(row_slot(ROWS_PER_PAGE), (1, 0));
        assert_eq!(row_slot(3 * ROWS_PER_PAGE + 2), (3, 2 * ROW_SIZE));
    }

    #[test]
    fn test_row_slot_injective_and_monotone() {
        let mut prev_page = 0;
        let mut seen = std::collections::HashSet::new();

        for row_index in 0..(3 * ROWS_PER_PAGE) {
            let (page_id, byte_offset) = row_slot(row_index);

            // No two indices share a byte range
            assert!(seen.insert((page_id, byte_offset)));
            // Offsets never overlap the next slot
            assert!(byte_offset + ROW_SIZE <= PAGE_SIZE);
            // Page index never decreases
            assert!(page_id >= prev_page);
            prev_page = page_id;
        }
    }

    #[test]
    fn test_open_empty_file() {
        let temp_dir = setup_test_dir();
        let table = Table::open(temp_dir.path().join("test.db")).unwrap();
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_insert_and_read_back() {
        let temp_dir = setup_test_dir();
        let mut table = Table::open(temp_dir.path().join("test.db")).unwrap();

        let row = test_row("writeup", 2.5);
        table.insert(&row).unwrap();
        assert_eq!(table.num_rows(), 1);

        let read = table.row(0).unwrap();
        assert_eq!(read, row);
    }

    #[test]
    fn test_scan_is_empty_on_fresh_table() {
        let temp_dir = setup_test_dir();
        let mut table = Table::open(temp_dir.path().join("test.db")).unwrap();

        assert_eq!(table.rows().count(), 0);
    }

    #[test]
    fn test_scan_preserves_insertion_order() {
        let temp_dir = setup_test_dir();
        let mut table = Table::open(temp_dir.path().join("test.db")).unwrap();

        for i in 0..5 {
            table.insert(&test_row(&format!("task{i}"), i as f32)).unwrap();
        }

        let rows: Vec<Row> = table.rows().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 5);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.task, format!("task{i}"));
            assert_eq!(row.hours, i as f32);
        }
    }

    #[test]
    fn test_scan_is_restartable() {
        let temp_dir = setup_test_dir();
        let mut table = Table::open(temp_dir.path().join("test.db")).unwrap();

        table.insert(&test_row("a", 1.0)).unwrap();
        table.insert(&test_row("b", 2.0)).unwrap();

        assert_eq!(table.rows().count(), 2);
        assert_eq!(table.rows().count(), 2);
    }

    #[test]
    fn test_insert_spans_pages() {
        let temp_dir = setup_test_dir();
        let mut table = Table::open(temp_dir.path().join("test.db")).unwrap();

        for i in 0..(ROWS_PER_PAGE + 3) {
            table.insert(&test_row("spill", i as f32)).unwrap();
        }

        // Rows on both sides of the page boundary read back intact
        let first_on_second_page = table.row(ROWS_PER_PAGE).unwrap();
        assert_eq!(first_on_second_page.hours, ROWS_PER_PAGE as f32);
        let last_on_first_page = table.row(ROWS_PER_PAGE - 1).unwrap();
        assert_eq!(last_on_first_page.hours, (ROWS_PER_PAGE - 1) as f32);
    }

    #[test]
    fn test_capacity_boundary() {
        let temp_dir = setup_test_dir();
        let mut table = Table::open(temp_dir.path().join("test.db")).unwrap();

        let row = test_row("fill", 1.0);
        for _ in 0..TABLE_MAX_ROWS {
            table.insert(&row).unwrap();
        }
        assert_eq!(table.num_rows(), TABLE_MAX_ROWS);

        // The next insert is rejected and the row count is unchanged
        let result = table.insert(&row);
        assert!(matches!(result, Err(TableError::Full)));
        assert_eq!(table.num_rows(), TABLE_MAX_ROWS);
    }

    #[test]
    fn test_persistence_round_trip() {
        let temp_dir = setup_test_dir();
        let db_file = temp_dir.path().join("test.db");

        {
            let mut table = Table::open(&db_file).unwrap();
            table.insert(&test_row("writeup", 2.5)).unwrap();
            table.insert(&test_row("review", 3.0)).unwrap();
            table.insert(&test_row("standup", 0.5)).unwrap();
            table.close().unwrap();
        }

        let mut table = Table::open(&db_file).unwrap();
        assert_eq!(table.num_rows(), 3);

        let rows: Vec<Row> = table.rows().map(|r| r.unwrap()).collect();
        assert_eq!(rows[0], test_row("writeup", 2.5));
        assert_eq!(rows[1], test_row("review", 3.0));
        assert_eq!(rows[2], test_row("standup", 0.5));
    }

    #[test]
    fn test_partial_page_close_writes_exact_length() {
        let temp_dir = setup_test_dir();
        let db_file = temp_dir.path().join("test.db");

        let trailing_rows = 7;
        {
            let mut table = Table::open(&db_file).unwrap();
            for i in 0..trailing_rows {
                table.insert(&test_row("partial", i as f32)).unwrap();
            }
            table.close().unwrap();
        }

        // The trailing page is written at its row bytes, not a full page
        let file_length = std::fs::metadata(&db_file).unwrap().len();
        assert_eq!(file_length, (trailing_rows * ROW_SIZE) as u64);
    }

    #[test]
    fn test_full_plus_partial_page_close() {
        let temp_dir = setup_test_dir();
        let db_file = temp_dir.path().join("test.db");

        let total_rows = ROWS_PER_PAGE + 5;
        {
            let mut table = Table::open(&db_file).unwrap();
            for i in 0..total_rows {
                table.insert(&test_row("mix", i as f32)).unwrap();
            }
            table.close().unwrap();
        }

        let file_length = std::fs::metadata(&db_file).unwrap().len();
        assert_eq!(file_length, (PAGE_SIZE + 5 * ROW_SIZE) as u64);

        let mut table = Table::open(&db_file).unwrap();
        assert_eq!(table.num_rows(), total_rows);
        let last = table.row(total_rows - 1).unwrap();
        assert_eq!(last.hours, (total_rows - 1) as f32);
    }

    #[test]
    fn test_close_skips_untouched_pages() {
        let temp_dir = setup_test_dir();
        let db_file = temp_dir.path().join("test.db");

        // Fill one full page plus a partial one, close, then reopen and
        // close again without touching any page: nothing to flush, file
        // length unchanged
        {
            let mut table = Table::open(&db_file).unwrap();
            for i in 0..(ROWS_PER_PAGE + 2) {
                table.insert(&test_row("idle", i as f32)).unwrap();
            }
            table.close().unwrap();
        }
        let length_before = std::fs::metadata(&db_file).unwrap().len();

        let table = Table::open(&db_file).unwrap();
        table.close().unwrap();

        let length_after = std::fs::metadata(&db_file).unwrap().len();
        assert_eq!(length_before, length_after);
    }

    #[test]
    fn test_trailing_partial_row_is_ignored_at_open() {
        let temp_dir = setup_test_dir();
        let db_file = temp_dir.path().join("test.db");

        {
            let mut table = Table::open(&db_file).unwrap();
            table.insert(&test_row("whole", 1.0)).unwrap();
            table.close().unwrap();
        }

        // Append half a row's worth of junk
        {
            use std::io::Write;
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&db_file)
                .unwrap();
            file.write_all(&vec![0xabu8; ROW_SIZE / 2]).unwrap();
        }

        let mut table = Table::open(&db_file).unwrap();
        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.row(0).unwrap().task, "whole");
    }

    #[test]
    fn test_storage_error_propagates() {
        let temp_dir = setup_test_dir();
        let mut table = Table::open(temp_dir.path().join("test.db")).unwrap();

        let result = table.row(TABLE_MAX_ROWS + ROWS_PER_PAGE);
        assert!(matches!(
            result,
            Err(TableError::Storage(StorageError::PageOutOfBounds { .. }))
        ));
    }
}
