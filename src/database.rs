use std::path::Path;

use chrono::Local;

use crate::table::{Row, Table, TableResult};

/// asctime-like stamp, e.g. `Thu Aug 28 10:30:00 2026`
const DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// The open database: owns the [`Table`] and implements the command
/// surface on top of its row-insertion and row-iteration contracts.
pub struct Database {
    table: Table,
}

impl Database {
    /// Open or create the database file
    pub fn open<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let table = Table::open(path)?;
        Ok(Self { table })
    }

    pub fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    /// Insert a task entry, stamping the date with the current local time
    pub fn insert(&mut self, task: &str, hours: f32) -> TableResult<()> {
        let date = Local::now().format(DATE_FORMAT).to_string();
        let row = Row::new(task, hours, date);
        self.table.insert(&row)
    }

    /// All rows in insertion order
    pub fn rows(&mut self) -> TableResult<Vec<Row>> {
        self.table.rows().collect()
    }

    /// Sum of hours over rows whose task matches exactly
    pub fn total(&mut self, task: &str) -> TableResult<f32> {
        let mut total = 0.0;
        for row in self.table.rows() {
            let row = row?;
            if row.task == task {
                total += row.hours;
            }
        }
        Ok(total)
    }

    /// Average hours over rows matching `task`, or over all rows when
    /// `task` is `None`. Zero matching rows yields NaN; callers get the
    /// raw division, not a special case.
    pub fn average(&mut self, task: Option<&str>) -> TableResult<f32> {
        let mut total = 0.0;
        let mut matched = 0u32;
        for row in self.table.rows() {
            let row = row?;
            if task.is_none_or(|t| row.task == t) {
                total += row.hours;
                matched += 1;
            }
        }
        Ok(total / matched as f32)
    }

    /// Flush committed pages and close the backing file
    pub fn close(self) -> TableResult<()> {
        self.table.close()
    }
}
