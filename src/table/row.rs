use super::{DATE_OFFSET, DATE_SIZE, HOURS_OFFSET, HOURS_SIZE, ROW_SIZE, TASK_OFFSET, TASK_SIZE};

/// A single fixed-schema record: a task name, an hours value, and the
/// date the entry was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub task: String,
    pub hours: f32,
    pub date: String,
}

impl Row {
    pub fn new(task: impl Into<String>, hours: f32, date: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            hours,
            date: date.into(),
        }
    }

    /// Serialize this row at a fixed offset into a page buffer.
    ///
    /// Text fields are NUL-padded to their field width; text longer than
    /// the width is truncated at the width and never spills into the
    /// neighbouring field. Rejecting oversized input is the command
    /// layer's job.
    pub fn serialize(&self, buffer: &mut [u8], byte_offset: usize) {
        let dst = &mut buffer[byte_offset..byte_offset + ROW_SIZE];

        write_text(&mut dst[TASK_OFFSET..TASK_OFFSET + TASK_SIZE], &self.task);
        dst[HOURS_OFFSET..HOURS_OFFSET + HOURS_SIZE].copy_from_slice(&self.hours.to_le_bytes());
        write_text(&mut dst[DATE_OFFSET..DATE_OFFSET + DATE_SIZE], &self.date);
    }

    /// Reconstruct a row from its fixed offset in a page buffer.
    ///
    /// No validation happens at this layer: text is read up to the first
    /// NUL and decoded lossily, so garbage bytes produce garbage fields,
    /// not an error.
    pub fn deserialize(buffer: &[u8], byte_offset: usize) -> Self {
        let src = &buffer[byte_offset..byte_offset + ROW_SIZE];

        let task = read_text(&src[TASK_OFFSET..TASK_OFFSET + TASK_SIZE]);
        let mut hours_bytes = [0u8; HOURS_SIZE];
        hours_bytes.copy_from_slice(&src[HOURS_OFFSET..HOURS_OFFSET + HOURS_SIZE]);
        let hours = f32::from_le_bytes(hours_bytes);
        let date = read_text(&src[DATE_OFFSET..DATE_OFFSET + DATE_SIZE]);

        Self { task, hours, date }
    }
}

/// Bounded copy into a fixed-width text field: truncate at the field
/// width, NUL-pad the remainder
fn write_text(dst: &mut [u8], text: &str) {
    dst.fill(0);
    let bytes = text.as_bytes();
    let len = bytes.len().min(dst.len());
    dst[..len].copy_from_slice(&bytes[..len]);
}

/// Read a fixed-width text field up to its first NUL terminator
fn read_text(src: &[u8]) -> String {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..end]).into_owned()
}
