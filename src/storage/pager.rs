use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::error::{StorageError, StorageResult};
use super::{PAGE_SIZE, PageId, TABLE_MAX_PAGES};

/// Page cache between the in-memory table and the backing file.
///
/// Pages are loaded lazily on first access and stay cached for the
/// process lifetime; there is no eviction. A slot transitions once from
/// empty to populated and is only reset at teardown. Writes reach the
/// file exclusively through [`Pager::flush`].
pub struct Pager {
    file: File,
    /// File length in bytes, probed once at open
    file_length: u64,
    pages: Vec<Option<Box<[u8]>>>,
}

impl Pager {
    /// Open the backing file (creating it if absent) with all page slots empty
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let file_length = file.seek(SeekFrom::End(0))?;

        let mut pages = Vec::with_capacity(TABLE_MAX_PAGES);
        pages.resize_with(TABLE_MAX_PAGES, || None);

        Ok(Self {
            file,
            file_length,
            pages,
        })
    }

    /// File length in bytes as probed at open time
    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    /// Get the in-memory buffer for a page, loading it from the file on
    /// first access.
    ///
    /// Pages within the file's current span are read from disk; a short
    /// read on the file's final partial page leaves the tail zeroed.
    /// Pages beyond the span are handed out as fresh zeroed buffers for
    /// future writes.
    pub fn page(&mut self, page_id: PageId) -> StorageResult<&mut [u8]> {
        if page_id >= TABLE_MAX_PAGES {
            return Err(StorageError::PageOutOfBounds {
                requested: page_id,
                max: TABLE_MAX_PAGES,
            });
        }

        if self.pages[page_id].is_none() {
            // Cache miss: allocate and, if the file already spans this
            // page, fill it from disk
            let mut buffer = vec![0u8; PAGE_SIZE].into_boxed_slice();

            let spanned_pages = self.file_length.div_ceil(PAGE_SIZE as u64) as usize;
            if page_id < spanned_pages {
                self.file
                    .seek(SeekFrom::Start((page_id * PAGE_SIZE) as u64))?;
                // A short read is expected for the trailing partial page;
                // the rest of the buffer stays zeroed
                let _bytes_read = self.file.read(&mut buffer)?;
            }

            self.pages[page_id] = Some(buffer);
        }

        // Slot was populated above
        Ok(self.pages[page_id].as_deref_mut().unwrap())
    }

    /// Write the first `byte_count` bytes of a page back to the file.
    ///
    /// `byte_count` is a full page for fully-occupied pages, or
    /// `rows * row size` for the trailing partially-filled page.
    /// Flushing a page that was never loaded is a logic error.
    pub fn flush(&mut self, page_id: PageId, byte_count: usize) -> StorageResult<()> {
        if page_id >= TABLE_MAX_PAGES {
            return Err(StorageError::PageOutOfBounds {
                requested: page_id,
                max: TABLE_MAX_PAGES,
            });
        }

        let page = self.pages[page_id]
            .as_deref()
            .ok_or(StorageError::FlushUnloaded(page_id))?;

        self.file
            .seek(SeekFrom::Start((page_id * PAGE_SIZE) as u64))?;
        self.file.write_all(&page[..byte_count])?;

        Ok(())
    }

    /// Check whether a page slot is populated
    pub fn is_loaded(&self, page_id: PageId) -> bool {
        page_id < TABLE_MAX_PAGES && self.pages[page_id].is_some()
    }

    /// Free a page slot. Called at teardown after the page has been
    /// flushed (or was never written).
    pub fn release(&mut self, page_id: PageId) {
        if page_id < TABLE_MAX_PAGES {
            self.pages[page_id] = None;
        }
    }

    /// Number of populated page slots
    pub fn loaded_page_count(&self) -> usize {
        self.pages.iter().filter(|slot| slot.is_some()).count()
    }
}
