use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};

use log::debug;

use crate::common::config::PAGE_SIZE;
use crate::common::config::PageId;

/// The block-layer interface the buffer pool consumes: page-sized random
/// access against a named file, plus the ability to grow it.
///
/// Kept deliberately narrow — no caching, no write coalescing, no background
/// scheduling thread. All of that belongs to the buffer pool sitting on top
/// of this trait, not here.
pub trait PageFile {
    /// Current length of the backing file, in whole pages.
    fn file_length(&self) -> io::Result<u64>;

    /// Reads exactly `PAGE_SIZE` bytes at offset `page_id * PAGE_SIZE`.
    fn read_block(&mut self, page_id: PageId, buf: &mut [u8; PAGE_SIZE]) -> io::Result<()>;

    /// Writes exactly `PAGE_SIZE` bytes at offset `page_id * PAGE_SIZE`.
    /// `page_id` must already be within the file's current length.
    fn write_block(&mut self, page_id: PageId, buf: &[u8; PAGE_SIZE]) -> io::Result<()>;

    /// Grows the file, zero-filling, so its length is at least `required_pages`.
    fn ensure_capacity(&mut self, required_pages: u64) -> io::Result<()>;

    /// Closes the underlying file handle.
    fn close(self) -> io::Result<()>;
}

/// A [`PageFile`] backed by a single `std::fs::File`, opened once at
/// construction and held for the lifetime of the buffer pool.
///
/// The file must already exist — creating it is the caller's responsibility,
/// matching the original block layer's `openPageFile`/`createPageFile` split.
pub struct DiskManager {
    file: File,
    file_name: String,
}

impl DiskManager {
    /// Opens an existing page file.
    pub fn open(file_name: &str) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(file_name)?;
        debug!("opened page file {file_name}");
        Ok(Self {
            file,
            file_name: file_name.to_string(),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl PageFile for DiskManager {
    fn file_length(&self) -> io::Result<u64> {
        let len = self.file.metadata()?.len();
        Ok(len / PAGE_SIZE as u64)
    }

    fn read_block(&mut self, page_id: PageId, buf: &mut [u8; PAGE_SIZE]) -> io::Result<()> {
        let total_pages = self.file_length()?;
        if page_id as u64 >= total_pages {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("page {page_id} is out of range ({total_pages} pages on disk)"),
            ));
        }
        let offset = page_id as u64 * PAGE_SIZE as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        let read = self.file.read(buf)?;
        if read < PAGE_SIZE {
            debug!("short read for page {page_id}, zero-filling remainder");
            buf[read..].fill(0);
        }
        Ok(())
    }

    fn write_block(&mut self, page_id: PageId, buf: &[u8; PAGE_SIZE]) -> io::Result<()> {
        let total_pages = self.file_length()?;
        if page_id as u64 >= total_pages {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("page {page_id} is out of range ({total_pages} pages on disk)"),
            ));
        }
        let offset = page_id as u64 * PAGE_SIZE as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(buf)?;
        self.file.flush()?;
        debug!("wrote page {page_id}");
        Ok(())
    }

    fn ensure_capacity(&mut self, required_pages: u64) -> io::Result<()> {
        let total_pages = self.file_length()?;
        if required_pages <= total_pages {
            return Ok(());
        }
        let additional = required_pages - total_pages;
        debug!("growing page file {} by {additional} page(s)", self.file_name);
        let zero_page = [0u8; PAGE_SIZE];
        self.file.seek(SeekFrom::End(0))?;
        for _ in 0..additional {
            self.file.write_all(&zero_page)?;
        }
        self.file.flush()?;
        Ok(())
    }

    fn close(self) -> io::Result<()> {
        // `File` closes on drop; nothing else to release in this thin wrapper.
        Ok(())
    }
}
