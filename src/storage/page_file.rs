//! The storage adapter: a flat file of fixed-size pages.
//!
//! `PageFile` is the buffer pool's only collaborator with the outside world.
//! It knows nothing about pinning, dirtiness or replacement; it just reads
//! and writes `PAGE_SIZE`-byte blocks by index and can grow the file with
//! zero-filled pages. The buffer pool holds one `PageFile` open for its
//! entire lifetime rather than reopening it around every access; this is the
//! internal optimization the core contract explicitly allows.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::common::{PageId, PAGE_SIZE};
use crate::error::{BufferPoolError, Result};

/// A single flat file of `PAGE_SIZE`-byte pages, indexed from 0, with no header.
pub struct PageFile {
    file: File,
    path: PathBuf,
}

impl PageFile {
    /// Opens `path` if it exists, otherwise creates it as a freshly
    /// zero-filled one-page file.
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = match OpenOptions::new().read(true).write(true).open(&path) {
            Ok(file) => file,
            Err(_) => {
                let mut file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&path)
                    .map_err(|_| BufferPoolError::FileNotFound(path.display().to_string()))?;
                file.write_all(&[0u8; PAGE_SIZE])?;
                file.flush()?;
                file
            }
        };

        Ok(Self { file, path })
    }

    /// The number of whole pages currently stored in the file.
    pub fn page_count(&self) -> Result<usize> {
        let len = self.file.metadata()?.len() as usize;
        Ok(len / PAGE_SIZE)
    }

    /// Appends zero-filled pages, if necessary, until the file holds at
    /// least `num_pages` pages.
    pub fn ensure_capacity(&mut self, num_pages: usize) -> Result<()> {
        let mut current = self.page_count()?;
        if current >= num_pages {
            return Ok(());
        }
        self.file.seek(SeekFrom::End(0))?;
        while current < num_pages {
            self.file.write_all(&[0u8; PAGE_SIZE])?;
            current += 1;
        }
        self.file.flush()?;
        debug!("grew {} to {} pages", self.path.display(), current);
        Ok(())
    }

    /// Reads page `page_id` into `buf`. The caller (the buffer pool) is
    /// responsible for calling [`Self::ensure_capacity`] first if the page
    /// might not exist yet; this keeps "grow to at least n pages" a
    /// separate, explicit adapter operation rather than something hidden
    /// inside every read, matching the storage-adapter contract.
    pub fn read_page(&mut self, page_id: PageId, buf: &mut [u8]) -> Result<()> {
        debug_assert_eq!(buf.len(), PAGE_SIZE);
        let page_id_usize = page_id as usize;
        if page_id < 0 || page_id_usize >= self.page_count()? {
            return Err(BufferPoolError::ReadNonExistingPage(page_id));
        }

        self.file
            .seek(SeekFrom::Start((page_id_usize * PAGE_SIZE) as u64))?;
        let read = self.file.read(buf)?;
        if read < PAGE_SIZE {
            debug!("short read at page {page_id}, zero-filling remainder");
            buf[read..].fill(0);
        }
        Ok(())
    }

    /// Writes `buf` (exactly `PAGE_SIZE` bytes) to page `page_id`. As with
    /// [`Self::read_page`], the caller must have already grown the file far
    /// enough.
    pub fn write_page(&mut self, page_id: PageId, buf: &[u8]) -> Result<()> {
        debug_assert_eq!(buf.len(), PAGE_SIZE);
        let page_id_usize = page_id as usize;
        if page_id < 0 || page_id_usize >= self.page_count()? {
            return Err(BufferPoolError::WriteFailed {
                page: page_id,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "write target page is beyond the file's current length",
                ),
            });
        }

        self.file
            .seek(SeekFrom::Start((page_id_usize * PAGE_SIZE) as u64))?;
        self.file.write_all(buf).map_err(|source| BufferPoolError::WriteFailed {
            page: page_id,
            source,
        })?;
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn create_then_open_reuses_existing_file() {
        let dir = TempDir::new("pagefile").unwrap();
        let path = dir.path().join("test.db");

        {
            let pf = PageFile::open_or_create(&path).unwrap();
            assert_eq!(pf.page_count().unwrap(), 1);
        }

        let pf = PageFile::open_or_create(&path).unwrap();
        assert_eq!(pf.page_count().unwrap(), 1);
    }

    #[test]
    fn read_write_round_trip() {
        let dir = TempDir::new("pagefile").unwrap();
        let path = dir.path().join("test.db");
        let mut pf = PageFile::open_or_create(&path).unwrap();

        let mut data = [0u8; PAGE_SIZE];
        data[..14].copy_from_slice(b"A test string.");
        pf.write_page(0, &data).unwrap();

        let mut buf = [0u8; PAGE_SIZE];
        pf.read_page(0, &mut buf).unwrap();
        assert_eq!(buf, data);
    }

    #[test]
    fn read_past_end_is_rejected() {
        let dir = TempDir::new("pagefile").unwrap();
        let path = dir.path().join("test.db");
        let mut pf = PageFile::open_or_create(&path).unwrap();

        let mut buf = [0xFFu8; PAGE_SIZE];
        let err = pf.read_page(5, &mut buf).unwrap_err();
        assert!(matches!(err, BufferPoolError::ReadNonExistingPage(5)));
    }

    #[test]
    fn ensure_capacity_then_read_past_former_end_succeeds() {
        let dir = TempDir::new("pagefile").unwrap();
        let path = dir.path().join("test.db");
        let mut pf = PageFile::open_or_create(&path).unwrap();

        pf.ensure_capacity(6).unwrap();
        let mut buf = [0xFFu8; PAGE_SIZE];
        pf.read_page(5, &mut buf).unwrap();
        assert_eq!(buf, [0u8; PAGE_SIZE]);
    }

    #[test]
    fn write_after_ensure_capacity_round_trips() {
        let dir = TempDir::new("pagefile").unwrap();
        let path = dir.path().join("test.db");
        let mut pf = PageFile::open_or_create(&path).unwrap();

        pf.ensure_capacity(4).unwrap();
        let data = [7u8; PAGE_SIZE];
        pf.write_page(3, &data).unwrap();
        assert_eq!(pf.page_count().unwrap(), 4);

        let mut buf = [0u8; PAGE_SIZE];
        pf.read_page(3, &mut buf).unwrap();
        assert_eq!(buf, [7u8; PAGE_SIZE]);
    }
}
