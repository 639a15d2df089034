//! The buffer pool itself: frame table, pin protocol, dirty write-back, and
//! the FIFO/LRU replacement cascade, all kept consistent across calls.

use std::collections::HashMap;
use std::path::Path;

use log::debug;

use crate::buffer::frame::Frame;
use crate::buffer::handle::PageHandle;
use crate::buffer::strategy::select_victim;
use crate::common::{FrameId, PageId, ReplacementStrategy, EMPTY_PAGE};
use crate::error::{BufferPoolError, Result};
use crate::storage::PageFile;

/// A fixed-size in-memory cache of `PAGE_SIZE` pages belonging to a single
/// backing file.
///
/// `BufferPool` is not `Send`/`Sync`: per the concurrency model, a pool is
/// used by exactly one thread at a time, and callers needing a
/// multi-threaded pool must wrap the whole thing in a mutex themselves.
pub struct BufferPool {
    frames: Vec<Frame>,
    page_table: HashMap<PageId, FrameId>,
    file: PageFile,
    strategy: ReplacementStrategy,
    clock: i64,
    fifo_cursor: FrameId,
    num_read_io: u64,
    num_write_io: u64,
}

impl BufferPool {
    /// Opens `file_name` (creating a fresh zero-filled one-page file if it
    /// doesn't exist) and allocates `num_frames` empty frames under the
    /// given replacement strategy.
    pub fn open(
        file_name: impl AsRef<Path>,
        num_frames: usize,
        strategy: ReplacementStrategy,
    ) -> Result<Self> {
        if num_frames == 0 {
            return Err(BufferPoolError::InvalidArgument(
                "frame count must be positive".to_string(),
            ));
        }
        let file_name = file_name.as_ref();
        if file_name.as_os_str().is_empty() {
            return Err(BufferPoolError::InvalidArgument(
                "backing file name must not be empty".to_string(),
            ));
        }

        let file = PageFile::open_or_create(file_name)?;
        let frames = (0..num_frames).map(|_| Frame::empty()).collect();

        Ok(Self {
            frames,
            page_table: HashMap::with_capacity(num_frames),
            file,
            strategy,
            clock: 0,
            fifo_cursor: 0,
            num_read_io: 0,
            num_write_io: 0,
        })
    }

    /// Opens the pool from a strategy tag rather than a [`ReplacementStrategy`]
    /// directly (the `stratData` surface from the external interface), for
    /// callers that carry the strategy as a configuration string. Unknown
    /// tags fall back to FIFO per [`ReplacementStrategy::from_tag`].
    pub fn open_with_tag(
        file_name: impl AsRef<Path>,
        num_frames: usize,
        strategy_tag: &str,
    ) -> Result<Self> {
        Self::open(file_name, num_frames, ReplacementStrategy::from_tag(strategy_tag))
    }

    /// Number of frames in the pool.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Pins `page_number`, loading it from disk (possibly evicting a
    /// victim) on a miss.
    pub fn pin_page(&mut self, page_number: PageId) -> Result<PageHandle> {
        if page_number < 0 {
            return Err(BufferPoolError::InvalidArgument(format!(
                "page number must be non-negative, got {page_number}"
            )));
        }

        if let Some(&frame_id) = self.page_table.get(&page_number) {
            self.clock += 1;
            let frame = &mut self.frames[frame_id];
            frame.pin_count += 1;
            frame.stamp = self.clock;
            return Ok(PageHandle {
                page_number,
                frame_id,
            });
        }

        let victim = select_victim(&self.frames, self.strategy, &mut self.fifo_cursor)
            .ok_or(BufferPoolError::NoFreeSlot)?;

        if !self.frames[victim].is_empty() {
            if self.frames[victim].dirty {
                self.write_back(victim)?;
            }
            self.page_table.remove(&self.frames[victim].resident);
        }

        self.file.ensure_capacity(page_number as usize + 1)?;
        self.file
            .read_page(page_number, &mut self.frames[victim].bytes)?;
        self.num_read_io += 1;

        self.clock += 1;
        let frame = &mut self.frames[victim];
        frame.resident = page_number;
        frame.dirty = false;
        frame.pin_count = 1;
        frame.stamp = self.clock;

        self.page_table.insert(page_number, victim);
        debug!("loaded page {page_number} into frame {victim}");

        Ok(PageHandle {
            page_number,
            frame_id: victim,
        })
    }

    /// Decrements the pin count for `handle`'s page. Idempotent once the
    /// count reaches 0, per the lenient underflow policy.
    pub fn unpin_page(&mut self, handle: &PageHandle) -> Result<()> {
        let frame = self.frame_for(handle.page_number)?;
        if frame.pin_count > 0 {
            frame.pin_count -= 1;
        }
        Ok(())
    }

    /// Marks the page resident at `handle` dirty. Legal even if the page is
    /// currently unpinned.
    pub fn mark_dirty(&mut self, handle: &PageHandle) -> Result<()> {
        self.frame_for(handle.page_number)?.dirty = true;
        Ok(())
    }

    /// Writes the frame behind `handle` to disk now, if dirty.
    pub fn force_page(&mut self, handle: &PageHandle) -> Result<()> {
        let frame_id = self.page_table.get(&handle.page_number).copied().ok_or(
            BufferPoolError::PageNotFound(handle.page_number),
        )?;
        if self.frames[frame_id].dirty {
            self.write_back(frame_id)?;
        }
        Ok(())
    }

    /// Writes every dirty, unpinned frame to disk. Pinned dirty frames are
    /// left untouched.
    pub fn force_flush_pool(&mut self) -> Result<()> {
        let candidates: Vec<FrameId> = self
            .frames
            .iter()
            .enumerate()
            .filter(|(_, f)| f.dirty && f.pin_count == 0)
            .map(|(idx, _)| idx)
            .collect();
        for frame_id in candidates {
            self.write_back(frame_id)?;
        }
        Ok(())
    }

    /// Flushes all dirty frames and tears the pool down. Fails with
    /// `PinnedPages` (leaving the pool untouched and still usable) if any
    /// frame is still pinned.
    pub fn shutdown(mut self) -> std::result::Result<(), (Self, BufferPoolError)> {
        if self.frames.iter().any(|f| f.pin_count > 0) {
            return Err((self, BufferPoolError::PinnedPages));
        }

        let dirty: Vec<FrameId> = self
            .frames
            .iter()
            .enumerate()
            .filter(|(_, f)| f.dirty)
            .map(|(idx, _)| idx)
            .collect();
        for frame_id in dirty {
            if let Err(e) = self.write_back(frame_id) {
                return Err((self, e));
            }
        }
        Ok(())
    }

    /// Snapshot of the resident page in each frame (`EMPTY_PAGE` for
    /// unoccupied frames), in frame-index order.
    pub fn frame_contents(&self) -> Vec<PageId> {
        self.frames.iter().map(|f| f.resident).collect()
    }

    /// Snapshot of each frame's dirty flag, in frame-index order.
    pub fn dirty_flags(&self) -> Vec<bool> {
        self.frames.iter().map(|f| f.dirty).collect()
    }

    /// Snapshot of each frame's pin count, in frame-index order.
    pub fn fix_counts(&self) -> Vec<u32> {
        self.frames.iter().map(|f| f.pin_count).collect()
    }

    pub fn num_read_io(&self) -> u64 {
        self.num_read_io
    }

    pub fn num_write_io(&self) -> u64 {
        self.num_write_io
    }

    /// Borrows the bytes behind `handle`. Valid for as long as the handle's
    /// page stays resident, which is guaranteed while it is pinned.
    pub fn page_data(&self, handle: &PageHandle) -> Result<&[u8]> {
        self.frame_ref_for(handle.page_number).map(|f| f.bytes.as_ref())
    }

    /// Mutably borrows the bytes behind `handle`. Does not itself mark the
    /// page dirty; call [`Self::mark_dirty`] to declare the intent to
    /// persist, same as the lenient markDirty contract.
    pub fn page_data_mut(&mut self, handle: &PageHandle) -> Result<&mut [u8]> {
        self.frame_for(handle.page_number)
            .map(|f| f.bytes.as_mut())
    }

    fn frame_ref_for(&self, page_number: PageId) -> Result<&Frame> {
        let frame_id = self
            .page_table
            .get(&page_number)
            .copied()
            .ok_or(BufferPoolError::PageNotFound(page_number))?;
        Ok(&self.frames[frame_id])
    }

    fn frame_for(&mut self, page_number: PageId) -> Result<&mut Frame> {
        let frame_id = self
            .page_table
            .get(&page_number)
            .copied()
            .ok_or(BufferPoolError::PageNotFound(page_number))?;
        Ok(&mut self.frames[frame_id])
    }

    /// Writes frame `frame_id` to disk (assumed dirty) and clears its dirty
    /// bit. Increments `num_write_io` only on the actual write.
    fn write_back(&mut self, frame_id: FrameId) -> Result<()> {
        let frame = &self.frames[frame_id];
        let resident = frame.resident;
        debug_assert_ne!(resident, EMPTY_PAGE, "write-back of an empty frame");
        self.file.ensure_capacity(resident as usize + 1)?;
        self.file.write_page(resident, frame.bytes.as_ref())?;
        self.num_write_io += 1;
        self.frames[frame_id].dirty = false;
        debug!("wrote back dirty frame {frame_id} (page {resident})");
        Ok(())
    }
}
