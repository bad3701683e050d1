use std::collections::HashMap;

use log::{debug, warn};

use crate::buffer::frame::{Frame, FrameData};
use crate::buffer::replacer::ReplacementPolicy;
use crate::common::config::{FrameId, PageId, PAGE_SIZE};
use crate::error::BufferPoolError;
use crate::storage::disk::DiskManager;
use crate::storage::disk::PageFile;

/// A handle to a pinned page: the page id plus a shared view onto its
/// frame's bytes. Valid for as long as the client holds at least one pin on
/// `page_id` — see invariant 6 in the data model and the design note on
/// aliased buffers in SPEC_FULL.md §9.
#[derive(Clone)]
pub struct PageHandle {
    page_id: PageId,
    data: FrameData,
}

impl PageHandle {
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Borrows the page's bytes for reading.
    pub fn bytes(&self) -> std::cell::Ref<'_, [u8; PAGE_SIZE]> {
        self.data.borrow()
    }

    /// Borrows the page's bytes for writing. Does not itself mark the page
    /// dirty — call [`BufferPool::mark_dirty`] after mutating.
    pub fn bytes_mut(&self) -> std::cell::RefMut<'_, [u8; PAGE_SIZE]> {
        self.data.borrow_mut()
    }
}

/// A fixed-size buffer pool over one page file.
///
/// Single-threaded by design (see SPEC_FULL.md §5): no internal locking, one
/// caller inside any public method at a time.
pub struct BufferPool<F: PageFile = DiskManager> {
    frames: Vec<Frame>,
    page_table: HashMap<PageId, FrameId>,
    strategy: ReplacementPolicy,
    page_file: Option<F>,
    time: u64,
    read_io: u64,
    write_io: u64,
}

impl BufferPool<DiskManager> {
    /// Opens `file_name` (which must already exist) and constructs a pool of
    /// `num_frames` frames using `strategy`.
    pub fn new(
        file_name: &str,
        num_frames: usize,
        strategy: ReplacementPolicy,
    ) -> Result<Self, BufferPoolError> {
        if file_name.is_empty() {
            return Err(BufferPoolError::InvalidArgument(
                "page file name must not be empty".to_string(),
            ));
        }
        let disk_manager = DiskManager::open(file_name)?;
        Self::with_page_file(disk_manager, num_frames, strategy)
    }
}

impl<F: PageFile> BufferPool<F> {
    /// Constructs a pool over an already-open [`PageFile`]. Exposed
    /// separately from [`BufferPool::new`] so tests (and non-`DiskManager`
    /// block layers) can supply their own `PageFile` implementation.
    pub fn with_page_file(
        page_file: F,
        num_frames: usize,
        strategy: ReplacementPolicy,
    ) -> Result<Self, BufferPoolError> {
        if num_frames == 0 {
            return Err(BufferPoolError::InvalidArgument(
                "frame count must be at least 1".to_string(),
            ));
        }
        let frames = (0..num_frames).map(|_| Frame::empty()).collect();
        Ok(Self {
            frames,
            page_table: HashMap::with_capacity(num_frames),
            strategy,
            page_file: Some(page_file),
            time: 0,
            read_io: 0,
            write_io: 0,
        })
    }

    /// Number of frames in the pool.
    pub fn pool_size(&self) -> usize {
        self.frames.len()
    }

    fn page_file_mut(&mut self) -> Result<&mut F, BufferPoolError> {
        self.page_file
            .as_mut()
            .ok_or_else(|| BufferPoolError::InvalidArgument("pool has been torn down".to_string()))
    }

    /// Pins `page_id`, bringing it into memory on a miss. Returns a handle
    /// whose bytes alias the frame's buffer for as long as the pin is held.
    pub fn pin(&mut self, page_id: PageId) -> Result<PageHandle, BufferPoolError> {
        self.time += 1;
        let time = self.time;

        let total_pages = self.page_file_mut()?.file_length()?;
        if page_id as u64 >= total_pages {
            self.page_file_mut()?.ensure_capacity(page_id as u64 + 1)?;
            // Defensive: ensure_capacity is expected to make the page reachable.
            // If it silently didn't, don't let an out-of-range read_block below
            // turn into a generic I/O error when a more specific one exists.
            let grown_pages = self.page_file_mut()?.file_length()?;
            if page_id as u64 >= grown_pages {
                return Err(BufferPoolError::NonExistingPage(page_id));
            }
        }

        if let Some(&frame_id) = self.page_table.get(&page_id) {
            let frame = &mut self.frames[frame_id];
            frame.pin(time);
            debug!("pin hit: page {page_id} in frame {frame_id}");
            return Ok(PageHandle {
                page_id,
                data: frame.data(),
            });
        }

        let frame_id = self.strategy.select_victim(&self.frames).ok_or_else(|| {
            warn!("pin miss for page {page_id}: all frames are pinned");
            BufferPoolError::AllFramesPinned
        })?;

        if let Some(victim_page_id) = self.frames[frame_id].page_id() {
            if self.frames[frame_id].is_dirty() {
                let bytes = *self.frames[frame_id].data().borrow();
                self.page_file_mut()?.write_block(victim_page_id, &bytes)?;
                self.frames[frame_id].clear_dirty();
                self.write_io += 1;
                debug!("wrote back dirty page {victim_page_id} from frame {frame_id}");
            }
            self.page_table.remove(&victim_page_id);
        }

        let mut bytes = [0u8; PAGE_SIZE];
        match self.page_file_mut()?.read_block(page_id, &mut bytes) {
            Ok(()) => {
                self.read_io += 1;
            }
            Err(err) => {
                // Preserve invariant 1: a frame that failed to load a page
                // must come back fully empty, not half-overwritten.
                self.frames[frame_id].reset();
                warn!("failed to read page {page_id} into frame {frame_id}: {err}");
                return Err(BufferPoolError::Io(err));
            }
        }

        self.frames[frame_id].load(page_id, bytes, time);
        self.page_table.insert(page_id, frame_id);
        debug!("pin miss: loaded page {page_id} into frame {frame_id}");

        Ok(PageHandle {
            page_id,
            data: self.frames[frame_id].data(),
        })
    }

    fn locate(&self, page_id: PageId) -> Result<FrameId, BufferPoolError> {
        self.page_table
            .get(&page_id)
            .copied()
            .ok_or(BufferPoolError::PageNotFound(page_id))
    }

    /// Decrements the pin count on `handle.page_id()`.
    pub fn unpin(&mut self, handle: &PageHandle) -> Result<(), BufferPoolError> {
        let frame_id = self.locate(handle.page_id)?;
        let frame = &mut self.frames[frame_id];
        if frame.pin_count() <= 0 {
            warn!("unpin of page {} with pin count already zero", handle.page_id);
            return Err(BufferPoolError::NothingToUnpin(handle.page_id));
        }
        frame.unpin();
        Ok(())
    }

    /// Marks `handle.page_id()` dirty without writing it.
    pub fn mark_dirty(&mut self, handle: &PageHandle) -> Result<(), BufferPoolError> {
        let frame_id = self.locate(handle.page_id)?;
        self.frames[frame_id].mark_dirty();
        Ok(())
    }

    /// Writes `handle.page_id()` to disk unconditionally, clears dirty.
    pub fn force(&mut self, handle: &PageHandle) -> Result<(), BufferPoolError> {
        let frame_id = self.locate(handle.page_id)?;
        let bytes = *self.frames[frame_id].data().borrow();
        self.page_file_mut()?.write_block(handle.page_id, &bytes)?;
        self.frames[frame_id].clear_dirty();
        self.write_io += 1;
        debug!("forced page {} from frame {frame_id}", handle.page_id);
        Ok(())
    }

    /// Writes back every dirty, unpinned frame. Stops at the first I/O error,
    /// leaving frames already flushed clean.
    pub fn flush_all(&mut self) -> Result<(), BufferPoolError> {
        for frame_id in 0..self.frames.len() {
            let frame = &self.frames[frame_id];
            if frame.is_dirty() && frame.pin_count() == 0 {
                let page_id = frame.page_id().expect("dirty frame must be resident");
                let bytes = *frame.data().borrow();
                self.page_file_mut()?.write_block(page_id, &bytes)?;
                self.frames[frame_id].clear_dirty();
                self.write_io += 1;
                debug!("flushed page {page_id} from frame {frame_id}");
            }
        }
        Ok(())
    }

    /// Tears the pool down: refuses if any frame is still pinned, otherwise
    /// flushes all dirty pages and closes the page file. Idempotent after a
    /// successful call (subsequent operations fail with
    /// [`BufferPoolError::InvalidArgument`] rather than reopening anything).
    pub fn teardown(&mut self) -> Result<(), BufferPoolError> {
        if let Some(frame) = self.frames.iter().find(|f| f.pin_count() > 0) {
            warn!(
                "teardown refused: page {} is still pinned",
                frame.page_id().expect("pinned frame must be resident")
            );
            return Err(BufferPoolError::AllFramesPinned);
        }

        let flush_result = self.flush_all();

        let close_result = match self.page_file.take() {
            Some(page_file) => page_file.close(),
            None => Ok(()),
        };
        self.frames.clear();
        self.page_table.clear();
        debug!("buffer pool torn down");

        flush_result?;
        close_result?;
        Ok(())
    }

    /// Snapshot of each frame's resident page id, in frame-index order.
    pub fn frame_contents(&self) -> Vec<Option<PageId>> {
        self.frames.iter().map(Frame::page_id).collect()
    }

    /// Snapshot of each frame's dirty flag, in frame-index order.
    pub fn dirty_flags(&self) -> Vec<bool> {
        self.frames.iter().map(Frame::is_dirty).collect()
    }

    /// Snapshot of each frame's pin count, in frame-index order.
    pub fn fix_counts(&self) -> Vec<i32> {
        self.frames.iter().map(Frame::pin_count).collect()
    }

    /// Total number of physical reads performed since construction.
    pub fn read_io(&self) -> u64 {
        self.read_io
    }

    /// Total number of physical writes performed since construction.
    pub fn write_io(&self) -> u64 {
        self.write_io
    }
}

impl<F: PageFile> Drop for BufferPool<F> {
    fn drop(&mut self) {
        if self.page_file.is_some() {
            if let Err(err) = self.teardown() {
                warn!("buffer pool dropped without clean teardown: {err}");
            }
        }
    }
}
