use std::cell::RefCell;
use std::rc::Rc;

use crate::common::config::{PageId, PAGE_SIZE};

/// Shared, interior-mutable backing storage for one frame's bytes.
///
/// A [`crate::buffer::PageHandle`] clones this `Rc` rather than borrowing from
/// the pool, so a client can read or write page bytes without re-borrowing
/// `BufferPool` on every access. This is sound because a frame is never
/// reused for a different page while its pin count is above zero (invariant
/// 3 in the data model), so a live handle's view can never be silently
/// overwritten by an eviction.
pub type FrameData = Rc<RefCell<[u8; PAGE_SIZE]>>;

/// One slot in the buffer pool: a page's bytes plus the bookkeeping the
/// replacement policy and dirty tracking need.
pub struct Frame {
    page_id: Option<PageId>,
    data: FrameData,
    pin_count: i32,
    dirty: bool,
    load_time: u64,
    last_used_time: u64,
}

impl Frame {
    /// A freshly allocated, empty frame with a zeroed buffer.
    pub fn empty() -> Self {
        Self {
            page_id: None,
            data: Rc::new(RefCell::new([0u8; PAGE_SIZE])),
            pin_count: 0,
            dirty: false,
            load_time: 0,
            last_used_time: 0,
        }
    }

    pub fn page_id(&self) -> Option<PageId> {
        self.page_id
    }

    pub fn is_empty(&self) -> bool {
        self.page_id.is_none()
    }

    pub fn pin_count(&self) -> i32 {
        self.pin_count
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn load_time(&self) -> u64 {
        self.load_time
    }

    pub fn last_used_time(&self) -> u64 {
        self.last_used_time
    }

    pub fn data(&self) -> FrameData {
        Rc::clone(&self.data)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn pin(&mut self, time: u64) {
        self.pin_count += 1;
        self.last_used_time = time;
    }

    pub fn unpin(&mut self) {
        self.pin_count -= 1;
    }

    /// Overwrites this frame's bookkeeping and buffer contents with a newly
    /// loaded page. Callers must have already written the victim back to
    /// disk (if it was dirty) before calling this.
    pub fn load(&mut self, page_id: PageId, bytes: [u8; PAGE_SIZE], time: u64) {
        self.page_id = Some(page_id);
        *self.data.borrow_mut() = bytes;
        self.pin_count = 1;
        self.dirty = false;
        self.load_time = time;
        self.last_used_time = time;
    }

    /// Resets the frame to fully empty. Used both for a brand-new frame's
    /// state and to preserve invariant 1 when a physical read fails mid-miss.
    pub fn reset(&mut self) {
        self.page_id = None;
        self.data.borrow_mut().fill(0);
        self.pin_count = 0;
        self.dirty = false;
        self.load_time = 0;
        self.last_used_time = 0;
    }
}
