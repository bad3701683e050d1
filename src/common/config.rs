//! Shared constants and identifier types for the page file and buffer pool.

/// Size in bytes of one page, shared by the block layer and the buffer pool.
pub const PAGE_SIZE: usize = 4096;

/// Logical page identifier within a page file. Unsigned: there is no
/// negative-page-id case to reject at this type, unlike the original source
/// language, so "non-existing page" only ever arises from an out-of-range
/// block-layer access (see [`crate::error::BufferPoolError::NonExistingPage`]).
pub type PageId = u32;

/// Index of a frame within the buffer pool's fixed frame array.
pub type FrameId = usize;
