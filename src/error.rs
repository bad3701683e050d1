//! Error taxonomy for the buffer pool and the block layer beneath it.

use thiserror::Error;

use crate::common::config::PageId;

/// Every fallible operation exposed by this crate returns this error type.
///
/// Variants group by the kind of failure described in the buffer pool's error
/// handling design, not by which C return-code constant the original source
/// happened to use for it — several of the original's distinct `RC_*` codes
/// collapse onto a single variant here (e.g. a negative page id and an
/// out-of-range disk access are both [`BufferPoolError::NonExistingPage`]),
/// while others that shared a code ("all pinned" vs. "nothing to unpin")
/// are kept apart because the buffer pool spec calls them out as distinct
/// conditions.
#[derive(Debug, Error)]
pub enum BufferPoolError {
    /// Construction was given a non-positive frame count or an empty file name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `pageId` could not be resolved to a valid block, even after
    /// `ensureCapacity`-style growth.
    #[error("non-existing page: {0}")]
    NonExistingPage(PageId),

    /// A `pin` missed and every frame is currently pinned, or `teardown` was
    /// called while pages remain pinned.
    #[error("all frames are pinned")]
    AllFramesPinned,

    /// `unpin` was called on a page whose pin count is already zero.
    #[error("page {0} is not pinned")]
    NothingToUnpin(PageId),

    /// `markDirty`, `unpin`, or `force` targeted a page not resident in the pool.
    #[error("page {0} not found in buffer pool")]
    PageNotFound(PageId),

    /// A read, write, extend, or close against the page file failed.
    #[error("page file I/O error: {0}")]
    Io(#[from] std::io::Error),
}
