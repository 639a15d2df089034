//! Error types surfaced by the buffer pool to its callers.

use thiserror::Error;

use crate::common::PageId;

/// Result type alias using [`BufferPoolError`].
pub type Result<T> = std::result::Result<T, BufferPoolError>;

/// Flat error taxonomy for the buffer pool core.
///
/// There is no nested cause chain beyond wrapping the underlying I/O error:
/// the core never retries or recovers from a storage failure locally, it
/// just hands the failure back to the caller with pool state left as it was
/// before the failed operation.
#[derive(Debug, Error)]
pub enum BufferPoolError {
    /// A null/empty pool name, non-positive frame count, or negative page number.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing file could not be opened or created.
    #[error("backing file not found or could not be created: {0}")]
    FileNotFound(String),

    /// A read targeted a page beyond the file's current length.
    #[error("tried to read non-existing page {0}")]
    ReadNonExistingPage(PageId),

    /// A write-back to the backing file failed.
    #[error("write to page {page} failed: {source}")]
    WriteFailed {
        page: PageId,
        #[source]
        source: std::io::Error,
    },

    /// `shutdownBufferPool` was called while at least one frame is pinned.
    #[error("cannot shut down buffer pool: pages are still pinned")]
    PinnedPages,

    /// `unpinPage`/`markDirty`/`forcePage` referenced a page not resident in any frame.
    #[error("page {0} is not resident in the buffer pool")]
    PageNotFound(PageId),

    /// A pin-miss found every frame pinned.
    #[error("no free frame to replace: all frames are pinned")]
    NoFreeSlot,

    /// Catch-all for storage-layer I/O failures that don't fit the more
    /// specific variants above (e.g. failure opening the file for a read).
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
