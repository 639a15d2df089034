//! Shared constants and identifier types used across the buffer pool.

/// Size in bytes of every page, resident or on disk.
pub const PAGE_SIZE: usize = 4096;

/// Sentinel `PageId` denoting an unoccupied frame.
pub const EMPTY_PAGE: PageId = -1;

/// A page identifier. Non-negative values name a page in the backing file;
/// [`EMPTY_PAGE`] marks a frame that holds no page.
pub type PageId = i64;

/// Index into the buffer pool's frame table.
pub type FrameId = usize;

/// Replacement strategy selected at construction and fixed for the pool's lifetime.
///
/// `LruK` is accepted for compatibility with callers that track a richer history,
/// but this core treats it identically to [`ReplacementStrategy::Lru`]: a single
/// recency stamp per frame, no k-distance bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacementStrategy {
    #[default]
    Fifo,
    Lru,
    LruK,
}

impl ReplacementStrategy {
    /// Parses a strategy tag, falling back to FIFO for anything unrecognized.
    /// This mirrors the compatibility fallback called out in the external
    /// interface contract: an unknown strategy tag must not be a hard error.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_uppercase().as_str() {
            "LRU" => ReplacementStrategy::Lru,
            "LRU_K" | "LRUK" => ReplacementStrategy::LruK,
            "FIFO" => ReplacementStrategy::Fifo,
            _ => ReplacementStrategy::Fifo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_known_tags_case_insensitively() {
        assert_eq!(ReplacementStrategy::from_tag("lru"), ReplacementStrategy::Lru);
        assert_eq!(ReplacementStrategy::from_tag("LRU"), ReplacementStrategy::Lru);
        assert_eq!(ReplacementStrategy::from_tag("lru_k"), ReplacementStrategy::LruK);
        assert_eq!(ReplacementStrategy::from_tag("LRUK"), ReplacementStrategy::LruK);
        assert_eq!(ReplacementStrategy::from_tag("fifo"), ReplacementStrategy::Fifo);
    }

    #[test]
    fn unrecognized_tag_falls_back_to_fifo() {
        assert_eq!(ReplacementStrategy::from_tag("mru"), ReplacementStrategy::Fifo);
        assert_eq!(ReplacementStrategy::from_tag(""), ReplacementStrategy::Fifo);
    }
}
