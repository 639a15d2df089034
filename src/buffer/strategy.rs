//! Victim selection for the two supported replacement policies.

use crate::buffer::frame::Frame;
use crate::common::{FrameId, ReplacementStrategy};

/// Picks the frame to evict to make room for a pin-miss.
///
/// Empty frames are always preferred, regardless of strategy, so FIFO/LRU
/// ordering among pages only becomes observable once the pool is
/// saturated. `fifo_cursor` is advanced past the chosen victim when FIFO
/// selects one; it is otherwise left untouched.
///
/// Returns `None` if every frame is pinned (caller should report
/// `NoFreeSlot`).
pub fn select_victim(
    frames: &[Frame],
    strategy: ReplacementStrategy,
    fifo_cursor: &mut FrameId,
) -> Option<FrameId> {
    if let Some(idx) = frames.iter().position(Frame::is_empty) {
        return Some(idx);
    }

    match strategy {
        ReplacementStrategy::Fifo => select_fifo(frames, fifo_cursor),
        ReplacementStrategy::Lru | ReplacementStrategy::LruK => select_lru(frames),
    }
}

/// Scans from the rotating cursor for the first evictable frame, wrapping
/// around the frame table exactly once.
fn select_fifo(frames: &[Frame], fifo_cursor: &mut FrameId) -> Option<FrameId> {
    let n = frames.len();
    for offset in 0..n {
        let idx = (*fifo_cursor + offset) % n;
        if frames[idx].is_evictable() {
            *fifo_cursor = (idx + 1) % n;
            return Some(idx);
        }
    }
    None
}

/// Picks the evictable, non-empty frame with the smallest stamp, breaking
/// ties by lowest index.
fn select_lru(frames: &[Frame]) -> Option<FrameId> {
    frames
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_evictable() && !f.is_empty())
        .min_by_key(|(idx, f)| (f.stamp, *idx))
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::EMPTY_PAGE;

    fn frame(resident: i64, pin_count: u32, stamp: i64) -> Frame {
        let mut f = Frame::empty();
        f.resident = resident;
        f.pin_count = pin_count;
        f.stamp = stamp;
        f
    }

    #[test]
    fn empty_frame_wins_regardless_of_strategy() {
        let frames = vec![frame(0, 1, 5), frame(EMPTY_PAGE, 0, -1), frame(2, 0, 3)];
        let mut cursor = 0;
        assert_eq!(
            select_victim(&frames, ReplacementStrategy::Fifo, &mut cursor),
            Some(1)
        );
    }

    #[test]
    fn fifo_wraps_and_advances_cursor() {
        let frames = vec![frame(0, 1, 0), frame(1, 0, 0), frame(2, 0, 0)];
        let mut cursor = 0;
        // frame 0 is pinned, so the scan from cursor=0 lands on frame 1.
        assert_eq!(
            select_victim(&frames, ReplacementStrategy::Fifo, &mut cursor),
            Some(1)
        );
        assert_eq!(cursor, 2);
    }

    #[test]
    fn fifo_returns_none_when_all_pinned() {
        let frames = vec![frame(0, 1, 0), frame(1, 1, 0)];
        let mut cursor = 0;
        assert_eq!(
            select_victim(&frames, ReplacementStrategy::Fifo, &mut cursor),
            None
        );
    }

    #[test]
    fn lru_picks_smallest_stamp_among_unpinned() {
        let frames = vec![frame(0, 0, 10), frame(1, 0, 3), frame(2, 1, 0)];
        let mut cursor = 0;
        assert_eq!(
            select_victim(&frames, ReplacementStrategy::Lru, &mut cursor),
            Some(1)
        );
    }

    #[test]
    fn lru_breaks_ties_by_lowest_index() {
        let frames = vec![frame(0, 0, 5), frame(1, 0, 5)];
        let mut cursor = 0;
        assert_eq!(
            select_victim(&frames, ReplacementStrategy::Lru, &mut cursor),
            Some(0)
        );
    }

    #[test]
    fn lru_k_behaves_exactly_like_lru() {
        let frames = vec![frame(0, 0, 9), frame(1, 0, 1)];
        let mut cursor = 0;
        assert_eq!(
            select_victim(&frames, ReplacementStrategy::LruK, &mut cursor),
            Some(1)
        );
    }
}
