use crate::buffer::frame::Frame;
use crate::common::config::FrameId;

/// The replacement strategy a buffer pool is configured with.
///
/// `LruK` is kept as a distinct, named variant rather than silently merged
/// into `Lru` at the type level, even though it currently selects victims
/// identically to `Lru` — see [`ReplacementPolicy::select_victim`]. A future
/// implementer wiring up real k-distance tracking has a clear place to add
/// it without renaming this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementPolicy {
    /// Evict the resident page with the oldest `load_time`.
    Fifo,
    /// Evict the resident page with the oldest `last_used_time`.
    Lru,
    /// Alias of `Lru` in this implementation.
    LruK,
}

impl ReplacementPolicy {
    /// Selects a victim frame index among `frames`, or `None` if every frame
    /// is pinned.
    ///
    /// Rule, applied in order: prefer the lowest-index empty frame; otherwise
    /// pick the unpinned frame minimizing this policy's metric, breaking ties
    /// by lowest index.
    pub fn select_victim(&self, frames: &[Frame]) -> Option<FrameId> {
        if let Some(index) = frames.iter().position(Frame::is_empty) {
            return Some(index);
        }

        let metric = |frame: &Frame| -> u64 {
            match self {
                ReplacementPolicy::Fifo => frame.load_time(),
                ReplacementPolicy::Lru | ReplacementPolicy::LruK => frame.last_used_time(),
            }
        };

        frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| frame.pin_count() == 0)
            .min_by_key(|(index, frame)| (metric(frame), *index))
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(page_id: u32, load_time: u64, last_used: u64) -> Frame {
        let mut frame = Frame::empty();
        frame.load(page_id, [0; crate::common::config::PAGE_SIZE], load_time);
        frame.unpin(); // load() leaves pin_count at 1; these fixtures are unpinned victims.
        if last_used != load_time {
            frame.pin(last_used);
            frame.unpin();
        }
        frame
    }

    #[test]
    fn prefers_empty_frame_over_any_metric() {
        let frames = vec![frame_with(0, 1, 1), Frame::empty(), frame_with(2, 2, 2)];
        assert_eq!(ReplacementPolicy::Fifo.select_victim(&frames), Some(1));
    }

    #[test]
    fn fifo_picks_oldest_load_time() {
        let frames = vec![frame_with(0, 5, 5), frame_with(1, 1, 9), frame_with(2, 3, 3)];
        assert_eq!(ReplacementPolicy::Fifo.select_victim(&frames), Some(1));
    }

    #[test]
    fn lru_picks_oldest_last_used_time() {
        let frames = vec![frame_with(0, 1, 9), frame_with(1, 2, 1), frame_with(2, 3, 5)];
        assert_eq!(ReplacementPolicy::Lru.select_victim(&frames), Some(1));
    }

    #[test]
    fn ties_break_by_lowest_index() {
        let frames = vec![frame_with(0, 4, 4), frame_with(1, 4, 4)];
        assert_eq!(ReplacementPolicy::Fifo.select_victim(&frames), Some(0));
    }

    #[test]
    fn all_pinned_yields_none() {
        let mut a = Frame::empty();
        a.load(0, [0; crate::common::config::PAGE_SIZE], 1);
        let mut b = Frame::empty();
        b.load(1, [0; crate::common::config::PAGE_SIZE], 2);
        let frames = vec![a, b];
        assert_eq!(ReplacementPolicy::Fifo.select_victim(&frames), None);
    }
}
