//! Adaptive block sizing
//!
//! The block size follows observed delete latency: fast deletes grow it by
//! 10%, slow ones shrink it by 20%, and a probe that lands past the cutoff
//! halves it. The `+ 1` after scaling keeps small sizes moving.

use std::time::Duration;

/// Deletes faster than this grow the block (unless the last probe overshot).
pub const FAST_DELETE: Duration = Duration::from_millis(10);
/// Deletes slower than this shrink the block.
pub const SLOW_DELETE: Duration = Duration::from_millis(100);
pub const GROWTH_FACTOR: f64 = 1.1;
pub const SHRINK_FACTOR: f64 = 0.8;

/// Contiguous id range proposed for deletion in one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start_id: i64,
    pub end_id: i64,
}

/// Block size change made after a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Increased(u64),
    Decreased(u64),
}

/// Block size plus the overshoot flag that suppresses growth right after a
/// narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveBatch {
    block_size: u64,
    overshoot: bool,
}

impl AdaptiveBatch {
    pub fn new(block_size: u64) -> Self {
        Self {
            block_size,
            overshoot: false,
        }
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn overshoot(&self) -> bool {
        self.overshoot
    }

    /// No further progress is possible once the size collapses to zero.
    pub fn is_exhausted(&self) -> bool {
        self.block_size == 0
    }

    /// Candidate block starting at `cursor`, clipped to `max_id`.
    pub fn propose(&self, cursor: i64, max_id: i64) -> Block {
        let span = i64::try_from(self.block_size.saturating_sub(1)).unwrap_or(i64::MAX);
        Block {
            start_id: cursor,
            end_id: cursor.saturating_add(span).min(max_id),
        }
    }

    /// The right edge of the candidate is not before the cutoff: halve and
    /// retry from the same start.
    pub fn narrow(&mut self) -> u64 {
        self.block_size /= 2;
        self.overshoot = true;
        self.block_size
    }

    /// Feed back the latency of an executed delete.
    pub fn record_delete(&mut self, elapsed: Duration) -> Option<Adjustment> {
        let mut adjustment = None;
        if elapsed < FAST_DELETE && !self.overshoot {
            self.block_size = grow(self.block_size);
            adjustment = Some(Adjustment::Increased(self.block_size));
        }
        if elapsed > SLOW_DELETE {
            self.block_size = shrink(self.block_size);
            adjustment = Some(Adjustment::Decreased(self.block_size));
        }
        self.overshoot = false;
        adjustment
    }
}

fn scale(size: u64, factor: f64) -> u64 {
    // float -> int `as` casts truncate and saturate
    ((size as f64 * factor) as u64).saturating_add(1)
}

pub fn grow(size: u64) -> u64 {
    scale(size, GROWTH_FACTOR)
}

pub fn shrink(size: u64) -> u64 {
    scale(size, SHRINK_FACTOR)
}
