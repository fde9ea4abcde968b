//! Block interval chunking
//!
//! Splits an inclusive block range into consecutive chunks so that each
//! chunk can be paged through on its own.

/// An inclusive range of block numbers, never empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: u64,
    end: u64,
}

impl Interval {
    /// Interval `[start, end]`, or `None` when `start > end`
    pub fn new(start: u64, end: u64) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// First block (inclusive)
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last block (inclusive)
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of blocks covered, saturating for `[0, u64::MAX]`
    pub fn len(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Intervals always cover at least one block
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if a block lies inside the interval
    pub fn contains(&self, block: u64) -> bool {
        (self.start..=self.end).contains(&block)
    }
}

impl From<Interval> for (u64, u64) {
    fn from(interval: Interval) -> Self {
        (interval.start, interval.end)
    }
}

/// Iterator over consecutive, non-overlapping chunks of `[start, end]`
///
/// Every chunk spans `size` blocks except possibly the last one. Nothing is
/// produced when `start > end`. A `size` of zero is treated as one.
#[derive(Debug, Clone)]
pub struct IntervalGenerator {
    next_start: u64,
    end: u64,
    size: u64,
    exhausted: bool,
}

impl IntervalGenerator {
    /// Create a generator over `[start, end]` in chunks of `size`
    pub fn new(start: u64, end: u64, size: u64) -> Self {
        Self {
            next_start: start,
            end,
            size: size.max(1),
            exhausted: start > end,
        }
    }
}

impl Iterator for IntervalGenerator {
    type Item = Interval;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let start = self.next_start;
        let end = start.saturating_add(self.size - 1).min(self.end);

        if end == self.end {
            self.exhausted = true;
        } else {
            self.next_start = end + 1;
        }

        Some(Interval { start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }
        let remaining = (self.end - self.next_start) / self.size + 1;
        let remaining = usize::try_from(remaining).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

/// Chunk `[start, end]` into intervals of at most `size` blocks
pub fn generate_intervals(start: u64, end: u64, size: u64) -> IntervalGenerator {
    IntervalGenerator::new(start, end, size)
}
