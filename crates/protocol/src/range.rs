//! Partition key ranges
//!
//! A `Range` is a closed interval `[first, last]` over the partition key.
//! `PartitionPlan` walks `[start, end]` in steps of `batch_size` and yields
//! contiguous, non-overlapping ranges; the final range is clipped to `end`.

use std::fmt;

use crate::{ProtocolError, Result};

/// Closed interval over the partition key
///
/// Invariant: `first <= last`.
///
/// # Example
///
/// ```
/// use unload_protocol::Range;
///
/// let range = Range::new(1, 10).unwrap();
/// assert_eq!(range.len(), 10);
/// assert!(range.contains(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    first: i64,
    last: i64,
}

impl Range {
    /// Create a new range, rejecting `first > last`
    pub fn new(first: i64, last: i64) -> Result<Self> {
        if first > last {
            return Err(ProtocolError::invalid_range(first, last));
        }
        Ok(Self { first, last })
    }

    /// First key (inclusive)
    #[inline]
    pub fn first(&self) -> i64 {
        self.first
    }

    /// Last key (inclusive)
    #[inline]
    pub fn last(&self) -> i64 {
        self.last
    }

    /// Number of keys covered by the range
    ///
    /// Saturates at `u64::MAX` for the full `i64` domain, which holds one
    /// key more than `u64` can count.
    #[inline]
    pub fn len(&self) -> u64 {
        let keys = i128::from(self.last) - i128::from(self.first) + 1;
        u64::try_from(keys).unwrap_or(u64::MAX)
    }

    /// A range always covers at least one key
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check whether a key falls inside the range
    #[inline]
    pub fn contains(&self, key: i64) -> bool {
        self.first <= key && key <= self.last
    }

    /// Bound parameters in query order: `(first, last)`
    #[inline]
    pub fn params(&self) -> [i64; 2] {
        [self.first, self.last]
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}

/// Generator of contiguous ranges tiling `[start, end]`
///
/// Yields nothing when `end < start`.
#[derive(Debug, Clone)]
pub struct PartitionPlan {
    next: Option<i64>,
    end: i64,
    batch_size: u64,
}

impl PartitionPlan {
    /// Create a plan over `[start, end]` with `batch_size` keys per range
    pub fn new(start: i64, end: i64, batch_size: u64) -> Result<Self> {
        if batch_size == 0 {
            return Err(ProtocolError::InvalidBatchSize);
        }
        Ok(Self {
            next: (start <= end).then_some(start),
            end,
            batch_size,
        })
    }

    /// Total number of ranges the plan yields from its current position
    pub fn range_count(&self) -> u64 {
        match self.next {
            Some(next) => {
                let span = (i128::from(self.end) - i128::from(next)) as u128;
                (span / u128::from(self.batch_size)) as u64 + 1
            }
            None => 0,
        }
    }
}

impl Iterator for PartitionPlan {
    type Item = Range;

    fn next(&mut self) -> Option<Range> {
        let first = self.next?;
        let last = i64::try_from(self.batch_size - 1)
            .ok()
            .and_then(|step| first.checked_add(step))
            .map_or(self.end, |last| last.min(self.end));

        self.next = if last >= self.end { None } else { Some(last + 1) };
        Some(Range { first, last })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = usize::try_from(self.range_count()).unwrap_or(usize::MAX);
        (count, Some(count))
    }
}
