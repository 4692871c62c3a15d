//! Interval primitives: the half-open `TimeRange` and the merge/clip/subtract
//! algebra every later stage is built on.
//!
//! All ranges are absolute instants (`DateTime<Utc>`), never wall-clock times.
//! Wall-clock concerns live in [`crate::calendar`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A half-open interval `[start, end)` with `start < end`.
///
/// The invariant is enforced at construction; there is no way to build an
/// empty or inverted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawRange> for TimeRange {
    type Error = SlotError;

    fn try_from(raw: RawRange) -> Result<Self> {
        TimeRange::try_new(raw.start, raw.end)
    }
}

impl TimeRange {
    /// Build a range, returning `None` when `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Build a range, returning [`SlotError::InvalidRange`] when `end <= start`.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Self::new(start, end).ok_or(SlotError::InvalidRange { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when the two ranges share at least one instant.
    /// Adjacent ranges (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Sort by start and fold overlapping or touching ranges into one.
///
/// The result is sorted, pairwise disjoint and minimal: no two output ranges
/// overlap or touch. Input order and duplicates do not matter.
pub fn merge_overlapping(ranges: &[TimeRange]) -> Vec<TimeRange> {
    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<TimeRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                // Overlapping or touching: extend the current range.
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}

/// Intersect `range` with `window`. `None` means no overlap.
pub fn clip(range: &TimeRange, window: &TimeRange) -> Option<TimeRange> {
    TimeRange::new(range.start.max(window.start), range.end.min(window.end))
}

/// Sweep `busy_merged` left to right and emit the gaps inside `window`.
///
/// `busy_merged` must be sorted and disjoint (the output of
/// [`merge_overlapping`]) and clipped to `window`. The output covers exactly
/// `window` minus the busy ranges, sorted and maximal.
pub fn subtract(window: &TimeRange, busy_merged: &[TimeRange]) -> Vec<TimeRange> {
    let mut free = Vec::new();
    let mut cursor = window.start;

    for busy in busy_merged {
        if busy.start > cursor {
            free.push(TimeRange {
                start: cursor,
                end: busy.start,
            });
        }
        cursor = cursor.max(busy.end);
    }

    if cursor < window.end {
        free.push(TimeRange {
            start: cursor,
            end: window.end,
        });
    }

    free
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
    }

    #[test]
    fn new_rejects_empty_and_inverted() {
        assert!(TimeRange::new(at(9, 0), at(9, 0)).is_none());
        assert!(TimeRange::new(at(10, 0), at(9, 0)).is_none());
        assert!(TimeRange::new(at(9, 0), at(9, 1)).is_some());
    }

    #[test]
    fn try_new_reports_invalid_range() {
        let err = TimeRange::try_new(at(10, 0), at(9, 0)).unwrap_err();
        assert!(matches!(err, SlotError::InvalidRange { .. }));
    }

    #[test]
    fn deserialize_rejects_inverted_range() {
        let json = r#"{"start":"2026-03-16T10:00:00Z","end":"2026-03-16T09:00:00Z"}"#;
        assert!(serde_json::from_str::<TimeRange>(json).is_err());
    }

    #[test]
    fn subtract_ignores_busy_starting_at_cursor() {
        let window = TimeRange::new(at(9, 0), at(12, 0)).unwrap();
        let busy = [TimeRange::new(at(9, 0), at(10, 0)).unwrap()];
        let free = subtract(&window, &busy);
        assert_eq!(free, vec![TimeRange::new(at(10, 0), at(12, 0)).unwrap()]);
    }
}
