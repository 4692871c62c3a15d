//! Compute free intervals from provider busy ranges and the business calendar.
//!
//! For every business window, busy ranges are clipped to the window, merged,
//! and subtracted. The provider feed is untrusted: entries that fail to parse
//! or are inverted are dropped one by one without failing the batch.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::BusinessCalendar;
use crate::error::{Result, SlotError};
use crate::interval::{clip, merge_overlapping, subtract, TimeRange};

/// A busy range as reported by the calendar provider, still unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyEntry {
    pub start: String,
    pub end: String,
}

impl BusyEntry {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with offset) and a bare `YYYY-MM-DDTHH:MM:SS`, which is
/// interpreted as UTC.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| SlotError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse provider entries, silently dropping unparseable or inverted ones.
pub fn parse_busy(entries: &[BusyEntry]) -> Vec<TimeRange> {
    entries
        .iter()
        .filter_map(|entry| {
            let parsed = match (parse_datetime(&entry.start), parse_datetime(&entry.end)) {
                (Ok(start), Ok(end)) => TimeRange::new(start, end),
                _ => None,
            };
            if parsed.is_none() {
                debug!(
                    start = %entry.start,
                    end = %entry.end,
                    "dropping malformed busy entry"
                );
            }
            parsed
        })
        .collect()
}

/// Merge the busy ranges that overlap `window`, clipped to it.
pub fn busy_within(window: &TimeRange, busy: &[TimeRange]) -> Vec<TimeRange> {
    let clipped: Vec<TimeRange> = busy.iter().filter_map(|b| clip(b, window)).collect();
    merge_overlapping(&clipped)
}

/// Free intervals of one business window: `window - merge(busy ∩ window)`.
pub fn free_in_window(window: &TimeRange, busy: &[TimeRange]) -> Vec<TimeRange> {
    subtract(window, &busy_within(window, busy))
}

/// Free intervals across every business window of `query`, in window order.
///
/// `busy` may be unsorted, overlapping or duplicated. An empty result is a
/// valid outcome, not an error.
pub fn build_free_intervals(
    query: &TimeRange,
    busy: &[TimeRange],
    calendar: &BusinessCalendar,
) -> Vec<TimeRange> {
    let windows = calendar.business_windows(query);
    let free: Vec<TimeRange> = windows
        .iter()
        .flat_map(|window| free_in_window(window, busy))
        .collect();

    debug!(
        windows = windows.len(),
        busy = busy.len(),
        free = free.len(),
        "free intervals built"
    );
    free
}

/// Convenience over [`parse_busy`] + [`build_free_intervals`] for raw
/// provider entries.
pub fn free_intervals_from_entries(
    query: &TimeRange,
    entries: &[BusyEntry],
    calendar: &BusinessCalendar,
) -> Vec<TimeRange> {
    build_free_intervals(query, &parse_busy(entries), calendar)
}
