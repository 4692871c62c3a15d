//! Per-business-day busy overview for the host's calendar view.
//!
//! Unlike [`crate::freebusy`], the overview also understands all-day entries
//! (`YYYY-MM-DD` bounds, end date exclusive). They cover whole local days in
//! the calendar timezone, so clipping them to a work window yields the full
//! window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::BusinessCalendar;
use crate::freebusy::{busy_within, parse_datetime, BusyEntry};
use crate::interval::TimeRange;

/// Busy ranges listed per day in a summary line before collapsing the rest.
pub const MAX_SUMMARY_RANGES: usize = 3;

/// Busy time overlapping one business day's work window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOverview {
    pub day: NaiveDate,
    pub window: TimeRange,
    /// Busy entries overlapping the window, before merging.
    pub event_count: usize,
    /// Merged busy ranges clipped to the window.
    pub busy: Vec<TimeRange>,
}

impl DayOverview {
    pub fn is_free(&self) -> bool {
        self.event_count == 0
    }

    /// One line per day in the calendar timezone, e.g.
    /// `2026-03-16 (Mon) 2 busy: 10:00 - 11:00, 14:00 - 15:00`.
    pub fn summary_line(&self, calendar: &BusinessCalendar) -> String {
        let tz = calendar.timezone();
        let day = self.day.format("%Y-%m-%d (%a)");
        if self.is_free() {
            return format!("{} free", day);
        }

        let mut ranges: Vec<String> = self
            .busy
            .iter()
            .take(MAX_SUMMARY_RANGES)
            .map(|range| {
                format!(
                    "{} - {}",
                    range.start().with_timezone(&tz).format("%H:%M"),
                    range.end().with_timezone(&tz).format("%H:%M")
                )
            })
            .collect();
        if self.busy.len() > MAX_SUMMARY_RANGES {
            ranges.push(format!("+{} more", self.busy.len() - MAX_SUMMARY_RANGES));
        }
        format!("{} {} busy: {}", day, self.event_count, ranges.join(", "))
    }
}

fn parse_all_day(entry: &BusyEntry, calendar: &BusinessCalendar) -> Option<TimeRange> {
    let first = NaiveDate::parse_from_str(&entry.start, "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(&entry.end, "%Y-%m-%d").ok()?;
    if end < first {
        return None;
    }
    // The end date is exclusive; a same-day end still covers the start day.
    let last = end.pred_opt()?.max(first);
    calendar.day_range(first, last).ok()
}

/// Resolve one provider entry, timed or all-day, into a range.
pub fn resolve_busy_entry(entry: &BusyEntry, calendar: &BusinessCalendar) -> Option<TimeRange> {
    match (parse_datetime(&entry.start), parse_datetime(&entry.end)) {
        (Ok(start), Ok(end)) => TimeRange::new(start, end),
        _ => parse_all_day(entry, calendar),
    }
}

/// Parse provider entries for the overview, dropping malformed ones.
pub fn parse_overview_busy(entries: &[BusyEntry], calendar: &BusinessCalendar) -> Vec<TimeRange> {
    entries
        .iter()
        .filter_map(|entry| {
            let parsed = resolve_busy_entry(entry, calendar);
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

/// One [`DayOverview`] per business window of `query`, in day order.
pub fn day_overview(
    query: &TimeRange,
    busy: &[TimeRange],
    calendar: &BusinessCalendar,
) -> Vec<DayOverview> {
    let days: Vec<DayOverview> = calendar
        .business_windows(query)
        .into_iter()
        .map(|window| DayOverview {
            day: calendar.local_date(window.start()),
            window,
            event_count: busy.iter().filter(|b| b.overlaps(&window)).count(),
            busy: busy_within(&window, busy),
        })
        .collect();

    debug!(
        days = days.len(),
        busy_days = days.iter().filter(|d| !d.is_free()).count(),
        "day overview built"
    );
    days
}
