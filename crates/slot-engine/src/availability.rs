//! Per-request availability computation and its wire shapes.
//!
//! Each request recomputes from its own busy data; nothing is shared between
//! requests. Fetching busy data is the caller's job.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::BusinessCalendar;
use crate::error::Result;
use crate::freebusy::{build_free_intervals, parse_busy, BusyEntry};
use crate::interval::TimeRange;
use crate::overview::{day_overview, parse_overview_busy, DayOverview};
use crate::slots::{discretize, SlotLength};

/// A validated query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub range: TimeRange,
}

impl AvailabilityQuery {
    /// Fill in missing bounds and validate.
    ///
    /// A missing start means `now`; a missing end means `now +
    /// default_range_days`. An explicit start past that default end is
    /// still rejected.
    ///
    /// # Errors
    /// Returns [`crate::SlotError::InvalidRange`] when `end <= start`.
    pub fn resolve(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        default_range_days: i64,
    ) -> Result<Self> {
        let start = start.unwrap_or(now);
        let end = end.unwrap_or_else(|| now + Duration::days(default_range_days));
        Ok(Self {
            range: TimeRange::try_new(start, end)?,
        })
    }
}

/// Free intervals for a query, as served to the guest's client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeIntervalsResponse {
    pub timezone: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub intervals: Vec<TimeRange>,
}

/// Discrete slots for a query (the simpler legacy representation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub timezone: String,
    pub slot_minutes: SlotLength,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub slots: Vec<TimeRange>,
}

/// Busy overview per business day, for the host's calendar view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub timezone: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub days: Vec<DayOverview>,
}

pub fn free_intervals_response(
    query: &AvailabilityQuery,
    busy: &[BusyEntry],
    calendar: &BusinessCalendar,
) -> FreeIntervalsResponse {
    let intervals = build_free_intervals(&query.range, &parse_busy(busy), calendar);
    FreeIntervalsResponse {
        timezone: calendar.timezone_name().to_string(),
        start: query.range.start(),
        end: query.range.end(),
        intervals,
    }
}

pub fn slots_response(
    query: &AvailabilityQuery,
    busy: &[BusyEntry],
    calendar: &BusinessCalendar,
    slot: SlotLength,
) -> SlotsResponse {
    let free = build_free_intervals(&query.range, &parse_busy(busy), calendar);
    SlotsResponse {
        timezone: calendar.timezone_name().to_string(),
        slot_minutes: slot,
        start: query.range.start(),
        end: query.range.end(),
        slots: discretize(&free, slot),
    }
}

/// All-day entries count as busy for the whole work window here.
pub fn overview_response(
    query: &AvailabilityQuery,
    busy: &[BusyEntry],
    calendar: &BusinessCalendar,
) -> OverviewResponse {
    let busy = parse_overview_busy(busy, calendar);
    OverviewResponse {
        timezone: calendar.timezone_name().to_string(),
        start: query.range.start(),
        end: query.range.end(),
        days: day_overview(&query.range, &busy, calendar),
    }
}
