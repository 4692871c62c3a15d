//! Business-calendar window generation and every timezone conversion the
//! engine performs.
//!
//! Free-interval construction, grid layout and selection aggregation all go
//! through [`BusinessCalendar`], so server and client views cannot disagree
//! on where a day starts or ends.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use tracing::debug;

use crate::dst::resolve_local;
use crate::error::{Result, SlotError};
use crate::interval::{clip, TimeRange};
use crate::slots::SlotLength;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Work hours in one IANA timezone, Monday through Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    tz: Tz,
    work_start_hour: u32,
    work_end_hour: u32,
}

impl BusinessCalendar {
    /// Validate and build a calendar.
    ///
    /// # Errors
    /// Returns [`SlotError::InvalidTimezone`] for an unknown IANA name and
    /// [`SlotError::InvalidWorkHours`] unless `0 <= start < end <= 24`.
    pub fn new(timezone: &str, work_start_hour: u32, work_end_hour: u32) -> Result<Self> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(timezone.to_string()))?;
        if work_start_hour >= work_end_hour || work_end_hour > 24 {
            return Err(SlotError::InvalidWorkHours {
                start: work_start_hour,
                end: work_end_hour,
            });
        }
        Ok(Self {
            tz,
            work_start_hour,
            work_end_hour,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn timezone_name(&self) -> &'static str {
        self.tz.name()
    }

    pub fn work_start_hour(&self) -> u32 {
        self.work_start_hour
    }

    pub fn work_end_hour(&self) -> u32 {
        self.work_end_hour
    }

    /// Weekdays only; there is no holiday calendar.
    pub fn is_business_day(&self, day: NaiveDate) -> bool {
        !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// The calendar-local date containing `instant`.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// The instant at `minute` minutes past local midnight of `day`.
    ///
    /// `minute` may equal [`MINUTES_PER_DAY`] (the following midnight).
    /// DST gaps and overlaps resolve per [`resolve_local`].
    pub fn instant_at(&self, day: NaiveDate, minute: u32) -> Option<DateTime<Utc>> {
        let naive = day.and_hms_opt(0, 0, 0)? + Duration::minutes(i64::from(minute));
        resolve_local(&self.tz, naive)
    }

    /// The unclipped work window of `day`, or `None` on weekends.
    pub fn window_for_day(&self, day: NaiveDate) -> Option<TimeRange> {
        if !self.is_business_day(day) {
            return None;
        }
        let start = self.instant_at(day, self.work_start_hour * 60)?;
        let end = self.instant_at(day, self.work_end_hour * 60)?;
        TimeRange::new(start, end)
    }

    /// One business window per weekday touched by `range`, clipped to it.
    ///
    /// Days are iterated in the calendar timezone from the day containing
    /// `range.start()` to the day containing `range.end()` inclusive. Weekends
    /// and days whose clipped window is empty contribute nothing.
    pub fn business_windows(&self, range: &TimeRange) -> Vec<TimeRange> {
        let first = self.local_date(range.start());
        let last = self.local_date(range.end());

        let windows: Vec<TimeRange> = first
            .iter_days()
            .take_while(|day| *day <= last)
            .filter_map(|day| self.window_for_day(day))
            .filter_map(|window| clip(&window, range))
            .collect();

        debug!(
            timezone = self.timezone_name(),
            first = %first,
            last = %last,
            windows = windows.len(),
            "business windows generated"
        );
        windows
    }

    /// Express `range` as `(local day, start minute, end minute)`.
    ///
    /// Minutes count from local midnight of the start day, so a range ending
    /// at the next midnight ends at minute 1440.
    pub fn minute_span(&self, range: &TimeRange) -> (NaiveDate, u32, u32) {
        let start = range.start().with_timezone(&self.tz);
        let end = range.end().with_timezone(&self.tz);
        let day = start.date_naive();

        let start_minute = start.hour() * 60 + start.minute();
        let day_offset = (end.date_naive() - day).num_days().max(0) as u32;
        let end_minute = day_offset * MINUTES_PER_DAY + end.hour() * 60 + end.minute();
        (day, start_minute, end_minute)
    }

    /// The instants spanning local days `first..=last`: midnight of `first`
    /// up to midnight after `last`.
    ///
    /// # Errors
    /// Returns [`SlotError::InvalidDayRange`] when `last < first`.
    pub fn day_range(&self, first: NaiveDate, last: NaiveDate) -> Result<TimeRange> {
        if last < first {
            return Err(SlotError::InvalidDayRange(format!(
                "{} is before {}",
                last, first
            )));
        }
        let start = self.instant_at(first, 0);
        let end = self.instant_at(last, MINUTES_PER_DAY);
        match (start, end) {
            (Some(start), Some(end)) => TimeRange::try_new(start, end),
            _ => Err(SlotError::InvalidDayRange(format!("{}..={}", first, last))),
        }
    }

    /// Business days in `first..=last`, the rows of the selection grid.
    pub fn grid_days(&self, first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
        first
            .iter_days()
            .take_while(|day| *day <= last)
            .filter(|day| self.is_business_day(*day))
            .collect()
    }

    /// Start minutes of the selection grid's columns: from the work start,
    /// one per slot, keeping only columns that end by the work end.
    pub fn grid_columns(&self, slot: SlotLength) -> Vec<u32> {
        let step = slot.minutes();
        let end = self.work_end_hour * 60;
        let mut columns = Vec::new();
        let mut minute = self.work_start_hour * 60;
        while minute + step <= end {
            columns.push(minute);
            minute += step;
        }
        columns
    }
}
