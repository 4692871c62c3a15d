//! Tests for business-window generation and timezone conversions.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use slot_engine::calendar::BusinessCalendar;
use slot_engine::interval::TimeRange;
use slot_engine::slots::SlotLength;
use slot_engine::SlotError;

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, mo, d).unwrap()
}

fn query(start: &str, end: &str) -> TimeRange {
    TimeRange::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
}

#[test]
fn rejects_unknown_timezone() {
    let err = BusinessCalendar::new("Mars/Olympus_Mons", 9, 17).unwrap_err();
    assert!(matches!(err, SlotError::InvalidTimezone(_)));
}

#[test]
fn rejects_invalid_work_hours() {
    for (start, end) in [(9, 9), (18, 8), (0, 25)] {
        let err = BusinessCalendar::new("UTC", start, end).unwrap_err();
        assert!(matches!(err, SlotError::InvalidWorkHours { .. }));
    }
    assert!(BusinessCalendar::new("UTC", 0, 24).is_ok());
}

#[test]
fn one_window_per_weekday() {
    // Mon 2026-03-16 through Fri 2026-03-20.
    let cal = BusinessCalendar::new("UTC", 9, 18).unwrap();
    let windows = cal.business_windows(&query("2026-03-16T00:00:00Z", "2026-03-21T00:00:00Z"));

    assert_eq!(windows.len(), 5);
    for (i, window) in windows.iter().enumerate() {
        let day = 16 + i as u32;
        assert_eq!(window.start(), utc(2026, 3, day, 9, 0));
        assert_eq!(window.end(), utc(2026, 3, day, 18, 0));
    }
}

#[test]
fn weekend_inside_range_contributes_nothing() {
    // Fri 2026-03-20 .. Mon 2026-03-23; Saturday and Sunday lie fully inside.
    let cal = BusinessCalendar::new("UTC", 9, 18).unwrap();
    let windows = cal.business_windows(&query("2026-03-20T00:00:00Z", "2026-03-24T00:00:00Z"));

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].start(), utc(2026, 3, 20, 9, 0));
    assert_eq!(windows[1].start(), utc(2026, 3, 23, 9, 0));
}

#[test]
fn range_of_only_weekend_yields_no_windows() {
    let cal = BusinessCalendar::new("UTC", 9, 18).unwrap();
    let windows = cal.business_windows(&query("2026-03-21T00:00:00Z", "2026-03-23T00:00:00Z"));
    assert!(windows.is_empty());
}

#[test]
fn windows_are_clipped_to_the_query() {
    let cal = BusinessCalendar::new("UTC", 9, 18).unwrap();
    let windows = cal.business_windows(&query("2026-03-16T12:00:00Z", "2026-03-17T10:30:00Z"));

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].start(), utc(2026, 3, 16, 12, 0));
    assert_eq!(windows[0].end(), utc(2026, 3, 16, 18, 0));
    assert_eq!(windows[1].start(), utc(2026, 3, 17, 9, 0));
    assert_eq!(windows[1].end(), utc(2026, 3, 17, 10, 30));
}

#[test]
fn query_outside_work_hours_yields_no_windows() {
    let cal = BusinessCalendar::new("UTC", 9, 18).unwrap();
    let windows = cal.business_windows(&query("2026-03-16T18:00:00Z", "2026-03-17T09:00:00Z"));
    assert!(windows.is_empty());
}

#[test]
fn weekday_is_judged_in_the_calendar_timezone() {
    // 2026-03-15T23:00Z is a Sunday in UTC but Monday 08:00 in Tokyo.
    let cal = BusinessCalendar::new("Asia/Tokyo", 8, 18).unwrap();
    let windows = cal.business_windows(&query("2026-03-15T15:00:00Z", "2026-03-16T15:00:00Z"));

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start(), utc(2026, 3, 15, 23, 0));
    assert_eq!(windows[0].end(), utc(2026, 3, 16, 9, 0));
}

#[test]
fn work_hours_follow_dst_offsets() {
    // New York switches to EDT on Sunday 2026-03-08.
    let cal = BusinessCalendar::new("America/New_York", 9, 17).unwrap();
    let windows = cal.business_windows(&query("2026-03-06T00:00:00Z", "2026-03-10T00:00:00Z"));

    assert_eq!(windows.len(), 2);
    // Friday, EST (UTC-5).
    assert_eq!(windows[0].start(), utc(2026, 3, 6, 14, 0));
    assert_eq!(windows[0].end(), utc(2026, 3, 6, 22, 0));
    // Monday, EDT (UTC-4).
    assert_eq!(windows[1].start(), utc(2026, 3, 9, 13, 0));
    assert_eq!(windows[1].end(), utc(2026, 3, 9, 21, 0));
}

#[test]
fn work_end_hour_24_reaches_next_midnight() {
    let cal = BusinessCalendar::new("UTC", 20, 24).unwrap();
    let windows = cal.business_windows(&query("2026-03-16T00:00:00Z", "2026-03-17T00:00:00Z"));
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].end(), utc(2026, 3, 17, 0, 0));
}

#[test]
fn minute_span_is_wall_clock_in_calendar_timezone() {
    let cal = BusinessCalendar::new("Asia/Tokyo", 8, 18).unwrap();
    let range = TimeRange::new(utc(2026, 3, 16, 0, 0), utc(2026, 3, 16, 1, 30)).unwrap();
    assert_eq!(cal.minute_span(&range), (date(2026, 3, 16), 540, 630));
}

#[test]
fn minute_span_ending_at_midnight_is_1440() {
    let cal = BusinessCalendar::new("UTC", 0, 24).unwrap();
    let range = TimeRange::new(utc(2026, 3, 16, 23, 0), utc(2026, 3, 17, 0, 0)).unwrap();
    assert_eq!(cal.minute_span(&range), (date(2026, 3, 16), 1380, 1440));
}

#[test]
fn instant_at_round_trips_minute_span() {
    let cal = BusinessCalendar::new("Europe/Berlin", 8, 18).unwrap();
    let start = cal.instant_at(date(2026, 7, 1), 9 * 60 + 15).unwrap();
    assert_eq!(start, utc(2026, 7, 1, 7, 15));
}

#[test]
fn day_range_spans_whole_local_days() {
    let cal = BusinessCalendar::new("Asia/Tokyo", 8, 18).unwrap();
    let range = cal.day_range(date(2026, 3, 16), date(2026, 3, 17)).unwrap();
    assert_eq!(range.start(), utc(2026, 3, 15, 15, 0));
    assert_eq!(range.end(), utc(2026, 3, 17, 15, 0));
}

#[test]
fn day_range_rejects_inverted_days() {
    let cal = BusinessCalendar::new("UTC", 8, 18).unwrap();
    let err = cal.day_range(date(2026, 3, 17), date(2026, 3, 16)).unwrap_err();
    assert!(matches!(err, SlotError::InvalidDayRange(_)));
}

#[test]
fn grid_days_skip_weekends() {
    let cal = BusinessCalendar::new("UTC", 8, 18).unwrap();
    let days = cal.grid_days(date(2026, 3, 20), date(2026, 3, 23));
    assert_eq!(days, vec![date(2026, 3, 20), date(2026, 3, 23)]);
}

#[test]
fn grid_columns_drop_partial_tail() {
    let cal = BusinessCalendar::new("UTC", 8, 10).unwrap();
    let columns = cal.grid_columns(SlotLength::new(45).unwrap());
    // 08:00, 08:45; 09:30 + 45 would pass 10:00.
    assert_eq!(columns, vec![480, 525]);
}
