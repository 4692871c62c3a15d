//! Property-based tests for the interval algebra and the slot pipeline.
//!
//! These hold for *any* busy set, not just the worked examples elsewhere.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use slot_engine::calendar::BusinessCalendar;
use slot_engine::freebusy::{build_free_intervals, busy_within, free_in_window};
use slot_engine::interval::{merge_overlapping, TimeRange};
use slot_engine::selection::{SelectedCell, Selection};
use slot_engine::slots::{discretize, slot_count, SlotLength};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap()
}

/// A busy range somewhere in a two-day span, 1 to 240 minutes long.
fn arb_busy() -> impl Strategy<Value = TimeRange> {
    (0i64..2 * 24 * 60, 1i64..=240).prop_map(|(offset, len)| {
        let start = base() + Duration::minutes(offset);
        TimeRange::new(start, start + Duration::minutes(len)).unwrap()
    })
}

fn arb_busy_set() -> impl Strategy<Value = Vec<TimeRange>> {
    prop::collection::vec(arb_busy(), 0..25)
}

fn arb_slot() -> impl Strategy<Value = SlotLength> {
    (15u32..=180).prop_map(|m| SlotLength::new(m).unwrap())
}

fn arb_timezone() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("UTC"),
        Just("Asia/Tokyo"),
        Just("America/New_York"),
        Just("Europe/London"),
    ]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

fn window() -> TimeRange {
    TimeRange::new(base() + Duration::hours(9), base() + Duration::hours(18)).unwrap()
}

// ---------------------------------------------------------------------------
// Property 1: merge_overlapping is sorted, minimal and idempotent
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn merge_is_minimal_and_idempotent(busy in arb_busy_set()) {
        let merged = merge_overlapping(&busy);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].end() < pair[1].start(), "ranges touch or overlap: {:?}", pair);
        }
        prop_assert_eq!(merge_overlapping(&merged), merged);
    }
}

// ---------------------------------------------------------------------------
// Property 2: free ∪ merged busy partitions the window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn free_and_busy_partition_window(busy in arb_busy_set()) {
        let window = window();
        let free = free_in_window(&window, &busy);
        let merged_busy = busy_within(&window, &busy);

        let mut pieces: Vec<TimeRange> = free.iter().chain(merged_busy.iter()).copied().collect();
        pieces.sort();

        // Contiguous tiling from window start to window end, no overlap.
        prop_assert!(!pieces.is_empty());
        prop_assert_eq!(pieces[0].start(), window.start());
        prop_assert_eq!(pieces[pieces.len() - 1].end(), window.end());
        for pair in pieces.windows(2) {
            prop_assert_eq!(pair[0].end(), pair[1].start());
        }

        // No free interval touches any busy range.
        for f in &free {
            prop_assert!(busy.iter().all(|b| !f.overlaps(b)));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: nothing escapes a business window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn free_and_slots_stay_in_business_windows(
        busy in arb_busy_set(),
        tz in arb_timezone(),
        slot in arb_slot(),
    ) {
        let cal = BusinessCalendar::new(tz, 8, 18).unwrap();
        let query = TimeRange::new(base(), base() + Duration::days(7)).unwrap();
        let windows = cal.business_windows(&query);
        let free = build_free_intervals(&query, &busy, &cal);
        let slots = discretize(&free, slot);

        for f in &free {
            prop_assert!(windows.iter().any(|w| w.contains(f)), "{:?} escapes", f);
            prop_assert!(cal.is_business_day(cal.local_date(f.start())));
        }
        for s in &slots {
            prop_assert!(free.iter().any(|f| f.contains(s)));
            prop_assert_eq!(s.duration_minutes(), i64::from(slot.minutes()));
        }
        for pair in free.windows(2) {
            prop_assert!(pair[0].end() <= pair[1].start());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: slot count per interval is floor(duration / slot)
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slot_count_is_floor(len in 1i64..=600, slot in arb_slot()) {
        let start = base() + Duration::hours(9);
        let interval = TimeRange::new(start, start + Duration::minutes(len)).unwrap();
        let slots = discretize(&[interval], slot);
        prop_assert_eq!(slots.len() as i64, slot_count(&interval, slot));
        prop_assert_eq!(slots.len() as i64, len / i64::from(slot.minutes()));
    }
}

// ---------------------------------------------------------------------------
// Property 5: selecting every slot and aggregating restores the interval
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn aggregating_all_slots_round_trips(
        start_minute in 0u32..=120,
        slot in arb_slot(),
        count in 1u32..=4,
    ) {
        let cal = BusinessCalendar::new("UTC", 0, 24).unwrap();
        let start = base() + Duration::minutes(i64::from(8 * 60 + start_minute));
        let len = i64::from(slot.minutes() * count);
        let interval = TimeRange::new(start, start + Duration::minutes(len)).unwrap();

        let selection: Selection = discretize(&[interval], slot)
            .iter()
            .map(|s| {
                let (day, minute, _) = cal.minute_span(s);
                SelectedCell::new(day, minute)
            })
            .collect();
        let proposed = selection.aggregate(slot, &cal);

        prop_assert_eq!(proposed.len(), 1);
        prop_assert_eq!(proposed[0].start, interval.start());
        prop_assert_eq!(proposed[0].end, interval.end());
    }
}
