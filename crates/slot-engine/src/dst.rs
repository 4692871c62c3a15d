//! Resolution of wall-clock times that fall on DST transitions.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Longest forward search through a DST gap, in minutes. Real-world gaps are
/// at most two hours.
const MAX_GAP_MINUTES: i64 = 3 * 60;

/// Map a local wall-clock time in `tz` to an absolute instant.
///
/// - Ambiguous times (fall back) resolve to the earlier instant.
/// - Non-existent times (spring forward) shift forward to the first valid
///   local minute after the gap, i.e. the transition instant.
///
/// Returns `None` only if no valid time exists within [`MAX_GAP_MINUTES`].
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    let mut candidate = naive;
    for _ in 0..=MAX_GAP_MINUTES {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => return Some(earliest.with_timezone(&Utc)),
            LocalResult::None => candidate += Duration::minutes(1),
        }
    }
    None
}
