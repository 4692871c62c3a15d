//! Slot discretization: cut free intervals into fixed-length bookable slots.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::interval::TimeRange;

pub const MIN_SLOT_MINUTES: u32 = 15;
pub const MAX_SLOT_MINUTES: u32 = 180;

/// A validated slot size in minutes, `15..=180`.
///
/// Constructing one is how a caller validates the size before discretizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlotLength(u32);

impl SlotLength {
    /// # Errors
    /// Returns [`SlotError::InvalidSlotMinutes`] outside `15..=180`.
    pub fn new(minutes: u32) -> Result<Self> {
        if (MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(SlotError::InvalidSlotMinutes(minutes))
        }
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl TryFrom<u32> for SlotLength {
    type Error = SlotError;

    fn try_from(minutes: u32) -> Result<Self> {
        Self::new(minutes)
    }
}

impl From<SlotLength> for u32 {
    fn from(slot: SlotLength) -> Self {
        slot.0
    }
}

/// Number of whole slots that fit in `interval`.
pub fn slot_count(interval: &TimeRange, slot: SlotLength) -> i64 {
    interval.duration_minutes() / i64::from(slot.minutes())
}

/// Walk each free interval from its start in `slot`-sized steps.
///
/// A slot is emitted only while it ends at or before the interval's end; the
/// tail remainder is dropped. Output follows input order, which is global
/// chronological order for the ordered, disjoint output of
/// [`crate::freebusy::build_free_intervals`].
pub fn discretize(free: &[TimeRange], slot: SlotLength) -> Vec<TimeRange> {
    let step = slot.duration();
    let mut slots = Vec::new();

    for interval in free {
        let mut slot_start = interval.start();
        while slot_start + step <= interval.end() {
            if let Some(range) = TimeRange::new(slot_start, slot_start + step) {
                slots.push(range);
            }
            slot_start += step;
        }
    }

    debug!(
        intervals = free.len(),
        slot_minutes = slot.minutes(),
        slots = slots.len(),
        "free intervals discretized"
    );
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_length_bounds() {
        assert!(SlotLength::new(14).is_err());
        assert!(SlotLength::new(15).is_ok());
        assert!(SlotLength::new(180).is_ok());
        assert!(matches!(
            SlotLength::new(181),
            Err(SlotError::InvalidSlotMinutes(181))
        ));
    }

    #[test]
    fn slot_length_deserializes_through_validation() {
        assert_eq!(serde_json::from_str::<SlotLength>("45").unwrap().minutes(), 45);
        assert!(serde_json::from_str::<SlotLength>("5").is_err());
    }
}
