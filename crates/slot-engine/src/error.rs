//! Error types for slot-engine operations.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// The query window is empty or inverted. Rejected before any computation.
    #[error("Invalid range: end ({end}) must be later than start ({start})")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// An inverted calendar-day range (last day before first day).
    #[error("Invalid day range: {0}")]
    InvalidDayRange(String),

    /// A selected cell whose start minute lies outside its day.
    #[error("Invalid cell: {day} startMinute {start_minute} (expected 0 <= startMinute < 1440)")]
    InvalidCell { day: NaiveDate, start_minute: u32 },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid work hours: {start}-{end} (expected 0 <= start < end <= 24)")]
    InvalidWorkHours { start: u32, end: u32 },

    #[error("slotMinutes must be between 15 and 180, got {0}")]
    InvalidSlotMinutes(u32),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    /// A required configuration key is absent. Fatal at startup.
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid proposal: {0}")]
    InvalidProposal(String),

    /// The guest has not selected any cell; submission is blocked.
    #[error("Nothing selected: choose at least one candidate time")]
    NothingSelected,
}

pub type Result<T> = std::result::Result<T, SlotError>;
