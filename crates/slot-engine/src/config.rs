//! Scheduler configuration, loaded once at startup from TOML.
//!
//! ```toml
//! timezone = "Asia/Tokyo"
//! work_start_hour = 8
//! work_end_hour = 18
//! default_slot_minutes = 30
//! ```
//!
//! The timezone and work hours are mandatory. Their absence is a startup
//! failure ([`SlotError::ConfigMissing`]), never a per-request condition.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::BusinessCalendar;
use crate::error::{Result, SlotError};
use crate::slots::SlotLength;

pub const DEFAULT_SLOT_MINUTES: u32 = 30;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;
pub const DEFAULT_RANGE_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// IANA timezone the business hours are expressed in.
    pub timezone: Option<String>,
    pub work_start_hour: Option<u32>,
    pub work_end_hour: Option<u32>,
    #[serde(default = "default_slot_minutes")]
    pub default_slot_minutes: u32,
    /// Proposed intervals kept per submission; the rest are truncated.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Query length used when a request omits its end.
    #[serde(default = "default_range_days")]
    pub default_range_days: i64,
}

fn default_slot_minutes() -> u32 {
    DEFAULT_SLOT_MINUTES
}

fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

fn default_range_days() -> i64 {
    DEFAULT_RANGE_DAYS
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            work_start_hour: None,
            work_end_hour: None,
            default_slot_minutes: DEFAULT_SLOT_MINUTES,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            default_range_days: DEFAULT_RANGE_DAYS,
        }
    }
}

impl SchedulerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file.
    ///
    /// # Errors
    /// Returns [`SlotError::Io`] if the file cannot be read and
    /// [`SlotError::ConfigParse`] if it is not valid config TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the business-calendar part of the config.
    ///
    /// # Errors
    /// [`SlotError::ConfigMissing`] names the first absent key; invalid values
    /// surface as [`SlotError::InvalidTimezone`] or
    /// [`SlotError::InvalidWorkHours`].
    pub fn calendar(&self) -> Result<BusinessCalendar> {
        let timezone = self
            .timezone
            .as_deref()
            .ok_or(SlotError::ConfigMissing("timezone"))?;
        let start = self
            .work_start_hour
            .ok_or(SlotError::ConfigMissing("work_start_hour"))?;
        let end = self
            .work_end_hour
            .ok_or(SlotError::ConfigMissing("work_end_hour"))?;
        BusinessCalendar::new(timezone, start, end)
    }

    pub fn default_slot(&self) -> Result<SlotLength> {
        SlotLength::new(self.default_slot_minutes)
    }
}
