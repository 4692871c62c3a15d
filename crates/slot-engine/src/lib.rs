//! # slot-engine
//!
//! Availability and slot computation for proposing meetings to a guest.
//!
//! Busy ranges from a calendar provider are subtracted from per-day business
//! windows to produce free intervals, which are cut into fixed-length slots.
//! On the guest side, selected grid cells are folded back into minimal
//! contiguous proposed intervals.
//!
//! ## Modules
//!
//! - [`interval`] -- `TimeRange` and merge / clip / subtract
//! - [`calendar`] -- business windows and all timezone conversions
//! - [`dst`] -- wall-clock resolution across DST transitions
//! - [`freebusy`] -- busy entries → free intervals
//! - [`slots`] -- free intervals → fixed-length slots
//! - [`selection`] -- selected cells → proposed intervals, drag gestures
//! - [`overview`] -- per-day busy overview, all-day entries included
//! - [`view`] -- guest-side view state with stale-fetch protection
//! - [`availability`] -- per-request query resolution and response shapes
//! - [`proposal`] -- submission validation
//! - [`config`] -- TOML configuration
//! - [`error`] -- Error types

pub mod availability;
pub mod calendar;
pub mod config;
pub mod dst;
pub mod error;
pub mod freebusy;
pub mod interval;
pub mod overview;
pub mod proposal;
pub mod selection;
pub mod slots;
pub mod view;

pub use availability::{
    AvailabilityQuery, FreeIntervalsResponse, OverviewResponse, SlotsResponse,
};
pub use calendar::BusinessCalendar;
pub use config::SchedulerConfig;
pub use error::SlotError;
pub use freebusy::{build_free_intervals, parse_busy, BusyEntry};
pub use interval::{clip, merge_overlapping, subtract, TimeRange};
pub use overview::{day_overview, DayOverview};
pub use proposal::{ProposalRecord, ProposalRequest};
pub use selection::{ProposedInterval, SelectedCell, Selection};
pub use slots::{discretize, SlotLength};
pub use view::{FetchOutcome, SchedulerViewState};
