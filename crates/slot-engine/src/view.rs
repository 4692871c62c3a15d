//! The guest-side controller: one value owning the query, the slot size,
//! fetched availability and the selection, updated only through methods
//! that recompute derived state.
//!
//! Fetches are tagged with a monotonically increasing sequence number and
//! only the most recently issued one may update the view, so a slow stale
//! response can never overwrite a newer one.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::BusinessCalendar;
use crate::config::SchedulerConfig;
use crate::error::{Result, SlotError};
use crate::interval::TimeRange;
use crate::selection::{
    CellState, DayAvailability, DragGesture, ProposedInterval, SelectedCell, Selection,
};
use crate::slots::SlotLength;

/// Delay that collapses rapid date / slot-size edits into one recompute.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Handle for one issued availability fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    range: TimeRange,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The instants the caller should fetch busy data for.
    pub fn range(&self) -> TimeRange {
        self.range
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was applied; `pruned` cells lost their backing slot.
    Applied { pruned: usize },
    /// A newer fetch has been issued since; the response was discarded.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SchedulerViewState {
    calendar: BusinessCalendar,
    max_suggestions: usize,
    days: Option<(NaiveDate, NaiveDate)>,
    slot: SlotLength,
    free_intervals: Vec<TimeRange>,
    availability: DayAvailability,
    selection: Selection,
    drag: DragGesture,
    issued_seq: u64,
}

impl SchedulerViewState {
    pub fn new(calendar: BusinessCalendar, slot: SlotLength, max_suggestions: usize) -> Self {
        Self {
            calendar,
            max_suggestions,
            days: None,
            slot,
            free_intervals: Vec::new(),
            availability: DayAvailability::default(),
            selection: Selection::new(),
            drag: DragGesture::new(),
            issued_seq: 0,
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        Ok(Self::new(
            config.calendar()?,
            config.default_slot()?,
            config.max_suggestions,
        ))
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    pub fn slot(&self) -> SlotLength {
        self.slot
    }

    pub fn days(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.days
    }

    pub fn free_intervals(&self) -> &[TimeRange] {
        &self.free_intervals
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Change the visible day range and issue a fetch for it.
    ///
    /// Any earlier outstanding ticket becomes stale.
    ///
    /// # Errors
    /// [`SlotError::InvalidDayRange`] when `last < first`.
    pub fn request_range(&mut self, first: NaiveDate, last: NaiveDate) -> Result<FetchTicket> {
        let range = self.calendar.day_range(first, last)?;
        self.days = Some((first, last));
        self.issued_seq += 1;
        Ok(FetchTicket {
            seq: self.issued_seq,
            range,
        })
    }

    /// Install fetched free intervals if `ticket` is the latest issued, then
    /// prune selections that no longer map to an available slot.
    pub fn apply_fetch(&mut self, ticket: &FetchTicket, free: Vec<TimeRange>) -> FetchOutcome {
        if ticket.seq != self.issued_seq {
            debug!(
                seq = ticket.seq,
                latest = self.issued_seq,
                "discarding stale availability response"
            );
            return FetchOutcome::Stale;
        }
        self.availability = DayAvailability::from_free_intervals(&free, &self.calendar);
        self.free_intervals = free;
        FetchOutcome::Applied {
            pruned: self.selection.prune(&self.availability, self.slot),
        }
    }

    /// Switch slot size; returns the number of cells pruned.
    pub fn set_slot_length(&mut self, slot: SlotLength) -> usize {
        self.slot = slot;
        self.selection.prune(&self.availability, slot)
    }

    /// Weekday rows for the current day range.
    pub fn grid_days(&self) -> Vec<NaiveDate> {
        match self.days {
            Some((first, last)) => self.calendar.grid_days(first, last),
            None => Vec::new(),
        }
    }

    pub fn grid_columns(&self) -> Vec<u32> {
        self.calendar.grid_columns(self.slot)
    }

    pub fn cell_state(&self, cell: &SelectedCell) -> CellState {
        self.selection
            .cell_state(cell, &self.availability, self.slot)
    }

    pub fn pointer_down(&mut self, cell: SelectedCell) -> bool {
        self.drag
            .pointer_down(cell, &mut self.selection, &self.availability, self.slot)
    }

    pub fn pointer_enter(&mut self, cell: SelectedCell) -> bool {
        self.drag
            .pointer_enter(cell, &mut self.selection, &self.availability, self.slot)
    }

    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The current selection aggregated into proposed intervals.
    pub fn proposals(&self) -> Vec<ProposedInterval> {
        self.selection.aggregate(self.slot, &self.calendar)
    }

    /// Proposed intervals ready to submit, capped at the configured maximum.
    ///
    /// # Errors
    /// [`SlotError::NothingSelected`] when the selection is empty.
    pub fn submission(&self) -> Result<Vec<ProposedInterval>> {
        let mut proposals = self.proposals();
        if proposals.is_empty() {
            return Err(SlotError::NothingSelected);
        }
        proposals.truncate(self.max_suggestions);
        Ok(proposals)
    }
}

/// Single-flight timer. Scheduling again replaces the pending deadline, so a
/// burst of edits fires once, `delay` after the last one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per schedule, the first time `now` reaches the deadline.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
