//! Guest-side selection: grid cells the guest toggled on, and their
//! re-aggregation into minimal contiguous proposed intervals.
//!
//! A cell is a `(local day, start minute)` pair. Whether it is available
//! depends on the current slot length and the free intervals, both of which
//! change over a session; [`Selection::prune`] is the only rule that
//! reconciles the two. Cells are never re-mapped to a different slot size.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::calendar::{BusinessCalendar, MINUTES_PER_DAY};
use crate::error::SlotError;
use crate::interval::TimeRange;
use crate::slots::SlotLength;

/// One discretized grid position the guest toggled on.
///
/// Deserialization rejects a `startMinute` outside the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCell")]
pub struct SelectedCell {
    pub day: NaiveDate,
    pub start_minute: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCell {
    day: NaiveDate,
    start_minute: u32,
}

impl TryFrom<RawCell> for SelectedCell {
    type Error = SlotError;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        if raw.start_minute >= MINUTES_PER_DAY {
            return Err(SlotError::InvalidCell {
                day: raw.day,
                start_minute: raw.start_minute,
            });
        }
        Ok(Self::new(raw.day, raw.start_minute))
    }
}

impl SelectedCell {
    pub fn new(day: NaiveDate, start_minute: u32) -> Self {
        Self { day, start_minute }
    }

    /// End minute of the cell for `slot`, or `None` when the cell does not
    /// fit inside its day.
    pub fn end_minute(&self, slot: SlotLength) -> Option<u32> {
        self.start_minute
            .checked_add(slot.minutes())
            .filter(|end| *end <= MINUTES_PER_DAY)
    }
}

/// A contiguous run of selected cells on one day, submitted as a candidate.
///
/// `id` is an opaque session-local token, not derived from content and not
/// stable across resubmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedInterval {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Free intervals indexed by calendar-local day as `[start, end)` minute spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayAvailability {
    by_day: BTreeMap<NaiveDate, Vec<(u32, u32)>>,
}

impl DayAvailability {
    pub fn from_free_intervals(free: &[TimeRange], calendar: &BusinessCalendar) -> Self {
        let mut by_day: BTreeMap<NaiveDate, Vec<(u32, u32)>> = BTreeMap::new();
        for interval in free {
            let (day, start, end) = calendar.minute_span(interval);
            by_day.entry(day).or_default().push((start, end));
        }
        for spans in by_day.values_mut() {
            spans.sort_unstable();
        }
        Self { by_day }
    }

    /// True when `[cell.start_minute, +slot)` fits inside one free span.
    pub fn is_available(&self, cell: &SelectedCell, slot: SlotLength) -> bool {
        let Some(end) = cell.end_minute(slot) else {
            return false;
        };
        self.by_day.get(&cell.day).is_some_and(|spans| {
            spans
                .iter()
                .any(|&(s, e)| cell.start_minute >= s && end <= e)
        })
    }

    pub fn spans(&self, day: NaiveDate) -> &[(u32, u32)] {
        self.by_day.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}

/// Visual state of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// No backing free interval; not interactive.
    Unavailable,
    Available { selected: bool },
}

/// The set of selected cells, keyed by `(day, start minute)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    cells: BTreeSet<SelectedCell>,
}

impl FromIterator<SelectedCell> for Selection {
    fn from_iter<I: IntoIterator<Item = SelectedCell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, cell: &SelectedCell) -> bool {
        self.cells.contains(cell)
    }

    pub fn insert(&mut self, cell: SelectedCell) -> bool {
        self.cells.insert(cell)
    }

    pub fn remove(&mut self, cell: &SelectedCell) -> bool {
        self.cells.remove(cell)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedCell> {
        self.cells.iter()
    }

    pub fn cell_state(
        &self,
        cell: &SelectedCell,
        availability: &DayAvailability,
        slot: SlotLength,
    ) -> CellState {
        if availability.is_available(cell, slot) {
            CellState::Available {
                selected: self.contains(cell),
            }
        } else {
            CellState::Unavailable
        }
    }

    /// Drop every cell that no longer maps to an available slot. Returns the
    /// number of cells removed.
    pub fn prune(&mut self, availability: &DayAvailability, slot: SlotLength) -> usize {
        let before = self.cells.len();
        self.cells.retain(|cell| availability.is_available(cell, slot));
        let removed = before - self.cells.len();
        if removed > 0 {
            debug!(removed, remaining = self.cells.len(), "pruned unavailable cells");
        }
        removed
    }

    /// Fold selected cells into minimal contiguous intervals per day, sorted
    /// by start instant.
    ///
    /// A run continues while the next start minute equals the run's end; any
    /// gap or a change of day closes it. Cells that overrun their day, and
    /// runs that collapse inside a DST gap, are skipped.
    pub fn aggregate(&self, slot: SlotLength, calendar: &BusinessCalendar) -> Vec<ProposedInterval> {
        let mut runs: Vec<(NaiveDate, u32, u32)> = Vec::new();

        // BTreeSet order groups by day and sorts start minutes ascending.
        for cell in &self.cells {
            let Some(cell_end) = cell.end_minute(slot) else {
                debug!(
                    day = %cell.day,
                    start_minute = cell.start_minute,
                    "skipping cell that overruns its day"
                );
                continue;
            };
            match runs.last_mut() {
                Some((day, _, end)) if *day == cell.day && *end == cell.start_minute => {
                    *end = cell_end;
                }
                _ => runs.push((cell.day, cell.start_minute, cell_end)),
            }
        }

        let mut proposed: Vec<ProposedInterval> = runs
            .into_iter()
            .filter_map(|(day, start_minute, end_minute)| {
                let start = calendar.instant_at(day, start_minute)?;
                let end = calendar.instant_at(day, end_minute)?;
                let Some(range) = TimeRange::new(start, end) else {
                    debug!(
                        day = %day,
                        start_minute,
                        end_minute,
                        "dropping selection that falls inside a DST gap"
                    );
                    return None;
                };
                Some(ProposedInterval {
                    id: Uuid::new_v4().to_string(),
                    start: range.start(),
                    end: range.end(),
                })
            })
            .collect();

        proposed.sort_by_key(|p| p.start);
        proposed
    }
}

/// What a drag gesture does to the cells it passes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Select,
    Unselect,
}

/// Pointer-driven toggling. The mode is fixed at pointer-down and replayed on
/// every pointer-enter until pointer-up, which may happen anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragGesture {
    mode: Option<DragMode>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    pub fn mode(&self) -> Option<DragMode> {
        self.mode
    }

    /// Start a drag on `cell`. Unavailable cells ignore the pointer and no
    /// drag begins. Returns whether the selection changed.
    pub fn pointer_down(
        &mut self,
        cell: SelectedCell,
        selection: &mut Selection,
        availability: &DayAvailability,
        slot: SlotLength,
    ) -> bool {
        if !availability.is_available(&cell, slot) {
            return false;
        }
        let mode = if selection.contains(&cell) {
            DragMode::Unselect
        } else {
            DragMode::Select
        };
        self.mode = Some(mode);
        Self::apply(mode, cell, selection)
    }

    /// Replay the drag mode on `cell` while a drag is active.
    pub fn pointer_enter(
        &mut self,
        cell: SelectedCell,
        selection: &mut Selection,
        availability: &DayAvailability,
        slot: SlotLength,
    ) -> bool {
        match self.mode {
            Some(mode) if availability.is_available(&cell, slot) => {
                Self::apply(mode, cell, selection)
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.mode = None;
    }

    fn apply(mode: DragMode, cell: SelectedCell, selection: &mut Selection) -> bool {
        match mode {
            DragMode::Select => selection.insert(cell),
            DragMode::Unselect => selection.remove(&cell),
        }
    }
}
