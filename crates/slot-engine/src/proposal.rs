//! Proposal intake: validate a guest's submission into a record ready for the
//! persistence and notification collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::BusinessCalendar;
use crate::error::{Result, SlotError};
use crate::freebusy::parse_datetime;
use crate::interval::TimeRange;
use crate::selection::ProposedInterval;

/// One candidate time as submitted over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionInput {
    pub start: String,
    pub end: String,
}

impl From<&ProposedInterval> for SuggestionInput {
    fn from(p: &ProposedInterval) -> Self {
        Self {
            start: p.start.to_rfc3339(),
            end: p.end.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub slot_suggestions: Vec<SuggestionInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub note: String,
    pub slot_suggestions: Vec<TimeRange>,
}

fn required(value: Option<&str>, field: &str) -> Result<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(SlotError::InvalidProposal(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

impl ProposalRecord {
    /// Validate `request` and stamp it with a fresh id and `now`.
    ///
    /// Suggestions past `max_suggestions` are truncated before parsing.
    ///
    /// # Errors
    /// [`SlotError::InvalidProposal`] when name or email is blank, no
    /// suggestion is given, or a kept suggestion is unparseable or inverted.
    pub fn from_request(
        request: &ProposalRequest,
        now: DateTime<Utc>,
        max_suggestions: usize,
    ) -> Result<Self> {
        let name = required(request.name.as_deref(), "name")?;
        let email = required(request.email.as_deref(), "email")?;
        if request.slot_suggestions.is_empty() {
            return Err(SlotError::InvalidProposal(
                "slotSuggestions is required".to_string(),
            ));
        }

        let slot_suggestions = request
            .slot_suggestions
            .iter()
            .take(max_suggestions)
            .map(|s| {
                let start = parse_datetime(&s.start)?;
                let end = parse_datetime(&s.end)?;
                TimeRange::new(start, end).ok_or_else(|| {
                    SlotError::InvalidProposal(format!("suggestion {} - {} is empty", s.start, s.end))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: Uuid::new_v4(),
            submitted_at: now,
            name,
            email,
            note: request
                .note
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            slot_suggestions,
        })
    }

    /// Numbered, human-readable suggestion lines in the calendar timezone,
    /// e.g. `1. 2026-03-16 (Mon) 09:00 - 10:30`.
    pub fn summary_lines(&self, calendar: &BusinessCalendar) -> Vec<String> {
        let tz = calendar.timezone();
        self.slot_suggestions
            .iter()
            .enumerate()
            .map(|(idx, range)| {
                let start = range.start().with_timezone(&tz);
                let end = range.end().with_timezone(&tz);
                format!(
                    "{}. {} - {}",
                    idx + 1,
                    start.format("%Y-%m-%d (%a) %H:%M"),
                    end.format("%H:%M")
                )
            })
            .collect()
    }
}
