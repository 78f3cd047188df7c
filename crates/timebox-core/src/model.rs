//! Record types shared by the codecs, the conflict engine, and the planner.
//!
//! Serde names follow the external camelCase convention so that decode
//! results and persisted snapshots keep the field names the presentation
//! layer and existing storage already use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a busy event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSource {
    /// Imported directly from a calendar file.
    #[serde(rename = "ics")]
    Ics,
    /// Produced by re-encoding CSV rows as a calendar.
    #[serde(rename = "csv-ics")]
    CsvIcs,
}

/// A read-only calendar entry imported from an external source.
///
/// The `id` is a content hash of (start, end, title), so re-importing the
/// same file for the same day reproduces the same ids. The whole busy
/// collection is replaced on each import; individual events are never
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub source: EventSource,
    #[serde(default)]
    pub all_day: bool,
}

/// A user-authored interval of focused time, fully editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBlock {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PlanBlock {
    /// Title given to blocks created without an explicit one.
    pub const DEFAULT_TITLE: &'static str = "Focus Block";
}

/// What kind of interval a plan block collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Busy,
    Plan,
}

/// A directed overlap fact: `plan_block_id` overlaps `conflicts_with`.
///
/// Plan-vs-plan overlaps are reported in both directions as two separate
/// facts. The conflict list is a pure function of the current collections
/// and must be treated as stale the instant either collection changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub plan_block_id: String,
    pub conflicts_with: String,
    #[serde(rename = "type")]
    pub kind: ConflictKind,
}

/// Result of decoding an ICS document for one target day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IcsParseResult {
    /// Events that survived all policies and the day filter.
    pub events: Vec<BusyEvent>,
    /// Count of all VEVENT components found, before any filtering.
    pub total_events: usize,
    /// `total_events - events.len()`. Deliberately conflates
    /// policy-excluded events with events outside the target day, so it
    /// can legitimately exceed `ignored_reasons.len()`.
    pub ignored_count: usize,
    /// One human-readable line per policy-excluded or unparseable event.
    pub ignored_reasons: Vec<String>,
}

/// One CSV data row after validation, with its 1-indexed position in the
/// source file (the header is row 1, so the first data row is 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCsvRow {
    pub row_number: usize,
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Result of validating a CSV table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvParseResult {
    pub rows: Vec<ParsedCsvRow>,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub has_errors: bool,
}
