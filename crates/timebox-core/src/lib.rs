//! # timebox-core
//!
//! Core of a single-user day planner: overlays user-defined plan blocks
//! on top of imported calendar busy events for one day, detects time
//! overlaps, and exports the plan back out as a calendar file.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use timebox_core::{detect_conflicts, BusyEvent, EventSource, PlanBlock};
//!
//! let busy = BusyEvent {
//!     id: "standup".to_string(),
//!     title: "Standup".to_string(),
//!     start: Utc.with_ymd_and_hms(2025, 11, 12, 9, 0, 0).unwrap(),
//!     end: Utc.with_ymd_and_hms(2025, 11, 12, 10, 0, 0).unwrap(),
//!     location: None,
//!     source: EventSource::Ics,
//!     all_day: false,
//! };
//! let block = PlanBlock {
//!     id: "deep-work".to_string(),
//!     title: "Deep work".to_string(),
//!     start: Utc.with_ymd_and_hms(2025, 11, 12, 9, 30, 0).unwrap(),
//!     end: Utc.with_ymd_and_hms(2025, 11, 12, 11, 0, 0).unwrap(),
//!     location: None,
//!     notes: None,
//! };
//!
//! let conflicts = detect_conflicts(&[block], &[busy]);
//! assert_eq!(conflicts.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`interval`] — the half-open overlap primitive
//! - [`ics_decode`] — ICS document → busy events for one target day
//! - [`ics_encode`] — plan blocks → ICS document
//! - [`csv`] — CSV row validation + valid-rows-to-ICS export
//! - [`conflict`] — pairwise conflict detection and query filters
//! - [`planner`] — the session state object (collections + fresh conflicts)
//! - [`id`] — injected identifier provider
//! - [`time`] — day bounds and date/time parsing helpers
//! - [`error`] — error types
//!
//! The codecs and the conflict engine never call each other; they are
//! bound only through the record types in [`model`].

pub mod conflict;
pub mod csv;
pub mod error;
pub mod ics_decode;
pub mod ics_encode;
pub mod id;
pub mod interval;
pub mod model;
pub mod planner;
pub mod time;

pub use conflict::{conflicts_for_block, detect_conflicts, has_conflict};
pub use csv::{parse_csv, rows_to_ics};
pub use error::{Result, TimeboxError};
pub use ics_decode::parse_ics;
pub use ics_encode::generate_ics;
pub use id::{IdProvider, RandomIds, SequentialIds};
pub use interval::overlaps;
pub use model::{
    BusyEvent, Conflict, ConflictKind, CsvParseResult, EventSource, IcsParseResult, ParsedCsvRow,
    PlanBlock,
};
pub use planner::{PlanBlockPatch, PlannerSnapshot, PlannerState};
pub use time::{day_bounds, is_within_day};
