//! Error types for timebox-core operations.
//!
//! Only document-level and precondition failures become error values.
//! Per-event and per-row problems are data: they land in the
//! `ignored_reasons` / `errors` lists of the decode results and never
//! abort the surrounding operation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeboxError {
    /// The input could not be interpreted as a calendar document at all.
    #[error("Failed to parse ICS file: {0}")]
    IcsParse(String),

    /// `rows_to_ics` was invoked with zero valid rows.
    #[error("No valid rows to export")]
    NoValidRows,

    /// A planner mutation referenced a plan block id that does not exist.
    #[error("Unknown plan block: {0}")]
    UnknownBlock(String),

    /// The requested visible hour window is empty or out of range.
    #[error("Invalid time window: {start}..{end}")]
    InvalidWindow { start: u32, end: u32 },
}

pub type Result<T> = std::result::Result<T, TimeboxError>;
