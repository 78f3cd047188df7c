//! Planner state — the explicit state object owned by the application
//! controller.
//!
//! Holds the selected day, the visible hour window, both interval
//! collections, and the current conflict list. Every mutation of either
//! collection recomputes conflicts before returning, so callers can never
//! observe a stale conflict list through this type. The core operations
//! themselves ([`detect_conflicts`] and the codecs) stay pure functions;
//! this type only sequences them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::conflict::detect_conflicts;
use crate::error::{Result, TimeboxError};
use crate::id::IdProvider;
use crate::model::{BusyEvent, Conflict, PlanBlock};

const DEFAULT_START_HOUR: u32 = 8;
const DEFAULT_END_HOUR: u32 = 18;

/// Partial update for a plan block. Outer `None` leaves a field
/// unchanged; for the optional fields, `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct PlanBlockPatch {
    pub title: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub location: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

/// The keyed persistence surface: plan blocks plus the visible hour
/// window. Busy events and conflicts are derived state and are not
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSnapshot {
    pub plan_blocks: Vec<PlanBlock>,
    pub start_hour: u32,
    pub end_hour: u32,
}

/// One day-planning session's state.
#[derive(Debug, Clone)]
pub struct PlannerState {
    selected_date: NaiveDate,
    start_hour: u32,
    end_hour: u32,
    busy_events: Vec<BusyEvent>,
    plan_blocks: Vec<PlanBlock>,
    conflicts: Vec<Conflict>,
}

impl PlannerState {
    /// Fresh state for the given day with the default 8–18 hour window.
    pub fn new(selected_date: NaiveDate) -> Self {
        Self {
            selected_date,
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            busy_events: Vec::new(),
            plan_blocks: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// The visible hour window as `(start_hour, end_hour)`.
    pub fn time_window(&self) -> (u32, u32) {
        (self.start_hour, self.end_hour)
    }

    pub fn busy_events(&self) -> &[BusyEvent] {
        &self.busy_events
    }

    pub fn plan_blocks(&self) -> &[PlanBlock] {
        &self.plan_blocks
    }

    /// The conflict list for the current collections. Recomputed by every
    /// mutating method, never stale.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn set_selected_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    /// Change the visible hour window.
    ///
    /// # Errors
    ///
    /// [`TimeboxError::InvalidWindow`] when the window is empty
    /// (`start >= end`) or reaches past hour 24.
    pub fn set_time_window(&mut self, start: u32, end: u32) -> Result<()> {
        if start >= end || end > 24 {
            return Err(TimeboxError::InvalidWindow { start, end });
        }
        self.start_hour = start;
        self.end_hour = end;
        Ok(())
    }

    /// Replace the whole busy collection (import semantics — never a merge).
    pub fn set_busy_events(&mut self, events: Vec<BusyEvent>) {
        self.busy_events = events;
        self.recompute();
    }

    pub fn clear_busy_events(&mut self) {
        self.busy_events.clear();
        self.recompute();
    }

    /// Add a fully-formed plan block (bulk import path).
    pub fn add_plan_block(&mut self, block: PlanBlock) {
        self.plan_blocks.push(block);
        self.recompute();
    }

    /// Create a new block with the default title, minting its id through
    /// the given provider. Returns the new block's id.
    pub fn create_block(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        ids: &dyn IdProvider,
    ) -> String {
        let id = ids.plan_block_id();
        self.plan_blocks.push(PlanBlock {
            id: id.clone(),
            title: PlanBlock::DEFAULT_TITLE.to_string(),
            start,
            end,
            location: None,
            notes: None,
        });
        self.recompute();
        id
    }

    /// Apply a partial update (edit, drag, or resize) to one block.
    ///
    /// # Errors
    ///
    /// [`TimeboxError::UnknownBlock`] when no block has the given id.
    pub fn update_plan_block(&mut self, id: &str, patch: PlanBlockPatch) -> Result<()> {
        let block = self
            .plan_blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| TimeboxError::UnknownBlock(id.to_string()))?;

        if let Some(title) = patch.title {
            block.title = title;
        }
        if let Some(start) = patch.start {
            block.start = start;
        }
        if let Some(end) = patch.end {
            block.end = end;
        }
        if let Some(location) = patch.location {
            block.location = location;
        }
        if let Some(notes) = patch.notes {
            block.notes = notes;
        }

        self.recompute();
        Ok(())
    }

    /// Delete one block.
    ///
    /// # Errors
    ///
    /// [`TimeboxError::UnknownBlock`] when no block has the given id.
    pub fn delete_plan_block(&mut self, id: &str) -> Result<()> {
        let index = self
            .plan_blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| TimeboxError::UnknownBlock(id.to_string()))?;
        self.plan_blocks.remove(index);
        self.recompute();
        Ok(())
    }

    pub fn clear_plan_blocks(&mut self) {
        self.plan_blocks.clear();
        self.recompute();
    }

    /// Capture the persistable slice of this state.
    pub fn snapshot(&self) -> PlannerSnapshot {
        PlannerSnapshot {
            plan_blocks: self.plan_blocks.clone(),
            start_hour: self.start_hour,
            end_hour: self.end_hour,
        }
    }

    /// Restore a snapshot into this state, keeping the current busy
    /// collection and recomputing conflicts against it.
    pub fn restore(&mut self, snapshot: PlannerSnapshot) {
        self.plan_blocks = snapshot.plan_blocks;
        self.start_hour = snapshot.start_hour;
        self.end_hour = snapshot.end_hour;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.conflicts = detect_conflicts(&self.plan_blocks, &self.busy_events);
    }
}
