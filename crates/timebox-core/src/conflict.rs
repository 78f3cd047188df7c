//! Conflict detection — pairwise overlaps between plan blocks and the
//! rest of the day.
//!
//! Full recomputation over a snapshot, O(P×(P+B)): every plan block is
//! tested against every busy event and every *other* plan block. The
//! plan-vs-plan relation is symmetric but reported as two directed facts
//! (A-overlaps-B and B-overlaps-A), because each block owns its own
//! warning list. A block is never compared against itself.
//!
//! Callers must not rely on output order beyond "outer loop over plan
//! blocks, inner loops over busy events then plan blocks, both in their
//! existing order".

use crate::interval::overlaps;
use crate::model::{BusyEvent, Conflict, ConflictKind, PlanBlock};

/// Compute the full conflict set for the given collections.
pub fn detect_conflicts(plan_blocks: &[PlanBlock], busy_events: &[BusyEvent]) -> Vec<Conflict> {
    let mut conflicts: Vec<Conflict> = Vec::new();

    for block in plan_blocks {
        for busy in busy_events {
            if overlaps(block.start, block.end, busy.start, busy.end) {
                conflicts.push(Conflict {
                    plan_block_id: block.id.clone(),
                    conflicts_with: busy.id.clone(),
                    kind: ConflictKind::Busy,
                });
            }
        }

        for other in plan_blocks {
            if other.id != block.id && overlaps(block.start, block.end, other.start, other.end) {
                conflicts.push(Conflict {
                    plan_block_id: block.id.clone(),
                    conflicts_with: other.id.clone(),
                    kind: ConflictKind::Plan,
                });
            }
        }
    }

    conflicts
}

/// All conflicts belonging to one plan block. Pure filter, no recomputation.
pub fn conflicts_for_block(block_id: &str, conflicts: &[Conflict]) -> Vec<Conflict> {
    conflicts
        .iter()
        .filter(|c| c.plan_block_id == block_id)
        .cloned()
        .collect()
}

/// Whether a plan block has any conflict at all.
pub fn has_conflict(block_id: &str, conflicts: &[Conflict]) -> bool {
    conflicts.iter().any(|c| c.plan_block_id == block_id)
}
