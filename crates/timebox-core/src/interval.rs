//! The half-open interval overlap primitive.
//!
//! Everything else in the crate reduces "do these two things collide?" to
//! this one comparison. Touching endpoints (one interval ending exactly
//! when another starts) are NOT an overlap.

use chrono::{DateTime, Utc};

/// True iff `[start_a, end_a)` and `[start_b, end_b)` intersect.
///
/// Two intervals overlap when each starts before the other ends:
/// `start_a < end_b && start_b < end_a`. The relation is symmetric, and
/// any interval with positive duration overlaps itself.
pub fn overlaps(
    start_a: DateTime<Utc>,
    end_a: DateTime<Utc>,
    start_b: DateTime<Utc>,
    end_b: DateTime<Utc>,
) -> bool {
    start_a < end_b && start_b < end_a
}
