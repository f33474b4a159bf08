//! Overlap engine.
//!
//! Computes the shared free-time windows between two users' availability.
//! This feeds both the match finder (as a read-only query) and the session
//! scheduler (as the validation gate for proposals).

use crate::availability::AvailabilityIndex;
use crate::interval::Interval;
use crate::types::Username;

/// Minimum length, in minutes, for an overlap to qualify for matching and
/// session proposals.
pub const MIN_OVERLAP_MINUTES: u16 = 30;

/// Pairwise same-day overlaps between two interval sets, keeping only those
/// of at least `min_minutes`.
///
/// O(|a| * |b|) per day; at this scale no index beyond day grouping is
/// needed. The result is sorted by day then start for deterministic output,
/// and is empty (not an error) when nothing qualifies.
#[must_use]
pub fn qualifying_overlaps(a: &[Interval], b: &[Interval], min_minutes: u16) -> Vec<Interval> {
    let mut windows: Vec<Interval> = a
        .iter()
        .flat_map(|mine| b.iter().filter_map(|theirs| mine.overlap(theirs)))
        .filter(|window| window.duration_minutes() >= min_minutes)
        .collect();
    windows.sort_unstable();
    windows.dedup();
    windows
}

/// All qualifying overlaps between two users' full weekly availability.
#[must_use]
pub fn shared_windows(
    availability: &AvailabilityIndex,
    a: &Username,
    b: &Username,
    min_minutes: u16,
) -> Vec<Interval> {
    qualifying_overlaps(
        availability.intervals_for(a),
        availability.intervals_for(b),
        min_minutes,
    )
}
