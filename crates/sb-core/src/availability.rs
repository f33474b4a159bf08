//! Per-user availability index.
//!
//! Holds each user's declared free-time intervals and answers day-level
//! queries for the overlap engine. The availability store loads an index
//! snapshot and persists mutations; duplicate detection lives here, not in
//! the store.

use std::collections::HashMap;

use crate::error::{ScheduleError, ScheduleResult};
use crate::interval::Interval;
use crate::types::{DayOfWeek, Username};

/// In-memory collection of availability intervals, keyed by user.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    by_user: HashMap<Username, Vec<Interval>>,
}

impl AvailabilityIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an interval for a user.
    ///
    /// Rejects an exact value duplicate (same day, start, and end) with
    /// [`ScheduleError::DuplicateInterval`]; overlapping-but-distinct
    /// intervals are not merged and are accepted as-is.
    pub fn add(&mut self, user: &Username, interval: Interval) -> ScheduleResult<()> {
        let intervals = self.by_user.entry(user.clone()).or_default();
        if intervals.contains(&interval) {
            return Err(ScheduleError::DuplicateInterval);
        }
        intervals.push(interval);
        Ok(())
    }

    /// Removes an exact-match interval for a user.
    ///
    /// Fails with [`ScheduleError::NotFound`] when no identical interval is
    /// stored.
    pub fn remove(&mut self, user: &Username, interval: &Interval) -> ScheduleResult<()> {
        if let Some(intervals) = self.by_user.get_mut(user) {
            if let Some(idx) = intervals.iter().position(|stored| stored == interval) {
                intervals.remove(idx);
                return Ok(());
            }
        }
        Err(ScheduleError::NotFound(format!(
            "availability interval {interval}"
        )))
    }

    /// All stored intervals for a user on the given day, unordered.
    #[must_use]
    pub fn for_day(&self, user: &Username, day: DayOfWeek) -> Vec<Interval> {
        self.intervals_for(user)
            .iter()
            .filter(|interval| interval.day() == day)
            .copied()
            .collect()
    }

    /// All stored intervals for a user; empty when the user has none.
    #[must_use]
    pub fn intervals_for(&self, user: &Username) -> &[Interval] {
        self.by_user.get(user).map_or(&[], Vec::as_slice)
    }
}
