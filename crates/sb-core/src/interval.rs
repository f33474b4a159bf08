//! Half-open weekly time intervals.

use std::fmt;

use serde::Serialize;

use crate::error::{ScheduleError, ScheduleResult};
use crate::types::{DayOfWeek, TimeOfDay};

/// A half-open time range `[start, end)` within a single day of the week.
///
/// The invariant `start < end` is enforced at construction, so every interval
/// in circulation has positive duration. Two intervals are equal iff their
/// day, start, and end all match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Interval {
    day: DayOfWeek,
    start: TimeOfDay,
    end: TimeOfDay,
}

impl Interval {
    /// Creates an interval, rejecting `start >= end`.
    pub fn new(day: DayOfWeek, start: TimeOfDay, end: TimeOfDay) -> ScheduleResult<Self> {
        if start >= end {
            return Err(ScheduleError::InvalidInterval);
        }
        Ok(Self { day, start, end })
    }

    #[must_use]
    pub const fn day(&self) -> DayOfWeek {
        self.day
    }

    #[must_use]
    pub const fn start(&self) -> TimeOfDay {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Length of the interval in minutes. Always positive.
    #[must_use]
    pub const fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Intersection of two intervals.
    ///
    /// `None` when the days differ or the ranges only touch at an endpoint;
    /// otherwise the overlap `[max(starts), min(ends))`, which is non-empty by
    /// construction. Symmetric in its arguments.
    #[must_use]
    pub fn overlap(&self, other: &Self) -> Option<Self> {
        if self.day != other.day {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Self {
            day: self.day,
            start,
            end,
        })
    }

    /// True iff `inner` lies entirely within this interval on the same day.
    #[must_use]
    pub fn contains(&self, inner: &Self) -> bool {
        self.day == inner.day && self.start <= inner.start && inner.end <= self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(day: DayOfWeek, start: (u16, u16), end: (u16, u16)) -> Interval {
        Interval::new(
            day,
            TimeOfDay::from_hm(start.0, start.1).unwrap(),
            TimeOfDay::from_hm(end.0, end.1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_start_not_before_end() {
        let at = TimeOfDay::from_hm(10, 0).unwrap();
        let later = TimeOfDay::from_hm(11, 0).unwrap();
        assert!(matches!(
            Interval::new(DayOfWeek::Mon, at, at),
            Err(ScheduleError::InvalidInterval)
        ));
        assert!(matches!(
            Interval::new(DayOfWeek::Mon, later, at),
            Err(ScheduleError::InvalidInterval)
        ));
    }

    #[test]
    fn overlap_returns_intersection() {
        let a = interval(DayOfWeek::Mon, (14, 0), (15, 30));
        let b = interval(DayOfWeek::Mon, (14, 30), (16, 0));
        let ov = a.overlap(&b).unwrap();
        assert_eq!(ov, interval(DayOfWeek::Mon, (14, 30), (15, 30)));
        assert_eq!(ov.duration_minutes(), 60);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = interval(DayOfWeek::Wed, (9, 0), (11, 0));
        let b = interval(DayOfWeek::Wed, (10, 0), (12, 0));
        assert_eq!(a.overlap(&b), b.overlap(&a));
    }

    #[test]
    fn overlap_duration_never_exceeds_either_input() {
        let a = interval(DayOfWeek::Fri, (8, 0), (9, 0));
        let b = interval(DayOfWeek::Fri, (8, 30), (12, 0));
        let ov = a.overlap(&b).unwrap();
        assert!(ov.duration_minutes() <= a.duration_minutes());
        assert!(ov.duration_minutes() <= b.duration_minutes());
    }

    #[test]
    fn overlap_none_for_different_days() {
        let a = interval(DayOfWeek::Mon, (14, 0), (15, 0));
        let b = interval(DayOfWeek::Tue, (14, 0), (15, 0));
        assert_eq!(a.overlap(&b), None);
    }

    #[test]
    fn overlap_none_for_edge_touching_ranges() {
        let a = interval(DayOfWeek::Mon, (14, 0), (15, 0));
        let b = interval(DayOfWeek::Mon, (15, 0), (16, 0));
        assert_eq!(a.overlap(&b), None);
    }

    #[test]
    fn overlap_none_for_disjoint_ranges() {
        let a = interval(DayOfWeek::Mon, (9, 0), (10, 0));
        let b = interval(DayOfWeek::Mon, (11, 0), (12, 0));
        assert_eq!(a.overlap(&b), None);
    }

    #[test]
    fn contains_requires_full_containment_on_same_day() {
        let outer = interval(DayOfWeek::Mon, (14, 0), (15, 30));
        let inner = interval(DayOfWeek::Mon, (14, 30), (15, 0));
        let crossing = interval(DayOfWeek::Mon, (15, 0), (16, 0));
        let other_day = interval(DayOfWeek::Tue, (14, 30), (15, 0));

        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&crossing));
        assert!(!outer.contains(&other_day));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn display_uses_clock_text() {
        let a = interval(DayOfWeek::Mon, (14, 0), (15, 30));
        assert_eq!(a.to_string(), "Mon 14:00-15:30");
    }
}
