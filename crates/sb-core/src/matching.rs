//! Classmate lookup and study-partner suggestions.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::availability::AvailabilityIndex;
use crate::error::{ScheduleResult, StoreError};
use crate::interval::Interval;
use crate::overlap::{MIN_OVERLAP_MINUTES, qualifying_overlaps};
use crate::types::{CourseCode, Username};

/// Read-only view of registered users and their enrollments.
///
/// This is the seam to the user/enrollment store; the engine never mutates
/// through it.
pub trait Roster {
    /// All registered usernames.
    fn usernames(&self) -> Result<Vec<Username>, StoreError>;

    /// Whether a user is registered.
    fn exists(&self, user: &Username) -> Result<bool, StoreError>;

    /// The courses a user is enrolled in.
    fn enrollments(&self, user: &Username) -> Result<Vec<CourseCode>, StoreError>;
}

/// A suggested study partner for one shared course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// The suggested classmate.
    pub candidate: Username,

    /// The course both users are enrolled in.
    pub course: CourseCode,

    /// The qualifying shared free-time windows (always non-empty).
    pub overlaps: Vec<Interval>,
}

/// Suggests classmates who share a course with `active` and have at least one
/// qualifying free-time overlap with them.
///
/// Yields one entry per (candidate, course) pair, ordered by candidate then
/// course. The active user is never included, regardless of any
/// self-enrollment anomaly in the stored data.
pub fn suggested_matches<R: Roster>(
    roster: &R,
    availability: &AvailabilityIndex,
    active: &Username,
) -> ScheduleResult<Vec<Match>> {
    let my_courses: BTreeSet<CourseCode> = roster.enrollments(active)?.into_iter().collect();
    if my_courses.is_empty() {
        return Ok(Vec::new());
    }
    let my_intervals = availability.intervals_for(active);

    let mut matches = Vec::new();
    for candidate in roster.usernames()? {
        if candidate == *active {
            continue;
        }
        let shared: Vec<CourseCode> = roster
            .enrollments(&candidate)?
            .into_iter()
            .filter(|course| my_courses.contains(course))
            .collect();
        if shared.is_empty() {
            continue;
        }

        let overlaps = qualifying_overlaps(
            my_intervals,
            availability.intervals_for(&candidate),
            MIN_OVERLAP_MINUTES,
        );
        if overlaps.is_empty() {
            continue;
        }
        for course in shared {
            matches.push(Match {
                candidate: candidate.clone(),
                course,
                overlaps: overlaps.clone(),
            });
        }
    }

    matches.sort_by(|a, b| {
        a.candidate
            .cmp(&b.candidate)
            .then_with(|| a.course.cmp(&b.course))
    });
    Ok(matches)
}

/// All users other than `active` enrolled in `course`, sorted by username.
///
/// A pure enrollment lookup; availability plays no part.
pub fn classmates<R: Roster>(
    roster: &R,
    active: &Username,
    course: &CourseCode,
) -> ScheduleResult<Vec<Username>> {
    let mut out = Vec::new();
    for user in roster.usernames()? {
        if user == *active {
            continue;
        }
        if roster.enrollments(&user)?.contains(course) {
            out.push(user);
        }
    }
    out.sort_unstable();
    Ok(out)
}
