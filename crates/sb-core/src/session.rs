//! Session proposal and confirmation.
//!
//! Sessions move through a two-state machine: created as `Proposed`, then
//! confirmed once, irreversibly, by the invitee. There is no rejection or
//! cancellation path. Proposal is gated on the shared-availability check;
//! the conflict scan against confirmed sessions happens only at
//! confirmation time, and only against the invitee's calendar.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::availability::AvailabilityIndex;
use crate::error::{ScheduleError, ScheduleResult, StoreError};
use crate::interval::Interval;
use crate::matching::Roster;
use crate::overlap::{MIN_OVERLAP_MINUTES, qualifying_overlaps};
use crate::types::{CourseCode, SessionStatus, Username};

/// A study session between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Store-assigned unique ID.
    pub id: String,
    pub course: CourseCode,
    pub interval: Interval,
    pub status: SessionStatus,
    pub initiator: Username,
    pub invitee: Username,
    pub created_at: DateTime<Utc>,
}

/// The fields of a session prior to creation; the store assigns `id`,
/// `status`, and `created_at`.
#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub course: CourseCode,
    pub interval: Interval,
    pub initiator: Username,
    pub invitee: Username,
}

/// Persistence seam for sessions.
///
/// `create` assigns a unique ID and records the session as `Proposed`.
/// Listing methods return sessions in creation order.
pub trait SessionStore {
    fn create(&self, draft: SessionDraft) -> Result<Session, StoreError>;

    fn get(&self, id: &str) -> Result<Option<Session>, StoreError>;

    /// Flips a session's stored status to `Confirmed`.
    fn mark_confirmed(&self, id: &str) -> Result<(), StoreError>;

    /// All sessions where the user is initiator or invitee, either status.
    fn sessions_for(&self, user: &Username) -> Result<Vec<Session>, StoreError>;

    /// Confirmed sessions where the user is initiator or invitee.
    fn confirmed_for(&self, user: &Username) -> Result<Vec<Session>, StoreError>;

    /// Proposed sessions awaiting this user's confirmation.
    fn proposed_for_invitee(&self, user: &Username) -> Result<Vec<Session>, StoreError>;
}

/// Proposes a study session.
///
/// Validates, in order: the parties are distinct registered users, both are
/// enrolled in the course, and the requested window lies entirely inside
/// some qualifying (>= 30 minute) overlap of the two users' availability on
/// that day. Merely intersecting an overlap is not enough. On success the
/// session is persisted as `Proposed`; no conflict check happens here.
pub fn propose<R: Roster, S: SessionStore>(
    roster: &R,
    availability: &AvailabilityIndex,
    sessions: &S,
    initiator: &Username,
    invitee: &Username,
    course: &CourseCode,
    interval: Interval,
) -> ScheduleResult<Session> {
    if initiator == invitee {
        return Err(ScheduleError::SelfProposal);
    }
    for user in [initiator, invitee] {
        if !roster.exists(user)? {
            return Err(ScheduleError::NotFound(format!("user {user}")));
        }
        if !roster.enrollments(user)?.contains(course) {
            return Err(ScheduleError::NotEnrolled {
                user: user.clone(),
                course: course.clone(),
            });
        }
    }

    let windows = qualifying_overlaps(
        &availability.for_day(initiator, interval.day()),
        &availability.for_day(invitee, interval.day()),
        MIN_OVERLAP_MINUTES,
    );
    if !windows.iter().any(|window| window.contains(&interval)) {
        return Err(ScheduleError::OutsideAvailability);
    }

    tracing::debug!(%initiator, %invitee, %course, %interval, "recording proposed session");
    Ok(sessions.create(SessionDraft {
        course: course.clone(),
        interval,
        initiator: initiator.clone(),
        invitee: invitee.clone(),
    })?)
}

/// Confirms a proposed session.
///
/// Only the invitee may confirm, exactly once; re-confirmation is an error,
/// not a no-op. The session's window must not overlap any other confirmed
/// session on the invitee's calendar (the initiator's calendar is
/// deliberately not checked). On success the stored status flips to
/// `Confirmed` and the updated session is returned.
pub fn confirm<S: SessionStore>(
    sessions: &S,
    actor: &Username,
    session_id: &str,
) -> ScheduleResult<Session> {
    let session = sessions
        .get(session_id)?
        .ok_or_else(|| ScheduleError::NotFound(format!("session {session_id}")))?;

    if session.invitee != *actor {
        return Err(ScheduleError::NotInvitee);
    }
    if session.status == SessionStatus::Confirmed {
        return Err(ScheduleError::AlreadyConfirmed);
    }
    for existing in sessions.confirmed_for(actor)? {
        if existing.id == session.id {
            continue;
        }
        if existing.interval.overlap(&session.interval).is_some() {
            return Err(ScheduleError::Conflict(existing.interval));
        }
    }

    tracing::debug!(%actor, session_id, "confirming session");
    sessions.mark_confirmed(session_id)?;
    Ok(Session {
        status: SessionStatus::Confirmed,
        ..session
    })
}

/// All sessions the user participates in, either role and either status, in
/// creation order.
pub fn list_sessions<S: SessionStore>(
    sessions: &S,
    user: &Username,
) -> ScheduleResult<Vec<Session>> {
    Ok(sessions.sessions_for(user)?)
}

/// Proposed sessions awaiting the user's confirmation, in creation order.
pub fn pending_confirmations<S: SessionStore>(
    sessions: &S,
    user: &Username,
) -> ScheduleResult<Vec<Session>> {
    Ok(sessions.proposed_for_invitee(user)?)
}
