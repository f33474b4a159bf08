//! Error taxonomy for the scheduling engine.

use thiserror::Error;

use crate::interval::Interval;
use crate::types::{CourseCode, Username};

/// An opaque failure from a backing store.
///
/// The engine treats storage as a collaborator; whatever error type the store
/// produces is carried through unchanged.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct StoreError(Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    /// Wraps an arbitrary store-layer error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(err))
    }
}

/// Rejections surfaced by the scheduling engine.
///
/// Every variant is a local validation failure reported directly to the
/// caller; none are transient. Validation fully precedes mutation, so a
/// rejected operation leaves no partial state behind.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// An interval's start was not strictly earlier than its end.
    #[error("interval start must be earlier than end")]
    InvalidInterval,

    /// An identical availability interval already exists for the user.
    #[error("identical availability interval already exists")]
    DuplicateInterval,

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A user tried to propose a session with themselves.
    #[error("cannot propose a session with yourself")]
    SelfProposal,

    /// A party to a proposal lacks the required enrollment.
    #[error("{user} is not enrolled in {course}")]
    NotEnrolled { user: Username, course: CourseCode },

    /// The proposed window is not contained in any qualifying shared overlap.
    #[error("proposed window lies outside the users' shared availability")]
    OutsideAvailability,

    /// Someone other than the invitee tried to confirm a session.
    #[error("only the invitee may confirm a session")]
    NotInvitee,

    /// The session was already confirmed; re-confirmation is an error.
    #[error("session is already confirmed")]
    AlreadyConfirmed,

    /// Confirming would overlap one of the invitee's confirmed sessions.
    #[error("overlaps a confirmed session at {0}")]
    Conflict(Interval),

    /// A backing store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
