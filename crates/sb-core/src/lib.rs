//! Core matching and scheduling engine for the study buddy tool.
//!
//! This crate contains the fundamental types and logic for:
//! - Intervals: half-open weekly time ranges with overlap arithmetic
//! - Availability: per-user free-time indexing
//! - Matching: classmate lookup and overlap-gated partner suggestions
//! - Sessions: the propose/confirm state machine with conflict detection
//!
//! Persistence is a collaborator, reached through the [`Roster`] and
//! [`SessionStore`] traits.

mod availability;
mod error;
mod interval;
mod matching;
mod overlap;
mod session;
pub mod types;

pub use availability::AvailabilityIndex;
pub use error::{ScheduleError, ScheduleResult, StoreError};
pub use interval::Interval;
pub use matching::{Match, Roster, classmates, suggested_matches};
pub use overlap::{MIN_OVERLAP_MINUTES, qualifying_overlaps, shared_windows};
pub use session::{
    Session, SessionDraft, SessionStore, confirm, list_sessions, pending_confirmations, propose,
};
