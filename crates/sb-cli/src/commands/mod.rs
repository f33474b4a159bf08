//! CLI command implementations.

pub mod avail;
pub mod classmates;
pub mod course;
pub mod matches;
pub mod profile;
pub mod session;
