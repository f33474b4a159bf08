//! Study session scheduler CLI library.
//!
//! This crate provides the CLI interface for the study session scheduler.

mod cli;
pub mod commands;
mod config;

pub use cli::{AvailAction, Cli, Commands, CourseAction, ProfileAction, SessionAction};
pub use config::Config;
