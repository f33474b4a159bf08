//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sb_core::types::{CourseCode, DayOfWeek, TimeOfDay, Username};

/// Study session scheduler.
///
/// Tracks course enrollments and weekly availability, suggests study
/// partners with enough shared free time, and manages proposed and
/// confirmed study sessions between classmates.
#[derive(Debug, Parser)]
#[command(name = "sb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage student profiles.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Manage course enrollments.
    Course {
        #[command(subcommand)]
        action: CourseAction,
    },

    /// Manage weekly availability.
    Avail {
        #[command(subcommand)]
        action: AvailAction,
    },

    /// List classmates enrolled in a course.
    Classmates {
        /// The acting user.
        #[arg(long)]
        user: Username,

        /// Course code to look up.
        #[arg(long)]
        course: CourseCode,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Suggest study partners sharing a course and enough free time.
    Matches {
        /// The acting user.
        #[arg(long)]
        user: Username,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Propose, confirm, and list study sessions.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// Register a new student profile.
    Create {
        /// Username for the new profile.
        #[arg(long)]
        user: Username,

        /// The student's full name.
        #[arg(long)]
        name: String,
    },

    /// Show a profile with its courses and availability.
    Show {
        /// Username to show.
        #[arg(long)]
        user: Username,
    },
}

/// Enrollment management actions.
#[derive(Debug, Subcommand)]
pub enum CourseAction {
    /// Enroll a user in a course.
    Add {
        /// The acting user.
        #[arg(long)]
        user: Username,

        /// Course code, e.g. MATH4000.
        code: CourseCode,
    },

    /// Drop a course.
    Remove {
        /// The acting user.
        #[arg(long)]
        user: Username,

        /// Course code to drop.
        code: CourseCode,
    },

    /// List a user's courses.
    List {
        /// The acting user.
        #[arg(long)]
        user: Username,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Availability management actions.
#[derive(Debug, Subcommand)]
pub enum AvailAction {
    /// Declare a weekly free-time interval.
    Add {
        /// The acting user.
        #[arg(long)]
        user: Username,

        /// Day of week, e.g. mon or tuesday.
        #[arg(long)]
        day: DayOfWeek,

        /// Start time, e.g. 14:00 or "2:00 PM".
        #[arg(long)]
        start: TimeOfDay,

        /// End time (exclusive).
        #[arg(long)]
        end: TimeOfDay,
    },

    /// Remove an exact-match interval.
    Remove {
        /// The acting user.
        #[arg(long)]
        user: Username,

        /// Day of week.
        #[arg(long)]
        day: DayOfWeek,

        /// Start time.
        #[arg(long)]
        start: TimeOfDay,

        /// End time (exclusive).
        #[arg(long)]
        end: TimeOfDay,
    },

    /// List a user's availability, ordered by day then start.
    List {
        /// The acting user.
        #[arg(long)]
        user: Username,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Session actions.
#[derive(Debug, Subcommand)]
pub enum SessionAction {
    /// Propose a study session with a classmate.
    ///
    /// The window must lie inside a shared free-time overlap of at least 30
    /// minutes on the given day. Prints the new session's ID.
    Propose {
        /// The proposing user.
        #[arg(long)]
        initiator: Username,

        /// The invited classmate.
        #[arg(long)]
        invitee: Username,

        /// Course the session is for.
        #[arg(long)]
        course: CourseCode,

        /// Day of week.
        #[arg(long)]
        day: DayOfWeek,

        /// Start time.
        #[arg(long)]
        start: TimeOfDay,

        /// End time (exclusive).
        #[arg(long)]
        end: TimeOfDay,
    },

    /// Confirm a proposed session (invitee only).
    Confirm {
        /// The acting user; must be the session's invitee.
        #[arg(long)]
        user: Username,

        /// Session ID to confirm.
        #[arg(long)]
        id: String,
    },

    /// List all sessions the user participates in.
    List {
        /// The acting user.
        #[arg(long)]
        user: Username,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List proposed sessions awaiting the user's confirmation.
    Pending {
        /// The acting user.
        #[arg(long)]
        user: Username,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
