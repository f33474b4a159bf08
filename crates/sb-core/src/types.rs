//! Core type definitions with validation.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parse and validation errors for core scalar types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The day of week was not recognized.
    #[error("unrecognized day of week: {value}")]
    InvalidDay { value: String },

    /// The time of day could not be parsed.
    #[error(r#"invalid time of day (expected "HH:MM" or "H:MM AM/PM"): {value}"#)]
    InvalidTime { value: String },

    /// A minutes-since-midnight value was out of range.
    #[error("time of day must be below 1440 minutes, got {value}")]
    MinutesOutOfRange { value: u16 },

    /// Invalid session status value.
    #[error("invalid session status: {value}")]
    InvalidStatus { value: String },
}

/// A day of the week.
///
/// Stored in the database as its three-letter abbreviation (`Mon`..`Sun`).
/// Parsing accepts abbreviations, full names, and the common short forms
/// (`tues`, `weds`, `thur`, `thurs`), case-insensitive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    /// All days in week order, Monday first.
    pub const ALL: [Self; 7] = [
        Self::Mon,
        Self::Tue,
        Self::Wed,
        Self::Thu,
        Self::Fri,
        Self::Sat,
        Self::Sun,
    ];

    /// Canonical abbreviation for display and database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mon => "Mon",
            Self::Tue => "Tue",
            Self::Wed => "Wed",
            Self::Thu => "Thu",
            Self::Fri => "Fri",
            Self::Sat => "Sat",
            Self::Sun => "Sun",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DayOfWeek {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" => Ok(Self::Mon),
            "tue" | "tues" | "tuesday" => Ok(Self::Tue),
            "wed" | "weds" | "wednesday" => Ok(Self::Wed),
            "thu" | "thur" | "thurs" | "thursday" => Ok(Self::Thu),
            "fri" | "friday" => Ok(Self::Fri),
            "sat" | "saturday" => Ok(Self::Sat),
            "sun" | "sunday" => Ok(Self::Sun),
            _ => Err(ParseError::InvalidDay {
                value: s.to_string(),
            }),
        }
    }
}

impl ToSql for DayOfWeek {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for DayOfWeek {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Number of minutes in a day; the exclusive upper bound for [`TimeOfDay`].
const MINUTES_PER_DAY: u16 = 24 * 60;

/// A time of day as minutes since midnight, always in `[0, 1440)`.
///
/// Parsed from 24-hour `HH:MM` or 12-hour `H:MM AM/PM` input at the boundary;
/// displayed and stored as zero-padded 24-hour `HH:MM`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Creates a time of day from minutes since midnight.
    pub const fn new(minutes: u16) -> Result<Self, ParseError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(ParseError::MinutesOutOfRange { value: minutes });
        }
        Ok(Self(minutes))
    }

    /// Creates a time of day from a 24-hour clock reading.
    pub const fn from_hm(hour: u16, minute: u16) -> Result<Self, ParseError> {
        if hour > 23 || minute > 59 {
            return Err(ParseError::MinutesOutOfRange {
                value: hour * 60 + minute,
            });
        }
        Self::new(hour * 60 + minute)
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Splits a trailing `am`/`pm` marker (with optional dots and spacing) off a
/// lowercase time string. Returns the input untouched when no marker is found.
fn strip_meridiem(s: &str) -> (&str, Option<Meridiem>) {
    let trimmed = s.trim_end();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    let Some(rest) = trimmed.strip_suffix('m') else {
        return (s, None);
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix('.').unwrap_or(rest);
    if let Some(body) = rest.strip_suffix('a') {
        return (body, Some(Meridiem::Am));
    }
    if let Some(body) = rest.strip_suffix('p') {
        return (body, Some(Meridiem::Pm));
    }
    (s, None)
}

impl std::str::FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(ParseError::Empty {
                field: "time of day",
            });
        }
        let invalid = || ParseError::InvalidTime {
            value: raw.to_string(),
        };

        let lower = raw.to_ascii_lowercase();
        let (body, meridiem) = strip_meridiem(&lower);
        let (hour_str, minute_str) = body.split_once(':').ok_or_else(invalid)?;

        let minute_str = minute_str.trim();
        // Minutes are always two digits; "17:5" is rejected.
        if minute_str.len() != 2 {
            return Err(invalid());
        }
        let hour: u16 = hour_str.trim().parse().map_err(|_| invalid())?;
        let minute: u16 = minute_str.parse().map_err(|_| invalid())?;
        if minute > 59 {
            return Err(invalid());
        }

        let hour = match meridiem {
            Some(Meridiem::Am) if (1..=12).contains(&hour) => {
                if hour == 12 { 0 } else { hour }
            }
            Some(Meridiem::Pm) if (1..=12).contains(&hour) => {
                if hour == 12 { 12 } else { hour + 12 }
            }
            None if hour <= 23 => hour,
            _ => return Err(invalid()),
        };

        Ok(Self(hour * 60 + minute))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl ToSql for TimeOfDay {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for TimeOfDay {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Lifecycle state of a study session.
///
/// The only transition is `Proposed` to `Confirmed`, performed by the invitee;
/// `Confirmed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    Proposed,
    Confirmed,
}

impl SessionStatus {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "Proposed",
            Self::Confirmed => "Confirmed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Proposed" => Ok(Self::Proposed),
            "Confirmed" => Ok(Self::Confirmed),
            _ => Err(ParseError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

impl ToSql for SessionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SessionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after trimming and validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ParseError> {
                let id = id.into();
                let id = id.trim();
                if id.is_empty() {
                    return Err(ParseError::Empty { field: $field_name });
                }
                Ok(Self(id.to_string()))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                Self::new(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

define_string_id!(
    /// A validated username.
    ///
    /// Usernames must be non-empty after trimming. Uniqueness is enforced by
    /// the student store.
    Username, "username"
);

define_string_id!(
    /// A validated course code (e.g., "MATH4000").
    ///
    /// Course codes must be non-empty after trimming. Duplicate enrollments in
    /// the same course are rejected by the enrollment store.
    CourseCode, "course code"
);
