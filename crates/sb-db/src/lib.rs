//! Storage layer for the study buddy tool.
//!
//! Provides persistence for students, enrollments, availability, and study
//! sessions using `rusqlite`, and implements the store traits consumed by
//! the `sb-core` engine.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. The tool is a single-user, one-operation-at-a-time CLI, so no
//! synchronization is provided. A multi-client adaptation would need to
//! serialize the confirm path (conflict scan plus state write) per invitee,
//! e.g. with a transaction or a per-user lock.
//!
//! # Schema
//!
//! Days are stored as their `Mon`..`Sun` abbreviation and times of day as
//! zero-padded `HH:MM` TEXT, so lexicographic ordering matches chronological
//! ordering within a day. Session `created_at` timestamps are ISO 8601 TEXT
//! (e.g. `2026-01-15T10:30:00Z`). Value uniqueness for enrollments and
//! availability is backed by UNIQUE constraints; duplicate detection for
//! availability happens up front in [`sb_core::AvailabilityIndex`], with the
//! constraint as a backstop.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use thiserror::Error;
use uuid::Uuid;

use sb_core::types::{CourseCode, DayOfWeek, SessionStatus, TimeOfDay, Username};
use sb_core::{
    AvailabilityIndex, Interval, Roster, Session, SessionDraft, SessionStore, StoreError,
};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A student with this username already exists.
    #[error("username already exists: {username}")]
    DuplicateStudent { username: String },
    /// The user is already enrolled in this course.
    #[error("{username} is already enrolled in {course}")]
    DuplicateEnrollment { username: String, course: String },
    /// An identical availability row already exists.
    #[error("identical availability interval already stored")]
    DuplicateAvailability,
    /// Failed to parse a session timestamp.
    #[error("invalid timestamp for session {session_id}: {timestamp}")]
    TimestampParse {
        session_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row violates a core invariant.
    #[error("corrupt row: {message}")]
    Corrupt { message: String },
}

/// A registered student profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentProfile {
    pub username: Username,
    pub full_name: String,
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// True when the error is a UNIQUE or PRIMARY KEY constraint violation.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Session columns as read from the database, before invariant checks.
struct SessionRow {
    id: String,
    course: CourseCode,
    initiator: Username,
    invitee: Username,
    day: DayOfWeek,
    start: TimeOfDay,
    end: TimeOfDay,
    status: SessionStatus,
    created_at: String,
}

impl SessionRow {
    fn into_session(self) -> Result<Session, DbError> {
        let interval = Interval::new(self.day, self.start, self.end).map_err(|e| {
            DbError::Corrupt {
                message: format!("session {}: {e}", self.id),
            }
        })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|source| DbError::TimestampParse {
                session_id: self.id.clone(),
                timestamp: self.created_at.clone(),
                source,
            })?
            .with_timezone(&Utc);
        Ok(Session {
            id: self.id,
            course: self.course,
            interval,
            status: self.status,
            initiator: self.initiator,
            invitee: self.invitee,
            created_at,
        })
    }
}

const SESSION_COLUMNS: &str =
    "id, course_code, initiator, invitee, day_of_week, start_time, end_time, status, created_at";

fn session_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok(SessionRow {
        id: row.get(0)?,
        course: row.get(1)?,
        initiator: row.get(2)?,
        invitee: row.get(3)?,
        day: row.get(4)?,
        start: row.get(5)?,
        end: row.get(6)?,
        status: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS students (
                username TEXT PRIMARY KEY,
                full_name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS enrollments (
                username TEXT NOT NULL,
                course_code TEXT NOT NULL,
                PRIMARY KEY (username, course_code),
                FOREIGN KEY (username) REFERENCES students(username) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_enrollments_course ON enrollments(course_code);

            -- Availability: one row per declared free-time interval
            -- day_of_week: 'Mon'..'Sun', start/end: 'HH:MM' (half-open)
            CREATE TABLE IF NOT EXISTS availability (
                username TEXT NOT NULL,
                day_of_week TEXT NOT NULL
                    CHECK(day_of_week IN ('Mon','Tue','Wed','Thu','Fri','Sat','Sun')),
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                UNIQUE(username, day_of_week, start_time, end_time),
                FOREIGN KEY (username) REFERENCES students(username) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_availability_user ON availability(username);

            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                course_code TEXT NOT NULL,
                initiator TEXT NOT NULL,
                invitee TEXT NOT NULL,
                day_of_week TEXT NOT NULL
                    CHECK(day_of_week IN ('Mon','Tue','Wed','Thu','Fri','Sat','Sun')),
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                status TEXT NOT NULL CHECK(status IN ('Proposed','Confirmed')),
                created_at TEXT NOT NULL,
                FOREIGN KEY (initiator) REFERENCES students(username),
                FOREIGN KEY (invitee) REFERENCES students(username)
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_invitee ON sessions(invitee, status);
            ",
        )?;
        Ok(())
    }

    // ========== Students ==========

    /// Registers a student profile.
    pub fn create_student(&self, username: &Username, full_name: &str) -> Result<(), DbError> {
        tracing::debug!(%username, "creating student profile");
        self.conn
            .execute(
                "INSERT INTO students (username, full_name) VALUES (?, ?)",
                params![username, full_name],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::DuplicateStudent {
                        username: username.to_string(),
                    }
                } else {
                    DbError::Sqlite(e)
                }
            })?;
        Ok(())
    }

    pub fn get_student(&self, username: &Username) -> Result<Option<StudentProfile>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT username, full_name FROM students WHERE username = ?")?;
        let profile = stmt
            .query_map(params![username], |row| {
                Ok(StudentProfile {
                    username: row.get(0)?,
                    full_name: row.get(1)?,
                })
            })?
            .next()
            .transpose()?;
        Ok(profile)
    }

    pub fn student_exists(&self, username: &Username) -> Result<bool, DbError> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM students WHERE username = ?)",
            params![username],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// All registered usernames, sorted.
    pub fn usernames(&self) -> Result<Vec<Username>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT username FROM students ORDER BY username")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    // ========== Enrollments ==========

    /// Enrolls a user in a course. Duplicate enrollments are rejected.
    pub fn add_course(&self, username: &Username, course: &CourseCode) -> Result<(), DbError> {
        self.conn
            .execute(
                "INSERT INTO enrollments (username, course_code) VALUES (?, ?)",
                params![username, course],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::DuplicateEnrollment {
                        username: username.to_string(),
                        course: course.to_string(),
                    }
                } else {
                    DbError::Sqlite(e)
                }
            })?;
        Ok(())
    }

    /// Removes an enrollment; returns whether a row was deleted.
    pub fn remove_course(&self, username: &Username, course: &CourseCode) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "DELETE FROM enrollments WHERE username = ? AND course_code = ?",
            params![username, course],
        )?;
        Ok(changed > 0)
    }

    /// The user's enrolled courses, sorted by course code.
    pub fn list_courses(&self, username: &Username) -> Result<Vec<CourseCode>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT course_code FROM enrollments WHERE username = ? ORDER BY course_code",
        )?;
        let rows = stmt.query_map(params![username], |row| row.get(0))?;
        let mut courses = Vec::new();
        for row in rows {
            courses.push(row?);
        }
        Ok(courses)
    }

    // ========== Availability ==========

    /// Persists one availability interval for a user.
    pub fn add_interval(&self, username: &Username, interval: &Interval) -> Result<(), DbError> {
        self.conn
            .execute(
                "
                INSERT INTO availability (username, day_of_week, start_time, end_time)
                VALUES (?, ?, ?, ?)
                ",
                params![username, interval.day(), interval.start(), interval.end()],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::DuplicateAvailability
                } else {
                    DbError::Sqlite(e)
                }
            })?;
        Ok(())
    }

    /// Deletes an exact-match interval; returns whether a row was deleted.
    pub fn remove_interval(
        &self,
        username: &Username,
        interval: &Interval,
    ) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "
            DELETE FROM availability
            WHERE username = ? AND day_of_week = ? AND start_time = ? AND end_time = ?
            ",
            params![username, interval.day(), interval.start(), interval.end()],
        )?;
        Ok(changed > 0)
    }

    /// The user's stored intervals, ordered by day (Monday first) then start.
    pub fn list_intervals(&self, username: &Username) -> Result<Vec<Interval>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT day_of_week, start_time, end_time
            FROM availability
            WHERE username = ?
            ORDER BY CASE day_of_week
                WHEN 'Mon' THEN 1 WHEN 'Tue' THEN 2 WHEN 'Wed' THEN 3 WHEN 'Thu' THEN 4
                WHEN 'Fri' THEN 5 WHEN 'Sat' THEN 6 WHEN 'Sun' THEN 7 END,
            start_time, end_time
            ",
        )?;
        let rows = stmt.query_map(params![username], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;
        let mut intervals = Vec::new();
        for row in rows {
            let (day, start, end): (DayOfWeek, TimeOfDay, TimeOfDay) = row?;
            let interval = Interval::new(day, start, end).map_err(|e| DbError::Corrupt {
                message: format!("availability for {username}: {e}"),
            })?;
            intervals.push(interval);
        }
        Ok(intervals)
    }

    /// Loads every user's availability into an in-memory index.
    pub fn availability_index(&self) -> Result<AvailabilityIndex, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT username, day_of_week, start_time, end_time FROM availability",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;

        let mut index = AvailabilityIndex::new();
        for row in rows {
            let (username, day, start, end): (Username, DayOfWeek, TimeOfDay, TimeOfDay) = row?;
            let interval = Interval::new(day, start, end).map_err(|e| DbError::Corrupt {
                message: format!("availability for {username}: {e}"),
            })?;
            // The UNIQUE constraint rules out duplicates; a failure here
            // means the stored data no longer satisfies the core invariants.
            index
                .add(&username, interval)
                .map_err(|e| DbError::Corrupt {
                    message: format!("availability for {username}: {e}"),
                })?;
        }
        Ok(index)
    }

    // ========== Sessions ==========

    /// Inserts a session as `Proposed`, assigning its ID and timestamp.
    pub fn create_session(&self, draft: SessionDraft) -> Result<Session, DbError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        tracing::debug!(
            session_id = %id,
            initiator = %draft.initiator,
            invitee = %draft.invitee,
            "creating session"
        );
        self.conn.execute(
            "
            INSERT INTO sessions
            (id, course_code, initiator, invitee, day_of_week, start_time, end_time, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                id,
                draft.course,
                draft.initiator,
                draft.invitee,
                draft.interval.day(),
                draft.interval.start(),
                draft.interval.end(),
                SessionStatus::Proposed,
                now.to_rfc3339_opts(SecondsFormat::Millis, true),
            ],
        )?;

        Ok(Session {
            id,
            course: draft.course,
            interval: draft.interval,
            status: SessionStatus::Proposed,
            initiator: draft.initiator,
            invitee: draft.invitee,
            created_at: now,
        })
    }

    pub fn get_session(&self, id: &str) -> Result<Option<Session>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?"
        ))?;
        let row = stmt
            .query_map(params![id], session_from_row)?
            .next()
            .transpose()?;
        row.map(SessionRow::into_session).transpose()
    }

    /// Flips a session's status to `Confirmed`.
    pub fn mark_session_confirmed(&self, id: &str) -> Result<(), DbError> {
        self.conn.execute(
            "UPDATE sessions SET status = 'Confirmed' WHERE id = ?",
            params![id],
        )?;
        Ok(())
    }

    fn collect_sessions(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Session>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, session_from_row)?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?.into_session()?);
        }
        Ok(sessions)
    }

    /// All sessions involving the user, in creation order.
    pub fn sessions_for(&self, user: &Username) -> Result<Vec<Session>, DbError> {
        self.collect_sessions(
            &format!(
                "
                SELECT {SESSION_COLUMNS} FROM sessions
                WHERE initiator = ? OR invitee = ?
                ORDER BY created_at ASC, id ASC
                "
            ),
            params![user, user],
        )
    }

    /// Confirmed sessions involving the user, in creation order.
    pub fn confirmed_sessions_for(&self, user: &Username) -> Result<Vec<Session>, DbError> {
        self.collect_sessions(
            &format!(
                "
                SELECT {SESSION_COLUMNS} FROM sessions
                WHERE status = 'Confirmed' AND (initiator = ? OR invitee = ?)
                ORDER BY created_at ASC, id ASC
                "
            ),
            params![user, user],
        )
    }

    /// Proposed sessions awaiting the user's confirmation, in creation order.
    pub fn proposed_for_invitee(&self, user: &Username) -> Result<Vec<Session>, DbError> {
        self.collect_sessions(
            &format!(
                "
                SELECT {SESSION_COLUMNS} FROM sessions
                WHERE status = 'Proposed' AND invitee = ?
                ORDER BY created_at ASC, id ASC
                "
            ),
            params![user],
        )
    }
}

impl Roster for Database {
    fn usernames(&self) -> Result<Vec<Username>, StoreError> {
        Self::usernames(self).map_err(StoreError::new)
    }

    fn exists(&self, user: &Username) -> Result<bool, StoreError> {
        self.student_exists(user).map_err(StoreError::new)
    }

    fn enrollments(&self, user: &Username) -> Result<Vec<CourseCode>, StoreError> {
        self.list_courses(user).map_err(StoreError::new)
    }
}

impl SessionStore for Database {
    fn create(&self, draft: SessionDraft) -> Result<Session, StoreError> {
        self.create_session(draft).map_err(StoreError::new)
    }

    fn get(&self, id: &str) -> Result<Option<Session>, StoreError> {
        self.get_session(id).map_err(StoreError::new)
    }

    fn mark_confirmed(&self, id: &str) -> Result<(), StoreError> {
        self.mark_session_confirmed(id).map_err(StoreError::new)
    }

    fn sessions_for(&self, user: &Username) -> Result<Vec<Session>, StoreError> {
        Self::sessions_for(self, user).map_err(StoreError::new)
    }

    fn confirmed_for(&self, user: &Username) -> Result<Vec<Session>, StoreError> {
        self.confirmed_sessions_for(user).map_err(StoreError::new)
    }

    fn proposed_for_invitee(&self, user: &Username) -> Result<Vec<Session>, StoreError> {
        Self::proposed_for_invitee(self, user).map_err(StoreError::new)
    }
}
