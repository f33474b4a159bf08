//! Session commands: propose, confirm, and list study sessions.

use std::io::Write;

use anyhow::Result;

use sb_core::types::{CourseCode, DayOfWeek, TimeOfDay, Username};
use sb_core::{Interval, Session};
use sb_db::Database;

fn write_sessions<W: Write>(
    writer: &mut W,
    sessions: &[Session],
    json: bool,
    empty_message: &str,
) -> Result<()> {
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(sessions)?)?;
    } else if sessions.is_empty() {
        writeln!(writer, "{empty_message}")?;
    } else {
        for session in sessions {
            writeln!(
                writer,
                "{}  {:<9}  {:<10}  {}  {} -> {}",
                session.id,
                session.status,
                session.course,
                session.interval,
                session.initiator,
                session.invitee
            )?;
        }
    }
    Ok(())
}

/// Proposes a session and prints its ID.
#[expect(clippy::too_many_arguments, reason = "one flag per CLI argument")]
pub fn propose<W: Write>(
    writer: &mut W,
    db: &Database,
    initiator: &Username,
    invitee: &Username,
    course: &CourseCode,
    day: DayOfWeek,
    start: TimeOfDay,
    end: TimeOfDay,
) -> Result<()> {
    let interval = Interval::new(day, start, end)?;
    let availability = db.availability_index()?;
    let session = sb_core::propose(db, &availability, db, initiator, invitee, course, interval)?;
    writeln!(writer, "{}", session.id)?;
    Ok(())
}

pub fn confirm<W: Write>(writer: &mut W, db: &Database, user: &Username, id: &str) -> Result<()> {
    let session = sb_core::confirm(db, user, id)?;
    writeln!(
        writer,
        "Confirmed {} with {} at {}",
        session.course, session.initiator, session.interval
    )?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, db: &Database, user: &Username, json: bool) -> Result<()> {
    let sessions = sb_core::list_sessions(db, user)?;
    write_sessions(writer, &sessions, json, &format!("No sessions for {user}."))
}

pub fn pending<W: Write>(writer: &mut W, db: &Database, user: &Username, json: bool) -> Result<()> {
    let sessions = sb_core::pending_confirmations(db, user)?;
    write_sessions(
        writer,
        &sessions,
        json,
        &format!("No sessions awaiting confirmation from {user}."),
    )
}
