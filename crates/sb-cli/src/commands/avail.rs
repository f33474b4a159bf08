//! Availability commands.

use std::io::Write;

use anyhow::{Result, bail};

use sb_core::Interval;
use sb_core::types::{DayOfWeek, TimeOfDay, Username};
use sb_db::Database;

pub fn add<W: Write>(
    writer: &mut W,
    db: &Database,
    user: &Username,
    day: DayOfWeek,
    start: TimeOfDay,
    end: TimeOfDay,
) -> Result<()> {
    if !db.student_exists(user)? {
        bail!("unknown user: {user}");
    }
    let interval = Interval::new(day, start, end)?;
    db.add_interval(user, &interval)?;
    writeln!(writer, "Added {interval} for {user}")?;
    Ok(())
}

pub fn remove<W: Write>(
    writer: &mut W,
    db: &Database,
    user: &Username,
    day: DayOfWeek,
    start: TimeOfDay,
    end: TimeOfDay,
) -> Result<()> {
    let interval = Interval::new(day, start, end)?;
    if !db.remove_interval(user, &interval)? {
        bail!("no availability interval {interval} for {user}");
    }
    writeln!(writer, "Removed {interval} for {user}")?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, db: &Database, user: &Username, json: bool) -> Result<()> {
    let intervals = db.list_intervals(user)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&intervals)?)?;
    } else if intervals.is_empty() {
        writeln!(writer, "No availability for {user}.")?;
    } else {
        for interval in intervals {
            writeln!(writer, "{interval}")?;
        }
    }
    Ok(())
}
