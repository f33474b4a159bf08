//! Profile commands for registering and inspecting students.

use std::io::Write;

use anyhow::{Context, Result, bail};

use sb_core::types::Username;
use sb_db::Database;

pub fn create<W: Write>(
    writer: &mut W,
    db: &Database,
    user: &Username,
    full_name: &str,
) -> Result<()> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        bail!("full name cannot be empty");
    }

    db.create_student(user, full_name)?;
    writeln!(writer, "Created profile for {user}")?;
    Ok(())
}

/// Shows a profile with its enrollments and availability.
pub fn show<W: Write>(writer: &mut W, db: &Database, user: &Username) -> Result<()> {
    let profile = db
        .get_student(user)?
        .with_context(|| format!("no profile for {user}"))?;

    writeln!(writer, "{} ({})", profile.username, profile.full_name)?;

    let courses = db.list_courses(user)?;
    if courses.is_empty() {
        writeln!(writer, "Courses: none")?;
    } else {
        let codes: Vec<String> = courses.iter().map(ToString::to_string).collect();
        writeln!(writer, "Courses: {}", codes.join(", "))?;
    }

    let intervals = db.list_intervals(user)?;
    if intervals.is_empty() {
        writeln!(writer, "Availability: none")?;
    } else {
        writeln!(writer, "Availability:")?;
        for interval in intervals {
            writeln!(writer, "  {interval}")?;
        }
    }
    Ok(())
}
