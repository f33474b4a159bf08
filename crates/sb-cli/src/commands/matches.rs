//! Matches command: suggest study partners.

use std::io::Write;

use anyhow::Result;

use sb_core::types::Username;
use sb_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database, user: &Username, json: bool) -> Result<()> {
    let availability = db.availability_index()?;
    let matches = sb_core::suggested_matches(db, &availability, user)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&matches)?)?;
        return Ok(());
    }
    if matches.is_empty() {
        writeln!(writer, "No suggested study partners for {user}.")?;
        return Ok(());
    }

    for entry in &matches {
        let windows: Vec<String> = entry.overlaps.iter().map(ToString::to_string).collect();
        writeln!(
            writer,
            "{:<16}  {:<10}  {}",
            entry.candidate,
            entry.course,
            windows.join(", ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::Interval;
    use sb_core::types::{CourseCode, DayOfWeek, TimeOfDay};

    fn username(name: &str) -> Username {
        Username::new(name).unwrap()
    }

    fn course(code: &str) -> CourseCode {
        CourseCode::new(code).unwrap()
    }

    fn interval(day: DayOfWeek, start: (u16, u16), end: (u16, u16)) -> Interval {
        Interval::new(
            day,
            TimeOfDay::from_hm(start.0, start.1).unwrap(),
            TimeOfDay::from_hm(end.0, end.1).unwrap(),
        )
        .unwrap()
    }

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        for name in ["alice", "bob"] {
            db.create_student(&username(name), name).unwrap();
            db.add_course(&username(name), &course("MATH4000")).unwrap();
            db.add_interval(&username(name), &interval(DayOfWeek::Mon, (14, 0), (15, 30)))
                .unwrap();
        }
        db
    }

    #[test]
    fn prints_candidate_course_and_windows() {
        let db = seeded_db();
        let mut output = Vec::new();

        run(&mut output, &db, &username("alice"), false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("bob"));
        assert!(output.contains("MATH4000"));
        assert!(output.contains("Mon 14:00-15:30"));
    }

    #[test]
    fn reports_when_nothing_matches() {
        let db = Database::open_in_memory().unwrap();
        db.create_student(&username("loner"), "No Friends").unwrap();
        let mut output = Vec::new();

        run(&mut output, &db, &username("loner"), false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("No suggested study partners for loner."));
    }

    #[test]
    fn json_output_carries_overlap_windows() {
        let db = seeded_db();
        let mut output = Vec::new();

        run(&mut output, &db, &username("alice"), true).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed[0]["candidate"], "bob");
        assert_eq!(parsed[0]["course"], "MATH4000");
        assert_eq!(parsed[0]["overlaps"][0]["start"], "14:00");
    }
}
