//! Classmates command: who else is enrolled in a course.

use std::io::Write;

use anyhow::Result;

use sb_core::types::{CourseCode, Username};
use sb_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    user: &Username,
    course: &CourseCode,
    json: bool,
) -> Result<()> {
    let found = sb_core::classmates(db, user, course)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&found)?)?;
    } else if found.is_empty() {
        writeln!(writer, "No classmates found for {course}.")?;
    } else {
        for classmate in found {
            writeln!(writer, "{classmate}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn username(name: &str) -> Username {
        Username::new(name).unwrap()
    }

    fn course(code: &str) -> CourseCode {
        CourseCode::new(code).unwrap()
    }

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        for name in ["alice", "bob", "carol"] {
            db.create_student(&username(name), name).unwrap();
        }
        db.add_course(&username("alice"), &course("MATH4000")).unwrap();
        db.add_course(&username("bob"), &course("MATH4000")).unwrap();
        db.add_course(&username("carol"), &course("CHEM1010")).unwrap();
        db
    }

    #[test]
    fn lists_classmates_excluding_the_actor() {
        let db = seeded_db();
        let mut output = Vec::new();

        run(&mut output, &db, &username("alice"), &course("MATH4000"), false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output, "bob\n");
    }

    #[test]
    fn reports_when_no_classmates() {
        let db = seeded_db();
        let mut output = Vec::new();

        run(&mut output, &db, &username("carol"), &course("CHEM1010"), false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("No classmates found for CHEM1010."));
    }

    #[test]
    fn json_output_is_a_sorted_array() {
        let db = seeded_db();
        db.add_course(&username("carol"), &course("MATH4000")).unwrap();
        let mut output = Vec::new();

        run(&mut output, &db, &username("alice"), &course("MATH4000"), true).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed, serde_json::json!(["bob", "carol"]));
    }
}
