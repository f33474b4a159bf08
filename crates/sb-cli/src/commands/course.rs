//! Enrollment commands.

use std::io::Write;

use anyhow::{Result, bail};

use sb_core::types::{CourseCode, Username};
use sb_db::Database;

pub fn add<W: Write>(
    writer: &mut W,
    db: &Database,
    user: &Username,
    code: &CourseCode,
) -> Result<()> {
    if !db.student_exists(user)? {
        bail!("unknown user: {user}");
    }
    db.add_course(user, code)?;
    writeln!(writer, "Enrolled {user} in {code}")?;
    Ok(())
}

pub fn remove<W: Write>(
    writer: &mut W,
    db: &Database,
    user: &Username,
    code: &CourseCode,
) -> Result<()> {
    if !db.remove_course(user, code)? {
        bail!("{user} is not enrolled in {code}");
    }
    writeln!(writer, "Dropped {code} for {user}")?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, db: &Database, user: &Username, json: bool) -> Result<()> {
    let courses = db.list_courses(user)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&courses)?)?;
    } else if courses.is_empty() {
        writeln!(writer, "No courses for {user}.")?;
    } else {
        for course in courses {
            writeln!(writer, "{course}")?;
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

    fn db_with_alice() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_student(&username("alice"), "Alice Anders").unwrap();
        db
    }

    #[test]
    fn add_then_list() {
        let db = db_with_alice();
        let mut output = Vec::new();

        add(&mut output, &db, &username("alice"), &course("MATH4000")).unwrap();
        list(&mut output, &db, &username("alice"), false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Enrolled alice in MATH4000"));
        assert!(output.contains("MATH4000\n"));
    }

    #[test]
    fn add_rejects_unknown_user() {
        let db = db_with_alice();
        let mut output = Vec::new();

        let err = add(&mut output, &db, &username("ghost"), &course("MATH4000")).unwrap_err();
        assert!(err.to_string().contains("unknown user: ghost"));
    }

    #[test]
    fn add_rejects_duplicate_enrollment() {
        let db = db_with_alice();
        let mut output = Vec::new();

        add(&mut output, &db, &username("alice"), &course("MATH4000")).unwrap();
        let err = add(&mut output, &db, &username("alice"), &course("MATH4000")).unwrap_err();
        assert!(err.to_string().contains("already enrolled"));
    }

    #[test]
    fn remove_reports_missing_enrollment() {
        let db = db_with_alice();
        let mut output = Vec::new();

        let err = remove(&mut output, &db, &username("alice"), &course("MATH4000")).unwrap_err();
        assert!(err.to_string().contains("not enrolled"));

        add(&mut output, &db, &username("alice"), &course("MATH4000")).unwrap();
        remove(&mut output, &db, &username("alice"), &course("MATH4000")).unwrap();
    }

    #[test]
    fn list_json_is_an_array_of_codes() {
        let db = db_with_alice();
        let mut output = Vec::new();

        add(&mut output, &db, &username("alice"), &course("MATH4000")).unwrap();
        add(&mut output, &db, &username("alice"), &course("CHEM1010")).unwrap();

        let mut json_output = Vec::new();
        list(&mut json_output, &db, &username("alice"), true).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&json_output).unwrap();
        assert_eq!(parsed, serde_json::json!(["CHEM1010", "MATH4000"]));
    }
}
