//! End-to-end integration tests for the complete scheduling flow.
//!
//! Tests the full pipeline: profiles → enrollment → availability → matches →
//! propose → confirm, driving the compiled binary against a temp database.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn sb_binary() -> String {
    env!("CARGO_BIN_EXE_sb").to_string()
}

/// Write a config file pointing at a database inside the temp directory.
fn write_config(temp: &Path) -> std::path::PathBuf {
    let db_file = temp.join("sb.db");
    let config_file = temp.join("config.toml");
    std::fs::write(
        &config_file,
        format!(r#"database_path = "{}""#, db_file.display()),
    )
    .unwrap();
    config_file
}

fn sb(config: &Path, args: &[&str]) -> Output {
    Command::new(sb_binary())
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to run sb")
}

fn sb_ok(config: &Path, args: &[&str]) -> String {
    let output = sb(config, args);
    assert!(
        output.status.success(),
        "sb {args:?} should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

fn sb_err(config: &Path, args: &[&str]) -> String {
    let output = sb(config, args);
    assert!(
        !output.status.success(),
        "sb {args:?} should fail, got: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Register a user, enroll them in MATH4000, and declare Mon 14:00-15:30 free.
fn seed_math_student(config: &Path, user: &str) {
    sb_ok(config, &["profile", "create", "--user", user, "--name", user]);
    sb_ok(config, &["course", "add", "--user", user, "MATH4000"]);
    sb_ok(
        config,
        &[
            "avail", "add", "--user", user, "--day", "mon", "--start", "14:00", "--end", "15:30",
        ],
    );
}

/// Two MATH4000 classmates with a shared Monday window: matching suggests the
/// partner, a contained proposal succeeds, and the invitee's confirmation is
/// visible to both parties.
#[test]
fn test_full_match_propose_confirm_flow() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    seed_math_student(&config, "alice");
    seed_math_student(&config, "bob");

    let matches_out = sb_ok(&config, &["matches", "--user", "alice"]);
    assert!(matches_out.contains("bob"), "matches: {matches_out}");
    assert!(matches_out.contains("MATH4000"));
    assert!(matches_out.contains("Mon 14:00-15:30"));

    let session_id = sb_ok(
        &config,
        &[
            "session", "propose", "--initiator", "alice", "--invitee", "bob", "--course",
            "MATH4000", "--day", "mon", "--start", "14:30", "--end", "15:00",
        ],
    )
    .trim()
    .to_string();
    assert!(!session_id.is_empty());

    let pending = sb_ok(&config, &["session", "pending", "--user", "bob"]);
    assert!(pending.contains(&session_id));

    let confirm_out = sb_ok(
        &config,
        &["session", "confirm", "--user", "bob", "--id", &session_id],
    );
    assert!(confirm_out.contains("Confirmed MATH4000 with alice"));

    for user in ["alice", "bob"] {
        let listing = sb_ok(&config, &["session", "list", "--user", user]);
        assert!(listing.contains(&session_id));
        assert!(listing.contains("Confirmed"));
        assert!(listing.contains("alice -> bob"));
    }

    let pending_after = sb_ok(&config, &["session", "pending", "--user", "bob"]);
    assert!(pending_after.contains("No sessions awaiting confirmation"));
}

/// A confirmed Mon 14:00-14:45 session blocks confirming a Mon 14:30-15:00
/// proposal; the conflicting proposal stays proposed.
#[test]
fn test_confirm_conflict_with_existing_session() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    seed_math_student(&config, "alice");
    seed_math_student(&config, "bob");
    seed_math_student(&config, "carol");

    let first_id = sb_ok(
        &config,
        &[
            "session", "propose", "--initiator", "carol", "--invitee", "bob", "--course",
            "MATH4000", "--day", "mon", "--start", "14:00", "--end", "14:45",
        ],
    )
    .trim()
    .to_string();
    sb_ok(
        &config,
        &["session", "confirm", "--user", "bob", "--id", &first_id],
    );

    let second_id = sb_ok(
        &config,
        &[
            "session", "propose", "--initiator", "alice", "--invitee", "bob", "--course",
            "MATH4000", "--day", "mon", "--start", "14:30", "--end", "15:00",
        ],
    )
    .trim()
    .to_string();

    let stderr = sb_err(
        &config,
        &["session", "confirm", "--user", "bob", "--id", &second_id],
    );
    assert!(
        stderr.contains("overlaps a confirmed session"),
        "stderr: {stderr}"
    );

    // The rejected session is still proposed; the first is untouched.
    let listing = sb_ok(&config, &["session", "list", "--user", "bob", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&listing).unwrap();
    let sessions = parsed.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    for session in sessions {
        let expected = if session["id"] == first_id.as_str() {
            "Confirmed"
        } else {
            "Proposed"
        };
        assert_eq!(session["status"], expected);
    }
}

/// Only the invitee may confirm, and a second confirmation is an error.
#[test]
fn test_confirm_authorization_and_repeat() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    seed_math_student(&config, "alice");
    seed_math_student(&config, "bob");

    let session_id = sb_ok(
        &config,
        &[
            "session", "propose", "--initiator", "alice", "--invitee", "bob", "--course",
            "MATH4000", "--day", "mon", "--start", "14:30", "--end", "15:00",
        ],
    )
    .trim()
    .to_string();

    let stderr = sb_err(
        &config,
        &["session", "confirm", "--user", "alice", "--id", &session_id],
    );
    assert!(stderr.contains("only the invitee"), "stderr: {stderr}");

    sb_ok(
        &config,
        &["session", "confirm", "--user", "bob", "--id", &session_id],
    );
    let stderr = sb_err(
        &config,
        &["session", "confirm", "--user", "bob", "--id", &session_id],
    );
    assert!(stderr.contains("already confirmed"), "stderr: {stderr}");
}

/// Proposals must lie inside a qualifying shared window.
#[test]
fn test_propose_outside_availability_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    seed_math_student(&config, "alice");
    seed_math_student(&config, "bob");

    // Crosses the end of the shared window.
    let stderr = sb_err(
        &config,
        &[
            "session", "propose", "--initiator", "alice", "--invitee", "bob", "--course",
            "MATH4000", "--day", "mon", "--start", "15:00", "--end", "16:00",
        ],
    );
    assert!(stderr.contains("shared availability"), "stderr: {stderr}");

    // Nothing was persisted.
    let pending = sb_ok(&config, &["session", "pending", "--user", "bob"]);
    assert!(pending.contains("No sessions awaiting confirmation"));
}

/// A 20-minute shared window is below the 30-minute matching floor.
#[test]
fn test_short_overlap_produces_no_match() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    seed_math_student(&config, "alice");
    sb_ok(
        &config,
        &["profile", "create", "--user", "bob", "--name", "bob"],
    );
    sb_ok(&config, &["course", "add", "--user", "bob", "MATH4000"]);
    sb_ok(
        &config,
        &[
            "avail", "add", "--user", "bob", "--day", "mon", "--start", "15:10", "--end", "16:00",
        ],
    );

    let matches_out = sb_ok(&config, &["matches", "--user", "alice"]);
    assert!(
        matches_out.contains("No suggested study partners"),
        "matches: {matches_out}"
    );
}

/// 12-hour clock input and day aliases are accepted on the command line.
#[test]
fn test_twelve_hour_times_and_day_aliases() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    sb_ok(
        &config,
        &["profile", "create", "--user", "alice", "--name", "Alice"],
    );
    sb_ok(
        &config,
        &[
            "avail", "add", "--user", "alice", "--day", "thurs", "--start", "2:00 PM", "--end",
            "3:30 PM",
        ],
    );

    let listing = sb_ok(&config, &["avail", "list", "--user", "alice"]);
    assert_eq!(listing.trim(), "Thu 14:00-15:30");
}

/// Registration enforces unique usernames and valid input.
#[test]
fn test_profile_validation() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    sb_ok(
        &config,
        &["profile", "create", "--user", "alice", "--name", "Alice"],
    );
    let stderr = sb_err(
        &config,
        &["profile", "create", "--user", "alice", "--name", "Other"],
    );
    assert!(stderr.contains("already exists"), "stderr: {stderr}");

    let stderr = sb_err(&config, &["profile", "show", "--user", "ghost"]);
    assert!(stderr.contains("no profile for ghost"), "stderr: {stderr}");
}

/// Unknown days and malformed times are rejected during argument parsing.
#[test]
fn test_invalid_day_and_time_arguments() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    sb_ok(
        &config,
        &["profile", "create", "--user", "alice", "--name", "Alice"],
    );

    let stderr = sb_err(
        &config,
        &[
            "avail", "add", "--user", "alice", "--day", "funday", "--start", "14:00", "--end",
            "15:00",
        ],
    );
    assert!(stderr.contains("unrecognized day"), "stderr: {stderr}");

    let stderr = sb_err(
        &config,
        &[
            "avail", "add", "--user", "alice", "--day", "mon", "--start", "25:00", "--end",
            "26:00",
        ],
    );
    assert!(stderr.contains("invalid time"), "stderr: {stderr}");
}

/// Matches emit machine-readable JSON with the overlap windows.
#[test]
fn test_matches_json_output() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    seed_math_student(&config, "alice");
    seed_math_student(&config, "bob");

    let output = sb_ok(&config, &["matches", "--user", "alice", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["candidate"], "bob");
    assert_eq!(parsed[0]["course"], "MATH4000");
    assert_eq!(parsed[0]["overlaps"][0]["day"], "Mon");
    assert_eq!(parsed[0]["overlaps"][0]["start"], "14:00");
    assert_eq!(parsed[0]["overlaps"][0]["end"], "15:30");
}
