use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sb_cli::commands::{avail, classmates, course, matches, profile, session};
use sb_cli::{AvailAction, Cli, Commands, Config, CourseAction, ProfileAction, SessionAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<sb_db::Database> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = sb_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok(db)
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Profile { action }) => {
            let db = open_database(cli.config.as_deref())?;
            match action {
                ProfileAction::Create { user, name } => {
                    profile::create(&mut stdout, &db, user, name)?;
                }
                ProfileAction::Show { user } => profile::show(&mut stdout, &db, user)?,
            }
        }
        Some(Commands::Course { action }) => {
            let db = open_database(cli.config.as_deref())?;
            match action {
                CourseAction::Add { user, code } => course::add(&mut stdout, &db, user, code)?,
                CourseAction::Remove { user, code } => {
                    course::remove(&mut stdout, &db, user, code)?;
                }
                CourseAction::List { user, json } => {
                    course::list(&mut stdout, &db, user, *json)?;
                }
            }
        }
        Some(Commands::Avail { action }) => {
            let db = open_database(cli.config.as_deref())?;
            match action {
                AvailAction::Add {
                    user,
                    day,
                    start,
                    end,
                } => avail::add(&mut stdout, &db, user, *day, *start, *end)?,
                AvailAction::Remove {
                    user,
                    day,
                    start,
                    end,
                } => avail::remove(&mut stdout, &db, user, *day, *start, *end)?,
                AvailAction::List { user, json } => avail::list(&mut stdout, &db, user, *json)?,
            }
        }
        Some(Commands::Classmates { user, course, json }) => {
            let db = open_database(cli.config.as_deref())?;
            classmates::run(&mut stdout, &db, user, course, *json)?;
        }
        Some(Commands::Matches { user, json }) => {
            let db = open_database(cli.config.as_deref())?;
            matches::run(&mut stdout, &db, user, *json)?;
        }
        Some(Commands::Session { action }) => {
            let db = open_database(cli.config.as_deref())?;
            match action {
                SessionAction::Propose {
                    initiator,
                    invitee,
                    course,
                    day,
                    start,
                    end,
                } => session::propose(
                    &mut stdout,
                    &db,
                    initiator,
                    invitee,
                    course,
                    *day,
                    *start,
                    *end,
                )?,
                SessionAction::Confirm { user, id } => {
                    session::confirm(&mut stdout, &db, user, id)?;
                }
                SessionAction::List { user, json } => {
                    session::list(&mut stdout, &db, user, *json)?;
                }
                SessionAction::Pending { user, json } => {
                    session::pending(&mut stdout, &db, user, *json)?;
                }
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
