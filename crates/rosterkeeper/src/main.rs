//! `rosterctl` - CLI for rosterkeeper
//!
//! This binary provides the command-line interface for validating, storing,
//! filtering, and watching employee records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::bail;
use chrono::NaiveDate;
use clap::Parser;
use tracing::warn;

use rosterkeeper::cli::{
    AddCommand, Cli, Command, ConfigCommand, ListCommand, OutputFormat, RemoveCommand,
    WatchCommand,
};
use rosterkeeper::employee::{Candidate, Employee};
use rosterkeeper::query::Criteria;
use rosterkeeper::session::Session;
use rosterkeeper::store::Store;
use rosterkeeper::validation::Validator;
use rosterkeeper::{display, init_logging, photo, store, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Add(cmd) => {
            let store = store::open(&config)?;
            handle_add(&*store, &config, cmd).await
        }
        Command::List(cmd) => {
            let store = store::open(&config)?;
            handle_list(&*store, &cmd).await
        }
        Command::Remove(cmd) => {
            let store = store::open(&config)?;
            handle_remove(&*store, &cmd).await
        }
        Command::Watch(cmd) => {
            let store = store::open(&config)?;
            handle_watch(store, cmd).await
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_add(store: &dyn Store, config: &Config, cmd: AddCommand) -> anyhow::Result<()> {
    let profile_photo = match &cmd.photo {
        Some(path) => match photo::read_to_data_uri(path).await {
            Ok(uri) => uri,
            // A bad photo never blocks the save; the record falls back to
            // the placeholder.
            Err(e) => {
                warn!(error = %e, "Could not read photo; continuing without one");
                photo::PLACEHOLDER.to_string()
            }
        },
        None => photo::PLACEHOLDER.to_string(),
    };

    let candidate = Candidate {
        first_name: cmd.first_name,
        last_name: cmd.last_name,
        email: cmd.email,
        sex: cmd.sex.map(Into::into),
        // An unparseable date counts as unselected, like an empty picker.
        birthdate: cmd
            .birthdate
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
        profile_photo,
    };

    let validator = Validator::with_config(&config.validation);
    let report = validator.validate(&candidate);
    if !report.is_valid() {
        eprintln!("Cannot add employee:");
        eprint!("{}", display::render_validation_errors(&report));
        bail!("validation failed");
    }

    let employee = candidate.into_employee()?;
    let id = store.add(&employee).await?;
    println!("Added employee {id}");

    let all = store.list(&Criteria::default()).await?;
    print!("{}", display::render_table(&all));
    Ok(())
}

async fn handle_list(store: &dyn Store, cmd: &ListCommand) -> anyhow::Result<()> {
    let criteria = cmd.filter.to_criteria();
    let visible = cmd.apply_limit(store.list(&criteria).await?);
    print!("{}", render(&visible, cmd.format)?);
    Ok(())
}

async fn handle_remove(store: &dyn Store, cmd: &RemoveCommand) -> anyhow::Result<()> {
    if store.remove(&cmd.id).await? {
        println!("Removed employee {}", cmd.id);
        Ok(())
    } else {
        bail!("no employee with id {}", cmd.id);
    }
}

async fn handle_watch(store: Arc<dyn Store>, cmd: WatchCommand) -> anyhow::Result<()> {
    let mut session = Session::new(store);
    session.set_criteria(cmd.filter.to_criteria())?;
    let mut rx = session.watch()?;

    eprintln!("Watching roster (press Ctrl-C to stop)...");
    loop {
        tokio::select! {
            snapshot = rx.recv() => {
                let Some(visible) = snapshot else { break };
                print!("{}", render(&visible, cmd.format)?);
                println!();
            }
            _ = tokio::signal::ctrl_c() => {
                session.unwatch();
                break;
            }
        }
    }
    Ok(())
}

fn render(employees: &[Employee], format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Plain => display::render_plain(employees),
        OutputFormat::Table => display::render_table(employees),
        OutputFormat::Json => {
            let mut out = display::render_json(employees)?;
            out.push('\n');
            out
        }
    })
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Store]");
                println!("  Backend:        {:?}", config.store.backend);
                println!("  Collection:     {}", config.store.collection);
                println!("  Blob path:      {}", config.blob_path().display());
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Validation]");
                println!("  Require photo:  {}", config.validation.require_photo);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
