//! Command-line interface for rosterkeeper.
//!
//! This module provides the CLI structure and command handlers for the
//! `rosterctl` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, FilterArgs, ListCommand, OutputFormat, PhotoArg, RemoveCommand,
    SexArg, SortArg, WatchCommand,
};

/// rosterctl - Manage an employee roster
///
/// Validates, stores, filters, and sorts employee records, with a choice of
/// a local JSON blob or a SQLite document collection as the backend.
#[derive(Debug, Parser)]
#[command(name = "rosterctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate and add an employee record
    Add(AddCommand),

    /// List employees matching the given filters
    List(ListCommand),

    /// Remove an employee by identifier
    Remove(RemoveCommand),

    /// Watch the roster and reprint it on every change
    Watch(WatchCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
