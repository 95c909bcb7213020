//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::employee::{Employee, Sex};
use crate::query::{Criteria, PhotoFilter, SortKey};

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Given name
    #[arg(long, default_value = "")]
    pub first_name: String,

    /// Family name
    #[arg(long, default_value = "")]
    pub last_name: String,

    /// Email address
    #[arg(long, default_value = "")]
    pub email: String,

    /// Recorded sex
    #[arg(long, value_enum)]
    pub sex: Option<SexArg>,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub birthdate: Option<String>,

    /// Path to a profile photo file
    #[arg(long, value_name = "FILE")]
    pub photo: Option<PathBuf>,
}

/// Filter and ordering flags shared by the listing commands.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Only show employees whose full name contains this text
    #[arg(short, long, value_name = "TEXT")]
    pub name: Option<String>,

    /// Only show employees with this recorded sex
    #[arg(short, long, value_enum)]
    pub sex: Option<SexArg>,

    /// Only show employees born on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub born_after: Option<NaiveDate>,

    /// Only show employees born on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub born_before: Option<NaiveDate>,

    /// Only show employees with or without a profile photo
    #[arg(short, long, value_enum)]
    pub photo: Option<PhotoArg>,

    /// Ordering of the result
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
}

impl FilterArgs {
    /// Build query criteria from the flags.
    #[must_use]
    pub fn to_criteria(&self) -> Criteria {
        Criteria::default()
            .with_name_contains(self.name.clone())
            .with_sex(self.sex.map(Sex::from))
            .with_birthdate_range(self.born_after, self.born_before)
            .with_photo(self.photo.map(PhotoFilter::from))
            .with_sort(self.sort.map(SortKey::from))
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Filter and ordering flags
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Maximum number of results
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ListCommand {
    /// Cap the visible set at `--limit`, after criteria evaluation.
    #[must_use]
    pub fn apply_limit(&self, mut employees: Vec<Employee>) -> Vec<Employee> {
        if let Some(limit) = self.limit {
            employees.truncate(limit);
        }
        employees
    }
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Identifier of the employee to remove
    pub id: String,
}

/// Watch command arguments.
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Filter and ordering flags
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Sex argument for filtering and record entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SexArg {
    /// Recorded as male
    Male,
    /// Recorded as female
    Female,
    /// Other, or preferred not to say
    Unspecified,
}

impl From<SexArg> for Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Male => Self::Male,
            SexArg::Female => Self::Female,
            SexArg::Unspecified => Self::Unspecified,
        }
    }
}

/// Photo presence argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PhotoArg {
    /// Only employees with an uploaded photo
    Has,
    /// Only employees without a photo
    None,
}

impl From<PhotoArg> for PhotoFilter {
    fn from(arg: PhotoArg) -> Self {
        match arg {
            PhotoArg::Has => Self::HasPhoto,
            PhotoArg::None => Self::NoPhoto,
        }
    }
}

/// Sort order argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Youngest first
    AgeAsc,
    /// Oldest first
    AgeDesc,
    /// Alphabetical by full name
    Name,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::AgeAsc => Self::AgeAscending,
            SortArg::AgeDesc => Self::AgeDescending,
            SortArg::Name => Self::Name,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
