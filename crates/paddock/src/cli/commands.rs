//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use paddock_core::{Category, ChampionshipStatus, Driver};

/// Championship commands.
#[derive(Debug, Subcommand)]
pub enum ChampionshipCommand {
    /// Create a draft championship
    Create {
        /// Championship name
        name: String,

        /// Season label
        #[arg(short, long)]
        season: String,

        /// Rank standings by team
        #[arg(long)]
        teams: bool,
    },

    /// List championships
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one championship
    Show {
        /// Championship id
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Change the lifecycle status
    Status {
        /// Championship id
        id: String,

        /// New status
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Set the season window
    Dates {
        /// Championship id
        id: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Replace the driver roster
    Roster {
        /// Championship id
        id: String,

        /// Drivers as NAME or NAME:CATEGORY
        #[arg(required = true, value_parser = parse_driver)]
        drivers: Vec<Driver>,
    },
}

/// Team commands.
#[derive(Debug, Subcommand)]
pub enum TeamCommand {
    /// Enter a team
    Add {
        /// Championship id
        championship: String,

        /// Team name
        name: String,

        /// Display color (#RGB or #RRGGBB)
        #[arg(long, default_value = "#888888")]
        color: String,

        /// Drivers as NAME or NAME:CATEGORY
        #[arg(short, long = "driver", required = true, value_parser = parse_driver)]
        drivers: Vec<Driver>,
    },

    /// Change a team's name, color or roster
    Update {
        /// Team id
        id: String,

        /// New team name
        #[arg(short, long)]
        name: Option<String>,

        /// New display color (#RGB or #RRGGBB)
        #[arg(long)]
        color: Option<String>,

        /// Replacement roster as NAME or NAME:CATEGORY
        #[arg(short, long = "driver", value_parser = parse_driver)]
        drivers: Option<Vec<Driver>>,
    },

    /// List the teams of a championship
    List {
        /// Championship id
        championship: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Delete a team
    Delete {
        /// Team id
        id: String,
    },
}

/// Track commands.
#[derive(Debug, Subcommand)]
pub enum TrackCommand {
    /// Schedule a track
    Add {
        /// Championship id
        championship: String,

        /// Circuit name
        name: String,

        /// Round number
        #[arg(short, long)]
        round: u32,

        /// Race day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Country
        #[arg(long, default_value = "")]
        country: String,
    },

    /// List the tracks of a championship
    List {
        /// Championship id
        championship: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Record a finishing order, winner first
    Results {
        /// Track id
        id: String,

        /// Driver names in finishing order
        #[arg(required = true)]
        order: Vec<String>,
    },

    /// Set raw points as NAME=POINTS
    Points {
        /// Track id
        id: String,

        /// Entries as NAME=POINTS; none clears the results
        #[arg(value_parser = parse_points_entry)]
        entries: Vec<(String, u32)>,
    },

    /// Delete a track
    Delete {
        /// Track id
        id: String,
    },
}

/// Event commands.
#[derive(Debug, Subcommand)]
pub enum EventCommand {
    /// Create an exhibition event
    Add(EventAddCommand),

    /// List the events of a championship
    List {
        /// Championship id
        championship: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Sign up for an event
    Join {
        /// Event id
        id: String,

        /// Entrant name
        name: String,

        /// Team label
        #[arg(short, long)]
        team: Option<String>,
    },

    /// Withdraw from an event
    Leave {
        /// Event id
        id: String,

        /// Entrant name
        name: String,
    },

    /// Delete an event
    Delete {
        /// Event id
        id: String,
    },
}

/// Event creation arguments.
#[derive(Debug, Args)]
pub struct EventAddCommand {
    /// Championship id
    pub championship: String,

    /// Event title
    pub title: String,

    /// Event day (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Start time (HH:MM)
    #[arg(long, default_value = "20:00")]
    pub hour: String,

    /// Capacity
    #[arg(short, long, default_value = "20")]
    pub max: u32,

    /// Regulations as KEY=VALUE
    #[arg(long = "rule", value_parser = parse_rule)]
    pub rules: Vec<(String, String)>,
}

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Championship id
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Compute as of this day instead of today (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Bundle file to read
    pub file: PathBuf,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Championship id
    pub id: String,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
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

/// Championship status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Being set up
    Draft,
    /// Season in progress
    Active,
    /// Season finished
    Completed,
    /// Kept for history
    Archived,
}

impl From<StatusArg> for ChampionshipStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => Self::Draft,
            StatusArg::Active => Self::Active,
            StatusArg::Completed => Self::Completed,
            StatusArg::Archived => Self::Archived,
        }
    }
}

/// Parse `NAME` or `NAME:CATEGORY`.
fn parse_driver(s: &str) -> Result<Driver, String> {
    match s.rsplit_once(':') {
        Some((name, category)) => {
            let category: Category = category.parse()?;
            Ok(Driver::with_category(name.trim(), category))
        }
        None => Ok(Driver::new(s.trim())),
    }
}

fn parse_points_entry(s: &str) -> Result<(String, u32), String> {
    let (name, points) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=POINTS, got '{s}'"))?;
    let points = points
        .trim()
        .parse()
        .map_err(|_| format!("invalid points '{points}'"))?;
    Ok((name.trim().to_string(), points))
}

fn parse_rule(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}
