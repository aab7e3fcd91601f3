//! Command-line interface for paddock.
//!
//! This module provides the CLI structure for the `paddock` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ChampionshipCommand, ConfigCommand, DashboardCommand, EventAddCommand, EventCommand,
    ExportCommand, ImportCommand, StatusArg, TeamCommand, TrackCommand,
};

use crate::logging::Verbosity;

/// paddock - Standings and progress for motorsport leagues
///
/// Manage championships, teams, tracks and events, and compute the public
/// dashboard: standings, season progress and the next race.
#[derive(Debug, Parser)]
#[command(name = "paddock")]
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
    /// Manage championships
    #[command(subcommand)]
    Championship(ChampionshipCommand),

    /// Manage teams
    #[command(subcommand)]
    Team(TeamCommand),

    /// Manage tracks and results
    #[command(subcommand)]
    Track(TrackCommand),

    /// Manage exhibition events
    #[command(subcommand)]
    Event(EventCommand),

    /// Show standings, progress and the next race
    Dashboard(DashboardCommand),

    /// Import a championship bundle
    Import(ImportCommand),

    /// Export a championship bundle
    Export(ExportCommand),

    /// Rewrite stored documents in canonical form
    Normalize,

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
