//! `paddock-core` - standings and progress for motorsport leagues
//!
//! Pure computations over already-loaded league data: point aggregation,
//! standings tables, championship progress and next-race selection, plus
//! the data model, load-time normalization and admin validation rules.
//! Nothing in this crate performs I/O.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod model;
pub mod normalize;
pub mod points;
pub mod progress;
pub mod results;
pub mod schedule;
pub mod standings;
pub mod validation;

pub use model::{
    Category, Championship, ChampionshipSettings, ChampionshipStatus, Driver, Event, Participant,
    Team, Track, TrackStatus,
};
pub use points::{points_for, team_points, total_points, Ledger, PointsMap};
pub use progress::{progress, Progress};
pub use schedule::{next_race, upcoming};
pub use standings::{DriverStanding, Standings, TeamStanding, TieBreak};
pub use validation::ValidationError;
