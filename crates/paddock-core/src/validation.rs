//! Validation rules for admin writes.
//!
//! Storage accepts any document; these checks run before a write is issued.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::model::{Championship, ChampionshipStatus, Event, Team, Track};

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

static HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[01]\d|2[0-3]):[0-5]\d$").expect("valid regex"));

/// A rule violated by an admin write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the field.
        field: &'static str,
    },

    /// A team was submitted without drivers.
    #[error("team '{team}' must have at least one driver")]
    NoDrivers {
        /// Team name.
        team: String,
    },

    /// A roster lists the same driver twice.
    #[error("driver '{driver}' is listed more than once")]
    DuplicateDriver {
        /// Driver name.
        driver: String,
    },

    /// A color is not a hex color.
    #[error("invalid color '{color}', expected #RGB or #RRGGBB")]
    InvalidColor {
        /// The rejected value.
        color: String,
    },

    /// An hour is not `HH:MM`.
    #[error("invalid hour '{hour}', expected HH:MM")]
    InvalidHour {
        /// The rejected value.
        hour: String,
    },

    /// A championship cap would be exceeded.
    #[error("{what} limit of {limit} reached")]
    LimitReached {
        /// What is being counted.
        what: &'static str,
        /// The configured cap.
        limit: u32,
    },

    /// Start date after end date.
    #[error("start date must not be after end date")]
    InvertedDates,

    /// Round numbers start at 1.
    #[error("round must be at least 1")]
    InvalidRound,

    /// An event has more entrants than places.
    #[error("event is full ({max} participants)")]
    EventFull {
        /// Capacity of the event.
        max: u32,
    },

    /// An entrant signed up twice.
    #[error("'{name}' is already entered")]
    AlreadyEntered {
        /// Entrant name.
        name: String,
    },

    /// The status change is not part of the lifecycle.
    #[error("cannot move championship from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: ChampionshipStatus,
        /// Requested status.
        to: ChampionshipStatus,
    },
}

/// Check a championship document.
///
/// # Errors
///
/// Returns the first rule the championship breaks.
pub fn validate_championship(championship: &Championship) -> Result<(), ValidationError> {
    if championship.name.trim().is_empty() {
        return Err(ValidationError::Empty { field: "name" });
    }
    if let (Some(start), Some(end)) = (championship.start_date, championship.end_date) {
        if start > end {
            return Err(ValidationError::InvertedDates);
        }
    }
    unique_names(championship.drivers.iter().map(|d| d.name.as_str()))
}

/// Check a team against its championship.
///
/// `other_teams` is the number of teams already entered, excluding this one.
///
/// # Errors
///
/// Returns the first rule the team breaks.
pub fn validate_team(
    team: &Team,
    championship: &Championship,
    other_teams: usize,
) -> Result<(), ValidationError> {
    if team.name.trim().is_empty() {
        return Err(ValidationError::Empty { field: "team name" });
    }
    if !is_hex_color(&team.color) {
        return Err(ValidationError::InvalidColor {
            color: team.color.clone(),
        });
    }
    if team.drivers.is_empty() {
        return Err(ValidationError::NoDrivers {
            team: team.name.clone(),
        });
    }
    if team.drivers.iter().any(|d| d.name.trim().is_empty()) {
        return Err(ValidationError::Empty {
            field: "driver name",
        });
    }
    unique_names(team.drivers.iter().map(|d| d.name.as_str()))?;

    let settings = &championship.settings;
    check_limit("team", settings.max_teams, other_teams + 1)?;
    check_limit(
        "drivers per team",
        settings.max_drivers_per_team,
        team.drivers.len(),
    )
}

/// Check a track document.
///
/// # Errors
///
/// Returns the first rule the track breaks.
pub fn validate_track(track: &Track) -> Result<(), ValidationError> {
    if track.name.trim().is_empty() {
        return Err(ValidationError::Empty { field: "track name" });
    }
    if track.round == 0 {
        return Err(ValidationError::InvalidRound);
    }
    Ok(())
}

/// Check an event document.
///
/// # Errors
///
/// Returns the first rule the event breaks.
pub fn validate_event(event: &Event) -> Result<(), ValidationError> {
    if event.title.trim().is_empty() {
        return Err(ValidationError::Empty { field: "title" });
    }
    if !HOUR.is_match(&event.hour) {
        return Err(ValidationError::InvalidHour {
            hour: event.hour.clone(),
        });
    }
    if event.participants.len() > event.max_participants as usize {
        return Err(ValidationError::EventFull {
            max: event.max_participants,
        });
    }
    let mut seen = HashSet::new();
    for p in &event.participants {
        if !seen.insert(p.name.as_str()) {
            return Err(ValidationError::AlreadyEntered {
                name: p.name.clone(),
            });
        }
    }
    Ok(())
}

/// Check a championship status change.
///
/// Staying in the same status is allowed.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTransition`] for moves outside the lifecycle.
pub fn check_transition(
    from: ChampionshipStatus,
    to: ChampionshipStatus,
) -> Result<(), ValidationError> {
    use ChampionshipStatus::{Active, Archived, Completed, Draft};

    let allowed = from == to
        || matches!(
            (from, to),
            (Draft, Active) | (Active, Completed) | (Draft | Active | Completed, Archived)
        );
    if allowed {
        Ok(())
    } else {
        Err(ValidationError::InvalidTransition { from, to })
    }
}

/// Whether a string is a `#RGB` or `#RRGGBB` color.
#[must_use]
pub fn is_hex_color(color: &str) -> bool {
    HEX_COLOR.is_match(color)
}

fn check_limit(what: &'static str, limit: u32, count: usize) -> Result<(), ValidationError> {
    if limit > 0 && count > limit as usize {
        return Err(ValidationError::LimitReached { what, limit });
    }
    Ok(())
}

fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateDriver {
                driver: name.to_string(),
            });
        }
    }
    Ok(())
}
