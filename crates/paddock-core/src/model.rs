//! League data model.
//!
//! These are the document shapes held by the store: championships, teams
//! with their embedded drivers, tracks with their points maps, and events.
//! Field names serialize in camelCase to match the stored documents.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize;
use crate::points::PointsMap;

/// Lifecycle state of a championship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChampionshipStatus {
    /// Being set up, not yet visible as running.
    #[default]
    Draft,
    /// Season in progress.
    Active,
    /// Season finished.
    Completed,
    /// Kept for history only.
    Archived,
}

impl fmt::Display for ChampionshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for ChampionshipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown championship status: {other}")),
        }
    }
}

/// Championship-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChampionshipSettings {
    /// Whether standings are ranked by team (true) or by driver (false).
    pub is_team_championship: bool,
    /// Points awarded by finishing position, winner first.
    pub points_per_position: Vec<u32>,
    /// Maximum number of teams. 0 means unlimited.
    pub max_teams: u32,
    /// Maximum drivers per team. 0 means unlimited.
    pub max_drivers_per_team: u32,
}

/// A season-long competition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Championship {
    /// Document id, empty until stored.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Season label, e.g. "2025".
    pub season: String,
    /// Lifecycle state.
    pub status: ChampionshipStatus,
    /// Scoring and capacity settings.
    pub settings: ChampionshipSettings,
    /// Driver roster for individual-format championships.
    ///
    /// Stored entries may be bare names or `{name, category}` records.
    #[serde(deserialize_with = "normalize::roster")]
    pub drivers: Vec<Driver>,
    /// First day of the season.
    #[serde(
        deserialize_with = "normalize::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
    /// Last day of the season.
    #[serde(
        deserialize_with = "normalize::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
}

impl Championship {
    /// Create a draft championship with the given name and season.
    #[must_use]
    pub fn new(name: impl Into<String>, season: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            season: season.into(),
            ..Self::default()
        }
    }

    /// Whether standings are ranked by team.
    #[must_use]
    pub fn is_team_championship(&self) -> bool {
        self.settings.is_team_championship
    }
}

/// Driver category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Group 1.
    Gr1,
    /// Group 2.
    Gr2,
    /// Group 3.
    Gr3,
    /// Group 4.
    Gr4,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gr1 => write!(f, "Gr1"),
            Self::Gr2 => write!(f, "Gr2"),
            Self::Gr3 => write!(f, "Gr3"),
            Self::Gr4 => write!(f, "Gr4"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts `Gr1`, `gr.1`, `GR 1` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "gr1" => Ok(Self::Gr1),
            "gr2" => Ok(Self::Gr2),
            "gr3" => Ok(Self::Gr3),
            "gr4" => Ok(Self::Gr4),
            _ => Err(format!("unknown driver category: {s}")),
        }
    }
}

/// A driver, embedded in a team or listed on a championship roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Driver {
    /// Driver name. Matches the keys of track points maps exactly.
    pub name: String,
    /// Category, if assigned.
    #[serde(
        deserialize_with = "normalize::lenient_category",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Category>,
    /// Points total carried by older documents.
    ///
    /// Only read through [`crate::points::Ledger`] when no track carries results.
    #[serde(
        rename = "points",
        deserialize_with = "normalize::lenient_points",
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_points: Option<u32>,
}

impl Driver {
    /// Create a driver without a category.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a driver with a category.
    #[must_use]
    pub fn with_category(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category: Some(category),
            legacy_points: None,
        }
    }
}

/// A team entered in a championship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Team {
    /// Document id, empty until stored.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Owning championship.
    pub championship_id: String,
    /// Team name.
    pub name: String,
    /// Display color as a hex string.
    pub color: String,
    /// Roster in display order.
    pub drivers: Vec<Driver>,
}

impl Team {
    /// Create a team with the given roster.
    #[must_use]
    pub fn new(
        championship_id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        drivers: Vec<Driver>,
    ) -> Self {
        Self {
            id: String::new(),
            championship_id: championship_id.into(),
            name: name.into(),
            color: color.into(),
            drivers,
        }
    }
}

/// Race state of a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackStatus {
    /// Not raced yet.
    #[default]
    #[serde(rename = "scheduled")]
    Scheduled,
    /// Race under way.
    #[serde(rename = "in-progress", alias = "in_progress")]
    InProgress,
    /// Results final.
    #[serde(rename = "completed")]
    Completed,
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A scheduled race and its results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Track {
    /// Document id, empty until stored.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Owning championship.
    pub championship_id: String,
    /// Circuit name.
    pub name: String,
    /// Country of the circuit.
    pub country: String,
    /// Race day.
    #[serde(
        deserialize_with = "normalize::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    /// Round number within the season, starting at 1.
    pub round: u32,
    /// Race state.
    pub status: TrackStatus,
    /// Points awarded per driver name.
    pub points: PointsMap,
}

impl Track {
    /// Create a scheduled track without results.
    #[must_use]
    pub fn new(
        championship_id: impl Into<String>,
        name: impl Into<String>,
        date: Option<NaiveDate>,
        round: u32,
    ) -> Self {
        Self {
            championship_id: championship_id.into(),
            name: name.into(),
            date,
            round,
            ..Self::default()
        }
    }

    /// A track is raced once its points map holds at least one entry.
    #[must_use]
    pub fn is_raced(&self) -> bool {
        !self.points.is_empty()
    }
}

/// One entrant of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Participant {
    /// Entrant name.
    pub name: String,
    /// Optional team label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

/// An exhibition race outside the championship points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    /// Document id, empty until stored.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Owning championship.
    pub championship_id: String,
    /// Event title.
    pub title: String,
    /// Event day.
    #[serde(
        deserialize_with = "normalize::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    /// Start time as `HH:MM`.
    pub hour: String,
    /// Race regulations, free-form.
    pub rules: BTreeMap<String, String>,
    /// Capacity.
    pub max_participants: u32,
    /// Entrants in sign-up order.
    pub participants: Vec<Participant>,
}

impl Event {
    /// Whether the event has reached its capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }

    /// Whether an entrant with this exact name has signed up.
    #[must_use]
    pub fn has_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.name == name)
    }
}
