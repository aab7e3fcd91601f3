//! Standings tables.
//!
//! Team championships get a team table plus a driver table flattened from
//! every team roster. Individual championships get a driver table built from
//! the championship roster, or from the team rosters when the championship
//! carries none.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::{Category, Championship, Driver, Team, Track};
use crate::points::Ledger;

/// How entries with equal points are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Ascending by name, case-insensitive first.
    #[default]
    Name,
    /// Keep the order the entries were loaded in.
    Insertion,
}

/// One row of the team table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    /// Team name.
    pub name: String,
    /// Team display color.
    pub color: String,
    /// Team total.
    pub points: u32,
    /// The team's drivers with their own totals, in roster order.
    pub drivers: Vec<DriverStanding>,
}

/// One row of a driver table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStanding {
    /// Driver name.
    pub name: String,
    /// Driver category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Team name when the row comes from a team roster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Team color when the row comes from a team roster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_color: Option<String>,
    /// Driver total.
    pub points: u32,
}

/// Both standings tables for a championship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Standings {
    /// Team table, empty for individual championships.
    pub teams: Vec<TeamStanding>,
    /// Driver table.
    pub drivers: Vec<DriverStanding>,
}

/// Build the standings tables for a championship.
#[must_use]
pub fn build(
    championship: &Championship,
    teams: &[Team],
    tracks: &[Track],
    tie_break: TieBreak,
) -> Standings {
    let roster = teams
        .iter()
        .flat_map(|t| t.drivers.iter())
        .chain(championship.drivers.iter());
    let ledger = Ledger::choose(tracks, roster);

    let standings = if championship.is_team_championship() {
        Standings {
            teams: team_standings(teams, &ledger, tie_break),
            drivers: team_driver_standings(teams, &ledger, tie_break),
        }
    } else {
        Standings {
            teams: Vec::new(),
            drivers: individual_standings(championship, teams, &ledger, tie_break),
        }
    };

    trace!(
        "Built standings: {} teams, {} drivers",
        standings.teams.len(),
        standings.drivers.len()
    );
    standings
}

/// Rank teams by team total.
#[must_use]
pub fn team_standings(teams: &[Team], ledger: &Ledger<'_>, tie_break: TieBreak) -> Vec<TeamStanding> {
    let mut rows: Vec<TeamStanding> = teams
        .iter()
        .map(|team| TeamStanding {
            name: team.name.clone(),
            color: team.color.clone(),
            points: ledger.team_total(team),
            drivers: team
                .drivers
                .iter()
                .map(|d| team_driver_row(d, team, ledger))
                .collect(),
        })
        .collect();

    rank(&mut rows, tie_break, |r| (r.points, r.name.as_str()));
    rows
}

/// Rank every driver of every team, tagged with their team.
#[must_use]
pub fn team_driver_standings(
    teams: &[Team],
    ledger: &Ledger<'_>,
    tie_break: TieBreak,
) -> Vec<DriverStanding> {
    let mut rows: Vec<DriverStanding> = teams
        .iter()
        .flat_map(|team| team.drivers.iter().map(move |d| (d, team)))
        .map(|(d, team)| team_driver_row(d, team, ledger))
        .collect();

    rank(&mut rows, tie_break, |r| (r.points, r.name.as_str()));
    rows
}

/// Rank the drivers of an individual championship.
///
/// Reads the championship roster when it has one, otherwise falls back to
/// the team rosters.
#[must_use]
pub fn individual_standings(
    championship: &Championship,
    teams: &[Team],
    ledger: &Ledger<'_>,
    tie_break: TieBreak,
) -> Vec<DriverStanding> {
    if championship.drivers.is_empty() {
        return team_driver_standings(teams, ledger, tie_break);
    }

    let mut rows: Vec<DriverStanding> = championship
        .drivers
        .iter()
        .map(|d| DriverStanding {
            name: d.name.clone(),
            category: d.category,
            team: None,
            team_color: None,
            points: ledger.driver_total(d),
        })
        .collect();

    rank(&mut rows, tie_break, |r| (r.points, r.name.as_str()));
    rows
}

fn team_driver_row(driver: &Driver, team: &Team, ledger: &Ledger<'_>) -> DriverStanding {
    DriverStanding {
        name: driver.name.clone(),
        category: driver.category,
        team: Some(team.name.clone()),
        team_color: Some(team.color.clone()),
        points: ledger.driver_total(driver),
    }
}

/// Stable sort, points descending, then the tie-break key.
fn rank<T>(rows: &mut [T], tie_break: TieBreak, key: impl Fn(&T) -> (u32, &str)) {
    rows.sort_by(|a, b| {
        let (a_points, a_name) = key(a);
        let (b_points, b_name) = key(b);
        b_points.cmp(&a_points).then_with(|| match tie_break {
            TieBreak::Name => compare_names(a_name, b_name),
            TieBreak::Insertion => Ordering::Equal,
        })
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
