//! Public dashboard for a championship.
//!
//! Loading issues the championship and collection reads together. They
//! overlap for stores with asynchronous I/O; the `SQLite` store serves them
//! one at a time behind its connection mutex. A collection that fails to
//! load is logged and treated as empty so the rest of the dashboard still
//! renders; only a missing championship is an error.

use std::fmt::Write as _;

use chrono::{NaiveDateTime, NaiveTime};
use paddock_core::standings::{self, Standings, TieBreak};
use paddock_core::{
    next_race, progress, Championship, ChampionshipStatus, Event, Progress, Team, Track,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::store::LeagueStore;

/// Everything the dashboard is computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardData {
    /// The championship shown.
    pub championship: Championship,
    /// Its teams.
    pub teams: Vec<Team>,
    /// Its tracks.
    pub tracks: Vec<Track>,
    /// Its events.
    pub events: Vec<Event>,
}

/// Load the data for a championship's dashboard.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the championship does not exist, or the
/// store's error if the championship itself cannot be read.
pub async fn load(store: &dyn LeagueStore, championship_id: &str) -> Result<DashboardData> {
    debug!("Loading dashboard for {} from {}", championship_id, store.name());

    let (championship, teams, tracks, events) = tokio::join!(
        store.championship(championship_id),
        store.teams(championship_id),
        store.tracks(championship_id),
        store.events(championship_id),
    );

    let championship =
        championship?.ok_or_else(|| Error::not_found("championship", championship_id))?;

    Ok(DashboardData {
        championship,
        teams: or_empty("teams", teams),
        tracks: or_empty("tracks", tracks),
        events: or_empty("events", events),
    })
}

fn or_empty<T>(collection: &str, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("Failed to load {}: {}", collection, e);
        Vec::new()
    })
}

/// Header fields of the championship shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionshipSummary {
    /// Championship id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Season label.
    pub season: String,
    /// Lifecycle state.
    pub status: ChampionshipStatus,
    /// Whether standings are ranked by team.
    pub is_team_championship: bool,
}

/// The computed dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Championship header.
    pub championship: ChampionshipSummary,
    /// Standings tables.
    pub standings: Standings,
    /// Season progress.
    pub progress: Progress,
    /// The next track to be raced.
    pub next_race: Option<Track>,
    /// Events on or after today, soonest first.
    pub events: Vec<Event>,
}

impl Dashboard {
    /// Compute the dashboard from loaded data at the given local time.
    #[must_use]
    pub fn build(data: &DashboardData, tie_break: TieBreak, now: NaiveDateTime) -> Self {
        let today = now.date();
        let championship = &data.championship;

        let mut events: Vec<Event> = data
            .events
            .iter()
            .filter(|e| e.date.is_some_and(|d| d >= today))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.hour.cmp(&b.hour)));

        Self {
            championship: ChampionshipSummary {
                id: championship.id.clone(),
                name: championship.name.clone(),
                season: championship.season.clone(),
                status: championship.status,
                is_team_championship: championship.is_team_championship(),
            },
            standings: standings::build(championship, &data.teams, &data.tracks, tie_break),
            progress: progress(&data.tracks, championship, now),
            next_race: next_race(&data.tracks, today).cloned(),
            events,
        }
    }

    /// Render the dashboard as plain text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let c = &self.championship;
        let _ = writeln!(out, "{} ({}) [{}]", c.name, c.season, c.status);
        let _ = writeln!(out, "{}", "=".repeat(40));

        let p = &self.progress;
        if p.total > 0 {
            let _ = writeln!(
                out,
                "Progress:   {}% ({}/{} races)",
                p.percentage, p.completed, p.total
            );
        } else {
            let _ = writeln!(out, "Progress:   {}%", p.percentage);
        }

        match &self.next_race {
            Some(track) => {
                let date = track
                    .date
                    .map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string());
                let _ = writeln!(
                    out,
                    "Next race:  Round {} - {} ({}) {}",
                    track.round, track.name, track.country, date
                );
            }
            None => {
                let _ = writeln!(out, "Next race:  none scheduled");
            }
        }

        if !self.standings.teams.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "[Teams]");
            for (pos, team) in self.standings.teams.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:>3}. {:<24} {:>5} pts",
                    pos + 1,
                    team.name,
                    team.points
                );
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "[Drivers]");
        for (pos, driver) in self.standings.drivers.iter().enumerate() {
            let team = driver
                .team
                .as_deref()
                .map_or_else(String::new, |t| format!(" ({t})"));
            let _ = writeln!(
                out,
                "{:>3}. {:<24} {:>5} pts{}",
                pos + 1,
                driver.name,
                driver.points,
                team
            );
        }

        if !self.events.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "[Events]");
            for event in &self.events {
                let date = event
                    .date
                    .map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string());
                let _ = writeln!(
                    out,
                    "  {} {} {} ({}/{})",
                    date,
                    event.hour,
                    event.title,
                    event.participants.len(),
                    event.max_participants
                );
            }
        }

        out
    }
}

/// Midnight of a date, for callers that only know the day.
#[must_use]
pub fn start_of_day(date: chrono::NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
