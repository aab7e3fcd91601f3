//! Championship bundles.
//!
//! A bundle is a single JSON document holding a championship with all of its
//! teams, tracks and events. Exporting and re-importing a bundle into the
//! same database replaces the stored documents in place.

use std::fs;
use std::path::Path;

use paddock_core::normalize::trim_driver_names;
use paddock_core::validation::{
    validate_championship, validate_event, validate_team, validate_track,
};
use paddock_core::{Championship, Event, Team, Track};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::storage::{generate_id, Collection, Storage};

/// A championship and everything that belongs to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bundle {
    /// The championship.
    pub championship: Championship,
    /// Its teams.
    pub teams: Vec<Team>,
    /// Its tracks.
    pub tracks: Vec<Track>,
    /// Its events.
    pub events: Vec<Event>,
}

/// Counts of documents written by an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Teams written.
    pub teams: usize,
    /// Tracks written.
    pub tracks: usize,
    /// Events written.
    pub events: usize,
}

/// Collect a championship and its documents into a bundle.
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`] for an unknown id, or a storage error.
pub fn export(storage: &Storage, championship_id: &str) -> Result<Bundle> {
    Ok(Bundle {
        championship: storage.require(championship_id)?,
        teams: storage.list_for(championship_id)?,
        tracks: storage.list_for(championship_id)?,
        events: storage.list_for(championship_id)?,
    })
}

/// Validate a bundle and store all of its documents.
///
/// Documents without an id get a new one. Every document is attached to the
/// bundle's championship. Nothing is written if any document is invalid.
///
/// # Errors
///
/// Returns a validation error naming the first invalid document, or a
/// storage error.
pub fn import(storage: &Storage, mut bundle: Bundle) -> Result<ImportSummary> {
    if bundle.championship.id.is_empty() {
        bundle.championship.id = generate_id(Collection::Championships);
    }
    let championship_id = bundle.championship.id.clone();

    trim_driver_names(&mut bundle.championship.drivers);
    validate_championship(&bundle.championship)?;
    for (index, team) in bundle.teams.iter_mut().enumerate() {
        team.championship_id.clone_from(&championship_id);
        trim_driver_names(&mut team.drivers);
        validate_team(team, &bundle.championship, index)?;
    }
    for track in &mut bundle.tracks {
        track.championship_id.clone_from(&championship_id);
        validate_track(track)?;
    }
    for event in &mut bundle.events {
        event.championship_id.clone_from(&championship_id);
        validate_event(event)?;
    }

    storage.upsert(&mut bundle.championship)?;
    for team in &mut bundle.teams {
        storage.upsert(team)?;
    }
    for track in &mut bundle.tracks {
        storage.upsert(track)?;
    }
    for event in &mut bundle.events {
        storage.upsert(event)?;
    }

    let summary = ImportSummary {
        teams: bundle.teams.len(),
        tracks: bundle.tracks.len(),
        events: bundle.events.len(),
    };
    info!(
        "Imported championship {} with {} teams, {} tracks, {} events",
        championship_id, summary.teams, summary.tracks, summary.events
    );
    Ok(summary)
}

/// Read a bundle from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_file(path: &Path) -> Result<Bundle> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write a bundle to a JSON file.
///
/// # Errors
///
/// Returns an error if the bundle cannot be serialized or written.
pub fn write_file(bundle: &Bundle, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(bundle)?;
    fs::write(path, text)?;
    Ok(())
}
