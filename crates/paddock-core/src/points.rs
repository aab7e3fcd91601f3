//! Point ledger and aggregation.
//!
//! Points live on tracks, keyed by driver name. A driver's total is the sum
//! over every track of the championship; a team's total is the sum of its
//! drivers' totals. Absent data always reads as zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::model::{Driver, Team, Track};
use crate::normalize::points_value;

/// Points awarded at one track, keyed by exact driver name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PointsMap(BTreeMap<String, u32>);

impl PointsMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Points for a driver, zero when absent.
    #[must_use]
    pub fn get(&self, driver_name: &str) -> u32 {
        self.0.get(driver_name).copied().unwrap_or(0)
    }

    /// Whether the driver has an entry, even a zero one.
    #[must_use]
    pub fn contains(&self, driver_name: &str) -> bool {
        self.0.contains_key(driver_name)
    }

    /// Set the points for a driver, returning the previous value.
    pub fn insert(&mut self, driver_name: impl Into<String>, points: u32) -> Option<u32> {
        self.0.insert(driver_name.into(), points)
    }

    /// Remove a driver's entry.
    pub fn remove(&mut self, driver_name: &str) -> Option<u32> {
        self.0.remove(driver_name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no driver has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, points)| (name.as_str(), *points))
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for PointsMap {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de> Deserialize<'de> for PointsMap {
    /// Reads any JSON value. Non-object values give an empty map and
    /// entries that are not non-negative integers are dropped.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        let Some(Value::Object(entries)) = value else {
            return Ok(Self::default());
        };

        let mut map = BTreeMap::new();
        for (name, raw) in entries {
            match points_value(&raw) {
                Some(points) => {
                    map.insert(name, points);
                }
                None => debug!("Dropping non-numeric points for {name}: {raw}"),
            }
        }
        Ok(Self(map))
    }
}

/// Points a driver earned at one track.
#[must_use]
pub fn points_for(track: &Track, driver_name: &str) -> u32 {
    track.points.get(driver_name)
}

/// A driver's total over all tracks, raced or not.
#[must_use]
pub fn total_points(tracks: &[Track], driver_name: &str) -> u32 {
    tracks
        .iter()
        .fold(0u32, |acc, track| acc.saturating_add(points_for(track, driver_name)))
}

/// A team's total: the sum of its drivers' totals.
#[must_use]
pub fn team_points(tracks: &[Track], team: &Team) -> u32 {
    team.drivers
        .iter()
        .fold(0u32, |acc, d| acc.saturating_add(total_points(tracks, &d.name)))
}

/// The source standings read points from.
///
/// Chosen once per load with [`Ledger::choose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ledger<'a> {
    /// Sum the points maps of these tracks.
    Tracks(&'a [Track]),
    /// Use the totals carried on older driver documents.
    LegacyDriverTotals,
}

impl<'a> Ledger<'a> {
    /// Pick the point source for a championship's data.
    ///
    /// Tracks win whenever any of them is raced. The legacy per-driver totals
    /// are used only when no track carries results and some driver still
    /// has a stored total.
    pub fn choose<'d>(tracks: &'a [Track], drivers: impl IntoIterator<Item = &'d Driver>) -> Self {
        if tracks.iter().any(Track::is_raced) {
            return Self::Tracks(tracks);
        }
        if drivers.into_iter().any(|d| d.legacy_points.is_some()) {
            debug!("No raced tracks, reading legacy driver totals");
            return Self::LegacyDriverTotals;
        }
        Self::Tracks(tracks)
    }

    /// Total for one driver.
    #[must_use]
    pub fn driver_total(&self, driver: &Driver) -> u32 {
        match self {
            Self::Tracks(tracks) => total_points(tracks, &driver.name),
            Self::LegacyDriverTotals => driver.legacy_points.unwrap_or(0),
        }
    }

    /// Total for a team.
    #[must_use]
    pub fn team_total(&self, team: &Team) -> u32 {
        team.drivers
            .iter()
            .fold(0u32, |acc, d| acc.saturating_add(self.driver_total(d)))
    }
}
