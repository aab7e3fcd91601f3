//! Load-time normalization of stored documents.
//!
//! Stored documents come in more than one shape: roster entries may be bare
//! names or records, dates may carry a time suffix, and points may be
//! numbers, numeric strings or garbage. These deserializers fold every shape
//! into the canonical model once, so no reader has to branch on shape.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::model::{Category, Driver};

/// A roster entry as found in stored championship documents.
#[derive(Deserialize)]
#[serde(untagged)]
enum RosterEntry {
    Name(String),
    Record(Driver),
}

impl From<RosterEntry> for Driver {
    fn from(entry: RosterEntry) -> Self {
        match entry {
            RosterEntry::Name(name) => Driver::new(name),
            RosterEntry::Record(driver) => driver,
        }
    }
}

/// Deserialize a championship roster from either entry shape.
///
/// A missing or null roster is empty. Entries without a name are dropped.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn roster<'de, D>(deserializer: D) -> Result<Vec<Driver>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RosterEntry>(entry) {
            Ok(entry) => Some(Driver::from(entry)),
            Err(e) => {
                debug!("Dropping unreadable roster entry: {e}");
                None
            }
        })
        .filter(|driver| !driver.name.trim().is_empty())
        .collect())
}

/// Parse a stored date, accepting `YYYY-MM-DD` with an optional time suffix.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Deserialize an optional date, treating unreadable values as absent.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => {
            let date = parse_date(&raw);
            if date.is_none() {
                debug!("Ignoring unreadable date: {raw}");
            }
            date
        }
        _ => None,
    })
}

/// Deserialize an optional driver category, treating unknown names as absent.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => raw.parse().ok(),
        _ => None,
    })
}

/// Deserialize an optional points value with [`points_value`] rules.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn lenient_points<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(points_value))
}

/// Read a points value from an arbitrary JSON value.
///
/// Non-negative integers are kept, integral floats and numeric strings are
/// converted, anything else reads as `None`.
#[must_use]
pub fn points_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).ok()
            } else {
                n.as_f64().and_then(float_points)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_points))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_points(v: f64) -> Option<u32> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) {
        Some(v as u32)
    } else {
        None
    }
}

/// Trim surrounding whitespace from driver names in place.
///
/// Points maps are keyed by exact name, so rosters are stored trimmed to
/// match the keys results entry writes.
pub fn trim_driver_names(drivers: &mut [Driver]) {
    for driver in drivers {
        let trimmed = driver.name.trim();
        if trimmed.len() != driver.name.len() {
            driver.name = trimmed.to_string();
        }
    }
}
