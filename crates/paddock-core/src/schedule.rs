//! Race calendar queries.

use chrono::NaiveDate;

use crate::model::{Track, TrackStatus};

/// Tracks still to be raced on or after `today`, soonest first.
///
/// Tracks without a date are never upcoming. Tracks sharing a date keep
/// their input order.
#[must_use]
pub fn upcoming(tracks: &[Track], today: NaiveDate) -> Vec<&Track> {
    let mut upcoming: Vec<&Track> = tracks
        .iter()
        .filter(|t| t.status != TrackStatus::Completed)
        .filter(|t| t.date.is_some_and(|d| d >= today))
        .collect();
    upcoming.sort_by_key(|t| t.date);
    upcoming
}

/// The soonest track not yet completed, today included.
#[must_use]
pub fn next_race(tracks: &[Track], today: NaiveDate) -> Option<&Track> {
    upcoming(tracks, today).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn track(name: &str, day: Option<NaiveDate>, status: TrackStatus) -> Track {
        Track {
            status,
            ..Track::new("c1", name, day, 1)
        }
    }

    #[test]
    fn test_next_race_empty() {
        assert!(next_race(&[], date(2025, 1, 1)).is_none());
    }

    #[test]
    fn test_next_race_skips_past_tracks() {
        let mut raced = track("Jan", Some(date(2025, 1, 1)), TrackStatus::Scheduled);
        raced.points.insert("A", 10);
        let tracks = vec![
            raced,
            track("Jun", Some(date(2025, 6, 1)), TrackStatus::Scheduled),
        ];

        let next = next_race(&tracks, date(2025, 3, 1)).unwrap();
        assert_eq!(next.name, "Jun");
    }

    #[test]
    fn test_next_race_today_is_eligible() {
        let tracks = vec![track("Today", Some(date(2025, 3, 1)), TrackStatus::InProgress)];
        let next = next_race(&tracks, date(2025, 3, 1)).unwrap();
        assert_eq!(next.name, "Today");
    }

    #[test]
    fn test_next_race_skips_completed() {
        let tracks = vec![
            track("Done", Some(date(2025, 3, 1)), TrackStatus::Completed),
            track("Later", Some(date(2025, 4, 1)), TrackStatus::Scheduled),
        ];
        assert_eq!(next_race(&tracks, date(2025, 3, 1)).unwrap().name, "Later");
    }

    #[test]
    fn test_next_race_picks_soonest_regardless_of_order() {
        let tracks = vec![
            track("Late", Some(date(2025, 9, 1)), TrackStatus::Scheduled),
            track("Undated", None, TrackStatus::Scheduled),
            track("Soon", Some(date(2025, 4, 1)), TrackStatus::Scheduled),
        ];
        assert_eq!(next_race(&tracks, date(2025, 3, 1)).unwrap().name, "Soon");
    }

    #[test]
    fn test_next_race_none_when_all_past() {
        let tracks = vec![track("Old", Some(date(2024, 1, 1)), TrackStatus::Scheduled)];
        assert!(next_race(&tracks, date(2025, 1, 1)).is_none());
    }

    #[test]
    fn test_upcoming_same_day_keeps_order() {
        let tracks = vec![
            track("First", Some(date(2025, 5, 1)), TrackStatus::Scheduled),
            track("Second", Some(date(2025, 5, 1)), TrackStatus::Scheduled),
        ];
        let names: Vec<&str> = upcoming(&tracks, date(2025, 1, 1))
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
