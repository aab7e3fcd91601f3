//! Championship progress.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::model::{Championship, ChampionshipStatus, Track};

/// How far a championship has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Raced tracks. Zero when progress is measured by date.
    pub completed: usize,
    /// Scheduled tracks. Zero when progress is measured by date.
    pub total: usize,
    /// Completion in percent, always within `0..=100`.
    pub percentage: u8,
}

/// Compute the progress of a championship.
///
/// With tracks, progress is the share of raced tracks. Without tracks it
/// falls back to the share of the season's date range that has elapsed at
/// `now`, and to zero when the range is not set.
#[must_use]
pub fn progress(tracks: &[Track], championship: &Championship, now: NaiveDateTime) -> Progress {
    if !tracks.is_empty() {
        let completed = tracks.iter().filter(|t| t.is_raced()).count();
        let total = tracks.len();
        return Progress {
            completed,
            total,
            percentage: percent(completed as u64, total as u64),
        };
    }

    match (championship.start_date, championship.end_date) {
        (Some(start), Some(end)) => Progress {
            completed: 0,
            total: 0,
            percentage: temporal_percentage(
                start.and_time(NaiveTime::MIN),
                end.and_time(NaiveTime::MIN),
                championship.status,
                now,
            ),
        },
        _ => Progress::default(),
    }
}

fn temporal_percentage(
    start: NaiveDateTime,
    end: NaiveDateTime,
    status: ChampionshipStatus,
    now: NaiveDateTime,
) -> u8 {
    if status == ChampionshipStatus::Completed {
        return 100;
    }
    if now < start {
        return 0;
    }
    if now >= end {
        return 100;
    }

    let elapsed = (now - start).num_milliseconds();
    let duration = (end - start).num_milliseconds();
    percent(
        u64::try_from(elapsed).unwrap_or(0),
        u64::try_from(duration).unwrap_or(0),
    )
}

/// `round(100 * part / whole)` with halves rounded up, clamped to 100.
fn percent(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = u128::from(part.min(whole));
    let whole = u128::from(whole);
    let rounded = (200 * part + whole) / (2 * whole);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    fn raced(name: &str) -> Track {
        let mut t = Track::new("c1", name, None, 1);
        t.points.insert("A", 10);
        t
    }

    fn dated_championship() -> Championship {
        let mut c = Championship::new("Cup", "2025");
        c.start_date = Some(date(2025, 1, 1));
        c.end_date = Some(date(2025, 1, 11));
        c
    }

    #[test]
    fn test_track_based_progress() {
        let tracks = vec![
            Track {
                date: Some(date(2025, 1, 1)),
                ..raced("R1")
            },
            Track::new("c1", "R2", Some(date(2025, 6, 1)), 2),
        ];
        let p = progress(&tracks, &Championship::default(), at(2025, 3, 1));
        assert_eq!(
            p,
            Progress {
                completed: 1,
                total: 2,
                percentage: 50
            }
        );
    }

    #[test]
    fn test_track_based_rounding() {
        let tracks = vec![
            raced("R1"),
            Track::new("c1", "R2", None, 2),
            Track::new("c1", "R3", None, 3),
        ];
        assert_eq!(progress(&tracks, &Championship::default(), at(2025, 1, 1)).percentage, 33);

        let tracks = vec![raced("R1"), raced("R2"), Track::new("c1", "R3", None, 3)];
        assert_eq!(progress(&tracks, &Championship::default(), at(2025, 1, 1)).percentage, 67);
    }

    #[test]
    fn test_track_based_ignores_dates() {
        let tracks = vec![Track::new("c1", "R1", None, 1)];
        let p = progress(&tracks, &dated_championship(), at(2030, 1, 1));
        assert_eq!(p.percentage, 0);
        assert_eq!(p.total, 1);
    }

    #[test]
    fn test_no_tracks_no_dates() {
        let p = progress(&[], &Championship::default(), at(2025, 1, 1));
        assert_eq!(p, Progress::default());
    }

    #[test]
    fn test_no_tracks_single_date_is_zero() {
        let mut c = Championship::default();
        c.start_date = Some(date(2025, 1, 1));
        assert_eq!(progress(&[], &c, at(2025, 6, 1)), Progress::default());
    }

    #[test]
    fn test_temporal_before_start() {
        let p = progress(&[], &dated_championship(), at(2024, 12, 1));
        assert_eq!(p.percentage, 0);
        assert_eq!(p.completed, 0);
        assert_eq!(p.total, 0);
    }

    #[test]
    fn test_temporal_after_end() {
        let p = progress(&[], &dated_championship(), at(2025, 2, 1));
        assert_eq!(p.percentage, 100);
    }

    #[test]
    fn test_temporal_midway() {
        // Five and a half days into a ten day season.
        let p = progress(&[], &dated_championship(), at(2025, 1, 6));
        assert_eq!(p.percentage, 55);
    }

    #[test]
    fn test_temporal_completed_status_wins() {
        let mut c = dated_championship();
        c.status = ChampionshipStatus::Completed;
        let p = progress(&[], &c, at(2024, 1, 1));
        assert_eq!(p.percentage, 100);
    }

    #[test]
    fn test_temporal_inverted_range() {
        let mut c = dated_championship();
        c.start_date = Some(date(2025, 2, 1));
        c.end_date = Some(date(2025, 1, 1));
        assert_eq!(progress(&[], &c, at(2025, 1, 15)).percentage, 0);
        assert_eq!(progress(&[], &c, at(2025, 3, 1)).percentage, 100);
    }

    #[test]
    fn test_dropped_points_leave_track_unraced() {
        let unreadable: Track =
            serde_json::from_str(r#"{"name":"Spa","round":1,"points":{"A":"dnf"}}"#).unwrap();
        let zero: Track =
            serde_json::from_str(r#"{"name":"Spa","round":1,"points":{"A":"0"}}"#).unwrap();

        let p = progress(&[unreadable, zero], &Championship::default(), at(2025, 3, 1));
        assert_eq!(p.completed, 1);
        assert_eq!(p.percentage, 50);
    }

    #[test]
    fn test_percent_bounds() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(0, 7), 0);
        assert_eq!(percent(7, 7), 100);
        assert_eq!(percent(9, 7), 100);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(1, 8), 13);
        for whole in 1..50 {
            for part in 0..=whole {
                assert!(percent(part, whole) <= 100);
            }
        }
    }
}
