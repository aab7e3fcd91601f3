//! Admin writes on league data.
//!
//! Every write is validated before it reaches storage. Championships can be
//! created and edited but never deleted.

use chrono::NaiveDate;
use paddock_core::normalize::trim_driver_names;
use paddock_core::results::award;
use paddock_core::validation::{
    check_transition, validate_championship, validate_event, validate_team, validate_track,
};
use paddock_core::{
    Championship, ChampionshipStatus, Driver, Event, Participant, PointsMap, Team, Track,
    TrackStatus, ValidationError,
};
use tracing::info;

use crate::config::LeagueConfig;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Create a draft championship with the configured scoring and caps.
///
/// # Errors
///
/// Returns a validation error for a blank name, or a storage error.
pub fn create_championship(
    storage: &Storage,
    league: &LeagueConfig,
    name: &str,
    season: &str,
    is_team_championship: bool,
) -> Result<Championship> {
    let mut championship = Championship::new(name.trim(), season.trim());
    championship.settings.is_team_championship = is_team_championship;
    championship.settings.points_per_position = league.default_points_per_position.clone();
    championship.settings.max_teams = league.max_teams;
    championship.settings.max_drivers_per_team = league.max_drivers_per_team;

    validate_championship(&championship)?;
    storage.insert(&mut championship)?;
    info!("Created championship {} ({})", championship.name, championship.id);
    Ok(championship)
}

/// Move a championship to another lifecycle state.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown id, or a validation error if
/// the move is not part of the lifecycle.
pub fn set_status(storage: &Storage, id: &str, status: ChampionshipStatus) -> Result<Championship> {
    let mut championship: Championship = storage.require(id)?;
    check_transition(championship.status, status)?;

    championship.status = status;
    storage.update(&championship)?;
    info!("Championship {} is now {}", id, status);
    Ok(championship)
}

/// Set the season window of a championship.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown id, or a validation error if
/// the start falls after the end.
pub fn set_dates(
    storage: &Storage,
    id: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Championship> {
    let mut championship: Championship = storage.require(id)?;
    championship.start_date = start;
    championship.end_date = end;

    validate_championship(&championship)?;
    storage.update(&championship)?;
    Ok(championship)
}

/// Replace the driver roster of a championship.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown id, or a validation error if
/// a driver is listed twice.
pub fn set_roster(storage: &Storage, id: &str, drivers: Vec<Driver>) -> Result<Championship> {
    let mut championship: Championship = storage.require(id)?;
    championship.drivers = drivers;
    trim_driver_names(&mut championship.drivers);

    validate_championship(&championship)?;
    storage.update(&championship)?;
    info!(
        "Championship {} roster set to {} drivers",
        id,
        championship.drivers.len()
    );
    Ok(championship)
}

/// Enter a team in a championship.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown championship, or a validation
/// error if the team breaks a rule or a cap.
pub fn add_team(
    storage: &Storage,
    championship_id: &str,
    name: &str,
    color: &str,
    drivers: Vec<Driver>,
) -> Result<Team> {
    let championship: Championship = storage.require(championship_id)?;
    let existing: Vec<Team> = storage.list_for(championship_id)?;

    let mut team = Team::new(championship_id, name.trim(), color.trim(), drivers);
    trim_driver_names(&mut team.drivers);
    validate_team(&team, &championship, existing.len())?;

    storage.insert(&mut team)?;
    info!("Added team {} to championship {}", team.name, championship_id);
    Ok(team)
}

/// Replace a stored team.
///
/// Returns the team as stored, with driver names trimmed.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the team or its championship is missing,
/// or a validation error.
pub fn update_team(storage: &Storage, team: &Team) -> Result<Team> {
    let championship: Championship = storage.require(&team.championship_id)?;
    let others = storage
        .list_for::<Team>(&team.championship_id)?
        .iter()
        .filter(|t| t.id != team.id)
        .count();

    let mut team = team.clone();
    team.name = team.name.trim().to_string();
    trim_driver_names(&mut team.drivers);
    validate_team(&team, &championship, others)?;

    storage.update(&team)?;
    info!("Updated team {} ({})", team.name, team.id);
    Ok(team)
}

/// Change the name, color or roster of a stored team.
///
/// Fields left as `None` keep their stored value.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown team, or a validation error.
pub fn edit_team(
    storage: &Storage,
    id: &str,
    name: Option<&str>,
    color: Option<&str>,
    drivers: Option<Vec<Driver>>,
) -> Result<Team> {
    let mut team: Team = storage.require(id)?;
    if let Some(name) = name {
        team.name = name.to_string();
    }
    if let Some(color) = color {
        team.color = color.trim().to_string();
    }
    if let Some(drivers) = drivers {
        team.drivers = drivers;
    }
    update_team(storage, &team)
}

/// Delete a team.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if no team has this id.
pub fn delete_team(storage: &Storage, id: &str) -> Result<()> {
    delete_existing::<Team>(storage, id)
}

/// Schedule a track.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown championship, or a validation
/// error for a blank name or round 0.
pub fn add_track(
    storage: &Storage,
    championship_id: &str,
    name: &str,
    country: &str,
    date: Option<NaiveDate>,
    round: u32,
) -> Result<Track> {
    storage.require::<Championship>(championship_id)?;

    let mut track = Track::new(championship_id, name.trim(), date, round);
    track.country = country.trim().to_string();
    validate_track(&track)?;

    storage.insert(&mut track)?;
    info!("Scheduled round {} at {}", track.round, track.name);
    Ok(track)
}

/// Record a finishing order, winner first, and mark the track completed.
///
/// Points follow the championship's points-per-position schedule.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the track or its championship is missing,
/// or [`Error::InvalidArgument`] for an empty order.
pub fn record_results<S: AsRef<str>>(storage: &Storage, track_id: &str, order: &[S]) -> Result<Track> {
    let track: Track = storage.require(track_id)?;
    let championship: Championship = storage.require(&track.championship_id)?;

    let points = award(order, &championship.settings.points_per_position);
    if points.is_empty() {
        return Err(Error::invalid_argument("finishing order is empty"));
    }
    store_points(storage, track, points)
}

/// Set the points map of a track directly.
///
/// A non-empty map marks the track completed; an empty one reschedules it.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the track is missing.
pub fn set_points(storage: &Storage, track_id: &str, points: PointsMap) -> Result<Track> {
    let track: Track = storage.require(track_id)?;
    store_points(storage, track, points)
}

fn store_points(storage: &Storage, mut track: Track, points: PointsMap) -> Result<Track> {
    track.status = if points.is_empty() {
        TrackStatus::Scheduled
    } else {
        TrackStatus::Completed
    };
    track.points = points;

    storage.update(&track)?;
    info!(
        "Recorded {} results for {} ({})",
        track.points.len(),
        track.name,
        track.id
    );
    Ok(track)
}

/// Delete a track.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if no track has this id.
pub fn delete_track(storage: &Storage, id: &str) -> Result<()> {
    delete_existing::<Track>(storage, id)
}

/// Create an event.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown championship, or a validation
/// error.
pub fn add_event(storage: &Storage, mut event: Event) -> Result<Event> {
    storage.require::<Championship>(&event.championship_id)?;
    event.title = event.title.trim().to_string();
    validate_event(&event)?;

    storage.insert(&mut event)?;
    info!("Created event {} ({})", event.title, event.id);
    Ok(event)
}

/// Sign an entrant up for an event.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown event, or a validation error
/// if the event is full or the name is already entered.
pub fn join_event(storage: &Storage, event_id: &str, participant: Participant) -> Result<Event> {
    let mut event: Event = storage.require(event_id)?;

    if participant.name.trim().is_empty() {
        return Err(ValidationError::Empty { field: "name" }.into());
    }
    if event.has_participant(&participant.name) {
        return Err(ValidationError::AlreadyEntered {
            name: participant.name,
        }
        .into());
    }
    if event.is_full() {
        return Err(ValidationError::EventFull {
            max: event.max_participants,
        }
        .into());
    }

    event.participants.push(participant);
    storage.update(&event)?;
    Ok(event)
}

/// Withdraw an entrant from an event.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown event, or
/// [`Error::InvalidArgument`] if the name is not entered.
pub fn leave_event(storage: &Storage, event_id: &str, name: &str) -> Result<Event> {
    let mut event: Event = storage.require(event_id)?;

    let before = event.participants.len();
    event.participants.retain(|p| p.name != name);
    if event.participants.len() == before {
        return Err(Error::invalid_argument(format!(
            "'{name}' is not entered in {}",
            event.title
        )));
    }

    storage.update(&event)?;
    Ok(event)
}

/// Delete an event.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if no event has this id.
pub fn delete_event(storage: &Storage, id: &str) -> Result<()> {
    delete_existing::<Event>(storage, id)
}

fn delete_existing<D: crate::storage::Document>(storage: &Storage, id: &str) -> Result<()> {
    if storage.delete::<D>(id)? {
        Ok(())
    } else {
        Err(Error::not_found(D::COLLECTION.kind(), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(team_format: bool) -> (Storage, LeagueConfig, Championship) {
        let storage = Storage::open_in_memory().unwrap();
        let league = LeagueConfig {
            default_points_per_position: vec![25, 18, 15],
            max_teams: 2,
            max_drivers_per_team: 2,
        };
        let championship =
            create_championship(&storage, &league, "Winter Cup", "2025", team_format).unwrap();
        (storage, league, championship)
    }

    fn drivers(names: &[&str]) -> Vec<Driver> {
        names.iter().map(|n| Driver::new(*n)).collect()
    }

    fn entrant(name: &str) -> Participant {
        Participant {
            name: name.to_string(),
            team: None,
        }
    }

    #[test]
    fn test_create_championship_uses_config() {
        let (storage, _, championship) = setup(true);

        assert_eq!(championship.status, ChampionshipStatus::Draft);
        assert_eq!(championship.settings.points_per_position, vec![25, 18, 15]);
        assert_eq!(championship.settings.max_teams, 2);
        assert!(championship.is_team_championship());

        let stored: Championship = storage.require(&championship.id).unwrap();
        assert_eq!(stored, championship);
    }

    #[test]
    fn test_create_championship_rejects_blank_name() {
        let storage = Storage::open_in_memory().unwrap();
        let err = create_championship(&storage, &LeagueConfig::default(), "  ", "2025", false)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_status_lifecycle() {
        let (storage, _, championship) = setup(false);

        set_status(&storage, &championship.id, ChampionshipStatus::Active).unwrap();
        let err = set_status(&storage, &championship.id, ChampionshipStatus::Draft).unwrap_err();
        assert!(err.is_validation());

        let done = set_status(&storage, &championship.id, ChampionshipStatus::Completed).unwrap();
        assert_eq!(done.status, ChampionshipStatus::Completed);
    }

    #[test]
    fn test_set_dates() {
        let (storage, _, championship) = setup(false);
        let jan = NaiveDate::from_ymd_opt(2025, 1, 1);
        let jun = NaiveDate::from_ymd_opt(2025, 6, 30);

        let updated = set_dates(&storage, &championship.id, jan, jun).unwrap();
        assert_eq!(updated.start_date, jan);

        assert!(set_dates(&storage, &championship.id, jun, jan)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_set_roster() {
        let (storage, _, championship) = setup(false);

        let updated = set_roster(&storage, &championship.id, drivers(&["Ann", "Bob"])).unwrap();
        assert_eq!(updated.drivers.len(), 2);

        let err = set_roster(&storage, &championship.id, drivers(&["Ann", "Ann"])).unwrap_err();
        assert!(err.is_validation());
        assert!(set_roster(&storage, "missing", Vec::new())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_add_team_enforces_caps() {
        let (storage, _, championship) = setup(true);
        let id = championship.id.as_str();

        add_team(&storage, id, "Red", "#ff0000", drivers(&["A"])).unwrap();
        add_team(&storage, id, "Blue", "#00f", drivers(&["B", "C"])).unwrap();

        let err = add_team(&storage, id, "Green", "#0f0", drivers(&["D"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::LimitReached { what: "team", .. })
        ));
        assert_eq!(storage.list_for::<Team>(id).unwrap().len(), 2);
    }

    #[test]
    fn test_add_team_unknown_championship() {
        let storage = Storage::open_in_memory().unwrap();
        let err = add_team(&storage, "nope", "Red", "#f00", drivers(&["A"])).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_team_counts_other_teams() {
        let (storage, _, championship) = setup(true);
        let id = championship.id.as_str();
        add_team(&storage, id, "Red", "#ff0000", drivers(&["A"])).unwrap();
        let mut blue = add_team(&storage, id, "Blue", "#0000ff", drivers(&["B"])).unwrap();

        blue.drivers.push(Driver::new("C"));
        update_team(&storage, &blue).unwrap();

        blue.drivers.push(Driver::new("D"));
        assert!(update_team(&storage, &blue).unwrap_err().is_validation());
        assert_eq!(storage.require::<Team>(&blue.id).unwrap().drivers.len(), 2);
    }

    #[test]
    fn test_edit_team() {
        let (storage, _, championship) = setup(true);
        let team = add_team(&storage, &championship.id, "Red", "#f00", drivers(&["A"])).unwrap();

        let renamed = edit_team(&storage, &team.id, Some(" Scarlet "), None, None).unwrap();
        assert_eq!(renamed.name, "Scarlet");
        assert_eq!(renamed.color, "#f00");

        let err = edit_team(&storage, &team.id, None, None, Some(drivers(&["A", "B", "C"])))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::LimitReached { limit: 2, .. })
        ));
        assert!(edit_team(&storage, &team.id, None, Some("blue"), None)
            .unwrap_err()
            .is_validation());

        let stored: Team = storage.require(&team.id).unwrap();
        assert_eq!(stored.name, "Scarlet");
        assert_eq!(stored.drivers.len(), 1);
        assert!(edit_team(&storage, "missing", None, None, None)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_padded_driver_names_match_results() {
        let (storage, _, championship) = setup(true);
        let team =
            add_team(&storage, &championship.id, "Red", "#f00", drivers(&[" Ann ", "Bob"])).unwrap();
        assert_eq!(team.drivers[0].name, "Ann");

        let track = add_track(&storage, &championship.id, "Spa", "", None, 1).unwrap();
        let raced = record_results(&storage, &track.id, &["Ann", "Bob"]).unwrap();

        let stored: Team = storage.require(&team.id).unwrap();
        assert_eq!(
            paddock_core::team_points(std::slice::from_ref(&raced), &stored),
            43
        );

        let roster = set_roster(&storage, &championship.id, drivers(&["Cid  "])).unwrap();
        assert_eq!(roster.drivers[0].name, "Cid");
    }

    #[test]
    fn test_delete_team() {
        let (storage, _, championship) = setup(true);
        let team = add_team(&storage, &championship.id, "Red", "#f00", drivers(&["A"])).unwrap();

        delete_team(&storage, &team.id).unwrap();
        assert!(delete_team(&storage, &team.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_record_results() {
        let (storage, _, championship) = setup(false);
        let track = add_track(&storage, &championship.id, "Spa", "Belgium", None, 1).unwrap();
        assert_eq!(track.status, TrackStatus::Scheduled);

        let raced = record_results(&storage, &track.id, &["Ann", "Bob", "Cid", "Dan"]).unwrap();

        assert_eq!(raced.status, TrackStatus::Completed);
        assert_eq!(raced.points.get("Ann"), 25);
        assert_eq!(raced.points.get("Cid"), 15);
        assert!(raced.points.contains("Dan"));
        assert_eq!(raced.points.get("Dan"), 0);
        assert_eq!(storage.require::<Track>(&track.id).unwrap(), raced);
    }

    #[test]
    fn test_record_results_empty_order() {
        let (storage, _, championship) = setup(false);
        let track = add_track(&storage, &championship.id, "Spa", "", None, 1).unwrap();
        let order: [&str; 0] = [];

        let err = record_results(&storage, &track.id, &order).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_set_points_and_clear() {
        let (storage, _, championship) = setup(false);
        let track = add_track(&storage, &championship.id, "Monza", "Italy", None, 2).unwrap();

        let points: PointsMap = [("Ann", 10)].into_iter().collect();
        let raced = set_points(&storage, &track.id, points).unwrap();
        assert!(raced.is_raced());

        let cleared = set_points(&storage, &track.id, PointsMap::new()).unwrap();
        assert_eq!(cleared.status, TrackStatus::Scheduled);
        assert!(!cleared.is_raced());
    }

    #[test]
    fn test_add_track_rejects_round_zero() {
        let (storage, _, championship) = setup(false);
        let err = add_track(&storage, &championship.id, "Spa", "", None, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidRound)
        ));
        assert!(delete_track(&storage, "missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_event_sign_up() {
        let (storage, _, championship) = setup(false);
        let event = add_event(
            &storage,
            Event {
                championship_id: championship.id.clone(),
                title: " Night Race ".to_string(),
                hour: "21:00".to_string(),
                max_participants: 2,
                ..Event::default()
            },
        )
        .unwrap();
        assert_eq!(event.title, "Night Race");

        join_event(&storage, &event.id, entrant("Ann")).unwrap();
        let err = join_event(&storage, &event.id, entrant("Ann")).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::AlreadyEntered { .. })
        ));

        join_event(&storage, &event.id, entrant("Bob")).unwrap();
        let err = join_event(&storage, &event.id, entrant("Cid")).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::EventFull { max: 2 })
        ));

        let after = leave_event(&storage, &event.id, "Ann").unwrap();
        assert_eq!(after.participants.len(), 1);
        assert!(leave_event(&storage, &event.id, "Ann").is_err());

        delete_event(&storage, &event.id).unwrap();
        assert!(storage.get::<Event>(&event.id).unwrap().is_none());
    }

    #[test]
    fn test_add_event_bad_hour() {
        let (storage, _, championship) = setup(false);
        let err = add_event(
            &storage,
            Event {
                championship_id: championship.id,
                title: "Sprint".to_string(),
                hour: "9pm".to_string(),
                max_participants: 4,
                ..Event::default()
            },
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}
