//! `paddock` - CLI for league standings
//!
//! This binary provides the command-line interface for managing league data
//! and printing a championship's dashboard.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::BTreeMap;

use chrono::Local;
use clap::Parser;

use paddock::cli::{
    ChampionshipCommand, Cli, Command, ConfigCommand, DashboardCommand, EventAddCommand,
    EventCommand, ExportCommand, TeamCommand, TrackCommand,
};
use paddock::dashboard::{self, start_of_day, Dashboard};
use paddock::{admin, bundle, init_logging, Config, LeagueStore, Storage};
use paddock_core::{Championship, Event, Participant, PointsMap, Team, Track};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Config commands never touch the database
    let command = match cli.command {
        Command::Config(config_cmd) => return handle_config(&config, config_cmd),
        other => other,
    };

    let storage = Storage::open(config.database_path())?;

    match command {
        Command::Championship(cmd) => handle_championship(&storage, &config, cmd).await,
        Command::Team(cmd) => handle_team(&storage, cmd),
        Command::Track(cmd) => handle_track(&storage, cmd),
        Command::Event(cmd) => handle_event(&storage, cmd),
        Command::Dashboard(cmd) => handle_dashboard(&storage, &config, &cmd).await,
        Command::Import(cmd) => {
            let summary = bundle::import(&storage, bundle::read_file(&cmd.file)?)?;
            println!(
                "Imported {} teams, {} tracks, {} events.",
                summary.teams, summary.tracks, summary.events
            );
            Ok(())
        }
        Command::Export(cmd) => handle_export(&storage, &cmd),
        Command::Normalize => {
            let rewritten = storage.normalize()?;
            println!("Normalized {rewritten} documents.");
            Ok(())
        }
        Command::Config(_) => Ok(()),
    }
}

async fn handle_championship(
    storage: &Storage,
    config: &Config,
    cmd: ChampionshipCommand,
) -> CliResult {
    match cmd {
        ChampionshipCommand::Create {
            name,
            season,
            teams,
        } => {
            let championship =
                admin::create_championship(storage, &config.league, &name, &season, teams)?;
            println!("{}", championship.id);
        }
        ChampionshipCommand::List { json } => list_championships(storage, json).await?,
        ChampionshipCommand::Show { id, json } => {
            let championship: Championship = storage.require(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&championship)?);
            } else {
                print_championship(&championship);
            }
        }
        ChampionshipCommand::Status { id, status } => {
            let championship = admin::set_status(storage, &id, status.into())?;
            println!("{} is now {}", championship.name, championship.status);
        }
        ChampionshipCommand::Dates { id, start, end } => {
            admin::set_dates(storage, &id, start, end)?;
            println!("Dates updated.");
        }
        ChampionshipCommand::Roster { id, drivers } => {
            let championship = admin::set_roster(storage, &id, drivers)?;
            println!("Roster set to {} drivers.", championship.drivers.len());
        }
    }
    Ok(())
}

async fn list_championships(storage: &Storage, json: bool) -> CliResult {
    let championships = LeagueStore::championships(storage).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&championships)?);
        return Ok(());
    }

    if championships.is_empty() {
        println!("No championships.");
    } else {
        for c in &championships {
            println!("{:<22} {:<10} {:<10} {}", c.id, c.season, c.status, c.name);
        }
    }
    println!();
    println!("{}", storage.stats()?);
    Ok(())
}

fn print_championship(c: &Championship) {
    let fmt_date = |d: Option<chrono::NaiveDate>| {
        d.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
    };

    println!("{} ({})", c.name, c.id);
    println!("=====================");
    println!("  Season:             {}", c.season);
    println!("  Status:             {}", c.status);
    println!(
        "  Format:             {}",
        if c.is_team_championship() {
            "teams"
        } else {
            "individual"
        }
    );
    println!("  Start:              {}", fmt_date(c.start_date));
    println!("  End:                {}", fmt_date(c.end_date));
    println!(
        "  Points:             {:?}",
        c.settings.points_per_position
    );
    println!("  Max teams:          {}", c.settings.max_teams);
    println!(
        "  Max drivers/team:   {}",
        c.settings.max_drivers_per_team
    );
    if !c.drivers.is_empty() {
        println!();
        println!("[Roster]");
        for driver in &c.drivers {
            match driver.category {
                Some(category) => println!("  {} ({category})", driver.name),
                None => println!("  {}", driver.name),
            }
        }
    }
}

fn handle_team(storage: &Storage, cmd: TeamCommand) -> CliResult {
    match cmd {
        TeamCommand::Add {
            championship,
            name,
            color,
            drivers,
        } => {
            let team = admin::add_team(storage, &championship, &name, &color, drivers)?;
            println!("{}", team.id);
        }
        TeamCommand::Update {
            id,
            name,
            color,
            drivers,
        } => {
            let team =
                admin::edit_team(storage, &id, name.as_deref(), color.as_deref(), drivers)?;
            println!("Updated team {} ({} drivers).", team.name, team.drivers.len());
        }
        TeamCommand::List { championship, json } => {
            let teams: Vec<Team> = storage.list_for(&championship)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&teams)?);
            } else {
                for team in &teams {
                    let drivers: Vec<&str> = team.drivers.iter().map(|d| d.name.as_str()).collect();
                    println!(
                        "{:<22} {:<8} {:<20} {}",
                        team.id,
                        team.color,
                        team.name,
                        drivers.join(", ")
                    );
                }
            }
        }
        TeamCommand::Delete { id } => {
            admin::delete_team(storage, &id)?;
            println!("Deleted team {id}.");
        }
    }
    Ok(())
}

fn handle_track(storage: &Storage, cmd: TrackCommand) -> CliResult {
    match cmd {
        TrackCommand::Add {
            championship,
            name,
            round,
            date,
            country,
        } => {
            let track = admin::add_track(storage, &championship, &name, &country, date, round)?;
            println!("{}", track.id);
        }
        TrackCommand::List { championship, json } => {
            let mut tracks: Vec<Track> = storage.list_for(&championship)?;
            tracks.sort_by_key(|t| t.round);
            if json {
                println!("{}", serde_json::to_string_pretty(&tracks)?);
            } else {
                for track in &tracks {
                    let date = track
                        .date
                        .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
                    println!(
                        "{:<22} R{:<3} {:<10} {:<12} {}",
                        track.id, track.round, date, track.status, track.name
                    );
                }
            }
        }
        TrackCommand::Results { id, order } => {
            let track = admin::record_results(storage, &id, &order)?;
            println!("Recorded {} results for {}.", track.points.len(), track.name);
        }
        TrackCommand::Points { id, entries } => {
            let points: PointsMap = entries.into_iter().collect();
            let track = admin::set_points(storage, &id, points)?;
            println!("{} is {}.", track.name, track.status);
        }
        TrackCommand::Delete { id } => {
            admin::delete_track(storage, &id)?;
            println!("Deleted track {id}.");
        }
    }
    Ok(())
}

fn handle_event(storage: &Storage, cmd: EventCommand) -> CliResult {
    match cmd {
        EventCommand::Add(EventAddCommand {
            championship,
            title,
            date,
            hour,
            max,
            rules,
        }) => {
            let event = admin::add_event(
                storage,
                Event {
                    championship_id: championship,
                    title,
                    date,
                    hour,
                    rules: rules.into_iter().collect::<BTreeMap<_, _>>(),
                    max_participants: max,
                    ..Event::default()
                },
            )?;
            println!("{}", event.id);
        }
        EventCommand::List { championship, json } => {
            let events: Vec<Event> = storage.list_for(&championship)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                for event in &events {
                    let date = event
                        .date
                        .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
                    println!(
                        "{:<22} {} {} {:>3}/{:<3} {}",
                        event.id,
                        date,
                        event.hour,
                        event.participants.len(),
                        event.max_participants,
                        event.title
                    );
                }
            }
        }
        EventCommand::Join { id, name, team } => {
            let event = admin::join_event(storage, &id, Participant { name, team })?;
            println!(
                "Entered ({}/{}).",
                event.participants.len(),
                event.max_participants
            );
        }
        EventCommand::Leave { id, name } => {
            admin::leave_event(storage, &id, &name)?;
            println!("Withdrew {name}.");
        }
        EventCommand::Delete { id } => {
            admin::delete_event(storage, &id)?;
            println!("Deleted event {id}.");
        }
    }
    Ok(())
}

async fn handle_dashboard(storage: &Storage, config: &Config, cmd: &DashboardCommand) -> CliResult {
    let now = cmd
        .today
        .map_or_else(|| Local::now().naive_local(), start_of_day);

    let data = dashboard::load(storage, &cmd.id).await?;
    let dashboard = Dashboard::build(&data, config.standings.tie_break, now);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", dashboard.render());
    }
    Ok(())
}

fn handle_export(storage: &Storage, cmd: &ExportCommand) -> CliResult {
    let exported = bundle::export(storage, &cmd.id)?;
    match &cmd.output {
        Some(path) => {
            bundle::write_file(&exported, path)?;
            println!("Exported to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&exported)?),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[League]");
                println!(
                    "  Points per position: {:?}",
                    config.league.default_points_per_position
                );
                println!("  Max teams:          {}", config.league.max_teams);
                println!(
                    "  Max drivers/team:   {}",
                    config.league.max_drivers_per_team
                );
                println!();
                println!("[Standings]");
                println!("  Tie break:          {:?}", config.standings.tie_break);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
