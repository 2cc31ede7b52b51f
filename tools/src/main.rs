//! city-runner: headless driver for the robot city.
//!
//! Usage:
//!   city-runner --seed 12345 --turns 30 --db city.db --name Metropolis
//!   city-runner --db city.db --load Metropolis --turns 10
//!   city-runner --seed 12345 --ipc-mode
//!
//! In IPC mode one JSON request is read per stdin line and one JSON
//! reply is written per stdout line.

use anyhow::Result;
use robot_city_core::{
    building::Building,
    city::{City, Location},
    command::PlayerCommand,
    config::SimConfig,
    engine::CityEngine,
    robot::RobotKind,
    store::{SaveSummary, SimStore},
    types::{Position, Turn},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Advance {
        #[serde(default = "one")]
        count: u64,
    },
    Command {
        command: PlayerCommand,
    },
    Save,
    Load {
        name: String,
    },
    ListSaves,
    DeleteSave {
        name: String,
    },
    Quit,
}

fn one() -> u64 {
    1
}

#[derive(serde::Serialize)]
struct RobotView {
    id:             String,
    kind:           RobotKind,
    energy:         f64,
    happiness:      f64,
    integrity:      f64,
    in_maintenance: bool,
    building:       Option<String>,
    position:       Position,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    name:              &'a str,
    turn:              Turn,
    money:             f64,
    parts:             u64,
    average_happiness: f64,
    training_queue:    Vec<(RobotKind, Turn)>,
    robots:            Vec<RobotView>,
    buildings:         &'a [Building],
    last_turn:         Vec<String>,
}

#[derive(serde::Serialize)]
struct SaveView {
    #[serde(flatten)]
    summary:  SaveSummary,
    saved_on: String,
}

struct Runner {
    engine: CityEngine,
    /// Second connection to the engine's database, for save listing
    /// and deletion.
    saves:  SimStore,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let turns = parse_arg(&args, "--turns", 30u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let name = string_arg(&args, "--name").unwrap_or("Robot City");
    let load = string_arg(&args, "--load");
    let config = match string_arg(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    if !ipc_mode {
        println!("Robot City: city-runner");
        println!("  seed:   {seed}");
        println!("  turns:  {turns}");
        println!("  db:     {db}");
        println!();
    }

    // A shared-cache URI lets the runner's second connection see the
    // engine's in-memory database.
    let db_effective = if db == ":memory:" {
        format!("file:cityrun_{}?mode=memory&cache=shared", chrono::Utc::now().timestamp_millis())
    } else {
        db.to_string()
    };
    let store = SimStore::open(&db_effective)?;
    store.migrate()?;
    let saves = SimStore::open(&db_effective)?;

    let engine = match load {
        Some(saved) => CityEngine::resume(saved, config, Box::new(store))?,
        None => CityEngine::new_game(name, seed, config, Box::new(store))?,
    };
    let mut runner = Runner { engine, saves };

    if ipc_mode {
        run_ipc_loop(&mut runner)?;
    } else {
        run_batch(&mut runner.engine, turns)?;
    }
    Ok(())
}

fn run_batch(engine: &mut CityEngine, turns: u64) -> Result<()> {
    for _ in 0..turns {
        engine.advance_turn()?;
        if let Some(log) = engine.last_turn_log() {
            for line in log.lines() {
                println!("[turn {:>3}] {line}", log.turn);
            }
        }
    }
    print_summary(&engine.city, turns);
    let save_id = engine.save()?;
    println!("  saved as:       {} ({save_id})", engine.city.name);
    Ok(())
}

fn run_ipc_loop(runner: &mut Runner) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                reply(&mut stdout, &serde_json::json!({ "error": e.to_string() }))?;
                continue;
            }
        };
        if matches!(request, IpcRequest::Quit) {
            break;
        }

        match handle_request(runner, request) {
            Ok(value) => reply(&mut stdout, &value)?,
            Err(e) => {
                log::warn!("request failed: {e}");
                reply(&mut stdout, &serde_json::json!({ "error": e.to_string() }))?;
            }
        }
    }
    Ok(())
}

fn handle_request(runner: &mut Runner, request: IpcRequest) -> Result<serde_json::Value> {
    let engine = &mut runner.engine;
    let value = match request {
        IpcRequest::GetState | IpcRequest::Quit => state_json(engine)?,
        IpcRequest::Advance { count } => {
            engine.run_turns(count)?;
            state_json(engine)?
        }
        IpcRequest::Command { command } => {
            let applied = engine.apply(&command)?;
            serde_json::json!({ "applied": applied, "state": state_json(engine)? })
        }
        IpcRequest::Save => {
            let save_id = engine.save()?;
            serde_json::json!({ "saved": engine.city.name, "save_id": save_id })
        }
        IpcRequest::Load { name } => {
            engine.load(&name)?;
            state_json(engine)?
        }
        IpcRequest::ListSaves => {
            let saves: Vec<SaveView> = runner
                .saves
                .list_saves()?
                .into_iter()
                .map(|summary| SaveView {
                    saved_on: format_saved_at(summary.saved_at),
                    summary,
                })
                .collect();
            serde_json::to_value(saves)?
        }
        IpcRequest::DeleteSave { name } => {
            let deleted = runner.saves.delete_save(&name)?;
            serde_json::json!({ "deleted": deleted, "name": name })
        }
    };
    Ok(value)
}

fn reply(out: &mut impl Write, value: &serde_json::Value) -> Result<()> {
    writeln!(out, "{value}")?;
    out.flush()?;
    Ok(())
}

fn state_json(engine: &CityEngine) -> Result<serde_json::Value> {
    let city = &engine.city;
    let robots = city
        .robots()
        .iter()
        .map(|r| {
            let building = match city.location_of(&r.id) {
                Some(Location::Hosted { building, .. }) => Some(building),
                _ => None,
            };
            RobotView {
                id: r.id.clone(),
                kind: r.kind,
                energy: r.energy(),
                happiness: r.happiness(),
                integrity: r.integrity(),
                in_maintenance: r.in_maintenance(),
                building,
                position: r.position(),
            }
        })
        .collect();
    let training_queue = city
        .training_center()
        .map(|c| c.queue().map(|t| (t.kind, t.turns_left)).collect())
        .unwrap_or_default();

    let state = UiState {
        name: &city.name,
        turn: city.turn(),
        money: city.money(),
        parts: city.parts(),
        average_happiness: city.average_happiness(),
        training_queue,
        robots,
        buildings: city.buildings(),
        last_turn: engine.last_turn_log().map(|l| l.lines()).unwrap_or_default(),
    };
    Ok(serde_json::to_value(state)?)
}

fn print_summary(city: &City, turns: u64) {
    println!();
    println!("=== CITY SUMMARY ===");
    println!("  city:           {}", city.name);
    println!("  turns run:      {turns}");
    println!("  final turn:     {}", city.turn());
    println!("  money:          {:.2}", city.money());
    println!("  parts:          {}", city.parts());
    println!("  happiness:      {:.1}%", city.average_happiness());
    println!("  buildings:      {}", city.buildings().len());
    for kind in RobotKind::ALL {
        println!("  {:<15} {}", format!("{}s:", kind.label().to_lowercase()), city.count_kind(kind));
    }
}

fn format_saved_at(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}
