//! sovereign-runner: headless driver for The Sovereign Core.
//!
//! Usage:
//!   sovereign-runner --country EG --difficulty STABLE --year 2025 \
//!       --command "زيادة ميزانية الجيش" --command "شن حرب على الجار"
//!   sovereign-runner --ipc-mode --db game.db
//!
//! In IPC mode, one JSON request per stdin line, one JSON reply per
//! stdout line. A background thread runs the passive tactical-point tick
//! against the active game, sleeping until the next one is due. It shares
//! the engine through a Mutex so ticks and commands never interleave.

use anyhow::{anyhow, Result};
use chrono::Utc;
use sovereign_core::{
    config::{GameConfig, RemoteAnalyzerConfig},
    engine::GameEngine,
    event::{CommandLogEntry, GameEvent},
    game::{Country, Difficulty, GameState},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

type SharedEngine = Arc<Mutex<GameEngine>>;
type ActiveGame = Arc<Mutex<Option<String>>>;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    ListCountries,
    StartGame {
        country_code: String,
        difficulty:   Difficulty,
        year:         i32,
    },
    Command {
        text: String,
    },
    GetState,
    GetLog,
    Tick,
    Quit,
}

#[derive(serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcReply {
    Countries {
        countries: Vec<Country>,
    },
    State {
        state:  GameState,
        events: Vec<GameEvent>,
    },
    CommandResult {
        state:    GameState,
        message:  String,
        warnings: Vec<String>,
        events:   Vec<GameEvent>,
    },
    Log {
        entries: Vec<CommandLogEntry>,
    },
    Error {
        error:  String,
        events: Vec<GameEvent>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let year = parse_arg(&args, "--year", 2025i32);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let country = flag_value(&args, "--country").unwrap_or("EG");
    let difficulty_code = flag_value(&args, "--difficulty").unwrap_or("STABLE");
    let commands: Vec<&str> = args
        .windows(2)
        .filter(|w| w[0] == "--command")
        .map(|w| w[1].as_str())
        .collect();

    let mut config = GameConfig::load(data_dir)?;
    if let Some(url) = flag_value(&args, "--analyzer-url") {
        config.remote_analyzer = Some(RemoteAnalyzerConfig {
            endpoint:     url.to_string(),
            api_key:      flag_value(&args, "--analyzer-key").map(str::to_string),
            timeout_secs: parse_arg(&args, "--analyzer-timeout", 5u64),
            language:     "ar".into(),
        });
    }
    let regen_interval = config.regen_interval_secs;

    let engine = GameEngine::open(db, config, seed)?;

    if ipc_mode {
        let engine: SharedEngine = Arc::new(Mutex::new(engine));
        let active: ActiveGame = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));
        let ticker = spawn_regen_ticker(engine.clone(), active.clone(), stop.clone(), regen_interval);

        let result = run_ipc_loop(&engine, &active);
        stop.store(true, Ordering::Relaxed);
        if ticker.join().is_err() {
            log::warn!("regen ticker panicked");
        }
        result
    } else {
        let difficulty = Difficulty::from_code(difficulty_code)
            .ok_or_else(|| anyhow!("unknown difficulty {difficulty_code:?}"))?;
        run_script(engine, country, difficulty, year, &commands)
    }
}

fn run_script(
    mut engine: GameEngine,
    country:    &str,
    difficulty: Difficulty,
    year:       i32,
    commands:   &[&str],
) -> Result<()> {
    let game = engine.start_game(country, difficulty, year, Utc::now())?;
    println!("The Sovereign Core: sovereign-runner");
    println!("  game:       {}", game.id);
    println!("  country:    {} ({})", game.country_name, game.country_code);
    println!("  difficulty: {}", difficulty.code());
    println!("  year:       {year}");
    println!();

    for text in commands {
        match engine.issue_command(&game.id, text, Utc::now()) {
            Ok(outcome) => {
                println!("> {text}");
                println!("{}", outcome.interpretation.message);
                println!();
            }
            Err(e) => println!("> {text}\n  failed: {e}\n"),
        }
    }

    print_summary(&engine, &game.id)
}

fn spawn_regen_ticker(
    engine:        SharedEngine,
    active:        ActiveGame,
    stop:          Arc<AtomicBool>,
    interval_secs: u64,
) -> thread::JoinHandle<()> {
    // Never sleep past the stop flag for long, nor past a full interval.
    let max_wait = Duration::from_secs(interval_secs.clamp(1, 5));
    thread::spawn(move || {
        let mut wait = max_wait;
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(wait);
            wait = max_wait;
            let game_id = match active.lock() {
                Ok(guard) => guard.clone(),
                Err(_) => break,
            };
            let Some(game_id) = game_id else { continue };
            let Ok(mut engine) = engine.lock() else { break };
            let now = Utc::now();
            if let Err(e) = engine.regenerate_if_due(&game_id, now) {
                log::warn!("game={game_id} regen tick failed: {e}");
                continue;
            }
            match engine.until_next_regen(&game_id, now) {
                Ok(left) => {
                    let left = left.to_std().unwrap_or(Duration::ZERO);
                    wait = left.clamp(Duration::from_millis(100), max_wait);
                }
                Err(e) => log::warn!("game={game_id} regen schedule unavailable: {e}"),
            }
        }
    })
}

fn run_ipc_loop(engine: &SharedEngine, active: &ActiveGame) -> Result<()> {
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
                let err_json = serde_json::json!({ "type": "error", "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };
        if matches!(request, IpcRequest::Quit) {
            break;
        }

        let reply = {
            let mut engine = lock(engine)?;
            let reply = handle_request(&mut engine, active, request);
            reply.unwrap_or_else(|e| IpcReply::Error {
                error:  e.to_string(),
                events: engine.take_events(),
            })
        };
        writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_request(
    engine:  &mut GameEngine,
    active:  &ActiveGame,
    request: IpcRequest,
) -> Result<IpcReply> {
    match request {
        IpcRequest::ListCountries => Ok(IpcReply::Countries {
            countries: engine.countries()?,
        }),
        IpcRequest::StartGame { country_code, difficulty, year } => {
            let state = engine.start_game(&country_code, difficulty, year, Utc::now())?;
            *lock(active)? = Some(state.id.clone());
            Ok(IpcReply::State { state, events: engine.take_events() })
        }
        IpcRequest::Command { text } => {
            let game_id = active_game(active)?;
            let outcome = engine.issue_command(&game_id, &text, Utc::now())?;
            Ok(IpcReply::CommandResult {
                state:    outcome.state,
                message:  outcome.interpretation.message,
                warnings: outcome.interpretation.analysis.warnings,
                events:   engine.take_events(),
            })
        }
        IpcRequest::GetState => {
            let game_id = active_game(active)?;
            let state = engine.game(&game_id)?;
            Ok(IpcReply::State { state, events: engine.take_events() })
        }
        IpcRequest::GetLog => {
            let game_id = active_game(active)?;
            Ok(IpcReply::Log { entries: engine.command_log(&game_id)? })
        }
        IpcRequest::Tick => {
            let game_id = active_game(active)?;
            let state = engine.regenerate_tactical_points(&game_id, Utc::now())?;
            Ok(IpcReply::State { state, events: engine.take_events() })
        }
        IpcRequest::Quit => Err(anyhow!("quit is handled by the read loop")),
    }
}

fn active_game(active: &ActiveGame) -> Result<String> {
    lock(active)?
        .clone()
        .ok_or_else(|| anyhow!("no active game; send start_game first"))
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    m.lock().map_err(|_| anyhow!("lock poisoned"))
}

fn print_summary(engine: &GameEngine, game_id: &str) -> Result<()> {
    let state = engine.game(game_id)?;
    let log = engine.command_log(game_id)?;
    let r = &state.resources;

    println!("=== GAME SUMMARY ===");
    println!("  treasury:        {:.1}B", r.treasury);
    println!("  manpower:        {}", r.manpower);
    println!("  stability:       {}%", r.stability);
    println!("  tactical points: {}", r.tactical_points);
    println!("  intelligence:    {}", r.intelligence_level);
    println!("  nuclear stage:   {}/5", r.nuclear_program_stage);
    println!("  at war:          {}", r.at_war);
    println!("  log entries:     {}", log.len());
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
