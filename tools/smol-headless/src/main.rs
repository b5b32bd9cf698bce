//! smol-headless: runs a SMOL session without a window.
//!
//! A small bot publishes input the way a keyboard and mouse would: the
//! player walks a square, the hammer chases the nearest mole and comes down
//! when it is on top of it.
//!
//! Usage:
//!   smol-headless run --seconds 10 --config session.json --log-every 60
//!   smol-headless step --ticks 600 --config session.json --script moves.jsonl

use std::process;
use std::thread;
use std::time::{Duration, Instant};

use smol_core::commands::MovementCommand;
use smol_core::enums::{Direction, EntityKind, SessionPhase};
use smol_core::error::{Result, SimError};
use smol_core::state::WorldSnapshot;
use smol_engine::sim::game_state::GameState;
use smol_engine::sim::input::InputSlot;
use smol_engine::{GameEngine, RenderHost, SimConfig};

/// Distance at which the bot brings the hammer down.
const STRIKE_RANGE: f64 = 8.0;

/// Ticks the bot walks in one direction before turning.
const LEG_TICKS: u64 = 45;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "step" => cmd_step(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "smol-headless: run a SMOL session without a window\n\
         \n\
         Commands:\n\
         \n\
         run   Start the threaded engine and let the bot play\n\
         \n\
           --seconds <N>    Wall-clock run time (default: 5)\n\
           --config <path>  JSON session config (optional)\n\
           --log-every <N>  Log a JSON snapshot every N ticks (default: 60)\n\
         \n\
         step  Tick the session on this thread and print the final snapshot\n\
         \n\
           --ticks <N>      Number of ticks (default: 600)\n\
           --config <path>  JSON session config (optional)\n\
           --script <path>  Player commands, one JSON command per line and\n\
                            tick, e.g. {{\"type\":\"Direction\",\"direction\":\"Left\"}}\n\
         \n\
         Environment:\n\
         \n\
           RUST_LOG         Log filter (default: info)\n"
    );
}

fn parse_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].as_str());
        }
    }
    None
}

fn parse_number(args: &[String], flag: &str, default: u64) -> u64 {
    match parse_value(args, flag) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Error: {flag} expects a number, got {raw}");
            process::exit(1);
        }),
        None => default,
    }
}

fn load_config(args: &[String]) -> Result<SimConfig> {
    match parse_value(args, "--config") {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| SimError::Config(format!("cannot read {path}: {e}")))?;
            SimConfig::from_json_str(&json)
        }
        None => Ok(SimConfig::default()),
    }
}

// --- Run command ---

/// Logs every n-th snapshot as JSON.
struct LogHost {
    every: u64,
}

impl RenderHost for LogHost {
    fn render(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        if self.every > 0 && snapshot.time.tick % self.every == 0 {
            let json = serde_json::to_string(snapshot)
                .map_err(|e| SimError::Render(e.to_string()))?;
            log::info!("{json}");
        }
        Ok(())
    }
}

fn cmd_run(args: &[String]) -> Result<()> {
    let seconds = parse_number(args, "--seconds", 5);
    let every = parse_number(args, "--log-every", 60);
    let config = load_config(args)?;

    let engine = GameEngine::init(LogHost { every }, config)?;
    let run_for = Duration::from_secs(seconds);
    let started = Instant::now();
    let mut paused_once = false;

    while started.elapsed() < run_for {
        if let Some(snapshot) = engine.latest_snapshot() {
            walk(&snapshot, engine.player_input());
            swing(&snapshot, engine.weapon_input());
            if snapshot.phase == SessionPhase::Over {
                log::info!("session over after {} ticks", snapshot.time.tick);
                break;
            }
        }

        // Exercise the pause handshake once, halfway through.
        if !paused_once && started.elapsed() >= run_for / 2 {
            paused_once = true;
            engine.stop()?;
            log::info!("paused at tick {}", engine.ticks());
            thread::sleep(Duration::from_millis(250));
            engine.run()?;
        }

        thread::sleep(Duration::from_millis(5));
    }

    engine.shutdown()?;
    summarize(engine.latest_snapshot().as_ref());
    Ok(())
}

// --- Step command ---

fn load_script(args: &[String]) -> Result<Vec<String>> {
    match parse_value(args, "--script") {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| SimError::Config(format!("cannot read {path}: {e}")))?;
            Ok(text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect())
        }
        None => Ok(Vec::new()),
    }
}

/// Feed one scripted JSON command to the player. Bad lines are skipped.
fn play_scripted(line: &str, player: &InputSlot) {
    match MovementCommand::from_json(line) {
        Ok(MovementCommand::Direction { direction }) => {
            player.set_position(None);
            player.set_direction(Some(direction));
        }
        Ok(MovementCommand::MoveTo { target }) => {
            player.set_direction(None);
            player.set_position(Some(target));
        }
        Err(e) => {
            log::warn!("skipping scripted command {line:?}: {e}");
            player.set_direction(None);
            player.set_position(None);
        }
    }
}

fn cmd_step(args: &[String]) -> Result<()> {
    let ticks = parse_number(args, "--ticks", 600);
    let config = load_config(args)?;
    let script = load_script(args)?;

    let mut game = GameState::new(config)?;
    let inputs = game.setup_session()?;
    let mut snapshot = game.snapshot();
    for tick in 0..ticks {
        // The script drives the player while it lasts; the bot does after.
        match script.get(tick as usize) {
            Some(line) => play_scripted(line, &inputs.player),
            None => walk(&snapshot, &inputs.player),
        }
        swing(&snapshot, &inputs.weapon);
        snapshot = game.tick();
        if game.is_over() {
            break;
        }
    }

    summarize(Some(&snapshot));
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("cannot serialize snapshot: {e}"),
    }
    Ok(())
}

// --- Bot ---

/// Walk the player around a square.
fn walk(snapshot: &WorldSnapshot, player: &InputSlot) {
    let leg = (snapshot.time.tick / LEG_TICKS) % 4;
    let direction = match leg {
        0 => Direction::Right,
        1 => Direction::Down,
        2 => Direction::Left,
        _ => Direction::Up,
    };
    player.set_position(None);
    player.set_direction(Some(direction));
}

/// Chase the nearest mole with the hammer and bring it down when close.
fn swing(snapshot: &WorldSnapshot, weapon: &InputSlot) {
    let hammer = snapshot
        .entities
        .iter()
        .find(|e| e.kind == EntityKind::Weapon);
    let Some(hammer) = hammer else {
        return;
    };

    let target = snapshot
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Enemy)
        .min_by(|a, b| {
            a.position
                .distance_squared(hammer.position)
                .total_cmp(&b.position.distance_squared(hammer.position))
        });

    match target {
        Some(mole) => {
            weapon.set_position(Some(mole.position));
            weapon.set_hittable(mole.position.distance(hammer.position) <= STRIKE_RANGE);
        }
        None => {
            weapon.set_position(None);
            weapon.set_hittable(false);
        }
    }
}

fn summarize(snapshot: Option<&WorldSnapshot>) {
    let Some(snapshot) = snapshot else {
        log::warn!("no snapshot was produced");
        return;
    };
    let player_hp = snapshot
        .entities
        .iter()
        .find(|e| e.kind == EntityKind::Player)
        .and_then(|e| e.hit_points);
    log::info!(
        "tick {} ({:.1}s): phase {:?}, score {}, {} moles up, player hp {:?}",
        snapshot.time.tick,
        snapshot.time.elapsed_secs,
        snapshot.phase,
        snapshot.score,
        snapshot.count_of(EntityKind::Enemy),
        player_hp
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use smol_core::types::Point;
    use smol_engine::sim::input::InputComponent;

    #[test]
    fn test_scripted_direction_drives_player() {
        let player = InputSlot::new(true);
        play_scripted(r#"{"type":"Direction","direction":"Left"}"#, &player);
        assert_eq!(player.direction(), Some(Direction::Left));
        assert_eq!(player.position(), None);

        play_scripted(r#"{"type":"MoveTo","target":[10.0,20.0]}"#, &player);
        assert_eq!(player.direction(), None);
        assert_eq!(player.position(), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_bad_scripted_line_stands_still() {
        let player = InputSlot::new(true);
        player.set_direction(Some(Direction::Up));
        play_scripted(r#"{"type":"Teleport"}"#, &player);
        assert_eq!(player.direction(), None);
        assert_eq!(player.position(), None);
    }
}
