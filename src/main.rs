//! Tank Battle headless driver
//!
//! Runs the simulation at a fixed timestep with a simple autopilot in the
//! player's seat, then prints how far it got.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::DVec2;

use tank_battle::audio::LogSink;
use tank_battle::consts::SIM_DT;
use tank_battle::levels::{BuiltinLevels, JsonLevelDir, LevelProvider};
use tank_battle::persistence::{JsonFileStore, MemoryStore, SaveStore};
use tank_battle::sim::{Direction, GameObject, GamePhase};
use tank_battle::{Services, Simulation, Tuning};

#[derive(Parser, Debug)]
#[command(name = "tank-battle")]
#[command(about = "Run the tank battle simulation headless with an autopilot")]
struct Cli {
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Tuning JSON file (missing fields keep defaults)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Directory of level JSON files
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Directory for save files; saves stay in memory when omitted
    #[arg(long)]
    saves: Option<PathBuf>,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,
    /// Level to start on
    #[arg(long, default_value_t = 1)]
    start_level: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Tank Battle starting (seed {})", cli.seed);

    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let levels: Box<dyn LevelProvider> = match &cli.levels {
        Some(dir) => Box::new(JsonLevelDir::load(dir)),
        None => Box::new(BuiltinLevels::new()),
    };
    let saves: Box<dyn SaveStore> = match &cli.saves {
        Some(dir) => Box::new(
            JsonFileStore::open(dir)
                .with_context(|| format!("opening save dir {}", dir.display()))?,
        ),
        None => Box::new(MemoryStore::new()),
    };

    let services = Services {
        levels,
        saves,
        sound: Box::new(LogSink::default()),
    };
    let mut sim = Simulation::new(services, tuning, cli.seed);
    sim.start_game(cli.start_level);

    let frames = (cli.seconds / SIM_DT).ceil() as u64;
    let mut phase = sim.current_state();
    let mut frame = 0;
    while frame < frames {
        autopilot(&mut sim);
        sim.update(SIM_DT);
        frame += 1;

        let now = sim.current_state();
        if now != phase {
            log::info!("t={:.2}s {:?} -> {:?}", frame as f64 * SIM_DT, phase, now);
            phase = now;
        }
        match now {
            GamePhase::LevelComplete => {
                sim.save_game("");
                sim.advance_level();
            }
            _ if now.is_terminal() => break,
            _ => {}
        }
    }

    println!("phase:     {:?}", sim.current_state());
    println!("time:      {:.1}s", frame as f64 * SIM_DT);
    println!("level:     {}/{}", sim.level(), sim.level_count());
    println!("score:     {}", sim.score());
    println!("lives:     {}", sim.player().lives);
    println!("remaining: {}", sim.remaining_enemies());
    println!("saves:     {}", sim.saves().len());
    Ok(())
}

/// Drive toward the nearest enemy's row or column, then shoot along it
fn autopilot(sim: &mut Simulation) {
    let player = sim.player().body();
    if !player.alive {
        return;
    }
    let me = player.center();
    let half = player.width as f64 / 2.0;
    let facing = player.direction;

    let nearest = sim
        .enemies()
        .iter()
        .filter(|e| e.is_alive())
        .map(|e| e.body().center() - me)
        .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()));
    let Some(delta) = nearest else {
        sim.handle_move_intent(facing, false);
        return;
    };

    if delta.x.abs() < half {
        sim.handle_move_intent(Direction::toward(DVec2::new(0.0, delta.y)), false);
        sim.request_fire();
    } else if delta.y.abs() < half {
        sim.handle_move_intent(Direction::toward(DVec2::new(delta.x, 0.0)), false);
        sim.request_fire();
    } else if delta.x.abs() < delta.y.abs() {
        sim.handle_move_intent(Direction::toward(DVec2::new(delta.x, 0.0)), true);
    } else {
        sim.handle_move_intent(Direction::toward(DVec2::new(0.0, delta.y)), true);
    }
}
