//! Headless Crystal Quest runner.
//!
//! Loads a level pack and tuning (falling back to the built-in campaign and
//! stock tuning), then either plays a replay or idles the session for a fixed
//! number of ticks. Events are logged, or printed as JSON lines with `--json`.

use std::path::PathBuf;

use clap::Parser;

use cq_core::time::FIXED_DT_US;
use cq_game::campaign::builtin_levels;
use cq_game::config::{load_config_from_path, GameConfig};
use cq_game::events::{EventQueue, GameEvent};
use cq_game::extension::Extension;
use cq_game::level::{load_levels_from_path, LevelDescriptor};
use cq_game::replay::{load_replay_from_path, play};
use cq_game::world::World;
use cq_game::{Game, Phase};

/// Run the Crystal Quest simulation without a renderer
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level pack JSON. Defaults to the built-in campaign.
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Tuning JSON. Defaults to stock tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay JSON to play instead of idling.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Override the RNG seed from the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to idle when no replay is given.
    #[arg(long, default_value_t = 3600)]
    max_ticks: u64,

    /// Print events as JSON lines on stdout.
    #[arg(long)]
    json: bool,
}

/// Logs a one-line summary of every level as it loads.
struct RunLog {
    loads: u32,
}

impl Extension for RunLog {
    fn name(&self) -> &str {
        "run_log"
    }

    fn after_load(&mut self, world: &mut World, level: &LevelDescriptor, _events: &mut EventQueue) {
        self.loads += 1;
        log::info!(
            "[load #{}] {} with {} crystals, score {}",
            self.loads,
            level.display_name(world.level_index),
            world.crystals.len(),
            world.score
        );
    }
}

fn load_levels(args: &Args) -> Vec<LevelDescriptor> {
    let Some(path) = &args.levels else {
        return builtin_levels();
    };
    load_levels_from_path(path).unwrap_or_else(|err| {
        log::warn!("{err}; using the built-in campaign");
        builtin_levels()
    })
}

fn load_config(args: &Args) -> GameConfig {
    let mut config = match &args.config {
        Some(path) => load_config_from_path(path).unwrap_or_else(|err| {
            log::warn!("{err}; using stock tuning");
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config
}

fn flush_events(game: &mut Game, json: bool) {
    for event in game.drain_events() {
        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => log::error!("Failed to encode {event:?}: {err}"),
            }
        } else if let GameEvent::Message { text, .. } = &event {
            log::info!("{text}");
        } else {
            log::debug!("{event:?}");
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Crystal Quest starting...");

    let levels = load_levels(&args);
    let config = load_config(&args);
    let mut game = Game::new(levels, config);
    game.register_extension(Box::new(RunLog { loads: 0 }));

    let ticks = match &args.replay {
        Some(path) => match load_replay_from_path(path) {
            Ok(replay) => play(&mut game, &replay) as u64,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => {
            game.start();
            let mut ticks = 0;
            while ticks < args.max_ticks && !game.phase().is_terminal() {
                game.tick(FIXED_DT_US);
                flush_events(&mut game, args.json);
                ticks += 1;
            }
            ticks
        }
    };
    flush_events(&mut game, args.json);

    let world = game.world();
    log::info!(
        "Finished after {ticks} ticks: {:?} on level {} with score {}",
        game.phase(),
        world.level_index + 1,
        world.score
    );
    if game.phase() == Phase::Won {
        log::info!("Campaign complete");
    }
}
