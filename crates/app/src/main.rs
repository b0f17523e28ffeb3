use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use turf::config::{MatchConfig, TICK_HZ};

mod bots;
mod scoreboard;

fn main() {
    // Optional first argument: path to a JSON match config.
    let config = match std::env::args().nth(1) {
        Some(path) => match MatchConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("splat_arena: cannot use match config {path}: {e}");
                std::process::exit(1);
            }
        },
        None => MatchConfig::default(),
    };

    let mut app = App::new();

    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
        Duration::from_secs_f64(1.0 / TICK_HZ),
    )))
    .add_plugins(LogPlugin::default())
    // Must be present before TurfPlugin builds.
    .insert_resource(config)
    .add_plugins((
        turf::TurfPlugin,
        bots::BotsPlugin,
        scoreboard::ScoreboardPlugin,
    ));

    app.run();
}
