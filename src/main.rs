//! Headless demo: run the simulation with the bundled data for a bounded
//! stretch of game time, logging what happens.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use tower_defense::gameplay::economy::Gold;
use tower_defense::gameplay::enemies::EnemyCatalog;
use tower_defense::gameplay::level::LevelCatalog;
use tower_defense::gameplay::towers::{TowerCatalog, UpgradeStore, spawn_tower};
use tower_defense::{GameState, config};

/// Fixed tick rate of the demo loop.
const TICK_SECONDS: f64 = 1.0 / 60.0;

/// Game seconds to simulate before exiting.
const RUN_SECONDS: f32 = 30.0;

fn main() {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            TICK_SECONDS,
        ))),
        StatesPlugin,
        LogPlugin::default(),
    ));
    app.add_plugins(tower_defense::plugin);

    load_catalogs(&mut app);

    app.add_systems(Startup, start_playing);
    app.add_systems(OnEnter(GameState::InGame), place_demo_towers);
    app.add_systems(Update, stop_after_run_time);

    app.run();
}

/// Parse the bundled data files. A broken catalog logs and leaves the
/// default (empty) one in place — the sim degrades instead of crashing.
fn load_catalogs(app: &mut App) {
    match config::from_json::<TowerCatalog>(include_str!("../data/towers.json")) {
        Ok(catalog) => {
            app.insert_resource(catalog);
        }
        Err(err) => error!("tower data: {err}"),
    }
    match config::from_json::<EnemyCatalog>(include_str!("../data/enemies.json")) {
        Ok(catalog) => {
            app.insert_resource(catalog);
        }
        Err(err) => error!("enemy data: {err}"),
    }
    match config::from_json::<LevelCatalog>(include_str!("../data/levels.json")) {
        Ok(catalog) => {
            app.insert_resource(catalog);
        }
        Err(err) => error!("level data: {err}"),
    }
}

fn start_playing(mut next: ResMut<NextState<GameState>>) {
    next.set(GameState::InGame);
}

fn place_demo_towers(
    catalog: Res<TowerCatalog>,
    store: Res<UpgradeStore>,
    mut commands: Commands,
) {
    spawn_tower(
        &mut commands,
        &catalog,
        &store,
        "basicArchers",
        0,
        Vec2::new(5.0, 2.0),
    );
    spawn_tower(
        &mut commands,
        &catalog,
        &store,
        "fireStones",
        0,
        Vec2::new(12.0, -2.0),
    );
    spawn_tower(
        &mut commands,
        &catalog,
        &store,
        "incomeTowers",
        0,
        Vec2::new(0.0, 5.0),
    );
}

fn stop_after_run_time(time: Res<Time>, gold: Res<Gold>, mut exit: MessageWriter<AppExit>) {
    if time.elapsed_secs() >= RUN_SECONDS {
        info!("demo finished with {} gold", gold.0);
        exit.write(AppExit::Success);
    }
}
