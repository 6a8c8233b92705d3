//! Wave spawning: a repeating timer drops a random enemy type onto a random
//! path of the current level.

use bevy::prelude::*;

use super::{EnemyCatalog, spawn_enemy};
use crate::gameplay::level::{CurrentLevel, LevelCatalog};
use crate::{GameSet, GameState, gameplay_running};

// === Constants ===

/// Seconds between enemy spawns.
pub const SPAWN_INTERVAL: f32 = 2.0;

// === Resources ===

/// Spawn cadence. Reset each time `InGame` is entered.
#[derive(Resource, Debug, Reflect)]
#[reflect(Resource)]
pub struct EnemySpawnTimer(pub Timer);

impl Default for EnemySpawnTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(SPAWN_INTERVAL, TimerMode::Repeating))
    }
}

// === Systems ===

fn reset_spawn_timer(mut commands: Commands) {
    commands.insert_resource(EnemySpawnTimer::default());
}

/// Ticks the spawn timer and spawns a random enemy when it fires.
/// Missing catalogs degrade to a warning — the wave simply stops.
fn tick_enemy_spawner(
    time: Res<Time>,
    mut spawn_timer: ResMut<EnemySpawnTimer>,
    catalog: Res<EnemyCatalog>,
    levels: Res<LevelCatalog>,
    current_level: Res<CurrentLevel>,
    mut commands: Commands,
) {
    spawn_timer.0.tick(time.delta());
    if !spawn_timer.0.just_finished() {
        return;
    }

    let Some(spec) = catalog.random() else {
        warn!("no enemy types loaded; skipping spawn");
        return;
    };
    let Some(path) = levels.random_path(current_level.0) else {
        warn!("no paths for level {}; skipping spawn", current_level.0);
        return;
    };

    spawn_enemy(&mut commands, spec, path);
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<EnemySpawnTimer>()
        .init_resource::<EnemySpawnTimer>();

    app.add_systems(OnEnter(GameState::InGame), reset_spawn_timer);

    app.add_systems(
        Update,
        tick_enemy_spawner
            .in_set(GameSet::Production)
            .run_if(gameplay_running),
    );
}
