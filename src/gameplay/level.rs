//! Level path data: each level carries a set of waypoint paths, and every
//! spawned enemy walks a randomly chosen one.

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

// === Data ===

/// An ordered waypoint sequence through a level.
#[derive(Debug, Clone, Deserialize)]
pub struct WaypointPath {
    pub name: String,
    /// `[x, y]` positions in world units.
    pub waypoints: Vec<[f32; 2]>,
}

impl WaypointPath {
    /// Waypoints as world-space vectors.
    #[must_use]
    pub fn points(&self) -> Vec<Vec2> {
        self.waypoints.iter().map(|&[x, y]| Vec2::new(x, y)).collect()
    }
}

/// The paths available to one level.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelPaths {
    pub paths: Vec<WaypointPath>,
}

// === Resources ===

/// All levels' path sets, indexed by level number (0-based).
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LevelCatalog {
    pub levels: Vec<LevelPaths>,
}

impl LevelCatalog {
    /// Pick a random path for the given level. `None` when the level has no
    /// paths — callers log and abort the spawn.
    #[must_use]
    pub fn random_path(&self, level: usize) -> Option<&WaypointPath> {
        let paths = &self.levels.get(level)?.paths;
        if paths.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..paths.len());
        paths.get(index)
    }
}

/// The level currently being played (0-based).
#[derive(Resource, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Resource)]
pub struct CurrentLevel(pub usize);

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<CurrentLevel>()
        .init_resource::<CurrentLevel>()
        .init_resource::<LevelCatalog>();
}
