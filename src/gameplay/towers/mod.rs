//! Tower agents: level data, derived stats, and the placement factory.

pub mod attack;
pub mod income;
pub mod targeting;
pub mod upgrade;

use std::collections::HashMap;

use bevy::prelude::*;
use serde::Deserialize;

use crate::config::ConfigError;
pub use targeting::TargetingStrategy;
pub use upgrade::{TowerUpgrades, UpgradeStore};

// === Data ===

/// What a tower's shots do on impact. `area_radius > 0` makes the projectile
/// a boulder: splash damage, optional burn and slow.
#[derive(Debug, Clone, Copy, Default, Deserialize, Reflect)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectileSpec {
    pub area_radius: f32,
    pub burn_dot: bool,
    pub slow_projectile: bool,
    pub rotate_towards_velocity: bool,
}

impl ProjectileSpec {
    /// Splash-damage projectile?
    #[must_use]
    pub fn is_area(&self) -> bool {
        self.area_radius > 0.0
    }
}

/// One level of one tower type, as loaded from `data/towers.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerLevelSpec {
    pub level: u32,
    pub name: String,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub range: i32,
    #[serde(default)]
    pub fire_rate: f32,
    #[serde(default)]
    pub targeting_strategy: TargetingStrategy,
    #[serde(default)]
    pub is_income_tower: bool,
    #[serde(default)]
    pub gold_per_second: f32,
    /// Towers with more than one attack animator fire a delayed second shot.
    #[serde(default = "default_animators")]
    pub attack_animators: u32,
    #[serde(default)]
    pub projectile: ProjectileSpec,
}

const fn default_animators() -> u32 {
    1
}

/// Every tower type's level table, keyed by type name.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TowerCatalog {
    pub towers: HashMap<String, Vec<TowerLevelSpec>>,
}

impl TowerCatalog {
    /// Level table for a tower type.
    pub fn levels(&self, tower_type: &str) -> Result<&[TowerLevelSpec], ConfigError> {
        self.towers
            .get(tower_type)
            .map(Vec::as_slice)
            .filter(|levels| !levels.is_empty())
            .ok_or_else(|| ConfigError::UnknownTowerType(tower_type.to_string()))
    }
}

// === Components ===

/// A placed tower: its type and current level. The level index only
/// increases, via [`upgrade::try_upgrade`].
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Tower {
    pub tower_type: String,
    pub level_index: usize,
}

/// Combat stats derived from base level data plus the persistent upgrade
/// store. Recomputed on every level change.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct TowerStats {
    pub damage: i32,
    pub range: f32,
    /// Seconds between shots.
    pub fire_rate: f32,
    pub targeting: TargetingStrategy,
}

/// Per-tower fire cooldown.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AttackTimer(pub Timer);

/// Number of attack animators on the visual rig; more than one means a
/// second shot follows each attack.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AttackAnimators(pub u32);

/// The projectile flavor this tower fires.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ProjectileEmitter(pub ProjectileSpec);

// === Pure Functions ===

/// Base stats for a level plus the store's per-type deltas. Income towers
/// ignore the combat deltas entirely.
#[must_use]
pub fn derive_stats(spec: &TowerLevelSpec, upgrades: TowerUpgrades) -> TowerStats {
    if spec.is_income_tower {
        return TowerStats {
            damage: spec.damage,
            range: spec.range as f32,
            fire_rate: spec.fire_rate,
            targeting: spec.targeting_strategy,
        };
    }
    TowerStats {
        damage: spec.damage + upgrades.additional_damage,
        range: spec.range as f32 + upgrades.additional_range,
        fire_rate: spec.fire_rate + upgrades.additional_fire_rate,
        targeting: spec.targeting_strategy,
    }
}

// === Archetype ===

/// Place a tower of the given type and level. Unknown types or level indexes
/// beyond the table log and return `None` — nothing is spawned.
pub fn spawn_tower(
    commands: &mut Commands,
    catalog: &TowerCatalog,
    store: &UpgradeStore,
    tower_type: &str,
    level_index: usize,
    position: Vec2,
) -> Option<Entity> {
    let levels = match catalog.levels(tower_type) {
        Ok(levels) => levels,
        Err(err) => {
            warn!("cannot place tower: {err}");
            return None;
        }
    };
    let Some(spec) = levels.get(level_index) else {
        warn!("tower type `{tower_type}` has no level {level_index}");
        return None;
    };

    let stats = derive_stats(spec, store.get(tower_type));
    let mut entity = commands.spawn((
        Name::new(spec.name.clone()),
        Tower {
            tower_type: tower_type.to_string(),
            level_index,
        },
        stats.clone(),
        Transform::from_translation(position.extend(0.0)),
        DespawnOnExit(crate::GameState::InGame),
    ));

    if spec.is_income_tower {
        entity.insert(income::IncomeTower::new(spec.gold_per_second));
    } else {
        entity.insert((
            AttackTimer(Timer::from_seconds(stats.fire_rate, TimerMode::Repeating)),
            AttackAnimators(spec.attack_animators),
            ProjectileEmitter(spec.projectile),
        ));
    }

    Some(entity.id())
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Tower>()
        .register_type::<TowerStats>()
        .register_type::<AttackTimer>()
        .register_type::<AttackAnimators>()
        .register_type::<ProjectileEmitter>()
        .init_resource::<TowerCatalog>();

    attack::plugin(app);
    income::plugin(app);
    upgrade::plugin(app);
}
