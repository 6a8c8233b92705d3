//! The upgrade economy: persistent per-type stat deltas and the level-up
//! operation.
//!
//! Upgrading is a pure data transition on the tower entity — the visual
//! swap is delegated to a collaborator via [`TowerVisualSwap`].

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::income::IncomeTower;
use super::{AttackAnimators, AttackTimer, ProjectileEmitter, Tower, TowerCatalog, TowerLevelSpec, TowerStats, derive_stats};
use crate::{GameSet, gameplay_running};

// === Data ===

/// Accumulated permanent bonuses for one tower type. Bought in the main
/// menu, applied to every tower of the type ever placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "camelCase", default)]
pub struct TowerUpgrades {
    pub additional_damage: i32,
    pub additional_range: f32,
    /// Negative values shorten the shot interval.
    pub additional_fire_rate: f32,
}

/// Per-tower-type upgrade deltas, keyed by type name. The only state that
/// survives a session; serializable for exactly that reason.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpgradeStore {
    entries: HashMap<String, TowerUpgrades>,
}

impl UpgradeStore {
    /// Deltas for a tower type; zero for types never upgraded.
    #[must_use]
    pub fn get(&self, tower_type: &str) -> TowerUpgrades {
        self.entries.get(tower_type).copied().unwrap_or_default()
    }

    pub fn record_damage(&mut self, tower_type: &str, amount: i32) {
        self.entries
            .entry(tower_type.to_string())
            .or_default()
            .additional_damage += amount;
    }

    pub fn record_range(&mut self, tower_type: &str, amount: f32) {
        self.entries
            .entry(tower_type.to_string())
            .or_default()
            .additional_range += amount;
    }

    pub fn record_fire_rate(&mut self, tower_type: &str, amount: f32) {
        self.entries
            .entry(tower_type.to_string())
            .or_default()
            .additional_fire_rate += amount;
    }

    /// Wipe every delta (new game).
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

// === Messages ===

/// Request a level-up for one tower.
#[derive(Message, Debug, Clone, Copy)]
pub struct UpgradeTower(pub Entity);

/// Remove a tower. No refund.
#[derive(Message, Debug, Clone, Copy)]
pub struct SellTower(pub Entity);

/// Tell the visual collaborator to swap the rendered model for the new
/// level. Logical state stays on the same entity.
#[derive(Message, Debug, Clone, Copy)]
pub struct TowerVisualSwap {
    pub tower: Entity,
    pub level_index: usize,
}

// === Pure Functions ===

/// The next level's spec, `None` at max level.
#[must_use]
pub fn next_level<'a>(levels: &'a [TowerLevelSpec], tower: &Tower) -> Option<&'a TowerLevelSpec> {
    levels.get(tower.level_index + 1)
}

/// Advance a tower one level and recompute its stats from the new base data
/// plus the store deltas. Returns `false` (leaving everything untouched)
/// when the tower is already at its final level.
pub fn try_upgrade(
    tower: &mut Tower,
    stats: &mut TowerStats,
    levels: &[TowerLevelSpec],
    store: &UpgradeStore,
) -> bool {
    if next_level(levels, tower).is_none() {
        return false;
    }
    tower.level_index += 1;
    *stats = derive_stats(&levels[tower.level_index], store.get(&tower.tower_type));
    true
}

// === Systems ===

/// Handles [`UpgradeTower`]: applies the level transition, swaps the fire
/// timer to the new rate, starts or stops income generation when the income
/// flag changes across the level boundary, and notifies the visual swap.
fn handle_upgrades(
    mut messages: MessageReader<UpgradeTower>,
    mut towers: Query<(&mut Tower, &mut TowerStats)>,
    catalog: Res<TowerCatalog>,
    store: Res<UpgradeStore>,
    mut swaps: MessageWriter<TowerVisualSwap>,
    mut commands: Commands,
) {
    for &UpgradeTower(entity) in messages.read() {
        let Ok((mut tower, mut stats)) = towers.get_mut(entity) else {
            continue;
        };
        let Ok(levels) = catalog.levels(&tower.tower_type) else {
            warn!("upgrade requested for unknown tower type `{}`", tower.tower_type);
            continue;
        };
        if !try_upgrade(&mut tower, &mut stats, levels, &store) {
            debug!("tower {entity:?} is already at max level");
            continue;
        }

        let spec = &levels[tower.level_index];
        if spec.is_income_tower {
            commands
                .entity(entity)
                .remove::<(AttackTimer, AttackAnimators, ProjectileEmitter)>()
                .insert(IncomeTower::new(spec.gold_per_second));
        } else {
            commands
                .entity(entity)
                .remove::<IncomeTower>()
                .insert((
                    AttackTimer(Timer::from_seconds(stats.fire_rate, TimerMode::Repeating)),
                    AttackAnimators(spec.attack_animators),
                    ProjectileEmitter(spec.projectile),
                ));
        }

        swaps.write(TowerVisualSwap {
            tower: entity,
            level_index: tower.level_index,
        });
    }
}

/// Handles [`SellTower`]: immediate removal.
fn handle_sales(
    mut messages: MessageReader<SellTower>,
    towers: Query<(), With<Tower>>,
    mut commands: Commands,
) {
    for &SellTower(entity) in messages.read() {
        if towers.get(entity).is_ok() {
            commands.entity(entity).despawn();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<UpgradeStore>()
        .add_message::<UpgradeTower>()
        .add_message::<SellTower>()
        .add_message::<TowerVisualSwap>();

    app.add_systems(
        Update,
        (handle_upgrades, handle_sales)
            .in_set(GameSet::Production)
            .run_if(gameplay_running),
    );
}
