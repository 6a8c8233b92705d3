//! Testing utilities for Bevy systems.

#![cfg(test)]

use std::time::Duration;

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::gameplay::Health;
use crate::gameplay::enemies::{ContactDamage, Enemy, EnemySpec, PathFollower, Rage, ResistanceProfile};
use crate::gameplay::level::WaypointPath;
use crate::gameplay::towers::{ProjectileSpec, TargetingStrategy, TowerCatalog, TowerLevelSpec};

/// Make every subsequent `app.update()` advance time by exactly `delta`.
/// The first update after app creation still has a zero delta — run one
/// update to initialize time before asserting on timers.
pub fn set_fixed_delta(app: &mut App, delta: Duration) {
    app.insert_resource(TimeUpdateStrategy::ManualDuration(delta));
    // `Time<Virtual>` clamps each update's delta to `max_delta` (250ms by
    // default), which would silently shrink any fixed delta above that and
    // break the "advance by exactly `delta`" contract. Raise the ceiling so
    // the manual duration is honored verbatim.
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .set_max_delta(Duration::from_secs(3600));
}

/// Assert how many entities match a query filter.
pub fn assert_entity_count<F: QueryFilter>(app: &mut App, expected: usize) {
    let count = app
        .world_mut()
        .query_filtered::<(), F>()
        .iter(app.world())
        .count();
    assert_eq!(count, expected, "expected {expected} matching entities, found {count}");
}

/// A plain enemy stat sheet: no resistances, no abilities.
pub fn test_spec() -> EnemySpec {
    EnemySpec {
        name: "grunt".to_string(),
        health: 100.0,
        speed: 2.0,
        damage: 1,
        dodge_chance: 0.0,
        fire_resistance: 0.0,
        damage_resistance: 0.0,
        is_damage_resistant: false,
        rage_health_threshold: 0.0,
        rage_speed_multiplier: 1.0,
        rage_damage_multiplier: 1.0,
        can_phase_shift: false,
        phase_shift_cooldown: 0.0,
        phase_shift_chance: 0.0,
        phase_shift_skip_waypoints: 0,
        can_become_invisible: false,
        invisibility_cooldown: 0.0,
        invisibility_duration: 0.0,
    }
}

/// A short three-waypoint path.
pub fn test_path() -> WaypointPath {
    WaypointPath {
        name: "lane".to_string(),
        waypoints: vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]],
    }
}

/// Spawn a minimal enemy at a position: full damage pipeline components,
/// no abilities.
pub fn spawn_test_enemy_at(world: &mut World, position: Vec2, health: f32) -> Entity {
    world
        .spawn((
            Enemy,
            Health::new(health),
            ContactDamage(1),
            ResistanceProfile {
                dodge_chance: 0.0,
                fire_resistance: 0.0,
                damage_resistance: 0.0,
                is_damage_resistant: false,
            },
            Rage {
                threshold: 0.0,
                speed_multiplier: 1.0,
                damage_multiplier: 1.0,
                active: false,
            },
            PathFollower::new(vec![position, position + Vec2::new(10.0, 0.0)]),
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

/// Spawn a minimal enemy at the origin.
pub fn spawn_test_enemy(world: &mut World, health: f32) -> Entity {
    spawn_test_enemy_at(world, Vec2::ZERO, health)
}

/// A two-type tower catalog: a three-level archer line and a two-level
/// income line.
pub fn test_tower_catalog() -> TowerCatalog {
    let archer = |level: u32, name: &str, damage: i32, range: i32, fire_rate: f32| TowerLevelSpec {
        level,
        name: name.to_string(),
        damage,
        range,
        fire_rate,
        targeting_strategy: TargetingStrategy::FirstTarget,
        is_income_tower: false,
        gold_per_second: 0.0,
        attack_animators: 1,
        projectile: ProjectileSpec::default(),
    };
    let income = |level: u32, name: &str, gold_per_second: f32| TowerLevelSpec {
        level,
        name: name.to_string(),
        damage: 0,
        range: 0,
        fire_rate: 0.0,
        targeting_strategy: TargetingStrategy::FirstTarget,
        is_income_tower: true,
        gold_per_second,
        attack_animators: 1,
        projectile: ProjectileSpec::default(),
    };

    let mut catalog = TowerCatalog::default();
    catalog.towers.insert(
        "basicArchers".to_string(),
        vec![
            archer(1, "Archer I", 10, 4, 1.5),
            archer(2, "Archer II", 16, 5, 1.2),
            archer(3, "Archer III", 25, 6, 0.9),
        ],
    );
    catalog.towers.insert(
        "incomeTowers".to_string(),
        vec![income(1, "Windmill", 5.0), income(2, "Market", 9.0)],
    );
    catalog
}
