//! Attack dispatch: fire timers, target acquisition, and projectile spawns.

use bevy::prelude::*;

use super::targeting::{Candidate, select_target, within_range};
use super::{AttackAnimators, AttackTimer, ProjectileEmitter, Tower, TowerStats};
use crate::gameplay::Health;
use crate::gameplay::enemies::abilities::Cloaked;
use crate::gameplay::enemies::{Dying, Enemy, PathFollower};
use crate::gameplay::feedback::{AnimationKind, AnimationTrigger};
use crate::gameplay::projectiles::spawn_projectile;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Delay before the second shot of a multi-animator tower.
pub const SECOND_SHOT_DELAY_SECS: f32 = 0.125;

// === Components ===

/// Pending second shot, inserted when a multi-animator tower attacks.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SecondShot(pub Timer);

impl Default for SecondShot {
    fn default() -> Self {
        Self(Timer::from_seconds(SECOND_SHOT_DELAY_SECS, TimerMode::Once))
    }
}

// === Type Aliases ===

/// Query over enemies eligible for targeting: alive and not cloaked.
type EligibleEnemies<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Transform, &'static Health, &'static PathFollower),
    (With<Enemy>, Without<Dying>, Without<Cloaked>),
>;

// === Helpers ===

/// Gather targeting candidates within range of a tower.
fn candidates_in_range(center: Vec2, range: f32, enemies: &EligibleEnemies) -> Vec<Candidate> {
    enemies
        .iter()
        .filter(|(_, transform, _, _)| {
            within_range(center, transform.translation.truncate(), range)
        })
        .map(|(entity, _, health, follower)| Candidate {
            entity,
            progress: follower.progress(),
            health: health.current,
        })
        .collect()
}

/// Acquire a target and fire one projectile. Returns whether a shot left.
fn shoot_at_best_target(
    commands: &mut Commands,
    animations: &mut MessageWriter<AnimationTrigger>,
    enemies: &EligibleEnemies,
    tower_entity: Entity,
    tower: &Tower,
    stats: &TowerStats,
    emitter: &ProjectileEmitter,
    origin: Vec3,
) -> bool {
    let candidates = candidates_in_range(origin.truncate(), stats.range, enemies);
    let Some(target) = select_target(stats.targeting, candidates) else {
        return false;
    };
    let Ok((_, target_transform, _, _)) = enemies.get(target) else {
        return false;
    };

    animations.write(AnimationTrigger {
        entity: tower_entity,
        kind: AnimationKind::Attack,
    });

    let slow_level = emitter
        .0
        .slow_projectile
        .then(|| tower.level_index as u32 + 1);
    spawn_projectile(
        commands,
        origin,
        target,
        target_transform.translation.truncate(),
        stats.damage as f32,
        emitter.0,
        slow_level,
    );
    true
}

// === Systems ===

/// Ticks fire timers; on expiry the tower attacks and the countdown restarts
/// at the current fire rate. Multi-animator towers also schedule a second
/// shot whether or not the first found a target.
fn tower_attack(
    time: Res<Time>,
    mut towers: Query<(
        Entity,
        &Tower,
        &TowerStats,
        &mut AttackTimer,
        &AttackAnimators,
        &ProjectileEmitter,
        &Transform,
    )>,
    enemies: EligibleEnemies,
    mut animations: MessageWriter<AnimationTrigger>,
    mut commands: Commands,
) {
    for (entity, tower, stats, mut timer, animators, emitter, transform) in &mut towers {
        timer.0.tick(time.delta());
        if !timer.0.just_finished() {
            continue;
        }

        shoot_at_best_target(
            &mut commands,
            &mut animations,
            &enemies,
            entity,
            tower,
            stats,
            emitter,
            transform.translation,
        );

        if animators.0 > 1 {
            commands.entity(entity).insert(SecondShot::default());
        }
    }
}

/// Fires the delayed second shot. The shot re-acquires its own target.
fn fire_second_shot(
    time: Res<Time>,
    mut towers: Query<(
        Entity,
        &Tower,
        &TowerStats,
        &mut SecondShot,
        &ProjectileEmitter,
        &Transform,
    )>,
    enemies: EligibleEnemies,
    mut animations: MessageWriter<AnimationTrigger>,
    mut commands: Commands,
) {
    for (entity, tower, stats, mut shot, emitter, transform) in &mut towers {
        shot.0.tick(time.delta());
        if !shot.0.is_finished() {
            continue;
        }

        shoot_at_best_target(
            &mut commands,
            &mut animations,
            &enemies,
            entity,
            tower,
            stats,
            emitter,
            transform.translation,
        );
        commands.entity(entity).remove::<SecondShot>();
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<SecondShot>();

    app.add_systems(
        Update,
        (tower_attack, fire_second_shot)
            .in_set(GameSet::Combat)
            .run_if(gameplay_running),
    );
}
