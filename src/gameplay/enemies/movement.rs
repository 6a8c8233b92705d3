//! Enemy path following: advance toward the current waypoint at effective
//! speed, step the waypoint index on arrival, despawn at the path end.

use bevy::prelude::*;

use super::{
    ContactDamage, Dying, Enemy, EnemyReachedEnd, Movement, PathFollower, Rage,
    WAYPOINT_ARRIVAL_DISTANCE,
};
use crate::gameplay::status::Slowed;
use crate::{GameSet, gameplay_running};

// === Pure Functions ===

/// Speed after rage and slow multipliers. The base speed is never mutated;
/// every modifier is applied at read time.
#[must_use]
pub fn effective_speed(movement: &Movement, rage: &Rage, slow: Option<&Slowed>) -> f32 {
    let rage_multiplier = if rage.active { rage.speed_multiplier } else { 1.0 };
    let slow_multiplier = slow.map_or(1.0, Slowed::multiplier);
    movement.base_speed * rage_multiplier * slow_multiplier
}

// === Systems ===

/// Moves enemies along their waypoint path. Runs in `GameSet::Movement`.
///
/// Reaching the final waypoint emits [`EnemyReachedEnd`] and despawns the
/// enemy — there is no dying state for a breakthrough.
fn follow_path(
    time: Res<Time>,
    mut enemies: Query<
        (
            Entity,
            &mut Transform,
            &mut PathFollower,
            &Movement,
            &Rage,
            Option<&Slowed>,
            &ContactDamage,
        ),
        (With<Enemy>, Without<Dying>),
    >,
    mut reached_end: MessageWriter<EnemyReachedEnd>,
    mut commands: Commands,
) {
    for (entity, mut transform, mut follower, movement, rage, slow, contact) in &mut enemies {
        let Some(target) = follower.target_waypoint() else {
            continue;
        };

        let position = transform.translation.truncate();
        let to_target = target - position;
        let speed = effective_speed(movement, rage, slow);
        if to_target.length() > f32::EPSILON {
            let step = to_target.normalize() * speed * time.delta_secs();
            transform.translation += step.extend(0.0);
        }

        if transform.translation.truncate().distance(target) < WAYPOINT_ARRIVAL_DISTANCE
            && !follower.advance()
        {
            reached_end.write(EnemyReachedEnd {
                enemy: entity,
                damage: contact.0,
            });
            commands.entity(entity).despawn();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        follow_path.in_set(GameSet::Movement).run_if(gameplay_running),
    );
}
