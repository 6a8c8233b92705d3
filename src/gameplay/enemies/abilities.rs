//! Optional enemy abilities: phase shift and invisibility.
//!
//! Both run on cooldown timers in `GameSet::Ai`. The coroutines of the
//! original design become per-enemy timer components; despawning the enemy
//! cancels them implicitly.

use bevy::prelude::*;
use rand::Rng;

use super::{Dying, Enemy, PathFollower};
use crate::gameplay::feedback::{AnimationKind, AnimationTrigger};
use crate::{GameSet, gameplay_running};

// === Components ===

/// Cooldown-gated chance to skip forward along the path.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PhaseShift {
    /// Probability per cooldown tick, in [0, 1].
    pub chance: f32,
    /// Waypoints skipped per activation.
    pub skip_waypoints: usize,
    pub timer: Timer,
}

impl PhaseShift {
    #[must_use]
    pub fn new(cooldown: f32, chance: f32, skip_waypoints: usize) -> Self {
        Self {
            chance,
            skip_waypoints,
            timer: Timer::from_seconds(cooldown, TimerMode::Repeating),
        }
    }
}

/// Cyclic invisibility: visible for `cooldown` seconds, cloaked for
/// `duration` seconds, forever.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Invisibility {
    pub cooldown: f32,
    pub duration: f32,
    pub timer: Timer,
}

impl Invisibility {
    #[must_use]
    pub fn new(cooldown: f32, duration: f32) -> Self {
        Self {
            cooldown,
            duration,
            timer: Timer::from_seconds(cooldown, TimerMode::Once),
        }
    }
}

/// Marker while invisible. Cloaked enemies are ineligible for targeting and
/// area damage — the spatial queries filter on this.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Cloaked;

// === Systems ===

/// Rolls phase shift on every cooldown tick; success teleports the enemy
/// forward along its path (clamped to the final waypoint).
fn phase_shift(
    time: Res<Time>,
    mut enemies: Query<
        (Entity, &mut PhaseShift, &mut PathFollower, &mut Transform),
        (With<Enemy>, Without<Dying>),
    >,
    mut animations: MessageWriter<AnimationTrigger>,
) {
    for (entity, mut ability, mut follower, mut transform) in &mut enemies {
        ability.timer.tick(time.delta());
        if !ability.timer.just_finished() {
            continue;
        }
        if rand::rng().random::<f32>() >= ability.chance {
            continue;
        }

        let Some(waypoint) = follower.phase_skip(ability.skip_waypoints) else {
            continue;
        };
        transform.translation = waypoint.extend(transform.translation.z);
        animations.write(AnimationTrigger {
            entity,
            kind: AnimationKind::Teleport,
        });
        debug!("enemy {entity:?} phase shifted to waypoint {}", follower.index);
    }
}

/// Cycles visibility: cooldown elapsed -> cloak for `duration`, then
/// reappear and restart the cooldown.
fn cycle_invisibility(
    time: Res<Time>,
    mut enemies: Query<
        (Entity, &mut Invisibility, Has<Cloaked>),
        (With<Enemy>, Without<Dying>),
    >,
    mut commands: Commands,
) {
    for (entity, mut ability, cloaked) in &mut enemies {
        ability.timer.tick(time.delta());
        if !ability.timer.is_finished() {
            continue;
        }

        if cloaked {
            commands.entity(entity).remove::<Cloaked>();
            ability.timer = Timer::from_seconds(ability.cooldown, TimerMode::Once);
            debug!("enemy {entity:?} is visible again");
        } else {
            commands.entity(entity).insert(Cloaked);
            ability.timer = Timer::from_seconds(ability.duration, TimerMode::Once);
            debug!("enemy {entity:?} became invisible");
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<PhaseShift>()
        .register_type::<Invisibility>()
        .register_type::<Cloaked>();

    app.add_systems(
        Update,
        (phase_shift, cycle_invisibility)
            .in_set(GameSet::Ai)
            .run_if(gameplay_running),
    );
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::testing::set_fixed_delta;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn create_ability_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<AnimationTrigger>();
        app.add_systems(Update, (phase_shift, cycle_invisibility));
        set_fixed_delta(&mut app, Duration::from_millis(500));
        app.update(); // initialize time (first frame delta=0)
        app
    }

    fn spawn_pathed_enemy(world: &mut World, ability: PhaseShift) -> Entity {
        let waypoints = (0..6).map(|i| Vec2::new(i as f32 * 5.0, 0.0)).collect();
        world
            .spawn((
                Enemy,
                ability,
                PathFollower::new(waypoints),
                Transform::default(),
            ))
            .id()
    }

    #[test]
    fn guaranteed_phase_shift_skips_and_teleports() {
        let mut app = create_ability_test_app();
        let enemy = spawn_pathed_enemy(app.world_mut(), PhaseShift::new(0.5, 1.0, 2));

        app.update(); // cooldown elapses, chance 1.0 always fires

        let follower = app.world().get::<PathFollower>(enemy).unwrap();
        assert_eq!(follower.index, 2);
        let transform = app.world().get::<Transform>(enemy).unwrap();
        assert_eq!(transform.translation.x, 10.0);
    }

    #[test]
    fn zero_chance_never_phase_shifts() {
        let mut app = create_ability_test_app();
        let enemy = spawn_pathed_enemy(app.world_mut(), PhaseShift::new(0.5, 0.0, 2));

        for _ in 0..10 {
            app.update();
        }

        assert_eq!(app.world().get::<PathFollower>(enemy).unwrap().index, 0);
    }

    #[test]
    fn phase_shift_clamps_at_path_end() {
        let mut app = create_ability_test_app();
        let enemy = spawn_pathed_enemy(app.world_mut(), PhaseShift::new(0.5, 1.0, 50));

        app.update();

        let follower = app.world().get::<PathFollower>(enemy).unwrap();
        assert_eq!(follower.index, follower.waypoints.len() - 1);
    }

    #[test]
    fn invisibility_cycles_cloak_on_and_off() {
        let mut app = create_ability_test_app();
        let enemy = app
            .world_mut()
            .spawn((Enemy, Invisibility::new(1.0, 0.5), Transform::default()))
            .id();

        app.update(); // 0.5s — cooldown still running
        assert!(app.world().get::<Cloaked>(enemy).is_none());

        app.update(); // 1.0s — cloak begins
        assert!(app.world().get::<Cloaked>(enemy).is_some());

        app.update(); // 0.5s cloaked — duration over, visible again
        assert!(app.world().get::<Cloaked>(enemy).is_none());

        app.update(); // cooldown restarted, 0.5s in
        assert!(app.world().get::<Cloaked>(enemy).is_none());

        app.update(); // cooldown complete — cloaked again
        assert!(app.world().get::<Cloaked>(enemy).is_some());
    }
}
