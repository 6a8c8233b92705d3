//! Timed status effects applied to enemies: movement slows and
//! damage-over-time burns.
//!
//! Effects are plain components with embedded timers. Despawning the enemy
//! removes them, which cancels every pending tick — no effect can outlive
//! its target.

use bevy::prelude::*;

use crate::gameplay::DamageType;
use crate::gameplay::enemies::damage::Damage;
use crate::gameplay::enemies::Dying;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Seconds between damage-over-time ticks.
pub const DOT_TICK_INTERVAL: f32 = 0.5;

// === Components ===

/// A movement slow. Effective speed is computed from the enemy's canonical
/// base speed each tick, so overlapping slows replace each other instead of
/// compounding into a corrupted base value.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Slowed {
    /// Fraction of speed removed, in [0, 1].
    pub fraction: f32,
    pub timer: Timer,
}

impl Slowed {
    #[must_use]
    pub fn new(fraction: f32, duration: f32) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            timer: Timer::from_seconds(duration, TimerMode::Once),
        }
    }

    /// Speed multiplier while the slow is active.
    #[must_use]
    pub fn multiplier(&self) -> f32 {
        1.0 - self.fraction
    }
}

/// A damage-over-time effect. Deals `damage_per_second * DOT_TICK_INTERVAL`
/// on every tick until the duration runs out.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Burning {
    pub damage_per_second: f32,
    pub damage_type: DamageType,
    pub tick: Timer,
    pub remaining: Timer,
}

impl Burning {
    #[must_use]
    pub fn new(damage_per_second: f32, duration: f32, damage_type: DamageType) -> Self {
        Self {
            damage_per_second,
            damage_type,
            tick: Timer::from_seconds(DOT_TICK_INTERVAL, TimerMode::Repeating),
            remaining: Timer::from_seconds(duration, TimerMode::Once),
        }
    }
}

// === Systems ===

/// Ticks slow timers and removes expired slows.
fn expire_slows(
    time: Res<Time>,
    mut slowed: Query<(Entity, &mut Slowed)>,
    mut commands: Commands,
) {
    for (entity, mut slow) in &mut slowed {
        slow.timer.tick(time.delta());
        if slow.timer.is_finished() {
            commands.entity(entity).remove::<Slowed>();
        }
    }
}

/// Ticks burn timers, emitting damage per completed interval. Dying enemies
/// take no further ticks.
fn tick_burns(
    time: Res<Time>,
    mut burning: Query<(Entity, &mut Burning), Without<Dying>>,
    mut damage: MessageWriter<Damage>,
    mut commands: Commands,
) {
    for (entity, mut burn) in &mut burning {
        burn.tick.tick(time.delta());
        let ticks = burn.tick.times_finished_this_tick();
        if ticks > 0 {
            damage.write(Damage {
                target: entity,
                amount: burn.damage_per_second * DOT_TICK_INTERVAL * ticks as f32,
                damage_type: burn.damage_type,
            });
        }

        burn.remaining.tick(time.delta());
        if burn.remaining.is_finished() {
            commands.entity(entity).remove::<Burning>();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Slowed>().register_type::<Burning>();

    app.add_systems(
        Update,
        (expire_slows, tick_burns)
            .in_set(GameSet::Status)
            .run_if(gameplay_running),
    );
}
