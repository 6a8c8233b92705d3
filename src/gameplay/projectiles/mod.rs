//! Projectile flight and impact: arc launch, apex-triggered homing, and
//! single-target or area damage resolution.

use bevy::prelude::*;

use crate::gameplay::DamageType;
use crate::gameplay::enemies::abilities::Cloaked;
use crate::gameplay::enemies::damage::Damage;
use crate::gameplay::enemies::{Dying, Enemy};
use crate::gameplay::feedback::{AnimationKind, AnimationTrigger};
use crate::gameplay::status::{Burning, Slowed};
use crate::gameplay::towers::ProjectileSpec;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Launch speed in world units per second.
pub const LAUNCH_SPEED: f32 = 15.0;

/// Launch angle above the horizon, in degrees. Steep for a high arc.
pub const LAUNCH_ANGLE_DEGREES: f32 = 75.0;

/// How strongly homing bends the velocity toward the target, per second.
pub const HOMING_STRENGTH: f32 = 0.1;

/// Downward acceleration on the vertical velocity component.
pub const GRAVITY: f32 = 9.81;

/// A projectile within this distance of its target counts as a hit
/// (stand-in for the collision collaborator's enemy collider).
pub const HIT_RADIUS: f32 = 0.5;

/// Seconds before a shot that never connected is cleaned up.
pub const MAX_FLIGHT_SECS: f32 = 6.0;

/// Delay between a standard projectile's hit and its damage (impact
/// animation window).
pub const IMPACT_DELAY_SECS: f32 = 0.0625;

/// How long a broken area projectile lingers for its animation.
pub const BREAK_DELAY_SECS: f32 = 0.5;

/// Burn-on-impact damage per second.
pub const BURN_DPS: f32 = 5.0;

/// Burn-on-impact duration in seconds.
pub const BURN_DURATION_SECS: f32 = 3.0;

/// Slow-on-impact duration in seconds.
pub const SLOW_DURATION_SECS: f32 = 3.0;

/// Slow fraction contributed by each slow level (clamped to a full stop).
pub const SLOW_FRACTION_PER_LEVEL: f32 = 0.5;

// === Components ===

/// A projectile in flight toward one enemy. The target reference is weak:
/// if the enemy disappears first, the projectile self-destructs harmlessly.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub target: Entity,
    pub damage: f32,
    pub spec: ProjectileSpec,
    /// Set for slow-effect towers; scales the applied slow.
    pub slow_level: Option<u32>,
}

/// Ballistic state. Homing arms at the arc's apex — until then the
/// projectile cannot hit anything.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ArcFlight {
    pub velocity: Vec2,
    pub homing: bool,
}

/// Despawns shots that never connect.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct FlightLifetime(pub Timer);

impl Default for FlightLifetime {
    fn default() -> Self {
        Self(Timer::from_seconds(MAX_FLIGHT_SECS, TimerMode::Once))
    }
}

/// A standard projectile that connected: damage lands when the timer ends.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ImpactCountdown(pub Timer);

impl Default for ImpactCountdown {
    fn default() -> Self {
        Self(Timer::from_seconds(IMPACT_DELAY_SECS, TimerMode::Once))
    }
}

/// An area projectile that already exploded; lingers for its break
/// animation, then despawns.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct BreakCountdown(pub Timer);

impl Default for BreakCountdown {
    fn default() -> Self {
        Self(Timer::from_seconds(BREAK_DELAY_SECS, TimerMode::Once))
    }
}

// === Pure Functions ===

/// Initial launch velocity: the configured angle and speed, with the
/// horizontal component flipped toward the target.
#[must_use]
pub fn launch_velocity(origin: Vec2, target: Vec2, angle_degrees: f32, speed: f32) -> Vec2 {
    let direction = (target - origin).normalize_or_zero();
    let angle = angle_degrees.to_radians();
    Vec2::new(angle.cos() * speed * direction.x, angle.sin() * speed)
}

/// One homing step: lerp the velocity toward the direct line to the target,
/// preserving speed.
#[must_use]
pub fn homing_step(velocity: Vec2, position: Vec2, target: Vec2, dt: f32) -> Vec2 {
    let direction = (target - position).normalize_or_zero();
    let desired = direction * velocity.length();
    velocity.lerp(desired, (HOMING_STRENGTH * dt).min(1.0))
}

// === Archetype ===

/// Launch a projectile from a tower toward an enemy.
pub fn spawn_projectile(
    commands: &mut Commands,
    origin: Vec3,
    target: Entity,
    target_position: Vec2,
    damage: f32,
    spec: ProjectileSpec,
    slow_level: Option<u32>,
) -> Entity {
    let velocity = launch_velocity(
        origin.truncate(),
        target_position,
        LAUNCH_ANGLE_DEGREES,
        LAUNCH_SPEED,
    );
    commands
        .spawn((
            Name::new("Projectile"),
            Projectile {
                target,
                damage,
                spec,
                slow_level,
            },
            ArcFlight {
                velocity,
                homing: false,
            },
            FlightLifetime::default(),
            Transform::from_translation(origin),
            DespawnOnExit(crate::GameState::InGame),
        ))
        .id()
}

// === Systems ===

/// Integrates projectile flight: gravity while ascending, homing after the
/// apex, rotation toward velocity. A projectile whose target vanished
/// despawns without dealing damage.
fn fly_projectiles(
    time: Res<Time>,
    mut projectiles: Query<(
        Entity,
        &Projectile,
        &mut ArcFlight,
        &mut FlightLifetime,
        &mut Transform,
    )>,
    enemies: Query<&Transform, (With<Enemy>, Without<Projectile>)>,
    mut commands: Commands,
) {
    let dt = time.delta_secs();
    for (entity, projectile, mut flight, mut lifetime, mut transform) in &mut projectiles {
        let Ok(target_transform) = enemies.get(projectile.target) else {
            commands.entity(entity).despawn();
            continue;
        };

        lifetime.0.tick(time.delta());
        if lifetime.0.is_finished() {
            commands.entity(entity).despawn();
            continue;
        }

        flight.velocity.y -= GRAVITY * dt;
        if !flight.homing && flight.velocity.y <= 0.0 {
            flight.homing = true;
        }
        if flight.homing {
            flight.velocity = homing_step(
                flight.velocity,
                transform.translation.truncate(),
                target_transform.translation.truncate(),
                dt,
            );
        }

        transform.translation += (flight.velocity * dt).extend(0.0);
        if projectile.spec.rotate_towards_velocity {
            transform.rotation = Quat::from_rotation_z(flight.velocity.to_angle());
        }
    }
}

/// Detects hits for armed projectiles and resolves them: standard shots
/// start their impact countdown, area shots explode immediately.
fn resolve_impacts(
    projectiles: Query<(Entity, &Projectile, &ArcFlight, &Transform)>,
    targets: Query<&Transform, (With<Enemy>, Without<Cloaked>, Without<Projectile>)>,
    victims: Query<
        (Entity, &Transform),
        (With<Enemy>, Without<Dying>, Without<Cloaked>, Without<Projectile>),
    >,
    mut damage: MessageWriter<Damage>,
    mut animations: MessageWriter<AnimationTrigger>,
    mut commands: Commands,
) {
    for (entity, projectile, flight, transform) in &projectiles {
        if !flight.homing {
            continue;
        }
        let Ok(target_transform) = targets.get(projectile.target) else {
            continue;
        };
        let position = transform.translation.truncate();
        if position.distance(target_transform.translation.truncate()) >= HIT_RADIUS {
            continue;
        }

        if projectile.spec.is_area() {
            explode(
                entity,
                projectile,
                position,
                &victims,
                &mut damage,
                &mut animations,
                &mut commands,
            );
        } else {
            commands
                .entity(entity)
                .remove::<ArcFlight>()
                .insert(ImpactCountdown::default());
        }
    }
}

/// Area impact: every living, visible enemy inside the radius takes the
/// payload — damage, optional burn, optional slow.
fn explode(
    entity: Entity,
    projectile: &Projectile,
    position: Vec2,
    victims: &Query<
        (Entity, &Transform),
        (With<Enemy>, Without<Dying>, Without<Cloaked>, Without<Projectile>),
    >,
    damage: &mut MessageWriter<Damage>,
    animations: &mut MessageWriter<AnimationTrigger>,
    commands: &mut Commands,
) {
    for (victim, victim_transform) in victims {
        if position.distance(victim_transform.translation.truncate())
            > projectile.spec.area_radius
        {
            continue;
        }

        if projectile.spec.burn_dot {
            damage.write(Damage {
                target: victim,
                amount: projectile.damage,
                damage_type: DamageType::Fire,
            });
            commands.entity(victim).insert(Burning::new(
                BURN_DPS,
                BURN_DURATION_SECS,
                DamageType::Fire,
            ));
        } else {
            damage.write(Damage {
                target: victim,
                amount: projectile.damage,
                damage_type: DamageType::Normal,
            });
        }

        if let Some(level) = projectile.slow_level {
            commands.entity(victim).insert(Slowed::new(
                SLOW_FRACTION_PER_LEVEL * level as f32,
                SLOW_DURATION_SECS,
            ));
        }
    }

    animations.write(AnimationTrigger {
        entity,
        kind: AnimationKind::Break,
    });
    commands
        .entity(entity)
        .remove::<ArcFlight>()
        .insert(BreakCountdown::default());
}

/// Lands delayed single-target damage once the impact window ends. The
/// target may have died in the meantime; the hit simply fizzles.
fn resolve_delayed_hits(
    time: Res<Time>,
    mut pending: Query<(Entity, &Projectile, &mut ImpactCountdown)>,
    enemies: Query<(), With<Enemy>>,
    mut damage: MessageWriter<Damage>,
    mut commands: Commands,
) {
    for (entity, projectile, mut countdown) in &mut pending {
        countdown.0.tick(time.delta());
        if !countdown.0.is_finished() {
            continue;
        }

        if enemies.get(projectile.target).is_ok() {
            damage.write(Damage {
                target: projectile.target,
                amount: projectile.damage,
                damage_type: DamageType::Normal,
            });
        }
        commands.entity(entity).despawn();
    }
}

/// Removes exploded area projectiles after their break animation.
fn clear_broken(
    time: Res<Time>,
    mut breaking: Query<(Entity, &mut BreakCountdown)>,
    mut commands: Commands,
) {
    for (entity, mut countdown) in &mut breaking {
        countdown.0.tick(time.delta());
        if countdown.0.is_finished() {
            commands.entity(entity).despawn();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Projectile>()
        .register_type::<ArcFlight>()
        .register_type::<FlightLifetime>()
        .register_type::<ImpactCountdown>()
        .register_type::<BreakCountdown>();

    app.add_systems(
        Update,
        fly_projectiles
            .in_set(GameSet::Movement)
            .run_if(gameplay_running),
    );
    app.add_systems(
        Update,
        (resolve_impacts, resolve_delayed_hits, clear_broken)
            .in_set(GameSet::Combat)
            .run_if(gameplay_running),
    );
}
