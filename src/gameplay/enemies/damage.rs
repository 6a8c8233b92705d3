//! Damage resolution: dodge, resistance, rage, and death.

use bevy::prelude::*;

use super::{ContactDamage, Dying, Enemy, Rage, ResistanceProfile};
use crate::gameplay::feedback::{AnimationKind, AnimationTrigger, FloatingDamage};
use crate::gameplay::{DamageType, Health};
use crate::{GameSet, gameplay_running};

// === Messages ===

/// Damage aimed at one enemy. Written by projectiles and status effects,
/// resolved by [`apply_damage`].
#[derive(Message, Debug, Clone, Copy)]
pub struct Damage {
    pub target: Entity,
    pub amount: f32,
    pub damage_type: DamageType,
}

// === Pure Functions ===

/// Resolve an incoming hit against a resistance profile.
///
/// `dodge_roll` is uniform in [0, 1); a roll under the dodge chance negates
/// the hit entirely (`None`). Otherwise the mitigated amount comes back:
/// fire resistance applies to Fire damage, and the flat resistance applies
/// on top when enabled — multiplicative, so the order never matters.
#[must_use]
pub fn resolve_damage(
    amount: f32,
    damage_type: DamageType,
    profile: &ResistanceProfile,
    dodge_roll: f32,
) -> Option<f32> {
    if dodge_roll < profile.dodge_chance {
        return None;
    }

    let mut mitigated = amount;
    if damage_type == DamageType::Fire {
        mitigated *= 1.0 - profile.fire_resistance;
    }
    if profile.is_damage_resistant {
        mitigated *= 1.0 - profile.damage_resistance;
    }
    Some(mitigated)
}

// === Systems ===

/// Applies queued [`Damage`] messages: dodge, mitigate, show the number,
/// subtract health, and check the rage threshold. Runs in `GameSet::Combat`.
fn apply_damage(
    mut messages: MessageReader<Damage>,
    mut enemies: Query<
        (
            &Transform,
            &mut Health,
            &ResistanceProfile,
            &mut Rage,
            &mut ContactDamage,
        ),
        (With<Enemy>, Without<Dying>),
    >,
    mut floating: MessageWriter<FloatingDamage>,
    mut animations: MessageWriter<AnimationTrigger>,
) {
    for message in messages.read() {
        let Ok((transform, mut health, profile, mut rage, mut contact)) =
            enemies.get_mut(message.target)
        else {
            continue;
        };

        let roll = rand::random::<f32>();
        let Some(amount) = resolve_damage(message.amount, message.damage_type, profile, roll)
        else {
            debug!("enemy {:?} dodged the attack", message.target);
            continue;
        };

        floating.write(FloatingDamage {
            entity: message.target,
            position: transform.translation,
            amount,
            damage_type: message.damage_type,
        });

        health.current -= amount;

        if !rage.active && health.current <= rage.threshold * health.max {
            rage.active = true;
            contact.0 = (contact.0 as f32 * rage.damage_multiplier).round() as i32;
            animations.write(AnimationTrigger {
                entity: message.target,
                kind: AnimationKind::Rage,
            });
            debug!("enemy {:?} entered rage mode", message.target);
        }
    }
}

/// Moves enemies at zero health into the dying state exactly once.
/// Runs in `GameSet::Death`.
fn check_death(
    mut enemies: Query<(Entity, &mut Health), (With<Enemy>, Without<Dying>)>,
    mut animations: MessageWriter<AnimationTrigger>,
    mut commands: Commands,
) {
    for (entity, mut health) in &mut enemies {
        if health.current <= 0.0 {
            health.current = 0.0;
            commands.entity(entity).insert(Dying::default());
            animations.write(AnimationTrigger {
                entity,
                kind: AnimationKind::Die,
            });
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_message::<Damage>();

    app.add_systems(
        Update,
        apply_damage.in_set(GameSet::Combat).run_if(gameplay_running),
    );
    app.add_systems(
        Update,
        check_death.in_set(GameSet::Death).run_if(gameplay_running),
    );
}
