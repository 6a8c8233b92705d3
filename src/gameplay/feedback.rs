//! Visual feedback sink: floating damage numbers and animation triggers.
//!
//! The core writes these messages and never reads them back; a rendering
//! collaborator drains them to spawn text popups or drive animators.

use bevy::prelude::*;

use crate::gameplay::DamageType;

// === Messages ===

/// A damage number to display above an enemy. Colored by damage type
/// (Normal = black, Fire = red in the stock presentation).
#[derive(Message, Debug, Clone, Copy)]
pub struct FloatingDamage {
    pub entity: Entity,
    pub position: Vec3,
    pub amount: f32,
    pub damage_type: DamageType,
}

/// Which animation a collaborator should play on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Attack,
    Die,
    Rage,
    Teleport,
    Break,
}

/// Fire-and-forget animation trigger.
#[derive(Message, Debug, Clone, Copy)]
pub struct AnimationTrigger {
    pub entity: Entity,
    pub kind: AnimationKind,
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_message::<FloatingDamage>()
        .add_message::<AnimationTrigger>();
}
