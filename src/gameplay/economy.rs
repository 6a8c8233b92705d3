//! Economy: the global gold pool.

use bevy::prelude::*;

use crate::GameState;

// === Constants ===

/// Starting gold when entering `InGame`.
pub const STARTING_GOLD: u32 = 200;

// === Resources ===

/// The player's current gold. Credited by income towers, debited by the
/// placement/upgrade UI collaborator.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct Gold(pub u32);

impl Default for Gold {
    fn default() -> Self {
        Self(STARTING_GOLD)
    }
}

impl Gold {
    /// Add gold, rounding to the nearest whole coin.
    pub fn credit(&mut self, amount: f32) {
        self.0 += amount.round().max(0.0) as u32;
    }

    /// Spend gold if the balance covers it. Returns `false` (and changes
    /// nothing) otherwise.
    pub const fn try_spend(&mut self, amount: u32) -> bool {
        if self.0 >= amount {
            self.0 -= amount;
            true
        } else {
            false
        }
    }
}

// === Systems ===

fn reset_gold(mut gold: ResMut<Gold>) {
    *gold = Gold::default();
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Gold>().init_resource::<Gold>();

    app.add_systems(OnEnter(GameState::InGame), reset_gold);
}
