//! Gameplay domain plugins: level paths, enemies, towers, projectiles,
//! status effects, economy, and the feedback sink.

pub mod economy;
pub mod enemies;
pub mod feedback;
pub mod level;
pub mod projectiles;
pub mod status;
pub mod towers;

use bevy::prelude::*;

use crate::gameplay::towers::{Tower, UpgradeStore};

// === Components ===

/// Hit points. Shared by every damageable entity.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    /// Create a health pool at full capacity.
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Current health as a fraction of max, clamped to [0, 1].
    #[must_use]
    pub fn ratio(&self) -> f32 {
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

/// The damage flavor carried by attacks and status effects. Resistance and
/// floating-number coloring key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DamageType {
    Normal,
    Fire,
}

// === Messages ===

/// Reset the session: wipe upgrade deltas, remove placed towers, restore
/// starting gold.
#[derive(Message, Debug, Clone, Copy)]
pub struct NewGame;

// === Systems ===

/// Handles [`NewGame`]: the upgrade store and gold pool reset, every placed
/// tower despawns.
fn handle_new_game(
    mut messages: MessageReader<NewGame>,
    mut store: ResMut<UpgradeStore>,
    mut gold: ResMut<economy::Gold>,
    towers: Query<Entity, With<Tower>>,
    mut commands: Commands,
) {
    if messages.read().next().is_none() {
        return;
    }
    store.reset();
    *gold = economy::Gold::default();
    for entity in &towers {
        commands.entity(entity).despawn();
    }
    info!("new game: upgrades and towers reset");
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Health>().add_message::<NewGame>();

    app.add_plugins((
        economy::plugin,
        enemies::plugin,
        feedback::plugin,
        level::plugin,
        projectiles::plugin,
        status::plugin,
        towers::plugin,
    ));

    app.add_systems(Update, handle_new_game);
}
