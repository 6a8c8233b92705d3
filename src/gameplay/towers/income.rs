//! Income towers: periodic gold generation instead of attacks.

use bevy::prelude::*;

use crate::gameplay::economy::Gold;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Seconds between income payouts.
pub const INCOME_INTERVAL_SECS: f32 = 1.0;

// === Components ===

/// Generates gold while the tower exists. Despawning the tower stops the
/// loop; there is nothing else to cancel.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct IncomeTower {
    pub gold_per_second: f32,
    pub timer: Timer,
}

impl IncomeTower {
    #[must_use]
    pub fn new(gold_per_second: f32) -> Self {
        Self {
            gold_per_second,
            timer: Timer::from_seconds(INCOME_INTERVAL_SECS, TimerMode::Repeating),
        }
    }
}

// === Systems ===

/// Credits gold once per completed interval. Counting completed intervals
/// (rather than a single `just_finished`) keeps the payout correct even when
/// a tick spans more than one interval.
fn generate_income(time: Res<Time>, mut towers: Query<&mut IncomeTower>, mut gold: ResMut<Gold>) {
    for mut income in &mut towers {
        income.timer.tick(time.delta());
        let completed = income.timer.times_finished_this_tick();
        if completed > 0 {
            gold.credit(income.gold_per_second * completed as f32);
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<IncomeTower>();

    app.add_systems(
        Update,
        generate_income
            .in_set(GameSet::Production)
            .run_if(gameplay_running),
    );
}
