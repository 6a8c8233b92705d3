//! Target selection: which enemy in range a tower shoots at.

use bevy::prelude::*;
use serde::Deserialize;

// === Data ===

/// The rule a tower uses to pick one target from everything in range.
/// Unknown strings in data deserialize to `Unspecified`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Reflect)]
#[serde(rename_all = "camelCase")]
pub enum TargetingStrategy {
    /// Furthest along its path.
    #[default]
    FirstTarget,
    /// Highest current health.
    MostHealth,
    /// No rule: first candidate found.
    #[serde(other)]
    Unspecified,
}

/// An enemy eligible for targeting, with the fields the strategies compare.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub entity: Entity,
    pub progress: f32,
    pub health: f32,
}

// === Pure Functions ===

/// Is `position` within a tower's circular range?
#[must_use]
pub fn within_range(center: Vec2, position: Vec2, range: f32) -> bool {
    center.distance(position) <= range
}

/// Pick a target. Ties go to the first candidate found; an empty candidate
/// set yields `None`.
#[must_use]
pub fn select_target(
    strategy: TargetingStrategy,
    candidates: impl IntoIterator<Item = Candidate>,
) -> Option<Entity> {
    let mut candidates = candidates.into_iter();
    match strategy {
        TargetingStrategy::FirstTarget => {
            let mut best: Option<Candidate> = None;
            for candidate in candidates {
                if best.is_none_or(|b| candidate.progress > b.progress) {
                    best = Some(candidate);
                }
            }
            best.map(|c| c.entity)
        }
        TargetingStrategy::MostHealth => {
            let mut best: Option<Candidate> = None;
            for candidate in candidates {
                if best.is_none_or(|b| candidate.health > b.health) {
                    best = Some(candidate);
                }
            }
            best.map(|c| c.entity)
        }
        TargetingStrategy::Unspecified => candidates.next().map(|c| c.entity),
    }
}
