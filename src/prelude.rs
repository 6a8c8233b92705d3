//! Common imports for consumers of the simulation core.

pub use bevy::prelude::*;

pub use crate::gameplay::economy::Gold;
pub use crate::gameplay::enemies::{Enemy, EnemyCatalog, spawn_enemy};
pub use crate::gameplay::feedback::{AnimationKind, AnimationTrigger, FloatingDamage};
pub use crate::gameplay::level::{CurrentLevel, LevelCatalog};
pub use crate::gameplay::towers::{Tower, TowerCatalog, UpgradeStore, spawn_tower};
pub use crate::gameplay::{DamageType, Health};
pub use crate::{GameSet, GameState, InGameState, gameplay_running};
