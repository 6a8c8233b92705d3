//! Enemy agents: stat sheets, the spawn archetype, and the components the
//! per-tick systems drive.

pub mod abilities;
pub mod damage;
mod movement;
pub mod spawner;

use bevy::prelude::*;
use serde::Deserialize;

use crate::gameplay::Health;
use crate::gameplay::level::WaypointPath;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Seconds a dead enemy lingers before removal (death animation window).
pub const DEATH_LINGER_SECS: f32 = 1.0;

/// An enemy counts as having reached a waypoint inside this radius.
pub const WAYPOINT_ARRIVAL_DISTANCE: f32 = 0.1;

// === Data ===

/// Per-type enemy stat sheet, loaded from `data/enemies.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySpec {
    pub name: String,
    pub health: f32,
    pub speed: f32,
    pub damage: i32,
    #[serde(default)]
    pub dodge_chance: f32,
    #[serde(default)]
    pub fire_resistance: f32,
    #[serde(default)]
    pub damage_resistance: f32,
    #[serde(default)]
    pub is_damage_resistant: bool,

    // Rage mode
    #[serde(default)]
    pub rage_health_threshold: f32,
    #[serde(default = "one")]
    pub rage_speed_multiplier: f32,
    #[serde(default = "one")]
    pub rage_damage_multiplier: f32,

    // Phase shift
    #[serde(default)]
    pub can_phase_shift: bool,
    #[serde(default)]
    pub phase_shift_cooldown: f32,
    #[serde(default)]
    pub phase_shift_chance: f32,
    #[serde(default)]
    pub phase_shift_skip_waypoints: usize,

    // Invisibility
    #[serde(default)]
    pub can_become_invisible: bool,
    #[serde(default)]
    pub invisibility_cooldown: f32,
    #[serde(default)]
    pub invisibility_duration: f32,
}

const fn one() -> f32 {
    1.0
}

/// Every enemy type in the game.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemySpec>,
}

impl EnemyCatalog {
    /// Look up a spec by enemy name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EnemySpec> {
        self.enemies.iter().find(|spec| spec.name == name)
    }

    /// Pick a random spec, `None` when the catalog is empty.
    #[must_use]
    pub fn random(&self) -> Option<&EnemySpec> {
        use rand::Rng;
        if self.enemies.is_empty() {
            return None;
        }
        self.enemies
            .get(rand::rng().random_range(0..self.enemies.len()))
    }
}

// === Components ===

/// Marker for enemy entities.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Enemy;

/// Canonical movement speed. Slows and rage multiply this at read time —
/// the base value is never overwritten.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Movement {
    pub base_speed: f32,
}

/// Damage dealt to the defense when this enemy reaches the path end.
/// Rage mode scales it permanently.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ContactDamage(pub i32);

/// Incoming-damage mitigation: dodge roll, fire-specific resistance, and an
/// optional flat resistance.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ResistanceProfile {
    pub dodge_chance: f32,
    pub fire_resistance: f32,
    pub damage_resistance: f32,
    pub is_damage_resistant: bool,
}

/// Rage mode: one-way transition when health falls to the threshold.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Rage {
    /// Fraction of max health at which rage triggers.
    pub threshold: f32,
    pub speed_multiplier: f32,
    pub damage_multiplier: f32,
    /// Never resets once set.
    pub active: bool,
}

/// The waypoint sequence this enemy walks and its position along it.
/// The index only ever increases.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PathFollower {
    pub waypoints: Vec<Vec2>,
    pub index: usize,
}

impl PathFollower {
    #[must_use]
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self { waypoints, index: 0 }
    }

    /// The waypoint currently being walked toward, `None` past the end.
    #[must_use]
    pub fn target_waypoint(&self) -> Option<Vec2> {
        self.waypoints.get(self.index).copied()
    }

    /// Step to the next waypoint. Returns `true` while waypoints remain.
    pub fn advance(&mut self) -> bool {
        self.index += 1;
        self.index < self.waypoints.len()
    }

    /// Jump forward `count` waypoints, clamped to the final one. Returns the
    /// waypoint landed on, `None` once the path is already finished.
    pub fn phase_skip(&mut self, count: usize) -> Option<Vec2> {
        if self.index >= self.waypoints.len() {
            return None;
        }
        self.index = (self.index + count).min(self.waypoints.len() - 1);
        self.target_waypoint()
    }

    /// Normalized progress along the path in [0, 1].
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.waypoints.len() < 2 {
            return 0.0;
        }
        (self.index as f32 / (self.waypoints.len() - 1) as f32).clamp(0.0, 1.0)
    }
}

/// Terminal state: the enemy stops simulating and despawns when the linger
/// timer ends. Inserted at most once per enemy.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Dying {
    pub timer: Timer,
}

impl Default for Dying {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(DEATH_LINGER_SECS, TimerMode::Once),
        }
    }
}

// === Messages ===

/// An enemy walked off the end of its path. The defense collaborator reads
/// the contact damage; the enemy itself is already gone.
#[derive(Message, Debug, Clone, Copy)]
pub struct EnemyReachedEnd {
    pub enemy: Entity,
    pub damage: i32,
}

// === Archetype ===

/// Spawn an enemy from its stat sheet on the given path.
/// Single source of truth for the enemy archetype.
pub fn spawn_enemy(commands: &mut Commands, spec: &EnemySpec, path: &WaypointPath) -> Entity {
    let waypoints = path.points();
    let start = waypoints.first().copied().unwrap_or(Vec2::ZERO);

    let mut entity = commands.spawn((
        Name::new(spec.name.clone()),
        Enemy,
        Health::new(spec.health),
        Movement {
            base_speed: spec.speed,
        },
        ContactDamage(spec.damage),
        ResistanceProfile {
            dodge_chance: spec.dodge_chance,
            fire_resistance: spec.fire_resistance,
            damage_resistance: spec.damage_resistance,
            is_damage_resistant: spec.is_damage_resistant,
        },
        Rage {
            threshold: spec.rage_health_threshold,
            speed_multiplier: spec.rage_speed_multiplier,
            damage_multiplier: spec.rage_damage_multiplier,
            active: false,
        },
        PathFollower::new(waypoints),
        Transform::from_translation(start.extend(0.0)),
        DespawnOnExit(crate::GameState::InGame),
    ));

    if spec.can_phase_shift {
        entity.insert(abilities::PhaseShift::new(
            spec.phase_shift_cooldown,
            spec.phase_shift_chance,
            spec.phase_shift_skip_waypoints,
        ));
    }
    if spec.can_become_invisible {
        entity.insert(abilities::Invisibility::new(
            spec.invisibility_cooldown,
            spec.invisibility_duration,
        ));
    }

    entity.id()
}

// === Systems ===

/// Ticks death linger timers and removes finished enemies.
fn remove_dying(time: Res<Time>, mut dying: Query<(Entity, &mut Dying)>, mut commands: Commands) {
    for (entity, mut state) in &mut dying {
        state.timer.tick(time.delta());
        if state.timer.is_finished() {
            commands.entity(entity).despawn();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Enemy>()
        .register_type::<Movement>()
        .register_type::<ContactDamage>()
        .register_type::<ResistanceProfile>()
        .register_type::<Rage>()
        .register_type::<PathFollower>()
        .register_type::<Dying>()
        .add_message::<EnemyReachedEnd>()
        .init_resource::<EnemyCatalog>();

    app.add_systems(
        Update,
        remove_dying.in_set(GameSet::Death).run_if(gameplay_running),
    );

    abilities::plugin(app);
    damage::plugin(app);
    movement::plugin(app);
    spawner::plugin(app);
}
