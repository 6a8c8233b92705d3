//! Tower-defense combat simulation core.
//!
//! Headless Bevy plugins: enemy pathing and abilities, tower targeting and
//! attack timing, projectile ballistics, status effects, and the upgrade
//! economy. Rendering, physics, and input stay with the host — the core only
//! emits feedback messages and reads data catalogs.

pub mod config;
pub mod gameplay;
pub mod prelude;
#[cfg(test)]
pub mod testing;

use bevy::prelude::*;

/// Primary game states.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Initial loading state.
    #[default]
    Loading,
    /// Main menu state.
    MainMenu,
    /// Active gameplay state.
    InGame,
}

/// Sub-states within `InGame`. Only exists while `GameState::InGame` is active.
#[derive(SubStates, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum InGameState {
    /// Normal gameplay.
    #[default]
    Playing,
    /// Game is paused (overlay on gameplay).
    Paused,
}

/// System sets for the per-tick simulation order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Spawning and income generation.
    Production,
    /// Status effect ticking (slows expiring, damage-over-time).
    Status,
    /// Enemy abilities and tower target acquisition.
    Ai,
    /// Enemy path following and projectile flight.
    Movement,
    /// Attack dispatch, impact resolution, damage application.
    Combat,
    /// Death detection and removal.
    Death,
}

/// Run condition: gameplay systems only run while actively playing.
pub fn gameplay_running(
    game_state: Res<State<GameState>>,
    in_game: Option<Res<State<InGameState>>>,
) -> bool {
    *game_state.get() == GameState::InGame
        && in_game.is_some_and(|s| *s.get() == InGameState::Playing)
}

/// Top-level plugin: states, set ordering, and all gameplay domains.
pub fn plugin(app: &mut App) {
    app.init_state::<GameState>().add_sub_state::<InGameState>();

    app.configure_sets(
        Update,
        (
            GameSet::Production,
            GameSet::Status,
            GameSet::Ai,
            GameSet::Movement,
            GameSet::Combat,
            GameSet::Death,
        )
            .chain(),
    );

    app.add_plugins(gameplay::plugin);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn game_state_default_is_loading() {
        assert_eq!(GameState::default(), GameState::Loading);
    }

    #[test]
    fn game_states_are_distinct() {
        assert_ne!(GameState::Loading, GameState::MainMenu);
        assert_ne!(GameState::MainMenu, GameState::InGame);
    }

    #[test]
    fn in_game_state_default_is_playing() {
        assert_eq!(InGameState::default(), InGameState::Playing);
    }

    #[test]
    fn in_game_states_are_distinct() {
        assert_ne!(InGameState::Playing, InGameState::Paused);
    }
}
