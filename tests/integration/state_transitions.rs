//! Tests for game state transitions.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use pretty_assertions::assert_eq;
use tower_defense::{GameState, InGameState};

fn create_game_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.add_plugins(tower_defense::plugin);
    app
}

#[test]
fn game_initializes_in_loading_state() {
    let app = create_game_app();
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Loading);
}

#[test]
fn can_transition_between_states() {
    let mut app = create_game_app();

    // Transition to MainMenu
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::MainMenu);
    app.update();

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::MainMenu);
}

#[test]
fn entering_ingame_starts_playing() {
    let mut app = create_game_app();

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
    app.update();

    let state = app.world().resource::<State<InGameState>>();
    assert_eq!(*state.get(), InGameState::Playing);
}

#[test]
fn leaving_ingame_drops_sub_state() {
    let mut app = create_game_app();

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
    app.update();
    assert!(app.world().get_resource::<State<InGameState>>().is_some());

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::MainMenu);
    app.update();
    app.update();

    assert!(app.world().get_resource::<State<InGameState>>().is_none());
}
