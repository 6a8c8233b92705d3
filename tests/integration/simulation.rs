//! End-to-end simulation tests: the full plugin stack driven tick by tick.

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use pretty_assertions::assert_eq;

use tower_defense::config;
use tower_defense::gameplay::NewGame;
use tower_defense::gameplay::economy::{Gold, STARTING_GOLD};
use tower_defense::gameplay::enemies::damage::Damage;
use tower_defense::gameplay::enemies::{Enemy, EnemyCatalog, spawn_enemy};
use tower_defense::gameplay::level::{LevelCatalog, WaypointPath};
use tower_defense::gameplay::projectiles::Projectile;
use tower_defense::gameplay::towers::{Tower, TowerCatalog, UpgradeStore, spawn_tower};
use tower_defense::gameplay::{DamageType, Health};
use tower_defense::{GameState, InGameState};

/// One enemy type, one path, and the stock tower tables — everything the
/// random pickers can choose is pinned down.
fn create_sim_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.add_plugins(tower_defense::plugin);

    let enemies: EnemyCatalog = config::from_json(
        r#"[{ "name": "grunt", "health": 100, "speed": 0.5, "damage": 1 }]"#,
    )
    .unwrap();
    let levels: LevelCatalog = config::from_json(
        r#"[{ "paths": [{ "name": "lane", "waypoints": [[0, 0], [40, 0]] }] }]"#,
    )
    .unwrap();
    app.insert_resource(enemies);
    app.insert_resource(levels);
    app.insert_resource(config::from_json::<TowerCatalog>(include_str!("../../data/towers.json")).unwrap());

    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        100,
    )));
    app
}

fn enter_ingame(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
    app.update();
}

fn place(app: &mut App, tower_type: &str, position: Vec2) -> Entity {
    let catalog = app.world().resource::<TowerCatalog>().clone();
    let store = app.world().resource::<UpgradeStore>().clone();
    let mut commands = app.world_mut().commands();
    let entity = spawn_tower(&mut commands, &catalog, &store, tower_type, 0, position).unwrap();
    app.world_mut().flush();
    entity
}

fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<(), F>()
        .iter(app.world())
        .count()
}

#[test]
fn bundled_data_files_parse() {
    config::from_json::<TowerCatalog>(include_str!("../../data/towers.json")).unwrap();
    config::from_json::<EnemyCatalog>(include_str!("../../data/enemies.json")).unwrap();
    config::from_json::<LevelCatalog>(include_str!("../../data/levels.json")).unwrap();
}

#[test]
fn wave_spawner_produces_walking_enemies() {
    let mut app = create_sim_app();
    enter_ingame(&mut app);

    // Two seconds of sim: the first spawn lands
    for _ in 0..21 {
        app.update();
    }
    assert!(count::<With<Enemy>>(&mut app) >= 1);

    let start_x = {
        let mut query = app.world_mut().query_filtered::<&Transform, With<Enemy>>();
        query.iter(app.world()).next().unwrap().translation.x
    };
    for _ in 0..10 {
        app.update();
    }
    let later_x = {
        let mut query = app.world_mut().query_filtered::<&Transform, With<Enemy>>();
        query.iter(app.world()).next().unwrap().translation.x
    };
    assert!(later_x > start_x, "enemy should walk east: {start_x} -> {later_x}");
}

#[test]
fn tower_opens_fire_on_enemies_in_range() {
    let mut app = create_sim_app();
    enter_ingame(&mut app);
    place(&mut app, "basicArchers", Vec2::new(2.0, 0.0));

    // Wait through the first spawn (2s) plus a full fire interval (1.5s)
    for _ in 0..40 {
        app.update();
    }

    assert!(count::<With<Projectile>>(&mut app) >= 1);
}

#[test]
fn income_tower_credits_gold_over_time() {
    let mut app = create_sim_app();
    // No enemy spawns muddying the picture: empty the enemy catalog
    app.insert_resource(EnemyCatalog::default());
    enter_ingame(&mut app);
    place(&mut app, "incomeTowers", Vec2::ZERO);

    // Three full payout intervals at 5 gold/second
    for _ in 0..30 {
        app.update();
    }

    assert_eq!(app.world().resource::<Gold>().0, STARTING_GOLD + 15);
}

#[test]
fn damage_pipeline_kills_and_removes_enemies() {
    let mut app = create_sim_app();
    app.insert_resource(EnemyCatalog::default());
    enter_ingame(&mut app);

    let spec: EnemyCatalog = config::from_json(
        r#"[{ "name": "grunt", "health": 100, "speed": 0.0, "damage": 1 }]"#,
    )
    .unwrap();
    let path = WaypointPath {
        name: "lane".to_string(),
        waypoints: vec![[5.0, 0.0], [40.0, 0.0]],
    };
    let enemy = {
        let mut commands = app.world_mut().commands();
        let enemy = spawn_enemy(&mut commands, &spec.enemies[0], &path);
        app.world_mut().flush();
        enemy
    };

    app.world_mut().write_message(Damage {
        target: enemy,
        amount: 250.0,
        damage_type: DamageType::Normal,
    });
    app.update();

    // Dead but lingering for the death animation, health clamped at zero
    assert_eq!(app.world().get::<Health>(enemy).unwrap().current, 0.0);
    assert_eq!(count::<With<Enemy>>(&mut app), 1);

    // One second later the corpse is gone
    for _ in 0..11 {
        app.update();
    }
    assert_eq!(count::<With<Enemy>>(&mut app), 0);
}

#[test]
fn paused_game_halts_the_simulation() {
    let mut app = create_sim_app();
    enter_ingame(&mut app);
    app.world_mut()
        .resource_mut::<NextState<InGameState>>()
        .set(InGameState::Paused);
    app.update();

    for _ in 0..40 {
        app.update();
    }

    assert_eq!(count::<With<Enemy>>(&mut app), 0);
}

#[test]
fn new_game_resets_session_state() {
    let mut app = create_sim_app();
    app.insert_resource(EnemyCatalog::default());
    enter_ingame(&mut app);
    place(&mut app, "basicArchers", Vec2::ZERO);
    app.world_mut()
        .resource_mut::<UpgradeStore>()
        .record_damage("basicArchers", 5);
    app.world_mut().resource_mut::<Gold>().0 = 3;

    app.world_mut().write_message(NewGame);
    app.update();

    assert_eq!(app.world().resource::<Gold>().0, STARTING_GOLD);
    assert_eq!(
        app.world()
            .resource::<UpgradeStore>()
            .get("basicArchers")
            .additional_damage,
        0
    );
    assert_eq!(count::<With<Tower>>(&mut app), 0);
}
