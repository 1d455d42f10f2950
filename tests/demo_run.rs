//! End-to-end run of the demo level with its scripted input.

use hecs::World;
use ledgewalk::app::GameApp;
use ledgewalk::components::{Actor, Player};
use ledgewalk::config::GameConfig;
use ledgewalk::scene::test_scene::{demo_script, load_test_scene};

fn demo_app(fps: f32) -> (GameApp, hecs::Entity) {
    let config = GameConfig::default();
    let mut world = World::new();
    let scene = load_test_scene(&mut world, &config, 7).unwrap();
    let enemy = scene.enemy;
    (GameApp::new(world, scene.level, scene.player, config, 1.0 / fps), enemy)
}

#[test]
fn demo_runs_to_completion() {
    let (mut app, enemy) = demo_app(60.0);
    let summary = app.run(&mut demo_script(), 10.0);

    assert!((599..=601).contains(&summary.frames), "frames: {}", summary.frames);
    // 50 Hz physics regardless of the frame rate.
    assert!((498..=501).contains(&summary.physics_steps), "steps: {}", summary.physics_steps);
    assert!(summary.player_state.is_some());
    assert!(summary.player_transitions > 3);
    assert!(app.enemy_state(enemy).is_some());
}

#[test]
fn scripted_player_gets_past_the_block() {
    let (mut app, _enemy) = demo_app(60.0);
    app.run(&mut demo_script(), 6.0);

    let player = app
        .world()
        .query::<&Actor>()
        .with::<&Player>()
        .iter()
        .map(|(_entity, actor)| actor.body.position)
        .next()
        .unwrap();
    assert!(player.x > 10.0, "player stuck at {player}");
    assert!(player.is_finite());
}

#[test]
fn same_seed_replays_identically() {
    let (mut first, enemy_a) = demo_app(60.0);
    let (mut second, enemy_b) = demo_app(60.0);

    let a = first.run(&mut demo_script(), 8.0);
    let b = second.run(&mut demo_script(), 8.0);

    assert_eq!(a, b);
    assert_eq!(first.enemy_state(enemy_a), second.enemy_state(enemy_b));
}
