use glam::Vec2;
use hecs::{Entity, World};

use crate::components::Facing;
use crate::config::GameConfig;
use crate::engine::input::{RawInput, ScriptedInput};
use crate::fsm::FsmError;
use crate::scene::prefabs::{solid, spawn_enemy, spawn_player};
use crate::systems::raycast::Level;

/// Handles to the actors of the demo level.
pub struct TestScene {
    pub level: Level,
    pub player: Entity,
    pub enemy: Entity,
}

/// A long floor, a climbable block, and an enemy patrolling past it.
pub fn load_test_scene(world: &mut World, config: &GameConfig, seed: u64) -> Result<TestScene, FsmError> {
    let level = Level::new(vec![
        // Floor
        solid(Vec2::new(-20.0, -1.0), Vec2::new(60.0, 0.0)),
        // Block with a ledge the player can hang from at the top of a jump.
        solid(Vec2::new(8.0, 0.0), Vec2::new(10.0, 3.0)),
        // Far wall the enemy patrols up to.
        solid(Vec2::new(34.0, 0.0), Vec2::new(35.0, 6.0)),
        // Left boundary
        solid(Vec2::new(-21.0, 0.0), Vec2::new(-20.0, 6.0)),
    ]);

    let player = spawn_player(world, &level, &config.player, Vec2::new(0.0, 0.0))?;
    let enemy = spawn_enemy(world, &level, &config.enemy, Vec2::new(22.0, 0.0), Facing::Left, seed)?;

    tracing::debug!(solids = level.solids().len(), "test scene loaded");
    Ok(TestScene { level, player, enemy })
}

/// Walk to the block, jump to its ledge, climb, then run at the enemy.
pub fn demo_script() -> ScriptedInput {
    let right = RawInput {
        move_axis: Vec2::X,
        ..RawInput::default()
    };
    let right_jump = RawInput { jump: true, ..right };
    ScriptedInput::new(vec![
        (0.0, RawInput::default()),
        (0.5, right),
        (1.0, right_jump),
        (1.3, right),
        (4.0, RawInput::default()),
        (4.5, right),
        (7.0, RawInput { attack: true, ..right }),
        (7.4, RawInput::default()),
    ])
}
