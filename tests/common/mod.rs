//! Shared harness for integration tests: a headless app over a hand-built level.
#![allow(dead_code)]

use glam::Vec2;
use hecs::{Entity, World};

use ledgewalk::app::GameApp;
use ledgewalk::components::{Actor, Facing};
use ledgewalk::config::GameConfig;
use ledgewalk::engine::geometry::Aabb;
use ledgewalk::engine::input::RawInput;
use ledgewalk::scene::prefabs::{solid, spawn_enemy, spawn_player};
use ledgewalk::states::player::PlayerStateId;
use ledgewalk::systems::Level;

/// One physics step per frame keeps step counts predictable.
pub const FRAME_DT: f32 = 1.0 / 50.0;

pub fn floor() -> Aabb {
    solid(Vec2::new(-20.0, -1.0), Vec2::new(60.0, 0.0))
}

/// Floor plus a 2x3 block whose near face is at x = 8.
pub fn block_level() -> Vec<Aabb> {
    vec![floor(), solid(Vec2::new(8.0, 0.0), Vec2::new(10.0, 3.0))]
}

pub struct Harness {
    pub app: GameApp,
    pub player: Entity,
    pub enemy: Option<Entity>,
}

impl Harness {
    pub fn player_only(solids: Vec<Aabb>, feet: Vec2, config: GameConfig) -> Self {
        let level = Level::new(solids);
        let mut world = World::new();
        let player = spawn_player(&mut world, &level, &config.player, feet).unwrap();
        Self {
            app: GameApp::new(world, level, player, config, FRAME_DT),
            player,
            enemy: None,
        }
    }

    pub fn with_enemy(
        solids: Vec<Aabb>,
        player_feet: Vec2,
        enemy_feet: Vec2,
        facing: Facing,
        config: GameConfig,
    ) -> Self {
        let level = Level::new(solids);
        let mut world = World::new();
        let player = spawn_player(&mut world, &level, &config.player, player_feet).unwrap();
        let enemy = spawn_enemy(&mut world, &level, &config.enemy, enemy_feet, facing, 7).unwrap();
        Self {
            app: GameApp::new(world, level, player, config, FRAME_DT),
            player,
            enemy: Some(enemy),
        }
    }

    pub fn player_actor(&self) -> Actor {
        (*self.app.world().get::<&Actor>(self.player).unwrap()).clone()
    }

    pub fn player_actor_mut(&mut self) -> hecs::RefMut<'_, Actor> {
        self.app.world().get::<&mut Actor>(self.player).unwrap()
    }

    pub fn player_state(&self) -> PlayerStateId {
        self.app.player_state().unwrap()
    }

    /// Run frames with `raw` held, recording the player state after each.
    pub fn hold(&mut self, raw: RawInput, frames: usize) -> Vec<PlayerStateId> {
        (0..frames)
            .map(|_| {
                self.app.frame(&raw);
                self.player_state()
            })
            .collect()
    }

    /// Run frames with `raw` held until the player leaves `state`, at most
    /// `limit` frames. Returns the state it left for.
    pub fn until_leaves(&mut self, state: PlayerStateId, raw: RawInput, limit: usize) -> Option<PlayerStateId> {
        for _ in 0..limit {
            self.app.frame(&raw);
            let now = self.player_state();
            if now != state {
                return Some(now);
            }
        }
        None
    }

    /// Run frames with `raw` held until the player is in `state`.
    pub fn until_in(&mut self, state: PlayerStateId, raw: RawInput, limit: usize) -> bool {
        for _ in 0..limit {
            if self.player_state() == state {
                return true;
            }
            self.app.frame(&raw);
        }
        self.player_state() == state
    }
}
