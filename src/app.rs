use hecs::{Entity, World};

use crate::components::{EnemyFsm, EnemyMemory, PlayerFsm};
use crate::config::GameConfig;
use crate::engine::input::{InputProvider, RawInput};
use crate::engine::time::{FixedStep, SimClock};
use crate::fsm::StateId;
use crate::states::enemy::EnemyStateId;
use crate::states::player::PlayerStateId;
use crate::systems::{
    contact_system, enemy_animation_system, enemy_logic_system, enemy_physics_system, physics_step,
    player_animation_system, player_logic_system, player_physics_system, Level, PHYSICS_DT,
};

/// Headless host: owns the world and drives frames and fixed physics steps.
pub struct GameApp {
    world: World,
    level: Level,
    config: GameConfig,
    player: Entity,
    clock: SimClock,
    fixed: FixedStep,
}

/// What the world looked like when a run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub physics_steps: usize,
    pub player_state: Option<PlayerStateId>,
    pub player_transitions: usize,
    pub strikes: u32,
}

impl GameApp {
    pub fn new(world: World, level: Level, player: Entity, config: GameConfig, frame_dt: f32) -> Self {
        Self {
            world,
            level,
            config,
            player,
            clock: SimClock::new(frame_dt),
            fixed: FixedStep::new(PHYSICS_DT),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn now(&self) -> f32 {
        self.clock.now
    }

    pub fn player_state(&self) -> Option<PlayerStateId> {
        self.world
            .get::<&PlayerFsm>(self.player)
            .ok()
            .map(|fsm| fsm.current())
    }

    pub fn enemy_state(&self, enemy: Entity) -> Option<EnemyStateId> {
        self.world.get::<&EnemyFsm>(enemy).ok().map(|fsm| fsm.current())
    }

    /// One frame: logic, zero or more physics steps, then clip callbacks.
    /// Returns the number of physics steps that ran.
    pub fn frame(&mut self, raw: &RawInput) -> usize {
        let now = self.clock.now;
        let dt = self.clock.dt;
        let GameConfig {
            player: player_config,
            enemy: enemy_config,
        } = &self.config;

        player_logic_system(&mut self.world, raw, &self.level, player_config, now);
        enemy_logic_system(&mut self.world, &self.level, enemy_config, now);

        // Sub-step `i` happens `i` fixed steps into the frame.
        let steps = self.fixed.advance(dt);
        for step in 0..steps {
            let step_now = now + step as f32 * PHYSICS_DT;
            physics_step(&mut self.world, &self.level);
            contact_system(&mut self.world, &self.level);
            player_physics_system(&mut self.world, &self.level, player_config, step_now);
            enemy_physics_system(&mut self.world, &self.level, enemy_config, step_now);
        }

        player_animation_system(&mut self.world, &self.level, player_config, now, dt);
        enemy_animation_system(&mut self.world, &self.level, enemy_config, now, dt);

        self.clock.tick();
        steps
    }

    /// Run frames until `seconds` of simulated time have passed.
    pub fn run(&mut self, input: &mut dyn InputProvider, seconds: f32) -> RunSummary {
        let mut summary = RunSummary {
            frames: 0,
            physics_steps: 0,
            player_state: self.player_state(),
            player_transitions: 0,
            strikes: 0,
        };

        while self.clock.now < seconds {
            let raw = input.poll(self.clock.now);
            summary.physics_steps += self.frame(&raw);
            summary.frames += 1;

            let state = self.player_state();
            if state != summary.player_state {
                if let Some(state) = state {
                    tracing::info!(t = self.clock.now, state = state.name(), "player state");
                }
                summary.player_state = state;
                summary.player_transitions += 1;
            }
        }

        summary.strikes = self
            .world
            .query::<&EnemyMemory>()
            .iter()
            .map(|(_entity, memory)| memory.strikes)
            .sum();
        summary
    }
}
