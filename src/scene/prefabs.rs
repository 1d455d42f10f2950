use glam::Vec2;
use hecs::{Entity, World};

use crate::components::*;
use crate::config::{EnemyConfig, PlayerConfig};
use crate::engine::geometry::Aabb;
use crate::fsm::{FsmError, StateMachine};
use crate::states::enemy::{EnemyCx, EnemyStateId, EnemyStates};
use crate::states::player::{PlayerCx, PlayerStateId, PlayerStates};
use crate::systems::collision::sense_contacts;
use crate::systems::raycast::{Level, SceneGeometry};

/// Static block spanning `min..max`.
pub fn solid(min: Vec2, max: Vec2) -> Aabb {
    Aabb::new(min, max)
}

/// Player standing with its feet at `feet`, already in its start state.
pub fn spawn_player(world: &mut World, level: &Level, config: &PlayerConfig, feet: Vec2) -> Result<Entity, FsmError> {
    let size = Vec2::new(config.collider_width, config.stand_collider_height);
    let body = Body::new(feet + Vec2::new(0.0, size.y * 0.5), size);
    let mut actor = Actor::new(body);
    actor.contacts = sense_contacts(&actor.body, &config.sensors, level);
    let mut moves = Moveset::new(config.amount_of_jumps);

    let fsm: PlayerFsm = {
        let mut cx = PlayerCx {
            actor: &mut actor,
            moves: &mut moves,
            config,
            geometry: level,
            now: 0.0,
        };
        StateMachine::initialize(PlayerStates::new(), PlayerStateId::Idle, &mut cx)?
    };

    Ok(world.spawn((
        Player,
        actor,
        moves,
        fsm,
        ClipPlayer::default(),
        Sensors(config.sensors),
    )))
}

/// AI actor with its own seeded generator, starting in idle.
pub fn spawn_enemy(
    world: &mut World,
    level: &Level,
    config: &EnemyConfig,
    feet: Vec2,
    facing: Facing,
    seed: u64,
) -> Result<Entity, FsmError> {
    let size = config.collider_size;
    let mut body = Body::new(feet + Vec2::new(0.0, size.y * 0.5), size);
    body.facing = facing;
    let mut actor = Actor::new(body);
    actor.contacts = sense_contacts(&actor.body, &config.sensors, level);
    let mut memory = EnemyMemory::new(seed);

    let geometry = SceneGeometry { level, target: None };
    let fsm: EnemyFsm = {
        let mut cx = EnemyCx {
            actor: &mut actor,
            memory: &mut memory,
            config,
            geometry: &geometry,
            now: 0.0,
        };
        StateMachine::initialize(EnemyStates::new(), EnemyStateId::Idle, &mut cx)?
    };

    Ok(world.spawn((
        Enemy,
        actor,
        memory,
        fsm,
        ClipPlayer::default(),
        Sensors(config.sensors),
    )))
}
