use hecs::World;

use crate::components::{Actor, ClipPlayer, Moveset, Player, PlayerFsm};
use crate::config::PlayerConfig;
use crate::engine::geometry::Aabb;
use crate::engine::input::RawInput;
use crate::states::player::PlayerCx;
use crate::systems::animation::advance_clip;
use crate::systems::raycast::Level;

/// Refresh input, then run the active state's frame update. Runs once per
/// frame, before any physics steps.
pub fn player_logic_system(world: &mut World, raw: &RawInput, level: &Level, config: &PlayerConfig, now: f32) {
    for (_entity, (_player, actor, moves, fsm)) in
        world.query_mut::<(&Player, &mut Actor, &mut Moveset, &mut PlayerFsm)>()
    {
        actor.input.refresh(raw, now, config.jump_input_hold_time);
        let mut cx = PlayerCx {
            actor,
            moves,
            config,
            geometry: level,
            now,
        };
        fsm.logic_update(&mut cx);
    }
}

/// Runs after each fixed step, once contacts are fresh.
pub fn player_physics_system(world: &mut World, level: &Level, config: &PlayerConfig, now: f32) {
    for (_entity, (_player, actor, moves, fsm)) in
        world.query_mut::<(&Player, &mut Actor, &mut Moveset, &mut PlayerFsm)>()
    {
        let mut cx = PlayerCx {
            actor,
            moves,
            config,
            geometry: level,
            now,
        };
        fsm.physics_update(&mut cx);
    }
}

/// Deliver clip keyframe and completion callbacks to the active state.
pub fn player_animation_system(world: &mut World, level: &Level, config: &PlayerConfig, now: f32, dt: f32) {
    for (_entity, (_player, actor, moves, fsm, clip)) in
        world.query_mut::<(&Player, &mut Actor, &mut Moveset, &mut PlayerFsm, &mut ClipPlayer)>()
    {
        let events = advance_clip(clip, &actor.anim, fsm.entered_at(), dt);
        let mut cx = PlayerCx {
            actor,
            moves,
            config,
            geometry: level,
            now,
        };
        if events.keyframe {
            fsm.animation_trigger(&mut cx);
        }
        if events.finished {
            fsm.animation_finish_trigger(&mut cx);
        }
    }
}

/// Collision bounds of the player, the target of every AI sensor.
pub fn player_bounds(world: &World) -> Option<Aabb> {
    world
        .query::<(&Player, &Actor)>()
        .iter()
        .next()
        .map(|(_entity, (_player, actor))| actor.body.bounds())
}
