use hecs::World;

use crate::components::{Actor, ClipPlayer, Enemy, EnemyFsm, EnemyMemory};
use crate::config::EnemyConfig;
use crate::states::enemy::EnemyCx;
use crate::systems::animation::advance_clip;
use crate::systems::player::player_bounds;
use crate::systems::raycast::{Level, SceneGeometry};

fn scene_geometry<'a>(world: &World, level: &'a Level) -> SceneGeometry<'a> {
    SceneGeometry {
        level,
        target: player_bounds(world),
    }
}

pub fn enemy_logic_system(world: &mut World, level: &Level, config: &EnemyConfig, now: f32) {
    let geometry = scene_geometry(world, level);
    for (_entity, (_enemy, actor, memory, fsm)) in
        world.query_mut::<(&Enemy, &mut Actor, &mut EnemyMemory, &mut EnemyFsm)>()
    {
        let mut cx = EnemyCx {
            actor,
            memory,
            config,
            geometry: &geometry,
            now,
        };
        fsm.logic_update(&mut cx);
    }
}

/// Runs after each fixed step; target sensors see the player where physics
/// just left it.
pub fn enemy_physics_system(world: &mut World, level: &Level, config: &EnemyConfig, now: f32) {
    let geometry = scene_geometry(world, level);
    for (_entity, (_enemy, actor, memory, fsm)) in
        world.query_mut::<(&Enemy, &mut Actor, &mut EnemyMemory, &mut EnemyFsm)>()
    {
        let mut cx = EnemyCx {
            actor,
            memory,
            config,
            geometry: &geometry,
            now,
        };
        fsm.physics_update(&mut cx);
    }
}

pub fn enemy_animation_system(world: &mut World, level: &Level, config: &EnemyConfig, now: f32, dt: f32) {
    let geometry = scene_geometry(world, level);
    for (_entity, (_enemy, actor, memory, fsm, clip)) in
        world.query_mut::<(&Enemy, &mut Actor, &mut EnemyMemory, &mut EnemyFsm, &mut ClipPlayer)>()
    {
        let events = advance_clip(clip, &actor.anim, fsm.entered_at(), dt);
        let mut cx = EnemyCx {
            actor,
            memory,
            config,
            geometry: &geometry,
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
