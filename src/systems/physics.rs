use glam::Vec2;
use hecs::World;

use crate::components::{Actor, Body};
use crate::systems::raycast::Level;

pub const PHYSICS_DT: f32 = 1.0 / 50.0;
pub const GRAVITY: Vec2 = Vec2::new(0.0, -40.0);

/// Resolved bodies are left this far clear of the surface they hit.
const CONTACT_SKIN: f32 = 1e-4;

/// One fixed step for every actor: integrate, then resolve against the level.
pub fn physics_step(world: &mut World, level: &Level) {
    for (_entity, actor) in world.query_mut::<&mut Actor>() {
        integrate(&mut actor.body, level, PHYSICS_DT);
    }
}

/// Semi-implicit Euler: velocity first, then position, one axis at a time so
/// a wall contact never eats vertical motion.
pub fn integrate(body: &mut Body, level: &Level, dt: f32) {
    body.velocity += GRAVITY * body.gravity_scale * dt;
    move_axis(body, level, Vec2::new(body.velocity.x * dt, 0.0));
    move_axis(body, level, Vec2::new(0.0, body.velocity.y * dt));
}

fn move_axis(body: &mut Body, level: &Level, delta: Vec2) {
    if delta == Vec2::ZERO {
        return;
    }
    body.position += delta;

    for solid in level.solids() {
        let bounds = body.bounds();
        if !bounds.overlaps(solid) {
            continue;
        }
        if delta.x > 0.0 {
            body.position.x -= bounds.max.x - solid.min.x + CONTACT_SKIN;
            body.velocity.x = 0.0;
        } else if delta.x < 0.0 {
            body.position.x += solid.max.x - bounds.min.x + CONTACT_SKIN;
            body.velocity.x = 0.0;
        } else if delta.y > 0.0 {
            body.position.y -= bounds.max.y - solid.min.y + CONTACT_SKIN;
            body.velocity.y = 0.0;
        } else {
            body.position.y += solid.max.y - bounds.min.y + CONTACT_SKIN;
            body.velocity.y = 0.0;
        }
    }
}
