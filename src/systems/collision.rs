use glam::Vec2;
use hecs::World;

use crate::components::{Actor, Body, Contacts, Sensors};
use crate::config::SensorConfig;
use crate::engine::geometry::{Aabb, Geometry, Layer};

/// Nudge past a hit so a follow-up ray starts on the far side of the surface.
const SENSOR_SKIN: f32 = 0.015;

/// Refresh every actor's contact flags from its sensor layout.
pub fn contact_system(world: &mut World, geometry: &dyn Geometry) {
    for (_entity, (actor, sensors)) in world.query_mut::<(&mut Actor, &Sensors)>() {
        actor.contacts = sense_contacts(&actor.body, &sensors.0, geometry);
    }
}

pub fn sense_contacts(body: &Body, sensors: &SensorConfig, geometry: &dyn Geometry) -> Contacts {
    let forward = body.forward();
    let wall_origin = body.local_point(sensors.wall_check);
    let ledge_origin = body.local_point(sensors.ledge_check);
    let reach = sensors.wall_check_distance;

    let ground = sensor_box(body.local_point(sensors.ground_check), sensors.ground_check_radius);
    let ceiling = sensor_box(body.local_point(sensors.ceiling_check), sensors.ceiling_check_radius);

    Contacts {
        grounded: geometry.overlap(ground, Layer::Ground),
        wall_front: geometry.raycast(wall_origin, forward, reach, Layer::Ground).is_some(),
        wall_back: geometry.raycast(wall_origin, -forward, reach, Layer::Ground).is_some(),
        ledge: geometry.raycast(ledge_origin, forward, reach, Layer::Ground).is_some(),
        ceiling: geometry.overlap(ceiling, Layer::Ground),
        floor_ahead: geometry
            .raycast(
                body.local_point(sensors.floor_ahead_check),
                Vec2::NEG_Y,
                sensors.floor_ahead_distance,
                Layer::Ground,
            )
            .is_some(),
    }
}

/// Top corner of the ledge in front of the wall sensor.
///
/// Cast forward to find the wall face, then down from just past it at ledge
/// height to find the top surface.
pub fn corner_position(body: &Body, sensors: &SensorConfig, geometry: &dyn Geometry) -> Option<Vec2> {
    let facing = body.facing.sign();
    let wall_origin = body.local_point(sensors.wall_check);
    let ledge_origin = body.local_point(sensors.ledge_check);

    let x_dist = geometry
        .raycast(wall_origin, body.forward(), sensors.wall_check_distance, Layer::Ground)?
        .distance;
    let down_origin = ledge_origin + Vec2::new((x_dist + SENSOR_SKIN) * facing, 0.0);
    let drop = ledge_origin.y - wall_origin.y + SENSOR_SKIN;
    let y_dist = geometry
        .raycast(down_origin, Vec2::NEG_Y, drop, Layer::Ground)?
        .distance;

    Some(Vec2::new(wall_origin.x + x_dist * facing, ledge_origin.y - y_dist))
}

/// Where the target was seen along the eye line, if within `distance`.
pub fn target_within(body: &Body, sensors: &SensorConfig, geometry: &dyn Geometry, distance: f32) -> Option<Vec2> {
    geometry
        .raycast(body.local_point(sensors.eye), body.forward(), distance, Layer::Target)
        .map(|hit| hit.point)
}

fn sensor_box(center: Vec2, radius: f32) -> Aabb {
    Aabb::from_center(center, Vec2::splat(radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::raycast::Level;

    fn player_body(position: Vec2) -> Body {
        Body::new(position, Vec2::new(0.6, 1.6))
    }

    #[test]
    fn standing_on_floor_is_grounded() {
        let level = Level::new(vec![Aabb::new(Vec2::new(-5.0, -1.0), Vec2::new(5.0, 0.0))]);
        let contacts = sense_contacts(&player_body(Vec2::new(0.0, 0.8)), &SensorConfig::default(), &level);

        assert!(contacts.grounded);
        assert!(contacts.floor_ahead);
        assert!(!contacts.wall_front);
        assert!(!contacts.ceiling);
    }

    #[test]
    fn wall_below_ledge_height_reports_missing_ledge() {
        let level = Level::new(vec![Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(3.0, 2.0))]);
        let contacts = sense_contacts(&player_body(Vec2::new(0.7, 1.6)), &SensorConfig::default(), &level);

        assert!(contacts.wall_front);
        assert!(!contacts.ledge);
        assert!(!contacts.wall_back);
    }

    #[test]
    fn corner_found_mirrored_when_facing_left() {
        let level = Level::new(vec![Aabb::new(Vec2::new(-3.0, 0.0), Vec2::new(-1.0, 2.0))]);
        let mut body = player_body(Vec2::new(-0.7, 1.6));
        body.flip();

        let corner = corner_position(&body, &SensorConfig::default(), &level);

        let corner = corner.unwrap();
        assert!((corner - Vec2::new(-1.0, 2.0)).length() < 1e-3);
    }

    #[test]
    fn no_corner_without_a_wall() {
        let level = Level::default();
        assert!(corner_position(&player_body(Vec2::ZERO), &SensorConfig::default(), &level).is_none());
    }
}
