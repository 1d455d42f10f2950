use glam::Vec2;

use super::{PlayerCx, PlayerStateId};
use crate::engine::geometry::Layer;
use crate::fsm::{State, Transition, Visit};
use crate::systems::collision::corner_position;

/// Sensor nudge past the corner so the ceiling ray starts clear of the ledge.
const CORNER_NUDGE: f32 = 0.015;

/// Hangs from a detected ledge and, on forward input, climbs over it.
///
/// The body is locked to the hang point until the climb clip completes.
/// Leaving mid-climb snaps the body to the top of the ledge.
#[derive(Debug, Default)]
pub struct LedgeClimbState {
    detected_at: Vec2,
    corner: Vec2,
    start: Vec2,
    stop: Vec2,
    is_hanging: bool,
    is_climbing: bool,
    is_touching_ceiling: bool,
}

impl LedgeClimbState {
    pub fn is_hanging(&self) -> bool {
        self.is_hanging
    }

    pub fn is_climbing(&self) -> bool {
        self.is_climbing
    }

    pub fn corner(&self) -> Vec2 {
        self.corner
    }

    pub fn start_position(&self) -> Vec2 {
        self.start
    }

    pub fn stop_position(&self) -> Vec2 {
        self.stop
    }

    /// Is there standing room above the ledge? Decides crouched or upright.
    fn check_for_space(&mut self, cx: &mut PlayerCx<'_>) {
        let facing = cx.actor.body.facing.sign();
        let origin = self.corner + Vec2::new(facing * CORNER_NUDGE, CORNER_NUDGE);
        self.is_touching_ceiling = cx
            .geometry
            .raycast(origin, Vec2::Y, cx.config.stand_collider_height, Layer::Ground)
            .is_some();
        cx.actor.anim.set_bool("isTouchingCeiling", self.is_touching_ceiling);
    }

    fn lock(&self, cx: &mut PlayerCx<'_>) {
        cx.actor.body.set_velocity_zero();
        cx.actor.body.position = self.start;
    }
}

impl<'a> State<PlayerCx<'a>> for LedgeClimbState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::LedgeClimb
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        self.is_hanging = false;
        self.is_climbing = false;
        self.is_touching_ceiling = false;

        let body = &mut cx.actor.body;
        body.set_velocity_zero();
        body.gravity_scale = 0.0;
        self.detected_at = cx.moves.handoff.ledge_detected_at.take().unwrap_or(body.position);
        body.position = self.detected_at;

        self.corner = match corner_position(body, &cx.config.sensors, cx.geometry) {
            Some(corner) => corner,
            None => {
                tracing::warn!(at = ?self.detected_at, "no ledge corner found; hanging in place");
                self.detected_at
            }
        };

        let facing = body.facing.sign();
        let start = cx.config.start_offset;
        let stop = cx.config.stop_offset;
        self.start = Vec2::new(self.corner.x - facing * start.x, self.corner.y - start.y);
        self.stop = Vec2::new(self.corner.x + facing * stop.x, self.corner.y + stop.y);
        body.position = self.start;
    }

    fn exit(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        self.is_hanging = false;
        cx.actor.body.gravity_scale = 1.0;
        if self.is_climbing {
            cx.actor.body.position = self.stop;
            self.is_climbing = false;
        }
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, visit: &Visit) -> Transition<PlayerStateId> {
        if visit.animation_finished {
            return if self.is_touching_ceiling {
                Transition::To(PlayerStateId::CrouchIdle)
            } else {
                Transition::To(PlayerStateId::Idle)
            };
        }

        self.lock(cx);
        let input = cx.actor.input;
        let facing = cx.actor.body.facing;
        let idle_hang = self.is_hanging && !self.is_climbing;

        if input.x == facing.as_input() && idle_hang {
            self.check_for_space(cx);
            self.is_climbing = true;
            cx.actor.anim.set_bool("climbLedge", true);
            Transition::Stay
        } else if input.y == -1 && idle_hang {
            Transition::To(PlayerStateId::InAir)
        } else if input.jump && idle_hang {
            cx.moves.handoff.determine_wall_jump_direction(true, facing.sign());
            Transition::To(PlayerStateId::WallJump)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut PlayerCx<'a>, visit: &Visit) -> Transition<PlayerStateId> {
        if !visit.animation_finished {
            self.lock(cx);
        }
        Transition::Stay
    }

    fn animation_trigger(&mut self, _cx: &mut PlayerCx<'a>) {
        self.is_hanging = true;
    }

    fn animation_finish_trigger(&mut self, cx: &mut PlayerCx<'a>) {
        cx.actor.anim.set_bool("climbLedge", false);
    }
}

#[cfg(test)]
mod tests {
    use super::super::rig::Rig;
    use super::*;
    use crate::engine::geometry::Aabb;
    use crate::systems::raycast::Level;

    /// A block whose top-left corner sits at (1, 2); player hangs on its left face.
    fn ledge_rig(ceiling: bool) -> Rig {
        let mut solids = vec![Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(3.0, 2.0))];
        if ceiling {
            solids.push(Aabb::new(Vec2::new(1.0, 3.0), Vec2::new(3.0, 3.5)));
        }
        let mut rig = Rig::airborne();
        rig.level = Level::new(solids);
        rig.actor.body.position = Vec2::new(0.7, 1.6);
        rig.moves.handoff.ledge_detected_at = Some(rig.actor.body.position);
        rig
    }

    #[test]
    fn snaps_to_start_offset_from_corner() {
        let mut rig = ledge_rig(false);
        let fsm = rig.start(PlayerStateId::LedgeClimb);

        let state = &fsm.registry().ledge_climb;
        assert!((state.corner() - Vec2::new(1.0, 2.0)).length() < 1e-3);
        let expected = Vec2::new(1.0 - rig.config.start_offset.x, 2.0 - rig.config.start_offset.y);
        assert!((rig.actor.body.position - expected).length() < 1e-3);
        assert!(rig.moves.handoff.ledge_detected_at.is_none());
    }

    #[test]
    fn ignores_input_until_hanging() {
        let mut rig = ledge_rig(false);
        let mut fsm = rig.start(PlayerStateId::LedgeClimb);

        rig.actor.input.y = -1;
        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::LedgeClimb);

        rig.keyframe(&mut fsm);
        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::InAir);
    }

    #[test]
    fn climb_without_ceiling_ends_standing_at_stop() {
        let mut rig = ledge_rig(false);
        let mut fsm = rig.start(PlayerStateId::LedgeClimb);
        let stop = fsm.registry().ledge_climb.stop_position();

        rig.keyframe(&mut fsm);
        rig.actor.input.x = 1;
        rig.logic(&mut fsm);
        assert!(fsm.registry().ledge_climb.is_climbing());
        assert!(rig.actor.anim.get_bool("climbLedge"));
        assert!(!rig.actor.anim.get_bool("isTouchingCeiling"));

        rig.finish_clip(&mut fsm);
        assert!(!rig.actor.anim.get_bool("climbLedge"));
        rig.logic(&mut fsm);

        assert_eq!(fsm.current(), PlayerStateId::Idle);
        assert_eq!(rig.actor.body.position, stop);
        assert_eq!(rig.actor.body.gravity_scale, 1.0);
    }

    #[test]
    fn climb_under_ceiling_ends_crouched() {
        let mut rig = ledge_rig(true);
        let mut fsm = rig.start(PlayerStateId::LedgeClimb);

        rig.keyframe(&mut fsm);
        rig.actor.input.x = 1;
        rig.logic(&mut fsm);
        assert!(rig.actor.anim.get_bool("isTouchingCeiling"));

        rig.finish_clip(&mut fsm);
        rig.logic(&mut fsm);

        assert_eq!(fsm.current(), PlayerStateId::CrouchIdle);
    }

    #[test]
    fn jump_from_hang_pushes_away_from_wall() {
        let mut rig = ledge_rig(false);
        let mut fsm = rig.start(PlayerStateId::LedgeClimb);

        rig.keyframe(&mut fsm);
        rig.actor.input.jump = true;
        rig.logic(&mut fsm);

        assert_eq!(fsm.current(), PlayerStateId::WallJump);
        assert!(rig.actor.body.velocity.x < 0.0);
    }
}
