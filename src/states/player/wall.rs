//! Wall family: sliding down, gripping, and climbing a wall.

use glam::Vec2;

use super::{PlayerCx, PlayerStateId};
use crate::fsm::{State, Transition, Visit};

/// Hand the climb the position the ledge was seen from. Written only
/// together with the transition that consumes it.
pub(super) fn climb_ledge(cx: &mut PlayerCx<'_>) -> PlayerStateId {
    cx.moves.handoff.ledge_detected_at = Some(cx.actor.body.position);
    PlayerStateId::LedgeClimb
}

/// Checks every wall state runs before its own, highest priority first.
fn wall_checks(cx: &mut PlayerCx<'_>) -> Option<PlayerStateId> {
    let contacts = cx.actor.contacts;
    let input = cx.actor.input;
    let facing = cx.actor.body.facing;

    if input.jump {
        cx.moves
            .handoff
            .determine_wall_jump_direction(contacts.wall_front, facing.sign());
        Some(PlayerStateId::WallJump)
    } else if contacts.grounded && !input.grab {
        Some(PlayerStateId::Idle)
    } else if !contacts.wall_front || (input.x != facing.as_input() && !input.grab) {
        Some(PlayerStateId::InAir)
    } else if contacts.wall_front && !contacts.ledge {
        Some(climb_ledge(cx))
    } else {
        None
    }
}

/// Geometry half of the wall checks, evaluated after each physics step.
fn wall_physics(cx: &mut PlayerCx<'_>) -> Option<PlayerStateId> {
    let contacts = cx.actor.contacts;
    if contacts.grounded && !cx.actor.input.grab {
        Some(PlayerStateId::Idle)
    } else if !contacts.wall_front {
        Some(PlayerStateId::InAir)
    } else if !contacts.ledge {
        Some(climb_ledge(cx))
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct WallSlideState;

impl<'a> State<PlayerCx<'a>> for WallSlideState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::WallSlide
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        if let Some(next) = wall_checks(cx) {
            return Transition::To(next);
        }
        cx.actor.body.set_velocity_y(-cx.config.wall_slide_velocity);

        let input = cx.actor.input;
        if input.grab && input.y == 0 {
            Transition::To(PlayerStateId::WallGrab)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        wall_physics(cx).into()
    }
}

/// Hangs motionless on the wall. The captured position is re-asserted on
/// every update so gravity never drags the body down.
#[derive(Debug, Default)]
pub struct WallGrabState {
    hold_position: Vec2,
}

impl WallGrabState {
    pub fn hold_position(&self) -> Vec2 {
        self.hold_position
    }

    fn hold(&self, cx: &mut PlayerCx<'_>) {
        cx.actor.body.position = self.hold_position;
        cx.actor.body.set_velocity_zero();
    }
}

impl<'a> State<PlayerCx<'a>> for WallGrabState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::WallGrab
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        self.hold_position = cx.actor.body.position;
        self.hold(cx);
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        if let Some(next) = wall_checks(cx) {
            return Transition::To(next);
        }
        self.hold(cx);

        let input = cx.actor.input;
        if input.y > 0 {
            Transition::To(PlayerStateId::WallClimb)
        } else if input.y < 0 || !input.grab {
            Transition::To(PlayerStateId::WallSlide)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        if let Some(next) = wall_physics(cx) {
            return Transition::To(next);
        }
        self.hold(cx);
        Transition::Stay
    }
}

#[derive(Debug, Default)]
pub struct WallClimbState;

impl<'a> State<PlayerCx<'a>> for WallClimbState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::WallClimb
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        if let Some(next) = wall_checks(cx) {
            return Transition::To(next);
        }
        cx.actor.body.set_velocity_y(cx.config.wall_climb_velocity);

        if cx.actor.input.y != 1 {
            Transition::To(PlayerStateId::WallGrab)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        wall_physics(cx).into()
    }
}

#[cfg(test)]
mod tests {
    use super::super::rig::Rig;
    use super::*;

    fn on_wall() -> Rig {
        let mut rig = Rig::airborne();
        rig.actor.contacts.wall_front = true;
        rig.actor.contacts.ledge = true;
        rig.actor.input.grab = true;
        rig.actor.input.x = 1;
        rig
    }

    #[test]
    fn grab_pins_position_through_gravity() {
        let mut rig = on_wall();
        rig.actor.body.position = Vec2::new(2.0, 3.0);
        let mut fsm = rig.start(PlayerStateId::WallGrab);

        for _ in 0..5 {
            rig.actor.body.velocity.y -= 1.0;
            rig.actor.body.position.y -= 0.1;
            rig.physics(&mut fsm);
            assert_eq!(rig.actor.body.position, Vec2::new(2.0, 3.0));
        }
        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::WallGrab);
        assert_eq!(rig.actor.body.velocity, Vec2::ZERO);
    }

    #[test]
    fn jump_outranks_grab_specific_checks() {
        let mut rig = on_wall();
        let mut fsm = rig.start(PlayerStateId::WallGrab);

        rig.actor.input.jump = true;
        rig.actor.input.y = 1;
        rig.logic(&mut fsm);

        assert_eq!(fsm.current(), PlayerStateId::WallJump);
    }

    #[test]
    fn grab_climbs_and_slides_on_vertical_input() {
        let mut rig = on_wall();
        let mut fsm = rig.start(PlayerStateId::WallGrab);

        rig.actor.input.y = 1;
        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::WallClimb);

        rig.logic(&mut fsm);
        assert_eq!(rig.actor.body.velocity.y, rig.config.wall_climb_velocity);

        rig.actor.input.y = 0;
        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::WallGrab);

        rig.actor.input.grab = false;
        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::WallSlide);
    }

    #[test]
    fn letting_go_away_from_wall_falls() {
        let mut rig = on_wall();
        rig.actor.input.grab = false;
        let mut fsm = rig.start(PlayerStateId::WallSlide);

        rig.actor.input.x = 0;
        rig.logic(&mut fsm);

        assert_eq!(fsm.current(), PlayerStateId::InAir);
    }

    #[test]
    fn ledge_seen_while_landing_is_not_replayed_later() {
        let mut rig = on_wall();
        rig.actor.input.grab = false;
        rig.actor.body.position = Vec2::new(2.0, 3.0);
        let mut fsm = rig.start(PlayerStateId::WallSlide);

        rig.actor.contacts.grounded = true;
        rig.actor.contacts.ledge = false;
        rig.physics(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::Idle);
        assert!(rig.moves.handoff.ledge_detected_at.is_none());

        // A different wall, far away, with open air above it.
        rig.actor.body.position = Vec2::new(50.0, 20.0);
        rig.actor.contacts.grounded = false;
        rig.change(&mut fsm, PlayerStateId::InAir);
        rig.physics(&mut fsm);

        assert_eq!(fsm.current(), PlayerStateId::LedgeClimb);
        assert!(rig.actor.body.position.x > 40.0, "snapped back to {}", rig.actor.body.position);
    }

    #[test]
    fn climbing_past_the_top_hands_off_to_ledge() {
        let mut rig = on_wall();
        let mut fsm = rig.start(PlayerStateId::WallClimb);

        rig.actor.contacts.ledge = false;
        rig.physics(&mut fsm);

        assert_eq!(fsm.current(), PlayerStateId::LedgeClimb);
    }
}
