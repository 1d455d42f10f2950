//! Grounded family: idle, walking, landing, and crouching.

use super::{PlayerCx, PlayerStateId};
use crate::components::PlayerHandoff;
use crate::fsm::{State, Transition, Visit};

/// Refill jump charges and re-arm the dash whenever the feet touch down.
/// Grounded states take no handoff, so anything still pending is dropped.
fn enter_grounded(cx: &mut PlayerCx<'_>) {
    cx.moves.jumps_left = cx.config.amount_of_jumps;
    cx.moves.dash_ready = true;
    cx.moves.handoff = PlayerHandoff::default();
}

/// Checks every grounded state runs before its own, highest priority first.
fn grounded_checks(cx: &mut PlayerCx<'_>) -> Option<PlayerStateId> {
    let contacts = cx.actor.contacts;
    let input = cx.actor.input;

    if input.attack {
        Some(PlayerStateId::Attack)
    } else if input.jump && cx.moves.can_jump() && !contacts.ceiling {
        Some(PlayerStateId::Jump)
    } else if !contacts.grounded {
        left_ground(cx)
    } else if contacts.wall_front && input.grab && contacts.ledge {
        Some(PlayerStateId::WallGrab)
    } else if input.dash && cx.moves.can_dash(cx.now, cx.config.dash_cooldown) && !contacts.ceiling {
        Some(PlayerStateId::Dash)
    } else {
        None
    }
}

/// Geometry half of the grounded checks, evaluated after each physics step.
fn grounded_physics(cx: &mut PlayerCx<'_>) -> Transition<PlayerStateId> {
    if cx.actor.contacts.grounded {
        Transition::Stay
    } else {
        left_ground(cx).into()
    }
}

fn left_ground(cx: &mut PlayerCx<'_>) -> Option<PlayerStateId> {
    cx.moves.handoff.coyote = true;
    Some(PlayerStateId::InAir)
}

#[derive(Debug, Default)]
pub struct IdleState;

impl<'a> State<PlayerCx<'a>> for IdleState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::Idle
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        enter_grounded(cx);
        cx.actor.body.set_velocity_x(0.0);
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        if let Some(next) = grounded_checks(cx) {
            return Transition::To(next);
        }
        let input = cx.actor.input;
        if input.x != 0 {
            Transition::To(PlayerStateId::Move)
        } else if input.y == -1 {
            Transition::To(PlayerStateId::CrouchIdle)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        grounded_physics(cx)
    }
}

#[derive(Debug, Default)]
pub struct MoveState;

impl<'a> State<PlayerCx<'a>> for MoveState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::Move
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        enter_grounded(cx);
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        if let Some(next) = grounded_checks(cx) {
            return Transition::To(next);
        }
        let input = cx.actor.input;
        let body = &mut cx.actor.body;
        body.check_if_should_flip(input.x);
        body.set_velocity_x(cx.config.movement_velocity * input.x as f32);

        if input.x == 0 {
            Transition::To(PlayerStateId::Idle)
        } else if input.y == -1 {
            Transition::To(PlayerStateId::CrouchMove)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        grounded_physics(cx)
    }
}

/// Touchdown; plays out the landing clip unless the player starts moving.
#[derive(Debug, Default)]
pub struct LandState;

impl<'a> State<PlayerCx<'a>> for LandState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::Land
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        enter_grounded(cx);
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, visit: &Visit) -> Transition<PlayerStateId> {
        if let Some(next) = grounded_checks(cx) {
            return Transition::To(next);
        }
        if cx.actor.input.x != 0 {
            Transition::To(PlayerStateId::Move)
        } else if visit.animation_finished {
            Transition::To(PlayerStateId::Idle)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        grounded_physics(cx)
    }
}

#[derive(Debug, Default)]
pub struct CrouchIdleState;

impl<'a> State<PlayerCx<'a>> for CrouchIdleState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::CrouchIdle
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        enter_grounded(cx);
        cx.actor.body.set_velocity_zero();
        cx.actor.body.set_collider_height(cx.config.crouch_collider_height);
    }

    fn exit(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        cx.actor.body.set_collider_height(cx.config.stand_collider_height);
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        if let Some(next) = grounded_checks(cx) {
            return Transition::To(next);
        }
        let input = cx.actor.input;
        if input.x != 0 {
            Transition::To(PlayerStateId::CrouchMove)
        } else if input.y != -1 && !cx.actor.contacts.ceiling {
            Transition::To(PlayerStateId::Idle)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        grounded_physics(cx)
    }
}

#[derive(Debug, Default)]
pub struct CrouchMoveState;

impl<'a> State<PlayerCx<'a>> for CrouchMoveState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::CrouchMove
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        enter_grounded(cx);
        cx.actor.body.set_collider_height(cx.config.crouch_collider_height);
    }

    fn exit(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        cx.actor.body.set_collider_height(cx.config.stand_collider_height);
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        if let Some(next) = grounded_checks(cx) {
            return Transition::To(next);
        }
        let input = cx.actor.input;
        let body = &mut cx.actor.body;
        body.set_velocity_x(cx.config.crouch_movement_velocity * body.facing.sign());
        body.check_if_should_flip(input.x);

        if input.x == 0 {
            Transition::To(PlayerStateId::CrouchIdle)
        } else if input.y != -1 && !cx.actor.contacts.ceiling {
            Transition::To(PlayerStateId::Move)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        grounded_physics(cx)
    }
}
