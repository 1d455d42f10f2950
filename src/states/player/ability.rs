//! Abilities: short committed actions that hand control back once done.

use glam::Vec2;

use super::{PlayerCx, PlayerStateId};
use crate::fsm::{State, Transition, Visit};

/// Where an ability returns to once it reports itself done.
fn ability_done(cx: &PlayerCx<'_>) -> PlayerStateId {
    if cx.actor.contacts.grounded && cx.actor.body.velocity.y < 0.01 {
        PlayerStateId::Idle
    } else {
        PlayerStateId::InAir
    }
}

fn finish_if(done: bool, cx: &PlayerCx<'_>) -> Transition<PlayerStateId> {
    if done {
        Transition::To(ability_done(cx))
    } else {
        Transition::Stay
    }
}

#[derive(Debug, Default)]
pub struct JumpState;

impl<'a> State<PlayerCx<'a>> for JumpState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::Jump
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        cx.actor.input.use_jump();
        cx.actor.body.set_velocity_y(cx.config.jump_velocity);
        cx.moves.jumps_left = cx.moves.jumps_left.saturating_sub(1);
        cx.moves.handoff.jumping = true;
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        finish_if(true, cx)
    }
}

#[derive(Debug, Default)]
pub struct WallJumpState {
    direction: f32,
}

impl<'a> State<PlayerCx<'a>> for WallJumpState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::WallJump
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        let body = &mut cx.actor.body;
        cx.actor.input.use_jump();
        cx.moves.jumps_left = cx.config.amount_of_jumps;
        self.direction = cx
            .moves
            .handoff
            .wall_jump_direction
            .take()
            .unwrap_or(-body.facing.sign());
        body.set_velocity_angled(cx.config.wall_jump_velocity, cx.config.wall_jump_angle, self.direction);
        body.check_if_should_flip(self.direction as i32);
        cx.moves.jumps_left = cx.moves.jumps_left.saturating_sub(1);
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, visit: &Visit) -> Transition<PlayerStateId> {
        let velocity = cx.actor.body.velocity;
        cx.actor.anim.set_float("yVelocity", velocity.y);
        cx.actor.anim.set_float("xVelocity", velocity.x.abs());
        finish_if(visit.elapsed(cx.now) >= cx.config.wall_jump_time, cx)
    }
}

/// Burst along the held direction (or facing) with gravity suspended.
#[derive(Debug, Default)]
pub struct DashState {
    direction: Vec2,
    done: bool,
}

impl DashState {
    pub fn direction(&self) -> Vec2 {
        self.direction
    }
}

impl<'a> State<PlayerCx<'a>> for DashState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::Dash
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        self.done = false;
        cx.moves.dash_ready = false;
        cx.actor.input.use_dash();

        let input = cx.actor.input;
        let body = &mut cx.actor.body;
        let held = Vec2::new(input.x as f32, input.y as f32);
        self.direction = if held == Vec2::ZERO {
            body.forward()
        } else {
            held.normalize()
        };
        body.check_if_should_flip(input.x);
        body.gravity_scale = 0.0;
    }

    fn exit(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        let body = &mut cx.actor.body;
        body.gravity_scale = 1.0;
        if body.velocity.y > 0.0 {
            body.set_velocity_y(body.velocity.y * cx.config.dash_end_y_multiplier);
        }
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, visit: &Visit) -> Transition<PlayerStateId> {
        if !self.done {
            if visit.elapsed(cx.now) >= cx.config.dash_time {
                self.done = true;
                cx.moves.last_dash_at = Some(cx.now);
            } else {
                cx.actor.body.velocity = self.direction * cx.config.dash_velocity;
            }
        }
        finish_if(self.done, cx)
    }
}

#[derive(Debug, Default)]
pub struct AttackState;

impl<'a> State<PlayerCx<'a>> for AttackState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::Attack
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        if cx.actor.contacts.grounded {
            cx.actor.body.set_velocity_x(0.0);
        }
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, visit: &Visit) -> Transition<PlayerStateId> {
        finish_if(visit.animation_finished, cx)
    }
}

#[cfg(test)]
mod tests {
    use super::super::rig::Rig;
    use super::*;

    #[test]
    fn jump_spends_a_charge_and_goes_airborne() {
        let mut rig = Rig::grounded();
        let mut fsm = rig.start(PlayerStateId::Idle);

        rig.actor.input.jump = true;
        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::Jump);
        assert_eq!(rig.actor.body.velocity.y, rig.config.jump_velocity);
        assert_eq!(rig.moves.jumps_left, rig.config.amount_of_jumps - 1);
        assert!(!rig.actor.input.jump);

        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::InAir);
        assert!(!fsm.registry().in_air.has_coyote_time());
    }

    #[test]
    fn wall_jump_holds_control_for_its_duration() {
        let mut rig = Rig::airborne();
        rig.moves.handoff.wall_jump_direction = Some(-1.0);
        let mut fsm = rig.start(PlayerStateId::WallJump);
        assert!(rig.actor.body.velocity.x < 0.0);
        assert!(rig.actor.body.velocity.y > 0.0);

        rig.now = rig.config.wall_jump_time * 0.5;
        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::WallJump);

        rig.now = rig.config.wall_jump_time;
        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::InAir);
    }

    #[test]
    fn dash_defaults_to_facing_and_starts_cooldown() {
        let mut rig = Rig::grounded();
        let mut fsm = rig.start(PlayerStateId::Dash);
        assert_eq!(fsm.registry().dash.direction(), Vec2::X);

        rig.logic(&mut fsm);
        assert_eq!(rig.actor.body.velocity, Vec2::X * rig.config.dash_velocity);

        rig.now = rig.config.dash_time;
        rig.logic(&mut fsm);
        assert_eq!(rig.moves.last_dash_at, Some(rig.config.dash_time));
        assert_eq!(rig.actor.body.gravity_scale, 1.0);
        assert!(!rig.moves.can_dash(rig.now, rig.config.dash_cooldown));
    }

    #[test]
    fn rising_dash_is_damped_on_exit() {
        let mut rig = Rig::airborne();
        rig.actor.input.y = 1;
        let mut fsm = rig.start(PlayerStateId::Dash);
        rig.logic(&mut fsm);

        rig.now = rig.config.dash_time;
        rig.logic(&mut fsm);

        let expected = rig.config.dash_velocity * rig.config.dash_end_y_multiplier;
        assert!((rig.actor.body.velocity.y - expected).abs() < 1e-4);
    }

    #[test]
    fn attack_returns_after_clip() {
        let mut rig = Rig::grounded();
        let mut fsm = rig.start(PlayerStateId::Attack);

        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::Attack);

        rig.finish_clip(&mut fsm);
        rig.logic(&mut fsm);
        assert_eq!(fsm.current(), PlayerStateId::Idle);
    }
}
