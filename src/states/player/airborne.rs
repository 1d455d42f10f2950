use super::wall::climb_ledge;
use super::{PlayerCx, PlayerStateId};
use crate::fsm::{State, Transition, Visit};

/// Airborne: falling, rising after a jump, and the coyote grace windows.
#[derive(Debug, Default)]
pub struct InAirState {
    coyote_time: bool,
    wall_jump_coyote_time: bool,
    wall_jump_coyote_started_at: f32,
    is_jumping: bool,
    was_touching_wall: bool,
    was_touching_wall_back: bool,
}

impl InAirState {
    pub fn has_coyote_time(&self) -> bool {
        self.coyote_time
    }

    pub fn has_wall_jump_coyote_time(&self) -> bool {
        self.wall_jump_coyote_time
    }

    /// The grounded jump charge is lost once the coyote window runs out.
    fn check_coyote_time(&mut self, cx: &mut PlayerCx<'_>, visit: &Visit) {
        if self.coyote_time && visit.elapsed(cx.now) > cx.config.coyote_time {
            self.coyote_time = false;
            cx.moves.jumps_left = cx.moves.jumps_left.saturating_sub(1);
        }
    }

    fn check_wall_jump_coyote_time(&mut self, cx: &PlayerCx<'_>) {
        if self.wall_jump_coyote_time && cx.now > self.wall_jump_coyote_started_at + cx.config.coyote_time {
            self.wall_jump_coyote_time = false;
        }
    }

    /// Releasing jump while rising cuts the ascent.
    fn check_jump_multiplier(&mut self, cx: &mut PlayerCx<'_>) {
        if !self.is_jumping {
            return;
        }
        let body = &mut cx.actor.body;
        if cx.actor.input.jump_stop {
            body.set_velocity_y(body.velocity.y * cx.config.variable_jump_height_multiplier);
            self.is_jumping = false;
        } else if body.velocity.y <= 0.0 {
            self.is_jumping = false;
        }
    }

    /// Landing and ledge detection; shared by both update paths.
    fn geometry_checks(&self, cx: &mut PlayerCx<'_>) -> Option<PlayerStateId> {
        let contacts = cx.actor.contacts;
        if contacts.grounded && cx.actor.body.velocity.y < 0.01 {
            Some(PlayerStateId::Land)
        } else if contacts.wall_front && !contacts.ledge && !contacts.grounded {
            Some(climb_ledge(cx))
        } else {
            None
        }
    }
}

impl<'a> State<PlayerCx<'a>> for InAirState {
    type Id = PlayerStateId;

    fn id(&self) -> PlayerStateId {
        PlayerStateId::InAir
    }

    fn enter(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) {
        let handoff = &mut cx.moves.handoff;
        self.coyote_time = std::mem::take(&mut handoff.coyote);
        self.is_jumping = std::mem::take(&mut handoff.jumping);
        self.wall_jump_coyote_time = false;
        self.wall_jump_coyote_started_at = 0.0;
        self.was_touching_wall = cx.actor.contacts.wall_front;
        self.was_touching_wall_back = cx.actor.contacts.wall_back;
    }

    fn exit(&mut self, _cx: &mut PlayerCx<'a>, _visit: &Visit) {
        self.was_touching_wall = false;
        self.was_touching_wall_back = false;
    }

    fn logic_update(&mut self, cx: &mut PlayerCx<'a>, visit: &Visit) -> Transition<PlayerStateId> {
        self.check_coyote_time(cx, visit);
        self.check_wall_jump_coyote_time(cx);
        self.check_jump_multiplier(cx);

        let contacts = cx.actor.contacts;
        let input = cx.actor.input;
        let facing = cx.actor.body.facing;

        if input.attack {
            return Transition::To(PlayerStateId::Attack);
        }
        if let Some(next) = self.geometry_checks(cx) {
            return Transition::To(next);
        }
        if input.jump && (contacts.wall_front || contacts.wall_back || self.wall_jump_coyote_time) {
            self.wall_jump_coyote_time = false;
            cx.moves
                .handoff
                .determine_wall_jump_direction(contacts.wall_front, facing.sign());
            return Transition::To(PlayerStateId::WallJump);
        }
        if input.jump && cx.moves.can_jump() {
            return Transition::To(PlayerStateId::Jump);
        }
        if contacts.wall_front && input.grab && contacts.ledge {
            return Transition::To(PlayerStateId::WallGrab);
        }
        if contacts.wall_front && input.x == facing.as_input() && cx.actor.body.velocity.y <= 0.0 {
            return Transition::To(PlayerStateId::WallSlide);
        }
        if input.dash && cx.moves.can_dash(cx.now, cx.config.dash_cooldown) {
            return Transition::To(PlayerStateId::Dash);
        }

        let body = &mut cx.actor.body;
        body.check_if_should_flip(input.x);
        body.set_velocity_x(cx.config.movement_velocity * input.x as f32);
        cx.actor.anim.set_float("yVelocity", body.velocity.y);
        cx.actor.anim.set_float("xVelocity", body.velocity.x.abs());
        Transition::Stay
    }

    fn physics_update(&mut self, cx: &mut PlayerCx<'a>, _visit: &Visit) -> Transition<PlayerStateId> {
        let contacts = cx.actor.contacts;
        let left_wall = (self.was_touching_wall || self.was_touching_wall_back)
            && !contacts.wall_front
            && !contacts.wall_back;
        if left_wall {
            self.wall_jump_coyote_time = true;
            self.wall_jump_coyote_started_at = cx.now;
        }
        self.was_touching_wall = contacts.wall_front;
        self.was_touching_wall_back = contacts.wall_back;

        self.geometry_checks(cx).into()
    }
}
