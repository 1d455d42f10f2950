//! Reacting to a sighted target: hold, charge, and look around after losing it.

use super::{EnemyCx, EnemyStateId};
use crate::components::Facing;
use crate::fsm::{State, Transition, Visit};

/// Horizontal slack when deciding the last known position has been reached.
const ARRIVE_DISTANCE: f32 = 0.1;

/// Target spotted: hold position briefly before committing to an action.
#[derive(Debug, Default)]
pub struct AlertState {
    target_in_max_aggro: bool,
    target_in_close_range: bool,
}

impl<'a> State<EnemyCx<'a>> for AlertState {
    type Id = EnemyStateId;

    fn id(&self) -> EnemyStateId {
        EnemyStateId::Alert
    }

    fn enter(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) {
        cx.actor.body.set_velocity_x(0.0);
        self.target_in_max_aggro = cx.target_in_max_aggro();
        self.target_in_close_range = cx.target_in_close_range();
    }

    fn logic_update(&mut self, cx: &mut EnemyCx<'a>, visit: &Visit) -> Transition<EnemyStateId> {
        let long_range_action = visit.elapsed(cx.now) >= cx.config.long_range_action_time;

        if self.target_in_close_range && cx.attack_ready() {
            Transition::To(EnemyStateId::Attack)
        } else if long_range_action {
            Transition::To(EnemyStateId::Chase)
        } else if !self.target_in_max_aggro {
            Transition::To(EnemyStateId::Search)
        } else if !cx.actor.contacts.floor_ahead {
            cx.actor.body.flip();
            Transition::To(EnemyStateId::Patrol)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) -> Transition<EnemyStateId> {
        self.target_in_max_aggro = cx.target_in_max_aggro();
        self.target_in_close_range = cx.target_in_close_range();
        Transition::Stay
    }
}

/// Run at the target's last known position for a bounded time.
#[derive(Debug, Default)]
pub struct ChaseState {
    target_in_min_aggro: bool,
    target_in_close_range: bool,
}

impl ChaseState {
    fn steer(&self, cx: &mut EnemyCx<'_>) -> Option<EnemyStateId> {
        let body = &mut cx.actor.body;
        if let Some(target) = cx.memory.last_known_target {
            let dx = target.x - body.position.x;
            if dx.abs() <= ARRIVE_DISTANCE && !self.target_in_min_aggro {
                cx.memory.handoff.turn_immediately = false;
                return Some(EnemyStateId::Search);
            }
            if let Some(toward) = Facing::toward(dx) {
                body.facing = toward;
            }
        }
        body.set_velocity_x(cx.config.charge_speed * body.facing.sign());
        None
    }
}

impl<'a> State<EnemyCx<'a>> for ChaseState {
    type Id = EnemyStateId;

    fn id(&self) -> EnemyStateId {
        EnemyStateId::Chase
    }

    fn enter(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) {
        self.target_in_min_aggro = cx.target_in_min_aggro();
        self.target_in_close_range = cx.target_in_close_range();
        let body = &mut cx.actor.body;
        body.set_velocity_x(cx.config.charge_speed * body.facing.sign());
    }

    fn logic_update(&mut self, cx: &mut EnemyCx<'a>, visit: &Visit) -> Transition<EnemyStateId> {
        let charge_over = visit.elapsed(cx.now) >= cx.config.charge_time;
        let contacts = cx.actor.contacts;

        if self.target_in_close_range && cx.attack_ready() {
            Transition::To(EnemyStateId::Attack)
        } else if !contacts.floor_ahead || contacts.wall_front {
            cx.memory.handoff.turn_immediately = true;
            Transition::To(EnemyStateId::Search)
        } else if charge_over {
            if self.target_in_min_aggro {
                Transition::To(EnemyStateId::Alert)
            } else {
                Transition::To(EnemyStateId::Search)
            }
        } else {
            self.steer(cx).into()
        }
    }

    fn physics_update(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) -> Transition<EnemyStateId> {
        self.target_in_min_aggro = cx.target_in_min_aggro();
        self.target_in_close_range = cx.target_in_close_range();
        if self.target_in_close_range && cx.attack_ready() {
            Transition::To(EnemyStateId::Attack)
        } else {
            Transition::Stay
        }
    }
}

/// Lost the target: turn around a few times looking for it.
#[derive(Debug, Default)]
pub struct SearchState {
    turn_immediately: bool,
    turns_done: u32,
    last_turn_at: f32,
    all_turns_done: bool,
    all_turns_time_done: bool,
    target_in_min_aggro: bool,
}

impl SearchState {
    pub fn turns_done(&self) -> u32 {
        self.turns_done
    }

    fn turn(&mut self, cx: &mut EnemyCx<'_>) {
        cx.actor.body.flip();
        self.last_turn_at = cx.now;
        self.turns_done += 1;
    }
}

impl<'a> State<EnemyCx<'a>> for SearchState {
    type Id = EnemyStateId;

    fn id(&self) -> EnemyStateId {
        EnemyStateId::Search
    }

    fn enter(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) {
        self.turn_immediately = std::mem::take(&mut cx.memory.handoff.turn_immediately);
        self.turns_done = 0;
        self.last_turn_at = cx.now;
        self.all_turns_done = false;
        self.all_turns_time_done = false;
        cx.actor.body.set_velocity_x(0.0);
        self.target_in_min_aggro = cx.target_in_min_aggro();
    }

    fn logic_update(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) -> Transition<EnemyStateId> {
        cx.actor.body.set_velocity_x(0.0);
        let between = cx.config.time_between_turns;

        if self.turn_immediately {
            self.turn(cx);
            self.turn_immediately = false;
        } else if cx.now >= self.last_turn_at + between && !self.all_turns_done {
            self.turn(cx);
        }
        if self.turns_done >= cx.config.amount_of_turns {
            self.all_turns_done = true;
        }
        if self.all_turns_done && cx.now >= self.last_turn_at + between {
            self.all_turns_time_done = true;
        }

        if self.target_in_min_aggro {
            Transition::To(EnemyStateId::Alert)
        } else if self.all_turns_time_done {
            Transition::To(EnemyStateId::Patrol)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) -> Transition<EnemyStateId> {
        self.target_in_min_aggro = cx.target_in_min_aggro();
        Transition::Stay
    }
}
