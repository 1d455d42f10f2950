use super::{EnemyCx, EnemyStateId};
use crate::fsm::{State, Transition, Visit};
use crate::states::DwellTimer;

/// Stand still for a randomized dwell, then resume patrolling.
#[derive(Debug, Default)]
pub struct IdleState {
    timer: DwellTimer,
    flip_after_idle: bool,
    target_in_min_aggro: bool,
}

impl IdleState {
    pub fn idle_duration(&self) -> f32 {
        self.timer.duration()
    }

    pub fn will_flip(&self) -> bool {
        self.flip_after_idle
    }
}

impl<'a> State<EnemyCx<'a>> for IdleState {
    type Id = EnemyStateId;

    fn id(&self) -> EnemyStateId {
        EnemyStateId::Idle
    }

    fn enter(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) {
        cx.actor.body.set_velocity_x(0.0);
        self.flip_after_idle = std::mem::take(&mut cx.memory.handoff.flip_after_idle);
        self.timer.start(&cx.config.idle_time, &mut cx.memory.rng);
        self.target_in_min_aggro = cx.target_in_min_aggro();
    }

    fn exit(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) {
        if self.flip_after_idle {
            cx.actor.body.flip();
        }
    }

    fn logic_update(&mut self, cx: &mut EnemyCx<'a>, visit: &Visit) -> Transition<EnemyStateId> {
        cx.actor.body.set_velocity_x(0.0);
        let idle_over = self.timer.update(visit, cx.now);

        if self.target_in_min_aggro {
            Transition::To(EnemyStateId::Chase)
        } else if idle_over {
            Transition::To(EnemyStateId::Patrol)
        } else {
            Transition::Stay
        }
    }

    fn physics_update(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) -> Transition<EnemyStateId> {
        self.target_in_min_aggro = cx.target_in_min_aggro();
        if self.target_in_min_aggro {
            Transition::To(EnemyStateId::Chase)
        } else {
            Transition::Stay
        }
    }
}

/// Walk along facing for a randomized duration; turn back at walls and edges.
#[derive(Debug, Default)]
pub struct PatrolState {
    timer: DwellTimer,
    target_in_min_aggro: bool,
}

impl PatrolState {
    pub fn patrol_duration(&self) -> f32 {
        self.timer.duration()
    }

    /// Blocked ahead: idle first, then come back the other way.
    fn blocked(cx: &mut EnemyCx<'_>) -> bool {
        let contacts = cx.actor.contacts;
        let blocked = contacts.wall_front || !contacts.floor_ahead;
        if blocked {
            cx.memory.handoff.flip_after_idle = true;
        }
        blocked
    }
}

impl<'a> State<EnemyCx<'a>> for PatrolState {
    type Id = EnemyStateId;

    fn id(&self) -> EnemyStateId {
        EnemyStateId::Patrol
    }

    fn enter(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) {
        let body = &mut cx.actor.body;
        body.set_velocity_x(cx.config.movement_speed * body.facing.sign());
        self.timer.start(&cx.config.patrol_time, &mut cx.memory.rng);
        self.target_in_min_aggro = cx.target_in_min_aggro();
    }

    fn logic_update(&mut self, cx: &mut EnemyCx<'a>, visit: &Visit) -> Transition<EnemyStateId> {
        let patrol_over = self.timer.update(visit, cx.now);

        if self.target_in_min_aggro {
            return Transition::To(EnemyStateId::Chase);
        }
        if Self::blocked(cx) {
            return Transition::To(EnemyStateId::Idle);
        }
        if patrol_over {
            return Transition::To(EnemyStateId::Idle);
        }
        let body = &mut cx.actor.body;
        body.set_velocity_x(cx.config.movement_speed * body.facing.sign());
        Transition::Stay
    }

    fn physics_update(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) -> Transition<EnemyStateId> {
        self.target_in_min_aggro = cx.target_in_min_aggro();
        if self.target_in_min_aggro {
            Transition::To(EnemyStateId::Chase)
        } else if Self::blocked(cx) {
            Transition::To(EnemyStateId::Idle)
        } else {
            Transition::Stay
        }
    }
}
