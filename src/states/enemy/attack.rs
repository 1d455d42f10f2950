use super::{EnemyCx, EnemyStateId};
use crate::fsm::{State, Transition, Visit};

/// Melee swing. The keyframe lands a strike if the target is still in reach;
/// clip completion hands back to alert or search.
#[derive(Debug, Default)]
pub struct AttackState {
    target_in_min_aggro: bool,
}

impl<'a> State<EnemyCx<'a>> for AttackState {
    type Id = EnemyStateId;

    fn id(&self) -> EnemyStateId {
        EnemyStateId::Attack
    }

    fn enter(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) {
        cx.actor.body.set_velocity_x(0.0);
        cx.memory.last_attack_at = Some(cx.now);
        self.target_in_min_aggro = cx.target_in_min_aggro();
    }

    fn logic_update(&mut self, cx: &mut EnemyCx<'a>, visit: &Visit) -> Transition<EnemyStateId> {
        cx.actor.body.set_velocity_x(0.0);
        if !visit.animation_finished {
            Transition::Stay
        } else if self.target_in_min_aggro {
            Transition::To(EnemyStateId::Alert)
        } else {
            Transition::To(EnemyStateId::Search)
        }
    }

    fn physics_update(&mut self, cx: &mut EnemyCx<'a>, _visit: &Visit) -> Transition<EnemyStateId> {
        self.target_in_min_aggro = cx.target_in_min_aggro();
        Transition::Stay
    }

    fn animation_trigger(&mut self, cx: &mut EnemyCx<'a>) {
        if cx.target_in_close_range() {
            cx.memory.strikes += 1;
            tracing::debug!(strikes = cx.memory.strikes, t = cx.now, "melee strike landed");
        }
    }
}
