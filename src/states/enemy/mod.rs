//! AI behavior family: patrol until the target is seen, then pursue and strike.

mod attack;
mod idle;
mod pursuit;

pub use attack::AttackState;
pub use idle::{IdleState, PatrolState};
pub use pursuit::{AlertState, ChaseState, SearchState};

use crate::components::{Actor, EnemyMemory};
use crate::config::EnemyConfig;
use crate::engine::geometry::Geometry;
use crate::fsm::{Dispatch, MachineContext, Registry, State, StateId};
use crate::systems::collision::target_within;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyStateId {
    Idle,
    Patrol,
    Alert,
    Chase,
    Search,
    Attack,
}

impl StateId for EnemyStateId {
    const ALL: &'static [Self] = &[
        Self::Idle,
        Self::Patrol,
        Self::Alert,
        Self::Chase,
        Self::Search,
        Self::Attack,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Patrol => "Patrol",
            Self::Alert => "Alert",
            Self::Chase => "Chase",
            Self::Search => "Search",
            Self::Attack => "Attack",
        }
    }

    fn anim_bool(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Patrol => "move",
            Self::Alert => "playerDetected",
            Self::Chase => "charge",
            Self::Search => "lookForPlayer",
            Self::Attack => "meleeAttack",
        }
    }
}

pub struct EnemyCx<'a> {
    pub actor: &'a mut Actor,
    pub memory: &'a mut EnemyMemory,
    pub config: &'a EnemyConfig,
    pub geometry: &'a dyn Geometry,
    pub now: f32,
}

impl EnemyCx<'_> {
    /// Look ahead for the target; a sighting updates the last known position.
    fn sees_target_within(&mut self, distance: f32) -> bool {
        match target_within(&self.actor.body, &self.config.sensors, self.geometry, distance) {
            Some(point) => {
                self.memory.last_known_target = Some(point);
                true
            }
            None => false,
        }
    }

    pub fn target_in_min_aggro(&mut self) -> bool {
        self.sees_target_within(self.config.min_aggro_distance)
    }

    pub fn target_in_max_aggro(&mut self) -> bool {
        self.sees_target_within(self.config.max_aggro_distance)
    }

    pub fn target_in_close_range(&mut self) -> bool {
        self.sees_target_within(self.config.close_range_action_distance)
    }

    pub fn attack_ready(&self) -> bool {
        self.memory.attack_ready(self.now, self.config.attack_cooldown)
    }
}

impl MachineContext for EnemyCx<'_> {
    fn now(&self) -> f32 {
        self.now
    }

    fn set_anim_bool(&mut self, name: &'static str, value: bool) {
        self.actor.anim.set_bool(name, value);
    }
}

#[derive(Debug, Default)]
pub struct EnemyStates {
    pub idle: IdleState,
    pub patrol: PatrolState,
    pub alert: AlertState,
    pub chase: ChaseState,
    pub search: SearchState,
    pub attack: AttackState,
}

impl EnemyStates {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registry for EnemyStates {
    type Id = EnemyStateId;
}

impl<'a> Dispatch<EnemyCx<'a>> for EnemyStates {
    fn state_mut(&mut self, id: EnemyStateId) -> &mut dyn State<EnemyCx<'a>, Id = EnemyStateId> {
        match id {
            EnemyStateId::Idle => &mut self.idle,
            EnemyStateId::Patrol => &mut self.patrol,
            EnemyStateId::Alert => &mut self.alert,
            EnemyStateId::Chase => &mut self.chase,
            EnemyStateId::Search => &mut self.search,
            EnemyStateId::Attack => &mut self.attack,
        }
    }
}
