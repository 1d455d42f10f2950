//! Player behavior family.

mod ability;
mod airborne;
mod grounded;
mod ledge;
mod wall;

pub use ability::{AttackState, DashState, JumpState, WallJumpState};
pub use airborne::InAirState;
pub use grounded::{CrouchIdleState, CrouchMoveState, IdleState, LandState, MoveState};
pub use ledge::LedgeClimbState;
pub use wall::{WallClimbState, WallGrabState, WallSlideState};

use crate::components::{Actor, Moveset};
use crate::config::PlayerConfig;
use crate::engine::geometry::Geometry;
use crate::fsm::{Dispatch, MachineContext, Registry, State, StateId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerStateId {
    Idle,
    Move,
    Land,
    CrouchIdle,
    CrouchMove,
    Jump,
    InAir,
    WallSlide,
    WallGrab,
    WallClimb,
    WallJump,
    LedgeClimb,
    Dash,
    Attack,
}

impl StateId for PlayerStateId {
    const ALL: &'static [Self] = &[
        Self::Idle,
        Self::Move,
        Self::Land,
        Self::CrouchIdle,
        Self::CrouchMove,
        Self::Jump,
        Self::InAir,
        Self::WallSlide,
        Self::WallGrab,
        Self::WallClimb,
        Self::WallJump,
        Self::LedgeClimb,
        Self::Dash,
        Self::Attack,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Move => "Move",
            Self::Land => "Land",
            Self::CrouchIdle => "CrouchIdle",
            Self::CrouchMove => "CrouchMove",
            Self::Jump => "Jump",
            Self::InAir => "InAir",
            Self::WallSlide => "WallSlide",
            Self::WallGrab => "WallGrab",
            Self::WallClimb => "WallClimb",
            Self::WallJump => "WallJump",
            Self::LedgeClimb => "LedgeClimb",
            Self::Dash => "Dash",
            Self::Attack => "Attack",
        }
    }

    fn anim_bool(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Move => "move",
            Self::Land => "land",
            Self::CrouchIdle => "crouchIdle",
            Self::CrouchMove => "crouchMove",
            // Jumps and dashes share the airborne blend tree.
            Self::Jump | Self::InAir | Self::WallJump | Self::Dash => "inAir",
            Self::WallSlide => "wallSlide",
            Self::WallGrab => "wallGrab",
            Self::WallClimb => "wallClimb",
            Self::LedgeClimb => "ledgeClimbState",
            Self::Attack => "attack",
        }
    }
}

/// Everything a player state may touch during one lifecycle call.
pub struct PlayerCx<'a> {
    pub actor: &'a mut Actor,
    pub moves: &'a mut Moveset,
    pub config: &'a PlayerConfig,
    pub geometry: &'a dyn Geometry,
    pub now: f32,
}

impl MachineContext for PlayerCx<'_> {
    fn now(&self) -> f32 {
        self.now
    }

    fn set_anim_bool(&mut self, name: &'static str, value: bool) {
        self.actor.anim.set_bool(name, value);
    }
}

/// One instance of every player state, resolved by [`PlayerStateId`].
#[derive(Debug, Default)]
pub struct PlayerStates {
    pub idle: IdleState,
    pub moving: MoveState,
    pub land: LandState,
    pub crouch_idle: CrouchIdleState,
    pub crouch_move: CrouchMoveState,
    pub jump: JumpState,
    pub in_air: InAirState,
    pub wall_slide: WallSlideState,
    pub wall_grab: WallGrabState,
    pub wall_climb: WallClimbState,
    pub wall_jump: WallJumpState,
    pub ledge_climb: LedgeClimbState,
    pub dash: DashState,
    pub attack: AttackState,
}

impl PlayerStates {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registry for PlayerStates {
    type Id = PlayerStateId;
}

impl<'a> Dispatch<PlayerCx<'a>> for PlayerStates {
    fn state_mut(&mut self, id: PlayerStateId) -> &mut dyn State<PlayerCx<'a>, Id = PlayerStateId> {
        match id {
            PlayerStateId::Idle => &mut self.idle,
            PlayerStateId::Move => &mut self.moving,
            PlayerStateId::Land => &mut self.land,
            PlayerStateId::CrouchIdle => &mut self.crouch_idle,
            PlayerStateId::CrouchMove => &mut self.crouch_move,
            PlayerStateId::Jump => &mut self.jump,
            PlayerStateId::InAir => &mut self.in_air,
            PlayerStateId::WallSlide => &mut self.wall_slide,
            PlayerStateId::WallGrab => &mut self.wall_grab,
            PlayerStateId::WallClimb => &mut self.wall_climb,
            PlayerStateId::WallJump => &mut self.wall_jump,
            PlayerStateId::LedgeClimb => &mut self.ledge_climb,
            PlayerStateId::Dash => &mut self.dash,
            PlayerStateId::Attack => &mut self.attack,
        }
    }
}
