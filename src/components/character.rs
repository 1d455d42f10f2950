use std::collections::BTreeMap;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::physics::{Body, Contacts};
use crate::engine::input::InputSnapshot;
use crate::fsm::StateMachine;
use crate::states::enemy::EnemyStates;
use crate::states::player::PlayerStates;

// ---------------------------------------------------------------------------
// Actor context
// ---------------------------------------------------------------------------

/// Per-actor mutable data, read and written by whichever state is active.
///
/// One writer at a time: only the machine's current state touches this
/// between two host calls, so no locking is involved.
#[derive(Debug, Clone)]
pub struct Actor {
    pub body: Body,
    pub contacts: Contacts,
    pub input: InputSnapshot,
    pub anim: Animator,
}

impl Actor {
    pub fn new(body: Body) -> Self {
        Self {
            body,
            contacts: Contacts::default(),
            input: InputSnapshot::default(),
            anim: Animator::default(),
        }
    }
}

/// Marker: this entity is the player.
pub struct Player;

/// Marker: this entity is AI-controlled.
pub struct Enemy;

// ---------------------------------------------------------------------------
// Animation components
// ---------------------------------------------------------------------------

/// Animator parameters set by states and read by the animation driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animator {
    bools: BTreeMap<&'static str, bool>,
    floats: BTreeMap<&'static str, f32>,
}

impl Animator {
    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    pub fn get_float(&self, name: &str) -> f32 {
        self.floats.get(name).copied().unwrap_or(0.0)
    }

    /// Every bool parameter currently raised, in name order.
    pub fn raised(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bools.iter().filter(|(_, on)| **on).map(|(name, _)| *name)
    }
}

/// Playback cursor for the clip the animation driver is running.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPlayer {
    pub clip: Option<&'static str>,
    /// Entry time of the state visit the clip belongs to.
    pub visit_started: Option<f32>,
    pub elapsed: f32,
    pub keyframe_fired: bool,
    pub finish_fired: bool,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Resources that outlive a single state visit: jump charges and dash cooldown.
#[derive(Debug, Clone, PartialEq)]
pub struct Moveset {
    pub jumps_left: u32,
    pub dash_ready: bool,
    pub last_dash_at: Option<f32>,
    pub handoff: PlayerHandoff,
}

impl Moveset {
    pub fn new(amount_of_jumps: u32) -> Self {
        Self {
            jumps_left: amount_of_jumps,
            dash_ready: true,
            last_dash_at: None,
            handoff: PlayerHandoff::default(),
        }
    }

    pub fn can_jump(&self) -> bool {
        self.jumps_left > 0
    }

    pub fn can_dash(&self, now: f32, cooldown: f32) -> bool {
        self.dash_ready && self.last_dash_at.map_or(true, |at| now >= at + cooldown)
    }
}

/// Values a state leaves for the next one during a transition.
///
/// Written right before a transition is requested and taken (reset) by the
/// receiving state's `enter`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerHandoff {
    /// Body position when the ledge was detected.
    pub ledge_detected_at: Option<Vec2>,
    /// Horizontal sign for the next wall jump.
    pub wall_jump_direction: Option<f32>,
    /// Walked off an edge: a grounded jump is still allowed briefly.
    pub coyote: bool,
    /// Rising from a jump: releasing the button cuts the ascent.
    pub jumping: bool,
}

impl PlayerHandoff {
    /// Wall jump away from a wall we touch, otherwise along facing.
    pub fn determine_wall_jump_direction(&mut self, touching_wall: bool, facing: f32) {
        let direction = if touching_wall { -facing } else { facing };
        self.wall_jump_direction = Some(direction);
    }
}

pub type PlayerFsm = StateMachine<PlayerStates>;

// ---------------------------------------------------------------------------
// Enemy
// ---------------------------------------------------------------------------

/// AI memory that outlives a single state visit.
#[derive(Debug, Clone)]
pub struct EnemyMemory {
    pub rng: StdRng,
    pub last_known_target: Option<Vec2>,
    pub last_attack_at: Option<f32>,
    /// Keyframe hits landed. Damage resolution belongs to the host.
    pub strikes: u32,
    pub handoff: EnemyHandoff,
}

impl EnemyMemory {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            last_known_target: None,
            last_attack_at: None,
            strikes: 0,
            handoff: EnemyHandoff::default(),
        }
    }

    pub fn attack_ready(&self, now: f32, cooldown: f32) -> bool {
        self.last_attack_at.map_or(true, |at| now >= at + cooldown)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnemyHandoff {
    /// Turn around when the coming idle ends.
    pub flip_after_idle: bool,
    /// Search starts with a turn instead of waiting one interval.
    pub turn_immediately: bool,
}

pub type EnemyFsm = StateMachine<EnemyStates>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_cooldown_counts_from_last_dash() {
        let mut moves = Moveset::new(1);
        assert!(moves.can_dash(0.0, 0.5));
        moves.last_dash_at = Some(1.0);
        assert!(!moves.can_dash(1.4, 0.5));
        assert!(moves.can_dash(1.5, 0.5));
        moves.dash_ready = false;
        assert!(!moves.can_dash(9.0, 0.5));
    }

    #[test]
    fn wall_jump_direction_points_away_from_wall() {
        let mut handoff = PlayerHandoff::default();
        handoff.determine_wall_jump_direction(true, 1.0);
        assert_eq!(handoff.wall_jump_direction, Some(-1.0));
        handoff.determine_wall_jump_direction(false, 1.0);
        assert_eq!(handoff.wall_jump_direction, Some(1.0));
    }

    #[test]
    fn animator_lists_raised_bools() {
        let mut anim = Animator::default();
        anim.set_bool("move", true);
        anim.set_bool("idle", false);
        anim.set_bool("attack", true);
        assert_eq!(anim.raised().collect::<Vec<_>>(), vec!["attack", "move"]);
        assert!(!anim.get_bool("missing"));
    }
}
