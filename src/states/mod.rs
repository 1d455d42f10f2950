//! Behavior families and the capabilities they are composed from.
//!
//! A concrete state is a flat struct. Shared behavior (grounded motion, wall
//! contact, ability completion, timed dwell) lives in small capability
//! functions and helpers that each state calls in a fixed order, instead of a
//! base-class chain.

pub mod enemy;
pub mod player;

use rand::Rng;

use crate::config::TimeRange;
use crate::fsm::Visit;

/// Timed-dwell capability: a duration drawn on enter, expired once the visit
/// has lasted that long.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DwellTimer {
    duration: f32,
    expired: bool,
}

impl DwellTimer {
    pub fn start<R: Rng + ?Sized>(&mut self, range: &TimeRange, rng: &mut R) {
        self.duration = range.sample(rng);
        self.expired = false;
    }

    /// Latch expiry and report it.
    pub fn update(&mut self, visit: &Visit, now: f32) -> bool {
        if visit.elapsed(now) >= self.duration {
            self.expired = true;
        }
        self.expired
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }
}
