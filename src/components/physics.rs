use glam::Vec2;

use crate::config::SensorConfig;
use crate::engine::geometry::Aabb;

/// Signed horizontal orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Same convention as normalized input: -1 or 1.
    pub fn as_input(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    pub fn toward(dx: f32) -> Option<Self> {
        if dx > 0.0 {
            Some(Facing::Right)
        } else if dx < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Collision box relative to the body position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub offset: Vec2,
    pub size: Vec2,
}

/// Position, velocity, and facing of one actor; the motion provider contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub collider: Collider,
    /// Multiplier on world gravity. Zero while a state pins the body.
    pub gravity_scale: f32,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            collider: Collider {
                offset: Vec2::ZERO,
                size,
            },
            gravity_scale: 1.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position + self.collider.offset, self.collider.size * 0.5)
    }

    pub fn set_velocity_zero(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn set_velocity_x(&mut self, x: f32) {
        self.velocity.x = x;
    }

    pub fn set_velocity_y(&mut self, y: f32) {
        self.velocity.y = y;
    }

    /// Launch at `speed` along `angle`, mirrored horizontally by `direction`.
    pub fn set_velocity_angled(&mut self, speed: f32, angle: Vec2, direction: f32) {
        let angle = angle.normalize_or_zero();
        self.velocity = Vec2::new(angle.x * speed * direction, angle.y * speed);
    }

    pub fn flip(&mut self) {
        self.facing = self.facing.flipped();
    }

    /// Turn toward a nonzero horizontal input that points away from facing.
    pub fn check_if_should_flip(&mut self, x_input: i32) {
        if x_input != 0 && x_input != self.facing.as_input() {
            self.flip();
        }
    }

    /// Resize the collider vertically, keeping its bottom edge in place.
    pub fn set_collider_height(&mut self, height: f32) {
        let delta = height - self.collider.size.y;
        self.collider.offset.y += delta * 0.5;
        self.collider.size.y = height;
    }

    /// A point relative to the body, with `x` mirrored by facing.
    pub fn local_point(&self, local: Vec2) -> Vec2 {
        self.position + Vec2::new(local.x * self.facing.sign(), local.y)
    }

    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.facing.sign(), 0.0)
    }
}

/// Collision flags, refreshed after every physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub grounded: bool,
    pub wall_front: bool,
    pub wall_back: bool,
    /// The ledge sensor (above the wall sensor) hit geometry.
    pub ledge: bool,
    pub ceiling: bool,
    /// There is floor just ahead of the feet.
    pub floor_ahead: bool,
}

/// Per-entity sensor layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensors(pub SensorConfig);
