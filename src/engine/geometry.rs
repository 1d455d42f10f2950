use glam::Vec2;

/// What a spatial query is allowed to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Static level geometry: floors, walls, ceilings, ledges.
    Ground,
    /// The actor an AI is hunting.
    Target,
}

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Strict overlap; boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    pub distance: f32,
}

/// Collision/geometry query service consumed by states and sensors.
pub trait Geometry {
    /// Nearest hit along `direction` within `max_distance`. A ray that starts
    /// inside a collider hits it at distance zero.
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, layer: Layer) -> Option<RayHit>;

    fn overlap(&self, area: Aabb, layer: Layer) -> bool;
}
