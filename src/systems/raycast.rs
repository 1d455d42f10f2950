use glam::Vec2;

use crate::engine::geometry::{Aabb, Geometry, Layer, RayHit};

/// Static level geometry: a flat list of solid boxes.
#[derive(Debug, Clone, Default)]
pub struct Level {
    solids: Vec<Aabb>,
}

impl Level {
    pub fn new(solids: Vec<Aabb>) -> Self {
        Self { solids }
    }

    pub fn solids(&self) -> &[Aabb] {
        &self.solids
    }
}

impl Geometry for Level {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, layer: Layer) -> Option<RayHit> {
        match layer {
            Layer::Ground => raycast_boxes(&self.solids, origin, direction, max_distance),
            Layer::Target => None,
        }
    }

    fn overlap(&self, area: Aabb, layer: Layer) -> bool {
        match layer {
            Layer::Ground => self.solids.iter().any(|solid| solid.overlaps(&area)),
            Layer::Target => false,
        }
    }
}

/// Level geometry plus the bounds of the actor AI sensors look for.
pub struct SceneGeometry<'a> {
    pub level: &'a Level,
    pub target: Option<Aabb>,
}

impl Geometry for SceneGeometry<'_> {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, layer: Layer) -> Option<RayHit> {
        match layer {
            Layer::Ground => self.level.raycast(origin, direction, max_distance, layer),
            Layer::Target => self
                .target
                .as_ref()
                .and_then(|target| raycast_boxes(std::slice::from_ref(target), origin, direction, max_distance)),
        }
    }

    fn overlap(&self, area: Aabb, layer: Layer) -> bool {
        match layer {
            Layer::Ground => self.level.overlap(area, layer),
            Layer::Target => self.target.is_some_and(|target| target.overlaps(&area)),
        }
    }
}

/// Nearest hit against `boxes` within `max_distance`.
pub fn raycast_boxes(boxes: &[Aabb], origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
    let dir = direction.normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }

    let mut best: Option<f32> = None;
    for aabb in boxes {
        if let Some(t) = ray_aabb_intersection(origin, dir, aabb) {
            if t <= max_distance && best.map_or(true, |b| t < b) {
                best = Some(t);
            }
        }
    }

    best.map(|t| RayHit {
        point: origin + dir * t,
        distance: t,
    })
}

/// Slab test. Returns 0.0 when the ray starts inside the box.
fn ray_aabb_intersection(origin: Vec2, dir: Vec2, aabb: &Aabb) -> Option<f32> {
    if aabb.contains(origin) {
        return Some(0.0);
    }

    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;
    for axis in 0..2 {
        let (o, d, lo, hi) = (origin[axis], dir[axis], aabb.min[axis], aabb.max[axis]);
        if d.abs() < 1e-8 {
            // Parallel to this slab: must already be between its planes.
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        tmin = tmin.max(t1.min(t2));
        tmax = tmax.min(t1.max(t2));
    }

    if tmax < 0.0 || tmin > tmax {
        return None;
    }
    Some(tmin.max(0.0))
}
