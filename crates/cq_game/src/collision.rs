//! Collision primitives: centered boxes and the downward ground probe.
//!
//! Gameplay truth is kept separate from visuals. Every dynamic entity collides
//! as an axis-aligned box built from its center and half extents, and
//! characters find their footing with a short vertical probe against platform
//! tops instead of a full mesh raycast.

use crate::entity::Platform;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half: Vec3) -> Self {
        Self { center, half }
    }

    pub fn cube(center: Vec3, half_extent: f32) -> Self {
        Self::new(center, Vec3::splat(half_extent))
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half
    }

    /// Touching faces count as overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.cmple(b_max).all() && b_min.cmple(a_max).all()
    }
}

/// Tuning for [`probe_ground`].
#[derive(Debug, Clone, Copy)]
pub struct GroundProbe {
    /// How far below the center the probe reaches.
    pub reach: f32,
    /// How far above the center a platform top may sit and still count.
    pub tolerance: f32,
    /// Rising faster than this ignores the ground entirely.
    pub max_rise_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub top: f32,
}

/// Highest platform top under `position` within the probe window, if any.
pub fn probe_ground(
    position: Vec3,
    vertical_velocity: f32,
    platforms: &[Platform],
    probe: &GroundProbe,
) -> Option<GroundHit> {
    if vertical_velocity > probe.max_rise_speed {
        return None;
    }

    let mut best: Option<GroundHit> = None;
    for platform in platforms {
        if !platform.contains_xz(position) {
            continue;
        }
        let top = platform.top();
        let gap = position.y - top;
        if gap < -probe.tolerance || gap > probe.reach {
            continue;
        }
        if best.map_or(true, |hit| top > hit.top) {
            best = Some(GroundHit { top });
        }
    }
    best
}
