//! Third-person follow camera.
//!
//! Only framing lives here; the renderer owns the projection. The simulation
//! needs the camera for one thing: the horizontal forward/right basis that
//! turns movement input into world directions.

use glam::Vec3;

pub const DEFAULT_OFFSET: Vec3 = Vec3::new(0.0, 5.0, 12.0);
const MIN_POLAR: f32 = 0.1 * std::f32::consts::PI;
const MAX_POLAR: f32 = 0.8 * std::f32::consts::PI;
const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 2000.0;
const ZOOM_STEP: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

#[derive(Debug, Clone)]
pub struct FollowCamera {
    pub offset: Vec3,
    pub target: Vec3,
    pub position: Vec3,
    zoom: f32,
}

impl FollowCamera {
    pub fn new() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            target: Vec3::ZERO,
            position: DEFAULT_OFFSET,
            zoom: DEFAULT_OFFSET.z,
        }
    }

    pub fn reset(&mut self) {
        let target = self.target;
        *self = Self::new();
        self.follow(target);
    }

    pub fn follow(&mut self, target: Vec3) {
        self.target = target;
        self.position = target + self.offset;
    }

    /// Rotate the offset around the target. Pitch stops at the polar clamp.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let radius = self.offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let polar = (self.offset.y / radius).clamp(-1.0, 1.0).acos();
        let azimuth = self.offset.x.atan2(self.offset.z);

        let polar = (polar + pitch).clamp(MIN_POLAR, MAX_POLAR);
        let azimuth = azimuth + yaw;
        self.offset = Vec3::new(
            radius * polar.sin() * azimuth.sin(),
            radius * polar.cos(),
            radius * polar.sin() * azimuth.cos(),
        );
        self.position = self.target + self.offset;
    }

    /// One scroll notch per unit of `steps`; positive zooms out.
    pub fn zoom_by(&mut self, steps: f32) {
        self.zoom = (self.zoom + steps * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset.z = self.zoom;
        self.position = self.target + self.offset;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn basis(&self) -> CameraBasis {
        let look = self.target - self.position;
        let forward = Vec3::new(look.x, 0.0, look.z).normalize_or_zero();
        let forward = if forward == Vec3::ZERO {
            Vec3::NEG_Z
        } else {
            forward
        };
        CameraBasis {
            forward,
            right: forward.cross(Vec3::Y),
        }
    }
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new()
    }
}
