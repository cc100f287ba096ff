//! Plain entity state shared by the movement, interaction and boss systems.
//!
//! Everything here is data plus small invariant-keeping helpers. Characters
//! are the only entities that survive level loads; the rest are rebuilt from
//! the level descriptor every time.

use crate::collision::Aabb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const MAX_HEALTH: f32 = 100.0;

pub const CRYSTAL_HALF_EXTENT: f32 = 0.5;
pub const ENEMY_HALF_EXTENT: f32 = 0.4;
pub const POWER_UP_HALF_EXTENT: f32 = 0.3;
pub const PROJECTILE_HALF_EXTENT: f32 = 0.4;
pub const TELEPORTER_HALF_EXTENTS: Vec3 = Vec3::new(0.8, 0.1, 0.8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Karina,
    Kelsey,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Karina, Role::Kelsey];

    pub fn index(self) -> usize {
        match self {
            Role::Karina => 0,
            Role::Kelsey => 1,
        }
    }

    pub fn other(self) -> Role {
        match self {
            Role::Karina => Role::Kelsey,
            Role::Kelsey => Role::Karina,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Karina => "Karina",
            Role::Kelsey => "Kelsey",
        }
    }

    pub fn base_speed_multiplier(self) -> f32 {
        match self {
            Role::Karina => 0.9,
            Role::Kelsey => 1.3,
        }
    }

    pub fn base_jump_multiplier(self) -> f32 {
        match self {
            Role::Karina => 1.5,
            Role::Kelsey => 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModifierKind {
    Speed(f32),
    Jump(f32),
    Shield,
}

/// A timed effect on one character. Expiry is a scheduled record keyed by `id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifier {
    pub id: u64,
    pub kind: ModifierKind,
}

#[derive(Debug, Clone)]
pub struct Character {
    pub role: Role,
    pub position: Vec3,
    pub velocity: Vec3,
    health: f32,
    pub speed_multiplier: f32,
    pub jump_multiplier: f32,
    pub is_shielded: bool,
    pub is_jumping: bool,
    pub is_using_ability: bool,
    /// Cosmetic squash/stretch. Never read by collision.
    pub scale_y: f32,
    /// Super Bounce is waiting for the next landing.
    pub awaiting_landing: bool,
    /// Remaining Speed Dash window in seconds.
    pub dash_remaining: f32,
    pub dash_velocity: Vec3,
    /// Horizontal push from contact damage, added on top of input and decayed
    /// by the controller.
    pub knockback: Vec3,
    modifiers: Vec<Modifier>,
}

impl Character {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            health: MAX_HEALTH,
            speed_multiplier: role.base_speed_multiplier(),
            jump_multiplier: role.base_jump_multiplier(),
            is_shielded: false,
            is_jumping: false,
            is_using_ability: false,
            scale_y: 1.0,
            awaiting_landing: false,
            dash_remaining: 0.0,
            dash_velocity: Vec3::ZERO,
            knockback: Vec3::ZERO,
            modifiers: Vec::new(),
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, MAX_HEALTH);
    }

    /// Subtract health, clamped at zero. Returns the amount actually removed.
    pub fn damage(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.set_health(before - amount.max(0.0));
        before - self.health
    }

    /// Add health, clamped at the maximum. Returns the amount actually gained.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.set_health(before + amount.max(0.0));
        self.health - before
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
        self.refresh_modifiers();
    }

    /// Drop a modifier by id. Unknown ids are ignored so stale expiries are harmless.
    pub fn remove_modifier(&mut self, id: u64) -> Option<Modifier> {
        let index = self.modifiers.iter().position(|m| m.id == id)?;
        let removed = self.modifiers.remove(index);
        self.refresh_modifiers();
        Some(removed)
    }

    pub fn clear_modifiers(&mut self) {
        self.modifiers.clear();
        self.refresh_modifiers();
    }

    fn refresh_modifiers(&mut self) {
        let mut speed = self.role.base_speed_multiplier();
        let mut jump = self.role.base_jump_multiplier();
        let mut shielded = false;
        for modifier in &self.modifiers {
            match modifier.kind {
                ModifierKind::Speed(factor) => speed *= factor,
                ModifierKind::Jump(factor) => jump *= factor,
                ModifierKind::Shield => shielded = true,
            }
        }
        self.speed_multiplier = speed;
        self.jump_multiplier = jump;
        self.is_shielded = shielded;
    }

    /// Put the character down at `position` at rest, with ability state cleared.
    pub fn place_at(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.knockback = Vec3::ZERO;
        self.is_jumping = false;
        self.scale_y = 1.0;
        self.reset_ability();
    }

    pub fn reset_ability(&mut self) {
        self.is_using_ability = false;
        self.awaiting_landing = false;
        self.dash_remaining = 0.0;
        self.dash_velocity = Vec3::ZERO;
    }

    pub fn aabb(&self, radius: f32) -> Aabb {
        Aabb::cube(self.position, radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformShape {
    Box { size: Vec3 },
    Cylinder { radius: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub center: Vec3,
    pub shape: PlatformShape,
}

impl Platform {
    pub fn new_box(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            shape: PlatformShape::Box { size },
        }
    }

    pub fn new_cylinder(center: Vec3, radius: f32, height: f32) -> Self {
        Self {
            center,
            shape: PlatformShape::Cylinder { radius, height },
        }
    }

    pub fn height(&self) -> f32 {
        match self.shape {
            PlatformShape::Box { size } => size.y,
            PlatformShape::Cylinder { height, .. } => height,
        }
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.height() * 0.5
    }

    pub fn contains_xz(&self, point: Vec3) -> bool {
        let dx = point.x - self.center.x;
        let dz = point.z - self.center.z;
        match self.shape {
            PlatformShape::Box { size } => dx.abs() <= size.x * 0.5 && dz.abs() <= size.z * 0.5,
            PlatformShape::Cylinder { radius, .. } => dx * dx + dz * dz <= radius * radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crystal {
    pub position: Vec3,
}

impl Crystal {
    pub fn aabb(&self) -> Aabb {
        Aabb::cube(self.position, CRYSTAL_HALF_EXTENT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatrolAxis {
    #[default]
    X,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub position: Vec3,
    pub initial_position: Vec3,
    pub axis: PatrolAxis,
    pub range: f32,
    /// Units per second.
    pub speed: f32,
    pub direction: f32,
}

impl Enemy {
    pub fn new(position: Vec3, axis: PatrolAxis, range: f32, speed: f32) -> Self {
        Self {
            position,
            initial_position: position,
            axis,
            range,
            speed,
            direction: 1.0,
        }
    }

    /// Advance along the patrol axis, clamping and turning around at either bound.
    pub fn patrol(&mut self, dt: f32) {
        let (current, origin) = match self.axis {
            PatrolAxis::X => (&mut self.position.x, self.initial_position.x),
            PatrolAxis::Z => (&mut self.position.z, self.initial_position.z),
        };
        *current += self.speed * self.direction * dt;
        if self.direction > 0.0 && *current >= origin + self.range {
            *current = origin + self.range;
            self.direction = -1.0;
        } else if self.direction < 0.0 && *current <= origin - self.range {
            *current = origin - self.range;
            self.direction = 1.0;
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::cube(self.position, ENEMY_HALF_EXTENT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    SpeedBoost,
    SuperJump,
    Shield,
}

impl PowerUpKind {
    const CYCLE: [PowerUpKind; 3] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::SuperJump,
        PowerUpKind::Shield,
    ];

    /// Kind for the `index`-th power-up of a level when none is given.
    pub fn for_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    pub fn duration_secs(self) -> f32 {
        match self {
            PowerUpKind::SpeedBoost | PowerUpKind::SuperJump => 5.0,
            PowerUpKind::Shield => 8.0,
        }
    }

    pub fn modifier(self) -> ModifierKind {
        match self {
            PowerUpKind::SpeedBoost => ModifierKind::Speed(2.0),
            PowerUpKind::SuperJump => ModifierKind::Jump(1.8),
            PowerUpKind::Shield => ModifierKind::Shield,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "Speed Boost",
            PowerUpKind::SuperJump => "Super Jump",
            PowerUpKind::Shield => "Shield",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    pub position: Vec3,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn aabb(&self) -> Aabb {
        Aabb::cube(self.position, POWER_UP_HALF_EXTENT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teleporter {
    pub pair: usize,
    pub slot: u8,
    pub position: Vec3,
}

impl Teleporter {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, TELEPORTER_HALF_EXTENTS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub position: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub lifetime: f32,
}

impl Projectile {
    pub fn advance(&mut self, dt: f32) {
        self.position += self.direction * self.speed * dt;
        self.lifetime -= dt;
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::cube(self.position, PROJECTILE_HALF_EXTENT)
    }
}
