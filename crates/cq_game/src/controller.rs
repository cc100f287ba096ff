use crate::camera::CameraBasis;
use crate::collision::{probe_ground, GroundHit, GroundProbe};
use crate::entity::{Character, Platform};
use cq_core::input::{Action, InputState};
use glam::Vec3;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerInput {
    /// Horizontal world-space intent, not yet normalized.
    pub move_dir: Vec3,
    pub jump_held: bool,
}

impl ControllerInput {
    pub fn from_actions(input: &InputState, basis: &CameraBasis) -> Self {
        let mut move_dir = Vec3::ZERO;
        if input.is_held(Action::Forward) {
            move_dir += basis.forward;
        }
        if input.is_held(Action::Back) {
            move_dir -= basis.forward;
        }
        if input.is_held(Action::Right) {
            move_dir += basis.right;
        }
        if input.is_held(Action::Left) {
            move_dir -= basis.right;
        }
        Self {
            move_dir,
            jump_held: input.is_held(Action::Jump),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub move_speed: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    pub character_radius: f32,
    pub probe_extra: f32,
    pub probe_tolerance: f32,
    pub max_landing_rise: f32,
    pub fall_floor: f32,
    pub stretch_fall_speed: f32,
    pub takeoff_scale: f32,
    pub fall_scale: f32,
    pub bounce_jump_factor: f32,
    pub bounce_push_radius: f32,
    pub bounce_push_force: f32,
    pub bounce_cooldown_secs: f32,
    pub bounce_watch_secs: f32,
    pub dash_speed_factor: f32,
    pub dash_secs: f32,
    pub dash_cooldown_secs: f32,
    /// How fast a contact knockback bleeds off, in u/s².
    pub knockback_decay: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            gravity: 18.0,
            jump_speed: 12.0,
            character_radius: 0.5,
            probe_extra: 0.2,
            probe_tolerance: 0.1,
            max_landing_rise: 0.6,
            fall_floor: -15.0,
            stretch_fall_speed: 3.0,
            takeoff_scale: 0.8,
            fall_scale: 1.2,
            bounce_jump_factor: 2.0,
            bounce_push_radius: 5.0,
            bounce_push_force: 5.0,
            bounce_cooldown_secs: 5.0,
            bounce_watch_secs: 5.0,
            dash_speed_factor: 5.0,
            dash_secs: 0.2,
            dash_cooldown_secs: 3.0,
            knockback_decay: 12.0,
        }
    }
}

impl MovementConfig {
    pub fn ground_probe(&self) -> GroundProbe {
        GroundProbe {
            reach: self.character_radius + self.probe_extra,
            tolerance: self.probe_tolerance,
            max_rise_speed: self.max_landing_rise,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    pub grounded: bool,
    /// Was airborne at the start of the step and is standing at the end.
    pub landed: bool,
    pub jumped: bool,
}

/// Full movement for the character receiving input.
pub fn step_active(
    character: &mut Character,
    input: ControllerInput,
    dt: f32,
    platforms: &[Platform],
    config: &MovementConfig,
) -> StepReport {
    let was_airborne = character.is_jumping;

    if character.dash_remaining > 0.0 {
        character.velocity.x = character.dash_velocity.x;
        character.velocity.z = character.dash_velocity.z;
        character.dash_remaining = (character.dash_remaining - dt).max(0.0);
    } else {
        let intent = Vec3::new(input.move_dir.x, 0.0, input.move_dir.z).normalize_or_zero();
        let horizontal =
            intent * config.move_speed * character.speed_multiplier + character.knockback;
        character.velocity.x = horizontal.x;
        character.velocity.z = horizontal.z;
    }
    character.knockback = decay_toward_zero(character.knockback, config.knockback_decay * dt);

    character.velocity.y -= config.gravity * dt;

    let hit = probe_ground(
        character.position,
        character.velocity.y,
        platforms,
        &config.ground_probe(),
    );
    let grounded = match hit {
        Some(hit) => {
            if character.velocity.y < 0.0 {
                snap_to(character, hit, config);
            }
            true
        }
        None => {
            character.is_jumping = true;
            false
        }
    };
    let landed = was_airborne && grounded && !character.is_jumping;

    let mut jumped = false;
    if input.jump_held && !character.is_jumping {
        character.velocity.y = config.jump_speed * character.jump_multiplier;
        character.is_jumping = true;
        character.scale_y = config.takeoff_scale;
        jumped = true;
    }

    character.position += character.velocity * dt;
    apply_stretch(character, config);

    StepReport {
        grounded,
        landed,
        jumped,
    }
}

/// The idle character only falls and lands; its horizontal motion is frozen.
pub fn step_passive(
    character: &mut Character,
    dt: f32,
    platforms: &[Platform],
    config: &MovementConfig,
) -> StepReport {
    let was_airborne = character.is_jumping;
    let hit = probe_ground(
        character.position,
        character.velocity.y,
        platforms,
        &config.ground_probe(),
    );
    let grounded = match hit {
        Some(hit) => {
            if character.velocity.y < 0.0 {
                snap_to(character, hit, config);
            }
            true
        }
        None => {
            character.velocity.y -= config.gravity * dt;
            character.position.y += character.velocity.y * dt;
            character.is_jumping = true;
            false
        }
    };
    if grounded && character.velocity.y <= 0.0 {
        character.is_jumping = false;
    }
    apply_stretch(character, config);

    StepReport {
        grounded,
        landed: was_airborne && !character.is_jumping,
        jumped: false,
    }
}

pub fn is_below_floor(character: &Character, config: &MovementConfig) -> bool {
    character.position.y < config.fall_floor
}

fn decay_toward_zero(impulse: Vec3, amount: f32) -> Vec3 {
    let speed = impulse.length();
    if speed <= amount {
        Vec3::ZERO
    } else {
        impulse * ((speed - amount) / speed)
    }
}

fn snap_to(character: &mut Character, hit: GroundHit, config: &MovementConfig) {
    character.position.y = hit.top + config.character_radius;
    character.velocity.y = 0.0;
    character.is_jumping = false;
    character.scale_y = 1.0;
}

fn apply_stretch(character: &mut Character, config: &MovementConfig) {
    if character.is_jumping {
        if character.velocity.y < -config.stretch_fall_speed {
            character.scale_y = config.fall_scale;
        }
    } else {
        character.scale_y = 1.0;
    }
}
