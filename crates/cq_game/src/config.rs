//! Tuning configuration. Every field has a default, so an empty JSON object
//! (or no file at all) gives the stock game.

use crate::boss::BossConfig;
use crate::controller::MovementConfig;
use crate::error::{read_json, LoadError};
use crate::interaction::CombatConfig;
use crate::lifecycle::LifecycleConfig;
use serde::Deserialize;
use std::path::Path;

/// What happens to a character that drops below the fall floor.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallPolicy {
    /// Health to zero, game over.
    #[default]
    Lethal,
    /// Lose `amount` health and respawn at the level start if still alive.
    Damage { amount: f32 },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u64,
    pub fall_policy: FallPolicy,
    pub movement: MovementConfig,
    pub combat: CombatConfig,
    pub boss: BossConfig,
    pub lifecycle: LifecycleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            fall_policy: FallPolicy::default(),
            movement: MovementConfig::default(),
            combat: CombatConfig::default(),
            boss: BossConfig::default(),
            lifecycle: LifecycleConfig::default(),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, LoadError> {
    let config: GameConfig = read_json(path)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &GameConfig) -> Result<(), LoadError> {
    let movement = &config.movement;
    if movement.gravity <= 0.0 {
        return Err(LoadError::invalid("config", "movement.gravity must be > 0"));
    }
    if movement.character_radius <= 0.0 {
        return Err(LoadError::invalid(
            "config",
            "movement.character_radius must be > 0",
        ));
    }
    if movement.knockback_decay < 0.0 {
        return Err(LoadError::invalid(
            "config",
            "movement.knockback_decay must not be negative",
        ));
    }
    if movement.move_speed < 0.0 || movement.jump_speed < 0.0 {
        return Err(LoadError::invalid(
            "config",
            "movement speeds must not be negative",
        ));
    }

    let boss = &config.boss;
    if boss.max_health <= 0.0 {
        return Err(LoadError::invalid("config", "boss.max_health must be > 0"));
    }
    if !(0.0 < boss.phase_three_health
        && boss.phase_three_health < boss.phase_two_health
        && boss.phase_two_health < boss.max_health)
    {
        return Err(LoadError::invalid(
            "config",
            "boss thresholds must satisfy 0 < phase_three < phase_two < max_health",
        ));
    }

    if !(boss.projectile_spread.is_finite() && boss.projectile_spread >= 0.0) {
        return Err(LoadError::invalid(
            "config",
            "boss.projectile_spread must be a finite value >= 0",
        ));
    }
    if boss
        .dash_speed
        .iter()
        .any(|speed| !(speed.is_finite() && *speed > 0.0))
    {
        return Err(LoadError::invalid("config", "boss.dash_speed entries must be > 0"));
    }
    if !(boss.projectile_speed.is_finite() && boss.projectile_speed >= 0.0) {
        return Err(LoadError::invalid(
            "config",
            "boss.projectile_speed must be a finite value >= 0",
        ));
    }

    if let FallPolicy::Damage { amount } = config.fall_policy {
        if amount <= 0.0 {
            return Err(LoadError::invalid(
                "config",
                "fall_policy.amount must be > 0",
            ));
        }
    }

    let cooldowns = [
        config.combat.contact_cooldown_secs,
        config.combat.teleport_cooldown_secs,
        config.lifecycle.transition_pause_secs,
        config.lifecycle.resume_delay_secs,
        config.lifecycle.boss_spawn_delay_secs,
        config.lifecycle.boss_defeat_delay_secs,
    ];
    if cooldowns.iter().any(|secs| *secs < 0.0) {
        return Err(LoadError::invalid(
            "config",
            "cooldowns and delays must not be negative",
        ));
    }
    Ok(())
}

const fn default_seed() -> u64 {
    0x5eed_c0de
}
