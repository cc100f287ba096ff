//! Level lifecycle: load, transition, reset and the terminal states.
//!
//! Every load rebuilds the world from a descriptor and cancels all pending
//! scheduled records, so nothing timed in one level can reach into the next.

use crate::abilities;
use crate::boss::Boss;
use crate::config::GameConfig;
use crate::entity::{
    Crystal, Enemy, Platform, PowerUp, PowerUpKind, Role, Teleporter, MAX_HEALTH,
};
use crate::events::{EffectKind, GameEvent};
use crate::game::Game;
use crate::level::LevelDescriptor;
use crate::world::{Environment, StepContext, World};
use cq_core::time::secs_to_us;
use glam::Vec3;
use serde::Deserialize;

const GROUND_CENTER: Vec3 = Vec3::new(0.0, -0.5, 0.0);
const GROUND_SIZE: Vec3 = Vec3::new(100.0, 1.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Running,
    Transitioning,
    GameOver,
    Won,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver | Phase::Won)
    }
}

/// Deferred work, fired against the simulation clock at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledAction {
    ExpireModifier { role: Role, id: u64 },
    AbilityReady { role: Role },
    EndLandingWatch { role: Role },
    BeginTransition { level: usize },
    LoadLevel { index: usize },
    Resume,
    SpawnBoss { position: Vec3 },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub transition_pause_secs: f32,
    pub resume_delay_secs: f32,
    pub boss_spawn_delay_secs: f32,
    pub boss_defeat_delay_secs: f32,
    pub boss_defeat_bonus: u32,
    pub boss_defeat_heal: f32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            transition_pause_secs: 0.7,
            resume_delay_secs: 0.1,
            boss_spawn_delay_secs: 2.0,
            boss_defeat_delay_secs: 2.0,
            boss_defeat_bonus: 500,
            boss_defeat_heal: 50.0,
        }
    }
}

/// Replace every per-level entity in `world` with fresh ones from `level`.
pub fn populate(world: &mut World, level: &LevelDescriptor) {
    world.clear_level();
    world.platforms.push(Platform::new_box(GROUND_CENTER, GROUND_SIZE));
    for spec in &level.platforms {
        let center = Vec3::new(spec.x, spec.y, spec.z);
        world.platforms.push(if spec.circular {
            Platform::new_cylinder(center, spec.width * 0.5, spec.height)
        } else {
            Platform::new_box(center, Vec3::new(spec.width, spec.height, spec.depth()))
        });
    }
    world.crystals.extend(level.crystals.iter().map(|point| Crystal {
        position: (*point).into(),
    }));
    world.enemies.extend(level.enemies.iter().map(|spec| {
        Enemy::new(
            Vec3::new(spec.x, spec.y, spec.z),
            spec.patrol_axis,
            spec.patrol_range,
            spec.speed,
        )
    }));
    world
        .power_ups
        .extend(level.power_ups.iter().enumerate().map(|(index, spec)| PowerUp {
            position: Vec3::new(spec.x, spec.y, spec.z),
            kind: spec.kind.unwrap_or_else(|| PowerUpKind::for_index(index)),
        }));
    for (pair, pads) in level.teleporter_pairs.iter().enumerate() {
        for (slot, pad) in pads.iter().enumerate() {
            world.teleporters.push(Teleporter {
                pair,
                slot: slot as u8,
                position: (*pad).into(),
            });
        }
    }
    world.environment = Environment {
        sky_color: level.sky_color,
        fog: level.fog,
        ground_color: level.ground_color,
    };
}

/// Tear down a beaten boss and pay out. Completion follows after a delay.
pub fn defeat_boss(world: &mut World, ctx: &mut StepContext, config: &GameConfig) {
    let Some(boss) = world.boss.take() else {
        return;
    };
    let rewards = &config.lifecycle;
    world.projectiles.clear();
    world.score += rewards.boss_defeat_bonus;
    ctx.events.push(GameEvent::ScoreChanged { score: world.score });
    for role in Role::ALL {
        let character = world.character_mut(role);
        character.heal(rewards.boss_defeat_heal);
        ctx.events.health(role, character.health());
    }
    ctx.events.effect(EffectKind::DefeatExplosion, boss.position);
    ctx.events.push(GameEvent::BossDefeated);
    ctx.events.message(
        format!("Boss Defeated! +{} points", rewards.boss_defeat_bonus),
        3.0,
    );
    ctx.requests
        .request_completion(secs_to_us(rewards.boss_defeat_delay_secs));
    log::info!("Crystal Guardian defeated, score {}", world.score);
}

impl Game {
    /// Begin play. Only valid from `Idle`.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            log::warn!("Ignoring start while {:?}", self.phase);
            return false;
        }
        self.phase = Phase::Running;
        self.events.push(GameEvent::GameStarted);
        log::info!("Game started on level {}", self.world.level_index + 1);
        true
    }

    /// Back to level one with a fresh score and full health, waiting for `start`.
    pub fn reset(&mut self) {
        log::info!("Resetting game");
        self.world.score = 0;
        self.world.last_damage_us = None;
        self.world.last_teleport_us = None;
        self.world.active = Role::Karina;
        for character in &mut self.world.characters {
            character.set_health(MAX_HEALTH);
        }
        self.input.clear();
        self.load_level(0, Phase::Idle);
    }

    /// Instantiate level `index` and leave the lifecycle in `then`.
    ///
    /// An index past the end of the campaign means it has been beaten.
    pub fn load_level(&mut self, index: usize, then: Phase) -> bool {
        let Some(level) = self.levels.get(index).cloned() else {
            log::error!("No level at index {index}; treating the campaign as won");
            self.enter_won();
            return false;
        };

        self.phase = Phase::Loading;
        self.scheduler.clear();
        populate(&mut self.world, &level);
        self.world.level_index = index;
        self.completion_honoured = false;

        for role in Role::ALL {
            let start = match role {
                Role::Karina => level.start_karina,
                Role::Kelsey => level.start_kelsey,
            };
            let character = self.world.character_mut(role);
            character.clear_modifiers();
            character.place_at(start.into());
        }
        self.world.camera.reset();
        let focus = self.world.active_character().position;
        self.world.camera.follow(focus);

        self.events.push(GameEvent::LevelChanged { level: index + 1 });
        for role in Role::ALL {
            let health = self.world.character(role).health();
            self.events.health(role, health);
        }
        self.events.push(GameEvent::ScoreChanged {
            score: self.world.score,
        });

        if let Some(boss) = level.boss {
            self.events.message("Prepare for BOSS BATTLE!", 3.0);
            self.scheduler.schedule_after(
                self.world.now_us,
                secs_to_us(self.config.lifecycle.boss_spawn_delay_secs),
                ScheduledAction::SpawnBoss {
                    position: boss.into(),
                },
            );
        }
        log::info!(
            "Loaded {} ({} platforms, {} crystals, {} enemies, boss: {})",
            level.display_name(index),
            self.world.platforms.len(),
            self.world.crystals.len(),
            self.world.enemies.len(),
            level.is_boss_level()
        );

        for extension in &mut self.extensions {
            extension.after_load(&mut self.world, &level, &mut self.events);
        }
        self.phase = then;
        true
    }

    /// Honour the current level's completion once; later requests are dropped.
    pub(crate) fn request_completion(&mut self, delay_us: u64) {
        if self.completion_honoured {
            log::debug!("Level {} already completing", self.world.level_index + 1);
            return;
        }
        self.completion_honoured = true;
        let level = self.world.level_index;
        if delay_us == 0 {
            self.begin_transition(level);
        } else {
            self.scheduler.schedule_after(
                self.world.now_us,
                delay_us,
                ScheduledAction::BeginTransition { level },
            );
        }
    }

    fn begin_transition(&mut self, from_level: usize) {
        if self.phase != Phase::Running || self.world.level_index != from_level {
            log::debug!("Dropping stale transition from level {}", from_level + 1);
            return;
        }
        let next = from_level + 1;
        if next >= self.levels.len() {
            self.enter_won();
            return;
        }
        self.phase = Phase::Transitioning;
        self.world.level_index = next;
        self.scheduler.schedule_after(
            self.world.now_us,
            secs_to_us(self.config.lifecycle.transition_pause_secs),
            ScheduledAction::LoadLevel { index: next },
        );
        log::info!("Level {} complete", from_level + 1);
    }

    fn spawn_boss(&mut self, position: Vec3) {
        if self.phase.is_terminal() {
            return;
        }
        if self.world.boss.is_some() {
            log::warn!("Replacing an existing boss");
        }
        let boss = Boss::spawn(position, &self.config.boss);
        let health = boss.health();
        self.world.boss = Some(boss);
        self.world.projectiles.clear();
        self.events
            .message("BOSS BATTLE: The Crystal Guardian", 5.0);
        self.events.push(GameEvent::BossSpawned);
        self.events.push(GameEvent::BossHealthChanged { health });
        log::info!("Boss spawned at {position:?}");
    }

    pub(crate) fn enter_game_over(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.phase = Phase::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.world.score,
        });
        log::info!("Game over with score {}", self.world.score);
    }

    pub(crate) fn enter_won(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.phase = Phase::Won;
        self.events.push(GameEvent::Won {
            score: self.world.score,
        });
        log::info!("Campaign won with score {}", self.world.score);
    }

    pub(crate) fn run_scheduled(&mut self) {
        while let Some(action) = self.scheduler.pop_due(self.world.now_us) {
            log::trace!("firing {action:?}");
            self.dispatch(action);
        }
    }

    fn dispatch(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::ExpireModifier { role, id } => {
                if let Some(modifier) = self.world.character_mut(role).remove_modifier(id) {
                    log::debug!("{} lost {:?}", role.name(), modifier.kind);
                }
            }
            ScheduledAction::AbilityReady { role } => abilities::make_ready(&mut self.world, role),
            ScheduledAction::EndLandingWatch { role } => {
                abilities::end_landing_watch(&mut self.world, role)
            }
            ScheduledAction::BeginTransition { level } => self.begin_transition(level),
            ScheduledAction::LoadLevel { index } => {
                if self.load_level(index, Phase::Transitioning) {
                    self.scheduler.schedule_after(
                        self.world.now_us,
                        secs_to_us(self.config.lifecycle.resume_delay_secs),
                        ScheduledAction::Resume,
                    );
                }
            }
            ScheduledAction::Resume => {
                if self.phase == Phase::Transitioning {
                    self.phase = Phase::Running;
                    log::info!("Resumed on level {}", self.world.level_index + 1);
                }
            }
            ScheduledAction::SpawnBoss { position } => self.spawn_boss(position),
        }
    }
}
