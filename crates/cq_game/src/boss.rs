//! The Crystal Guardian.
//!
//! A three-phase controller. The boss patrols a phase-specific path, and when
//! its attack cooldown runs out it either dashes at the active character or
//! fires a projectile volley. A dash that arrives leaves it vulnerable for a
//! short window, which is the only time contact hurts it. Phases only go up.

use crate::collision::Aabb;
use crate::entity::Projectile;
use glam::Vec3;
use rand::Rng;
use serde::Deserialize;
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub max_health: f32,
    pub half_extent: f32,
    pub phase_two_health: f32,
    pub phase_three_health: f32,
    pub phase_change_cooldown_secs: f32,
    pub arrival_distance: f32,
    pub settle_distance: f32,
    pub patrol_speed: f32,
    /// Per-phase values are indexed by `phase - 1`.
    pub patrol_speed_factor: [f32; 3],
    pub dash_speed: [f32; 3],
    pub vulnerable_secs: [f32; 3],
    pub cooldown_base_secs: [f32; 3],
    pub cooldown_jitter_secs: [f32; 3],
    pub volley_size: [u32; 3],
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_lifetime_secs: f32,
    pub projectile_ring_offset: f32,
    pub projectile_spread: f32,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            half_extent: 1.0,
            phase_two_health: 65.0,
            phase_three_health: 30.0,
            phase_change_cooldown_secs: 2.0,
            arrival_distance: 1.0,
            settle_distance: 0.1,
            patrol_speed: 6.0,
            patrol_speed_factor: [1.0, 1.2, 1.5],
            dash_speed: [24.0, 36.0, 48.0],
            vulnerable_secs: [3.0, 2.0, 1.5],
            cooldown_base_secs: [5.0, 3.0, 2.0],
            cooldown_jitter_secs: [3.0, 2.0, 1.0],
            volley_size: [0, 3, 5],
            projectile_speed: 15.0,
            projectile_damage: 10.0,
            projectile_lifetime_secs: 5.0,
            projectile_ring_offset: 0.5,
            projectile_spread: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossMode {
    Patrolling,
    Attacking { target: Vec3 },
    Vulnerable { remaining: f32 },
    Defeated,
}

/// What happened during one AI tick, for the caller to turn into events.
#[derive(Debug, Clone, PartialEq)]
pub enum BossSignal {
    DashStarted { target: Vec3 },
    VolleyFired { count: usize },
    /// Dash arrived; the boss is now vulnerable.
    Landed { position: Vec3 },
    VulnerabilityEnded,
}

#[derive(Debug, Default)]
pub struct BossTick {
    pub signals: Vec<BossSignal>,
    pub projectiles: Vec<Projectile>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageOutcome {
    pub applied: f32,
    pub new_phase: Option<u8>,
    pub defeated: bool,
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub position: Vec3,
    pub velocity: Vec3,
    health: f32,
    phase: u8,
    pub mode: BossMode,
    pub attack_cooldown: f32,
    pub patrol_target: Vec3,
}

impl Boss {
    pub fn spawn(position: Vec3, config: &BossConfig) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            health: config.max_health,
            phase: 1,
            mode: BossMode::Patrolling,
            attack_cooldown: 0.0,
            patrol_target: position,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn is_vulnerable(&self) -> bool {
        matches!(self.mode, BossMode::Vulnerable { .. })
    }

    pub fn is_defeated(&self) -> bool {
        self.mode == BossMode::Defeated
    }

    pub fn aabb(&self, config: &BossConfig) -> Aabb {
        Aabb::cube(self.position, config.half_extent)
    }

    fn phase_slot(&self) -> usize {
        usize::from(self.phase.clamp(1, 3) - 1)
    }

    /// Advance the AI by `dt` seconds. `time_secs` drives the patrol path.
    pub fn tick<R: Rng>(
        &mut self,
        dt: f32,
        time_secs: f32,
        player: Vec3,
        rng: &mut R,
        config: &BossConfig,
    ) -> BossTick {
        let mut out = BossTick::default();
        if self.is_defeated() {
            return out;
        }
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        let slot = self.phase_slot();

        match self.mode {
            BossMode::Defeated => return out,
            BossMode::Attacking { target } => {
                self.move_toward(target, config.dash_speed[slot], dt);
                if self.position.distance(target) < config.arrival_distance {
                    self.velocity = Vec3::ZERO;
                    self.mode = BossMode::Vulnerable {
                        remaining: config.vulnerable_secs[slot],
                    };
                    out.signals.push(BossSignal::Landed {
                        position: self.position,
                    });
                }
                return out;
            }
            BossMode::Vulnerable { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.mode = BossMode::Patrolling;
                    out.signals.push(BossSignal::VulnerabilityEnded);
                } else {
                    self.mode = BossMode::Vulnerable { remaining };
                }
            }
            BossMode::Patrolling => {}
        }

        self.patrol_target = patrol_target(self.phase, time_secs);

        if self.mode == BossMode::Patrolling && self.attack_cooldown <= 0.0 {
            self.start_attack(player, rng, config, &mut out);
            let jitter: f32 = rng.gen();
            self.attack_cooldown =
                config.cooldown_base_secs[slot] + config.cooldown_jitter_secs[slot] * jitter;
            if matches!(self.mode, BossMode::Attacking { .. }) {
                return out;
            }
        }

        if self.position.distance(self.patrol_target) > config.settle_distance {
            let speed = config.patrol_speed * config.patrol_speed_factor[slot];
            self.move_toward(self.patrol_target, speed, dt);
        } else {
            self.velocity = Vec3::ZERO;
        }
        out
    }

    fn start_attack<R: Rng>(
        &mut self,
        player: Vec3,
        rng: &mut R,
        config: &BossConfig,
        out: &mut BossTick,
    ) {
        let roll: f32 = rng.gen();
        let volley = match self.phase {
            1 => false,
            2 => roll <= 0.5,
            _ => roll > 0.3,
        };
        let count = config.volley_size[self.phase_slot()] as usize;
        if volley && count > 0 {
            for index in 0..count {
                out.projectiles
                    .push(self.aimed_projectile(index, count, player, rng, config));
            }
            log::debug!("Boss phase {} fired {} projectiles", self.phase, count);
            out.signals.push(BossSignal::VolleyFired { count });
        } else {
            self.mode = BossMode::Attacking { target: player };
            log::debug!("Boss phase {} dashing at {:?}", self.phase, player);
            out.signals.push(BossSignal::DashStarted { target: player });
        }
    }

    fn aimed_projectile<R: Rng>(
        &self,
        index: usize,
        count: usize,
        player: Vec3,
        rng: &mut R,
        config: &BossConfig,
    ) -> Projectile {
        let angle = index as f32 / count as f32 * TAU;
        let origin = self.position
            + Vec3::new(angle.sin(), 0.0, angle.cos()) * config.projectile_ring_offset;
        let spread = config.projectile_spread;
        let aim = player
            + Vec3::new(
                rng.gen_range(-spread..=spread),
                0.0,
                rng.gen_range(-spread..=spread),
            );
        let direction = (aim - origin).normalize_or_zero();
        Projectile {
            position: origin,
            direction: if direction == Vec3::ZERO {
                Vec3::NEG_Y
            } else {
                direction
            },
            speed: config.projectile_speed,
            damage: config.projectile_damage,
            lifetime: config.projectile_lifetime_secs,
        }
    }

    fn move_toward(&mut self, target: Vec3, speed: f32, dt: f32) {
        let offset = target - self.position;
        let distance = offset.length();
        let step = speed * dt;
        if distance <= step || distance <= f32::EPSILON {
            self.velocity = if dt > 0.0 { offset / dt } else { Vec3::ZERO };
            self.position = target;
        } else {
            self.velocity = offset / distance * speed;
            self.position += self.velocity * dt;
        }
    }

    /// Apply damage and resolve phase thresholds. A defeated boss ignores it.
    pub fn apply_damage(&mut self, amount: f32, config: &BossConfig) -> DamageOutcome {
        if self.is_defeated() {
            return DamageOutcome::default();
        }
        let before = self.health;
        self.health = (self.health - amount.max(0.0)).max(0.0);
        let mut outcome = DamageOutcome {
            applied: before - self.health,
            ..DamageOutcome::default()
        };

        if self.health <= 0.0 {
            self.mode = BossMode::Defeated;
            self.velocity = Vec3::ZERO;
            outcome.defeated = true;
            log::info!("Boss defeated");
            return outcome;
        }

        let reached = phase_for_health(self.health, config);
        if reached > self.phase {
            self.phase = reached;
            self.attack_cooldown = config.phase_change_cooldown_secs;
            if self.is_vulnerable() {
                self.mode = BossMode::Patrolling;
            }
            outcome.new_phase = Some(reached);
            log::info!("Boss entering phase {reached} at {:.0} health", self.health);
        }
        outcome
    }

    pub fn clear_vulnerability(&mut self) {
        if self.is_vulnerable() {
            self.mode = BossMode::Patrolling;
        }
    }

    /// Shove the boss `distance` units horizontally away from `from`.
    pub fn knock_back(&mut self, from: Vec3, distance: f32) {
        let away = self.position - from;
        let away = Vec3::new(away.x, 0.0, away.z).normalize_or_zero();
        self.position += away * distance;
    }
}

pub fn phase_for_health(health: f32, config: &BossConfig) -> u8 {
    if health <= config.phase_three_health {
        3
    } else if health <= config.phase_two_health {
        2
    } else {
        1
    }
}

/// Where the boss wants to be at `t` seconds while patrolling in `phase`.
pub fn patrol_target(phase: u8, t: f32) -> Vec3 {
    const CENTER_Z: f32 = -10.0;
    match phase {
        1 => {
            let (radius, omega) = (8.0, 0.5);
            Vec3::new(
                (omega * t).sin() * radius,
                5.0 + (2.0 * t).sin() * 0.5,
                (omega * t).cos() * radius + CENTER_Z,
            )
        }
        2 => {
            let (radius, omega) = (6.0, 0.8);
            Vec3::new(
                (omega * t).sin() * radius,
                4.0 + (3.0 * t).sin(),
                (omega * t).cos() * radius + CENTER_Z,
            )
        }
        _ => {
            let (radius, omega) = (5.0, 1.2);
            Vec3::new(
                (omega * t).sin() * radius + (3.0 * t).sin() * 2.0,
                3.0 + (4.0 * t).sin() * 1.5,
                (omega * t).cos() * radius + (2.5 * t).cos() * 2.0 + CENTER_Z,
            )
        }
    }
}
