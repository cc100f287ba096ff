//! The mutable game state every system reads and writes during a tick.

use crate::boss::Boss;
use crate::camera::FollowCamera;
use crate::entity::{Character, Crystal, Enemy, Platform, PowerUp, Projectile, Role, Teleporter};
use crate::events::EventQueue;
use crate::level::FogSpec;
use crate::lifecycle::ScheduledAction;
use cq_core::schedule::Scheduler;
use cq_core::time::us_to_secs;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub sky_color: u32,
    pub fog: Option<FogSpec>,
    pub ground_color: u32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            sky_color: 0xcccccc,
            fog: None,
            ground_color: 0x2e8b57,
        }
    }
}

pub struct World {
    pub characters: [Character; 2],
    pub active: Role,
    pub platforms: Vec<Platform>,
    pub crystals: Vec<Crystal>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    pub teleporters: Vec<Teleporter>,
    pub boss: Option<Boss>,
    pub projectiles: Vec<Projectile>,
    pub environment: Environment,
    pub camera: FollowCamera,
    pub score: u32,
    pub level_index: usize,
    /// Simulation clock in microseconds. Only advanced by ticks.
    pub now_us: u64,
    pub last_damage_us: Option<u64>,
    pub last_teleport_us: Option<u64>,
    pub rng: StdRng,
    next_modifier_id: u64,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            characters: [Character::new(Role::Karina), Character::new(Role::Kelsey)],
            active: Role::Karina,
            platforms: Vec::new(),
            crystals: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            teleporters: Vec::new(),
            boss: None,
            projectiles: Vec::new(),
            environment: Environment::default(),
            camera: FollowCamera::new(),
            score: 0,
            level_index: 0,
            now_us: 0,
            last_damage_us: None,
            last_teleport_us: None,
            rng: StdRng::seed_from_u64(seed),
            next_modifier_id: 1,
        }
    }

    pub fn character(&self, role: Role) -> &Character {
        &self.characters[role.index()]
    }

    pub fn character_mut(&mut self, role: Role) -> &mut Character {
        &mut self.characters[role.index()]
    }

    pub fn active_character(&self) -> &Character {
        self.character(self.active)
    }

    pub fn active_character_mut(&mut self) -> &mut Character {
        self.character_mut(self.active)
    }

    pub fn switch_active(&mut self) -> Role {
        self.active = self.active.other();
        self.active
    }

    pub fn now_secs(&self) -> f32 {
        us_to_secs(self.now_us)
    }

    pub fn next_modifier_id(&mut self) -> u64 {
        let id = self.next_modifier_id;
        self.next_modifier_id += 1;
        id
    }

    /// True when no stamp exists or at least `window_us` passed since it.
    pub fn cooldown_elapsed(&self, stamp: Option<u64>, window_us: u64) -> bool {
        stamp.map_or(true, |at| self.now_us.saturating_sub(at) >= window_us)
    }

    /// Drop every per-level entity. Characters, score and clock survive.
    pub fn clear_level(&mut self) {
        self.platforms.clear();
        self.crystals.clear();
        self.enemies.clear();
        self.power_ups.clear();
        self.teleporters.clear();
        self.boss = None;
        self.projectiles.clear();
    }
}

/// Follow-up work a system asks the lifecycle to perform once the tick ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickRequests {
    /// Level completion, with the delay before the transition starts.
    pub completion_after_us: Option<u64>,
    pub game_over: bool,
}

impl TickRequests {
    pub fn request_completion(&mut self, delay_us: u64) {
        if self.completion_after_us.is_none() {
            self.completion_after_us = Some(delay_us);
        }
    }
}

/// Borrowed outputs a system writes into while it runs.
pub struct StepContext<'a> {
    pub events: &'a mut EventQueue,
    pub scheduler: &'a mut Scheduler<ScheduledAction>,
    pub requests: &'a mut TickRequests,
}
