//! The game loop.
//!
//! A [`Game`] owns the world, the deferred scheduler, the outbound event queue
//! and the registered extensions. Hosts feed it frame time through [`Game::frame`]
//! (fixed-timestep accumulator) or drive single ticks with [`Game::tick`].
//!
//! One tick runs, in order:
//!   1. due scheduled records
//!   2. movement (switch, ability, characters, enemies, landings, falls)
//!   3. boss AI
//!   4. contact resolution
//!   5. lifecycle requests raised by the steps above

use crate::abilities;
use crate::boss::BossSignal;
use crate::camera::FollowCamera;
use crate::campaign::builtin_levels;
use crate::config::{FallPolicy, GameConfig};
use crate::controller::{is_below_floor, step_active, step_passive, ControllerInput, StepReport};
use crate::entity::Role;
use crate::events::{EffectKind, EventQueue, GameEvent};
use crate::extension::Extension;
use crate::interaction;
use crate::level::LevelDescriptor;
use crate::lifecycle::{Phase, ScheduledAction};
use crate::world::{StepContext, TickRequests, World};
use cq_core::input::{Action, InputState};
use cq_core::schedule::Scheduler;
use cq_core::time::{us_to_secs, TimeState};

pub struct Game {
    pub(crate) world: World,
    pub(crate) config: GameConfig,
    pub(crate) levels: Vec<LevelDescriptor>,
    pub(crate) phase: Phase,
    pub(crate) scheduler: Scheduler<ScheduledAction>,
    pub(crate) events: EventQueue,
    pub(crate) input: InputState,
    pub(crate) time: TimeState,
    pub(crate) extensions: Vec<Box<dyn Extension>>,
    /// Set once the current level's completion has been accepted.
    pub(crate) completion_honoured: bool,
}

impl Game {
    /// New session on level one, waiting in `Idle` for [`Game::start`].
    pub fn new(levels: Vec<LevelDescriptor>, config: GameConfig) -> Self {
        let mut game = Self {
            world: World::new(config.seed),
            config,
            levels,
            phase: Phase::Idle,
            scheduler: Scheduler::new(),
            events: EventQueue::new(),
            input: InputState::new(),
            time: TimeState::new(),
            extensions: Vec::new(),
            completion_honoured: false,
        };
        game.load_level(0, Phase::Idle);
        game
    }

    pub fn with_builtin_levels(config: GameConfig) -> Self {
        Self::new(builtin_levels(), config)
    }

    pub fn register_extension(&mut self, extension: Box<dyn Extension>) {
        log::info!("Registered extension '{}'", extension.name());
        self.extensions.push(extension);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn levels(&self) -> &[LevelDescriptor] {
        &self.levels
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn camera_mut(&mut self) -> &mut FollowCamera {
        &mut self.world.camera
    }

    pub fn pending_scheduled(&self) -> usize {
        self.scheduler.len()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn time(&self) -> &TimeState {
        &self.time
    }

    /// Feed measured frame time and run every fixed step it covers.
    pub fn frame(&mut self, real_dt_us: u64) -> u32 {
        self.time.begin_frame_with(real_dt_us);
        while self.time.should_step() {
            let dt_us = self.time.fixed_dt_us;
            self.tick(dt_us);
        }
        self.time.steps_this_frame
    }

    /// Advance the simulation clock by `dt_us` and run one tick.
    pub fn tick(&mut self, dt_us: u64) {
        if self.phase == Phase::Loading {
            log::warn!("Tick ignored while a level is loading");
            return;
        }
        self.world.now_us += dt_us;
        self.run_scheduled();
        if self.phase == Phase::Running {
            self.step_running(us_to_secs(dt_us));
        }
        self.input.end_tick();
    }

    fn step_running(&mut self, dt: f32) {
        let mut requests = TickRequests::default();

        self.step_movement(dt, &mut requests);
        for extension in &mut self.extensions {
            extension.after_movement(&mut self.world, &mut self.events);
        }

        self.step_boss(dt);

        let mut ctx = StepContext {
            events: &mut self.events,
            scheduler: &mut self.scheduler,
            requests: &mut requests,
        };
        interaction::resolve(&mut self.world, dt, &mut ctx, &self.config);
        for extension in &mut self.extensions {
            extension.after_collision(&mut self.world, &mut self.events);
        }

        let focus = self.world.active_character().position;
        self.world.camera.follow(focus);
        self.apply_requests(requests);
    }

    fn step_movement(&mut self, dt: f32, requests: &mut TickRequests) {
        let movement = self.config.movement;
        let mut ctx = StepContext {
            events: &mut self.events,
            scheduler: &mut self.scheduler,
            requests,
        };

        if self.input.is_just_pressed(Action::Switch) {
            let active = self.world.switch_active();
            let focus = self.world.active_character().position;
            self.world.camera.follow(focus);
            ctx.events.push(GameEvent::CharacterSwitched { active });
            ctx.events
                .message(format!("Switched to {}", active.name()), 1.0);
            log::info!("Switched to {}", active.name());
        }
        if self.input.is_just_pressed(Action::Ability) {
            abilities::activate(&mut self.world, &mut ctx, &movement);
        }

        let basis = self.world.camera.basis();
        let input = ControllerInput::from_actions(&self.input, &basis);
        let active = self.world.active;
        let mut reports = [StepReport::default(); 2];
        {
            let World {
                characters,
                platforms,
                ..
            } = &mut self.world;
            for role in Role::ALL {
                let character = &mut characters[role.index()];
                reports[role.index()] = if role == active {
                    step_active(character, input, dt, platforms, &movement)
                } else {
                    step_passive(character, dt, platforms, &movement)
                };
            }
        }
        for enemy in &mut self.world.enemies {
            enemy.patrol(dt);
        }

        for role in Role::ALL {
            if reports[role.index()].landed {
                abilities::on_landed(&mut self.world, role, &mut ctx, &movement);
            }
        }
        for role in Role::ALL {
            if is_below_floor(self.world.character(role), &movement) {
                let level = self.levels.get(self.world.level_index);
                handle_fall(&mut self.world, role, level, self.config.fall_policy, &mut ctx);
            }
        }
    }

    fn step_boss(&mut self, dt: f32) {
        let player = self.world.active_character().position;
        let time_secs = self.world.now_secs();
        let Some(boss) = self.world.boss.as_mut() else {
            return;
        };
        let tick = boss.tick(dt, time_secs, player, &mut self.world.rng, &self.config.boss);
        let phase = boss.phase();

        self.world.projectiles.extend(tick.projectiles);
        for signal in tick.signals {
            match signal {
                BossSignal::DashStarted { .. } => {
                    let text = if phase == 1 {
                        "Boss is attacking!"
                    } else {
                        "Boss charging!"
                    };
                    self.events.message(text, 1.5);
                }
                BossSignal::VolleyFired { .. } => {
                    self.events.message("Boss firing projectiles!", 1.5);
                }
                BossSignal::Landed { position } => {
                    self.events.effect(EffectKind::Shockwave, position);
                    self.events.message("Boss is vulnerable!", 1.5);
                }
                BossSignal::VulnerabilityEnded => log::debug!("Boss recovered"),
            }
        }
    }

    fn apply_requests(&mut self, requests: TickRequests) {
        if requests.game_over {
            self.enter_game_over();
            return;
        }
        if let Some(delay_us) = requests.completion_after_us {
            self.request_completion(delay_us);
        }
    }
}

fn handle_fall(
    world: &mut World,
    role: Role,
    level: Option<&LevelDescriptor>,
    policy: FallPolicy,
    ctx: &mut StepContext,
) {
    let character = world.character_mut(role);
    match policy {
        FallPolicy::Lethal => {
            character.set_health(0.0);
        }
        FallPolicy::Damage { amount } => {
            character.damage(amount);
        }
    }
    let health = character.health();
    ctx.events.health(role, health);
    ctx.events.message(format!("{} fell!", role.name()), 1.5);
    log::info!("{} fell out of the world, health {health:.0}", role.name());

    if health <= 0.0 {
        ctx.requests.game_over = true;
        return;
    }
    if let Some(level) = level {
        let start = match role {
            Role::Karina => level.start_karina,
            Role::Kelsey => level.start_kelsey,
        };
        character.place_at(start.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::{Boss, BossMode};
    use crate::entity::{Enemy, PatrolAxis, PowerUpKind, Projectile, MAX_HEALTH};
    use crate::level::{Point, PowerUpSpec};
    use cq_core::time::FIXED_DT_US;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn empty_level() -> LevelDescriptor {
        LevelDescriptor {
            name: None,
            sky_color: 0xcccccc,
            fog: None,
            ground_color: 0x2e8b57,
            start_karina: Point::new(-2.0, 1.0, 0.0),
            start_kelsey: Point::new(2.0, 1.0, 0.0),
            platforms: Vec::new(),
            crystals: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            teleporter_pairs: Vec::new(),
            boss: None,
        }
    }

    /// One crystal exactly where Karina spawns, so the first tick collects it.
    fn crystal_at_start() -> LevelDescriptor {
        LevelDescriptor {
            crystals: vec![Point::new(-2.0, 1.0, 0.0)],
            ..empty_level()
        }
    }

    fn far_crystal() -> LevelDescriptor {
        LevelDescriptor {
            crystals: vec![Point::new(30.0, 1.0, 30.0)],
            ..empty_level()
        }
    }

    fn running(levels: Vec<LevelDescriptor>) -> Game {
        let mut game = Game::new(levels, GameConfig::default());
        assert!(game.start());
        game
    }

    fn tick_n(game: &mut Game, ticks: usize) {
        for _ in 0..ticks {
            game.tick(FIXED_DT_US);
        }
    }

    fn tick_for(game: &mut Game, secs: f32) {
        let ticks = (secs * 60.0).ceil() as usize;
        tick_n(game, ticks);
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn start_only_from_idle() {
        let mut game = Game::new(vec![far_crystal()], GameConfig::default());
        assert_eq!(game.phase(), Phase::Idle);
        assert!(game.start());
        assert!(!game.start());
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn idle_game_does_not_simulate() {
        let mut game = Game::new(vec![far_crystal()], GameConfig::default());
        tick_n(&mut game, 30);
        assert_eq!(game.world().character(Role::Karina).position.y, 1.0);
    }

    #[test]
    fn last_crystal_triggers_exactly_one_transition() {
        let mut game = running(vec![crystal_at_start(), far_crystal()]);
        game.world_mut().score = 20;
        game.drain_events();

        game.tick(FIXED_DT_US);
        assert_eq!(game.world().score, 30);
        assert!(game.world().crystals.is_empty());
        assert_eq!(game.phase(), Phase::Transitioning);

        tick_for(&mut game, 1.0);
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.world().level_index, 1);
        assert_eq!(game.world().crystals.len(), 1);

        tick_for(&mut game, 2.0);
        let events = game.drain_events();
        assert_eq!(
            count(&events, |e| matches!(e, GameEvent::LevelChanged { .. })),
            1
        );
        assert_eq!(game.world().level_index, 1);
        assert_eq!(game.world().score, 30);
    }

    #[test]
    fn transition_pauses_before_loading() {
        let mut game = running(vec![crystal_at_start(), far_crystal()]);
        game.tick(FIXED_DT_US);
        tick_for(&mut game, 0.5);
        assert_eq!(game.phase(), Phase::Transitioning);
        assert!(game.world().crystals.is_empty());
        tick_for(&mut game, 0.25);
        assert_eq!(game.world().crystals.len(), 1);
    }

    #[test]
    fn completing_the_last_level_wins() {
        let mut game = running(vec![crystal_at_start()]);
        game.tick(FIXED_DT_US);
        assert_eq!(game.phase(), Phase::Won);
        let events = game.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Won { score: 10 })));
    }

    #[test]
    fn enemy_contact_respects_shared_cooldown() {
        let mut game = running(vec![far_crystal()]);
        game.world_mut()
            .enemies
            .push(Enemy::new(Vec3::new(-2.0, 0.5, 0.0), PatrolAxis::X, 0.0, 0.0));

        game.tick(FIXED_DT_US);
        assert_eq!(game.world().character(Role::Karina).health(), 85.0);

        tick_n(&mut game, 58);
        assert_eq!(game.world().character(Role::Karina).health(), 85.0);

        tick_n(&mut game, 4);
        assert_eq!(game.world().character(Role::Karina).health(), 70.0);
    }

    #[test]
    fn enemy_contact_pushes_the_character_away() {
        let mut game = running(vec![far_crystal()]);
        game.world_mut()
            .enemies
            .push(Enemy::new(Vec3::new(-1.4, 0.5, 0.0), PatrolAxis::X, 0.0, 0.0));

        game.tick(FIXED_DT_US);
        assert_eq!(game.world().character(Role::Karina).health(), 85.0);
        let hit_x = game.world().character(Role::Karina).position.x;

        tick_n(&mut game, 30);
        let karina = game.world().character(Role::Karina);
        assert!(karina.position.x < hit_x - 1.0, "x = {}", karina.position.x);
        assert_eq!(karina.position.z, 0.0);
        assert_eq!(karina.health(), 85.0);
    }

    #[test]
    fn health_never_leaves_bounds_and_zero_ends_the_game() {
        let mut game = running(vec![far_crystal()]);
        game.world_mut()
            .enemies
            .push(Enemy::new(Vec3::new(-2.0, 0.5, 0.0), PatrolAxis::X, 0.0, 0.0));

        for _ in 0..(60 * 10) {
            game.tick(FIXED_DT_US);
            let health = game.world().character(Role::Karina).health();
            assert!((0.0..=MAX_HEALTH).contains(&health));
        }
        assert_eq!(game.world().character(Role::Karina).health(), 0.0);
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn teleport_relocates_exactly_then_cools_down() {
        let level = LevelDescriptor {
            teleporter_pairs: vec![[Point::new(-2.0, 0.0, 0.0), Point::new(10.0, 2.1, -5.0)]],
            ..far_crystal()
        };
        let mut game = running(vec![level]);

        let mut ticks = 0;
        while game.world().last_teleport_us.is_none() && ticks < 120 {
            game.tick(FIXED_DT_US);
            ticks += 1;
        }
        let stamp = game.world().last_teleport_us.expect("should have teleported");
        let karina = game.world().character(Role::Karina);
        assert_eq!(karina.position, Vec3::new(10.0, 3.1, -5.0));
        assert_eq!(karina.velocity, Vec3::new(0.0, 3.0, 0.0));

        tick_for(&mut game, 1.5);
        assert_eq!(game.world().last_teleport_us, Some(stamp));
        assert_eq!(game.world().character(Role::Karina).position.x, 10.0);
    }

    #[test]
    fn shield_absorbs_contact_until_it_expires() {
        let level = LevelDescriptor {
            power_ups: vec![PowerUpSpec {
                x: -2.0,
                y: 1.0,
                z: 0.0,
                kind: Some(PowerUpKind::Shield),
            }],
            ..far_crystal()
        };
        let mut game = running(vec![level]);
        game.tick(FIXED_DT_US);
        assert!(game.world().character(Role::Karina).is_shielded);
        let picked_at = game.world().now_us;

        game.world_mut()
            .enemies
            .push(Enemy::new(Vec3::new(-2.0, 0.5, 0.0), PatrolAxis::X, 0.0, 0.0));
        tick_for(&mut game, 7.5);
        assert_eq!(game.world().character(Role::Karina).health(), 100.0);

        while game.world().now_us < picked_at + 8_000_000 + 2 * FIXED_DT_US {
            game.tick(FIXED_DT_US);
        }
        let karina = game.world().character(Role::Karina);
        assert!(!karina.is_shielded);
        assert_eq!(karina.health(), 85.0);
    }

    #[test]
    fn shield_absorbs_projectiles() {
        let mut game = running(vec![far_crystal()]);
        game.world_mut()
            .character_mut(Role::Karina)
            .add_modifier(crate::entity::Modifier {
                id: 900,
                kind: crate::entity::ModifierKind::Shield,
            });
        let target = game.world().character(Role::Karina).position;
        game.world_mut().projectiles.push(Projectile {
            position: target,
            direction: Vec3::X,
            speed: 0.0,
            damage: 10.0,
            lifetime: 5.0,
        });
        game.tick(FIXED_DT_US);
        assert!(game.world().projectiles.is_empty());
        assert_eq!(game.world().character(Role::Karina).health(), 100.0);
    }

    #[test]
    fn projectiles_ignore_contact_cooldown() {
        let mut game = running(vec![far_crystal()]);
        game.world_mut().last_damage_us = Some(game.world().now_us);
        let target = game.world().character(Role::Kelsey).position;
        for _ in 0..2 {
            game.world_mut().projectiles.push(Projectile {
                position: target,
                direction: Vec3::NEG_Z,
                speed: 0.0,
                damage: 10.0,
                lifetime: 5.0,
            });
        }
        game.tick(FIXED_DT_US);
        assert_eq!(game.world().character(Role::Kelsey).health(), 80.0);
        assert!(game.world().projectiles.is_empty());
    }

    #[test]
    fn projectiles_expire() {
        let mut game = running(vec![far_crystal()]);
        game.world_mut().projectiles.push(Projectile {
            position: Vec3::new(40.0, 20.0, 40.0),
            direction: Vec3::Y,
            speed: 1.0,
            damage: 10.0,
            lifetime: 0.5,
        });
        tick_for(&mut game, 0.6);
        assert!(game.world().projectiles.is_empty());
    }

    #[test]
    fn lethal_fall_ends_the_game() {
        let mut game = running(vec![far_crystal()]);
        let karina = game.world_mut().character_mut(Role::Karina);
        karina.set_health(40.0);
        karina.place_at(Vec3::new(0.0, -14.9, 0.0));

        tick_n(&mut game, 10);
        assert_eq!(game.world().character(Role::Karina).health(), 0.0);
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn damaging_fall_respawns_at_start() {
        let config = GameConfig {
            fall_policy: FallPolicy::Damage { amount: 25.0 },
            ..GameConfig::default()
        };
        let mut game = Game::new(vec![far_crystal()], config);
        game.start();
        let kelsey = game.world_mut().character_mut(Role::Kelsey);
        kelsey.set_health(40.0);
        kelsey.place_at(Vec3::new(0.0, -14.9, 0.0));

        tick_n(&mut game, 10);
        let kelsey = game.world().character(Role::Kelsey);
        assert_eq!(kelsey.health(), 15.0);
        assert_eq!(kelsey.position.x, 2.0);
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn vulnerable_boss_at_seventy_drops_to_phase_two() {
        let mut game = running(vec![far_crystal()]);
        let config = game.config().boss;
        let karina = game.world().character(Role::Karina).position;
        let mut boss = Boss::spawn(karina, &config);
        boss.apply_damage(30.0, &config);
        boss.mode = BossMode::Vulnerable { remaining: 2.0 };
        game.world_mut().boss = Some(boss);

        game.tick(FIXED_DT_US);
        let boss = game.world().boss.as_ref().expect("boss alive");
        assert_eq!(boss.health(), 60.0);
        assert_eq!(boss.phase(), 2);
        assert!(!boss.is_vulnerable());
        let events = game.drain_events();
        assert_eq!(
            count(&events, |e| matches!(e, GameEvent::PhaseChanged { phase: 2 })),
            1
        );
        assert_eq!(game.world().character(Role::Karina).health(), 100.0);
    }

    #[test]
    fn invulnerable_boss_hurts_on_contact() {
        let mut game = running(vec![far_crystal()]);
        let config = game.config().boss;
        let karina = game.world().character(Role::Karina).position;
        let mut boss = Boss::spawn(karina, &config);
        boss.attack_cooldown = 30.0;
        game.world_mut().boss = Some(boss);

        game.tick(FIXED_DT_US);
        assert_eq!(game.world().character(Role::Karina).health(), 85.0);
        assert_eq!(game.world().boss.as_ref().map(Boss::health), Some(100.0));
    }

    #[test]
    fn boss_defeat_pays_out_and_completes_after_delay() {
        let mut game = running(vec![far_crystal(), far_crystal()]);
        let config = game.config().boss;
        let karina = game.world().character(Role::Karina).position;
        game.world_mut().character_mut(Role::Kelsey).set_health(80.0);
        let mut boss = Boss::spawn(karina, &config);
        boss.apply_damage(90.0, &config);
        boss.mode = BossMode::Vulnerable { remaining: 2.0 };
        game.world_mut().boss = Some(boss);
        game.world_mut().projectiles.push(Projectile {
            position: Vec3::new(30.0, 10.0, 30.0),
            direction: Vec3::Y,
            speed: 0.0,
            damage: 10.0,
            lifetime: 5.0,
        });

        game.tick(FIXED_DT_US);
        assert!(game.world().boss.is_none());
        assert!(game.world().projectiles.is_empty());
        assert_eq!(game.world().score, 500);
        assert_eq!(game.world().character(Role::Karina).health(), 100.0);
        assert_eq!(game.world().character(Role::Kelsey).health(), 100.0);
        assert_eq!(game.phase(), Phase::Running);

        tick_for(&mut game, 1.9);
        assert_eq!(game.world().level_index, 0);
        tick_for(&mut game, 1.0);
        assert_eq!(game.world().level_index, 1);
    }

    #[test]
    fn boss_spawns_two_seconds_into_a_boss_level() {
        let arena = LevelDescriptor {
            boss: Some(Point::new(0.0, 4.0, -5.0)),
            ..far_crystal()
        };
        let mut game = running(vec![arena]);
        tick_for(&mut game, 1.9);
        assert!(game.world().boss.is_none());
        tick_for(&mut game, 0.2);
        let boss = game.world().boss.as_ref().expect("boss should be up");
        assert_eq!(boss.health(), 100.0);
        assert_eq!(boss.phase(), 1);
    }

    #[test]
    fn reset_restores_session_and_cancels_timers() {
        let level = LevelDescriptor {
            power_ups: vec![PowerUpSpec {
                x: -2.0,
                y: 1.0,
                z: 0.0,
                kind: None,
            }],
            ..far_crystal()
        };
        let mut game = running(vec![level, far_crystal()]);
        game.tick(FIXED_DT_US);
        assert!((game.world().character(Role::Karina).speed_multiplier - 1.8).abs() < 1e-5);
        assert_eq!(game.pending_scheduled(), 1);
        game.world_mut().score = 70;
        game.world_mut().character_mut(Role::Kelsey).set_health(12.0);

        game.reset();
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.world().score, 0);
        assert_eq!(game.world().level_index, 0);
        assert_eq!(game.pending_scheduled(), 0);
        for role in Role::ALL {
            let character = game.world().character(role);
            assert_eq!(character.health(), 100.0);
            assert!(character.modifiers().is_empty());
        }
        assert!((game.world().character(Role::Karina).speed_multiplier - 0.9).abs() < 1e-5);
        assert_eq!(game.world().power_ups.len(), 1);
    }

    #[test]
    fn switch_swaps_active_without_moving_anyone() {
        let mut game = running(vec![far_crystal()]);
        tick_n(&mut game, 30);
        let before = game.world().character(Role::Kelsey).position;
        game.input_mut().press(Action::Switch);
        game.tick(FIXED_DT_US);
        assert_eq!(game.world().active, Role::Kelsey);
        assert_eq!(game.world().character(Role::Kelsey).position, before);

        game.tick(FIXED_DT_US);
        assert_eq!(game.world().active, Role::Kelsey);
    }

    #[test]
    fn loading_phase_blocks_ticks() {
        let mut game = running(vec![far_crystal()]);
        game.phase = Phase::Loading;
        let before = game.world().now_us;
        game.tick(FIXED_DT_US);
        assert_eq!(game.world().now_us, before);
    }

    #[test]
    fn frame_runs_fixed_steps() {
        let mut game = running(vec![far_crystal()]);
        assert_eq!(game.frame(FIXED_DT_US * 3), 3);
        assert_eq!(game.world().now_us, FIXED_DT_US * 3);
    }

    struct Recorder {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Extension for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn after_movement(&mut self, _world: &mut World, _events: &mut EventQueue) {
            self.log.borrow_mut().push("movement");
        }

        fn after_collision(&mut self, _world: &mut World, _events: &mut EventQueue) {
            self.log.borrow_mut().push("collision");
        }

        fn after_load(
            &mut self,
            _world: &mut World,
            _level: &LevelDescriptor,
            _events: &mut EventQueue,
        ) {
            self.log.borrow_mut().push("load");
        }
    }

    #[test]
    fn extensions_run_at_each_hook_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut game = Game::new(vec![far_crystal()], GameConfig::default());
        game.register_extension(Box::new(Recorder { log: log.clone() }));
        game.start();
        game.tick(FIXED_DT_US);
        game.reset();
        assert_eq!(*log.borrow(), vec!["movement", "collision", "load"]);
    }
}
