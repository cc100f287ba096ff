//! Pairwise contact resolution for the active character.
//!
//! Runs once per tick after movement and the boss AI. Pickups are removed as
//! they are consumed, contact damage from enemies and the boss shares a single
//! cooldown, and projectiles are advanced, expired and resolved in one pass.

use crate::collision::Aabb;
use crate::config::GameConfig;
use crate::entity::{Modifier, PowerUp, Projectile, Role};
use crate::events::{EffectKind, GameEvent};
use crate::lifecycle::{self, ScheduledAction};
use crate::world::{StepContext, World};
use cq_core::time::secs_to_us;
use glam::Vec3;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub crystal_score: u32,
    pub crystal_heal: f32,
    pub contact_damage: f32,
    pub contact_cooldown_secs: f32,
    pub enemy_knockback: f32,
    pub enemy_knockback_lift: f32,
    pub boss_knockback: f32,
    pub boss_knockback_lift: f32,
    /// Damage the boss takes from touching it while vulnerable.
    pub boss_hit_damage: f32,
    pub boss_hit_push: f32,
    pub teleport_cooldown_secs: f32,
    pub teleport_lift: f32,
    pub teleport_clearance: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            crystal_score: 10,
            crystal_heal: 3.0,
            contact_damage: 15.0,
            contact_cooldown_secs: 1.0,
            enemy_knockback: 6.0,
            enemy_knockback_lift: 3.0,
            boss_knockback: 9.0,
            boss_knockback_lift: 4.2,
            boss_hit_damage: 10.0,
            boss_hit_push: 1.0,
            teleport_cooldown_secs: 2.0,
            teleport_lift: 3.0,
            teleport_clearance: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactResult {
    Hit,
    Absorbed,
    CoolingDown,
}

pub fn resolve(world: &mut World, dt: f32, ctx: &mut StepContext, config: &GameConfig) {
    collect_crystals(world, ctx, config);
    touch_enemies(world, ctx, config);
    collect_power_ups(world, ctx, config);
    use_teleporters(world, ctx, config);
    touch_boss(world, ctx, config);
    resolve_projectiles(world, dt, ctx, config.movement.character_radius);
}

fn active_body(world: &World, config: &GameConfig) -> Aabb {
    world
        .active_character()
        .aabb(config.movement.character_radius)
}

fn collect_crystals(world: &mut World, ctx: &mut StepContext, config: &GameConfig) {
    let body = active_body(world, config);
    let mut collected = Vec::new();
    world.crystals.retain(|crystal| {
        let hit = crystal.aabb().intersects(&body);
        if hit {
            collected.push(crystal.position);
        }
        !hit
    });
    if collected.is_empty() {
        return;
    }

    let role = world.active;
    for position in collected {
        world.score += config.combat.crystal_score;
        ctx.events.push(GameEvent::ScoreChanged { score: world.score });
        ctx.events.effect(EffectKind::CrystalBurst, position);
        ctx.events
            .message(format!("+{} points!", config.combat.crystal_score), 1.5);

        let character = world.character_mut(role);
        let gained = character.heal(config.combat.crystal_heal);
        if gained > 0.0 {
            ctx.events.message(format!("+{gained:.0} Health"), 1.5);
        }
        ctx.events.health(role, character.health());
    }
    log::debug!(
        "{} crystal(s) left, score {}",
        world.crystals.len(),
        world.score
    );

    if world.crystals.is_empty() {
        ctx.events.message("Level Complete!", 2.0);
        ctx.requests.request_completion(0);
    }
}

/// Contact damage to the active character from something at `source`.
///
/// Enemy and boss contact share one cooldown stamp. A shield absorbs the hit
/// without consuming the cooldown.
pub fn contact_damage(
    world: &mut World,
    source: Vec3,
    knockback: f32,
    lift: f32,
    ctx: &mut StepContext,
    config: &GameConfig,
) -> ContactResult {
    let window = secs_to_us(config.combat.contact_cooldown_secs);
    if !world.cooldown_elapsed(world.last_damage_us, window) {
        return ContactResult::CoolingDown;
    }
    let role = world.active;
    let now = world.now_us;
    let character = world.character_mut(role);
    if character.is_shielded {
        log::debug!("{} shield absorbed contact", role.name());
        return ContactResult::Absorbed;
    }

    character.damage(config.combat.contact_damage);
    let away = character.position - source;
    let away = Vec3::new(away.x, 0.0, away.z).normalize_or_zero();
    character.knockback = away * knockback;
    character.velocity.x += character.knockback.x;
    character.velocity.z += character.knockback.z;
    character.velocity.y = lift;
    character.is_jumping = true;
    let health = character.health();

    world.last_damage_us = Some(now);
    ctx.events.health(role, health);
    log::debug!("{} took contact damage, health {health:.0}", role.name());
    if health <= 0.0 {
        ctx.requests.game_over = true;
    }
    ContactResult::Hit
}

fn touch_enemies(world: &mut World, ctx: &mut StepContext, config: &GameConfig) {
    let body = active_body(world, config);
    let source = world
        .enemies
        .iter()
        .find(|enemy| enemy.aabb().intersects(&body))
        .map(|enemy| enemy.position);
    if let Some(source) = source {
        contact_damage(
            world,
            source,
            config.combat.enemy_knockback,
            config.combat.enemy_knockback_lift,
            ctx,
            config,
        );
    }
}

fn collect_power_ups(world: &mut World, ctx: &mut StepContext, config: &GameConfig) {
    let body = active_body(world, config);
    let mut picked: Vec<PowerUp> = Vec::new();
    world.power_ups.retain(|power_up| {
        let hit = power_up.aabb().intersects(&body);
        if hit {
            picked.push(*power_up);
        }
        !hit
    });

    for power_up in picked {
        let role = world.active;
        let id = world.next_modifier_id();
        world.character_mut(role).add_modifier(Modifier {
            id,
            kind: power_up.kind.modifier(),
        });
        ctx.scheduler.schedule_after(
            world.now_us,
            secs_to_us(power_up.kind.duration_secs()),
            ScheduledAction::ExpireModifier { role, id },
        );
        ctx.events.message(
            format!("{} got {}!", role.name(), power_up.kind.label()),
            2.0,
        );
        log::debug!("{} picked up {:?}", role.name(), power_up.kind);
    }
}

fn use_teleporters(world: &mut World, ctx: &mut StepContext, config: &GameConfig) {
    let window = secs_to_us(config.combat.teleport_cooldown_secs);
    if !world.cooldown_elapsed(world.last_teleport_us, window) {
        return;
    }
    let body = active_body(world, config);
    let Some(entry) = world
        .teleporters
        .iter()
        .find(|pad| pad.aabb().intersects(&body))
        .copied()
    else {
        return;
    };
    let Some(exit) = world
        .teleporters
        .iter()
        .find(|pad| pad.pair == entry.pair && pad.slot != entry.slot)
        .copied()
    else {
        log::warn!("Teleporter pair {} has no partner pad", entry.pair);
        return;
    };

    let destination = exit.position
        + Vec3::Y * (config.movement.character_radius + config.combat.teleport_clearance);
    let now = world.now_us;
    let character = world.active_character_mut();
    character.position = destination;
    character.velocity = Vec3::new(0.0, config.combat.teleport_lift, 0.0);
    character.is_jumping = true;
    world.last_teleport_us = Some(now);

    ctx.events.effect(EffectKind::Teleport, entry.position);
    ctx.events.effect(EffectKind::Teleport, exit.position);
    ctx.events.message("Teleported!", 1.0);
    log::debug!("Teleported through pair {} to {destination:?}", entry.pair);
}

fn touch_boss(world: &mut World, ctx: &mut StepContext, config: &GameConfig) {
    let body = active_body(world, config);
    let player = world.active_character().position;
    let Some(boss) = world.boss.as_mut() else {
        return;
    };
    if boss.is_defeated() || !boss.aabb(&config.boss).intersects(&body) {
        return;
    }

    if !boss.is_vulnerable() {
        let source = boss.position;
        let result = contact_damage(
            world,
            source,
            config.combat.boss_knockback,
            config.combat.boss_knockback_lift,
            ctx,
            config,
        );
        if result == ContactResult::Absorbed {
            ctx.events.message("Shield absorbed boss hit!", 1.0);
        }
        return;
    }

    let outcome = boss.apply_damage(config.combat.boss_hit_damage, &config.boss);
    boss.knock_back(player, config.combat.boss_hit_push);
    boss.clear_vulnerability();
    let (health, position) = (boss.health(), boss.position);

    ctx.events.push(GameEvent::BossHealthChanged { health });
    ctx.events.effect(EffectKind::Impact, position);
    if let Some(phase) = outcome.new_phase {
        ctx.events.push(GameEvent::PhaseChanged { phase });
        ctx.events.effect(EffectKind::PhaseTransition, position);
        ctx.events
            .message(format!("Boss entering Phase {phase}!"), 2.0);
    }
    if outcome.defeated {
        lifecycle::defeat_boss(world, ctx, config);
    }
}

fn resolve_projectiles(world: &mut World, dt: f32, ctx: &mut StepContext, radius: f32) {
    if world.projectiles.is_empty() {
        return;
    }
    let bodies: [(Role, Aabb); 2] =
        Role::ALL.map(|role| (role, world.character(role).aabb(radius)));

    let mut hits: Vec<(Role, Projectile)> = Vec::new();
    world.projectiles.retain_mut(|projectile| {
        projectile.advance(dt);
        if projectile.is_expired() {
            return false;
        }
        let shot = projectile.aabb();
        match bodies.iter().find(|(_, body)| body.intersects(&shot)) {
            Some(&(role, _)) => {
                hits.push((role, *projectile));
                false
            }
            None => true,
        }
    });

    for (role, projectile) in hits {
        ctx.events.effect(EffectKind::Impact, projectile.position);
        let character = world.character_mut(role);
        if character.is_shielded {
            ctx.events.message("Shield absorbed hit!", 1.0);
            continue;
        }
        character.damage(projectile.damage);
        let health = character.health();
        ctx.events.health(role, health);
        log::debug!("{} hit by projectile, health {health:.0}", role.name());
        if health <= 0.0 {
            ctx.requests.game_over = true;
        }
    }
}
