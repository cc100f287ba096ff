//! Per-character special abilities.
//!
//! Karina's Super Bounce launches her at twice the base jump and releases a
//! shockwave on landing that shoves nearby enemies away. Kelsey's Speed Dash
//! drives her along the camera forward for a short window. Readiness comes
//! back through scheduled records, so level loads cancel pending cooldowns.

use crate::controller::MovementConfig;
use crate::entity::Role;
use crate::events::EffectKind;
use crate::lifecycle::ScheduledAction;
use crate::world::{StepContext, World};
use cq_core::time::secs_to_us;

/// Fire the active character's ability. Returns false while it is still in use.
pub fn activate(world: &mut World, ctx: &mut StepContext, config: &MovementConfig) -> bool {
    let role = world.active;
    if world.character(role).is_using_ability {
        return false;
    }
    match role {
        Role::Karina => super_bounce(world, ctx, config),
        Role::Kelsey => speed_dash(world, ctx, config),
    }
    true
}

fn super_bounce(world: &mut World, ctx: &mut StepContext, config: &MovementConfig) {
    let now = world.now_us;
    let karina = world.character_mut(Role::Karina);
    karina.is_using_ability = true;
    karina.awaiting_landing = true;
    karina.velocity.y = config.jump_speed * config.bounce_jump_factor;
    karina.is_jumping = true;
    karina.scale_y = config.takeoff_scale;
    ctx.scheduler.schedule_after(
        now,
        secs_to_us(config.bounce_watch_secs),
        ScheduledAction::EndLandingWatch { role: Role::Karina },
    );
    log::debug!("Karina used Super Bounce");
}

fn speed_dash(world: &mut World, ctx: &mut StepContext, config: &MovementConfig) {
    let now = world.now_us;
    let forward = world.camera.basis().forward;
    let kelsey = world.character_mut(Role::Kelsey);
    kelsey.is_using_ability = true;
    kelsey.dash_velocity = forward * config.move_speed * config.dash_speed_factor;
    kelsey.dash_remaining = config.dash_secs;
    let position = kelsey.position;

    ctx.events.effect(EffectKind::Dash, position);
    ctx.events.message("Speed Dash!", 1.0);
    ctx.scheduler.schedule_after(
        now,
        secs_to_us(config.dash_cooldown_secs),
        ScheduledAction::AbilityReady { role: Role::Kelsey },
    );
    log::debug!("Kelsey used Speed Dash");
}

/// Landing hook, called after movement for every character that touched down.
pub fn on_landed(world: &mut World, role: Role, ctx: &mut StepContext, config: &MovementConfig) {
    if role != Role::Karina || !world.character(role).awaiting_landing {
        return;
    }
    let now = world.now_us;
    let center = {
        let karina = world.character_mut(role);
        karina.awaiting_landing = false;
        karina.position
    };

    for enemy in &mut world.enemies {
        let offset = enemy.position - center;
        let distance = offset.length();
        if distance < config.bounce_push_radius {
            let force =
                config.bounce_push_force * (1.0 - distance / config.bounce_push_radius);
            enemy.position += offset.normalize_or_zero() * force;
        }
    }

    ctx.events.effect(EffectKind::Shockwave, center);
    ctx.events.message("Super Bounce!", 1.0);
    ctx.scheduler.schedule_after(
        now,
        secs_to_us(config.bounce_cooldown_secs),
        ScheduledAction::AbilityReady { role },
    );
}

pub fn make_ready(world: &mut World, role: Role) {
    let character = world.character_mut(role);
    character.is_using_ability = false;
    character.awaiting_landing = false;
    log::debug!("{} ability ready", role.name());
}

/// The bounce never landed in time; give the ability back without a shockwave.
pub fn end_landing_watch(world: &mut World, role: Role) {
    if world.character(role).awaiting_landing {
        log::debug!("{} landing watch expired", role.name());
        make_ready(world, role);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Enemy, PatrolAxis};
    use crate::events::{EventQueue, GameEvent};
    use crate::world::TickRequests;
    use cq_core::schedule::Scheduler;
    use glam::Vec3;

    struct Harness {
        events: EventQueue,
        scheduler: Scheduler<ScheduledAction>,
        requests: TickRequests,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                events: EventQueue::new(),
                scheduler: Scheduler::new(),
                requests: TickRequests::default(),
            }
        }

        fn ctx(&mut self) -> StepContext<'_> {
            StepContext {
                events: &mut self.events,
                scheduler: &mut self.scheduler,
                requests: &mut self.requests,
            }
        }
    }

    #[test]
    fn super_bounce_launches_and_blocks_reuse() {
        let config = MovementConfig::default();
        let mut world = World::new(1);
        let mut harness = Harness::new();

        assert!(activate(&mut world, &mut harness.ctx(), &config));
        let karina = world.character(Role::Karina);
        assert_eq!(karina.velocity.y, 24.0);
        assert!(karina.is_jumping);
        assert!(karina.awaiting_landing);
        assert!(!activate(&mut world, &mut harness.ctx(), &config));
        assert_eq!(harness.scheduler.len(), 1);
    }

    #[test]
    fn landing_pushes_nearby_enemies_only() {
        let config = MovementConfig::default();
        let mut world = World::new(1);
        let mut harness = Harness::new();
        world.character_mut(Role::Karina).position = Vec3::new(0.0, 0.5, 0.0);
        world
            .enemies
            .push(Enemy::new(Vec3::new(2.0, 0.5, 0.0), PatrolAxis::X, 2.0, 1.8));
        world
            .enemies
            .push(Enemy::new(Vec3::new(0.0, 0.5, 9.0), PatrolAxis::Z, 2.0, 1.8));

        activate(&mut world, &mut harness.ctx(), &config);
        on_landed(&mut world, Role::Karina, &mut harness.ctx(), &config);

        assert!((world.enemies[0].position.x - 5.0).abs() < 1e-4);
        assert_eq!(world.enemies[1].position, Vec3::new(0.0, 0.5, 9.0));
        assert!(!world.character(Role::Karina).awaiting_landing);
        assert!(world.character(Role::Karina).is_using_ability);
        assert!(harness.events.iter().any(|e| matches!(
            e,
            GameEvent::Effect {
                kind: EffectKind::Shockwave,
                ..
            }
        )));
    }

    #[test]
    fn landing_watch_expiry_releases_ability() {
        let config = MovementConfig::default();
        let mut world = World::new(1);
        let mut harness = Harness::new();
        activate(&mut world, &mut harness.ctx(), &config);
        end_landing_watch(&mut world, Role::Karina);
        let karina = world.character(Role::Karina);
        assert!(!karina.is_using_ability);
        assert!(!karina.awaiting_landing);
    }

    #[test]
    fn speed_dash_follows_camera_forward() {
        let config = MovementConfig::default();
        let mut world = World::new(1);
        let mut harness = Harness::new();
        world.switch_active();

        assert!(activate(&mut world, &mut harness.ctx(), &config));
        let kelsey = world.character(Role::Kelsey);
        assert!((kelsey.dash_velocity - Vec3::new(0.0, 0.0, -30.0)).length() < 1e-4);
        assert_eq!(kelsey.dash_remaining, 0.2);
        assert_eq!(harness.scheduler.next_due(), Some(3_000_000));

        make_ready(&mut world, Role::Kelsey);
        assert!(!world.character(Role::Kelsey).is_using_ability);
    }
}
