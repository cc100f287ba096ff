//! Outbound notifications for UI and effects collaborators.
//!
//! Systems push events while mutating the world; hosts drain the queue after
//! each frame. Consumers cannot fail a tick because nothing here calls back.

use crate::entity::Role;
use glam::Vec3;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Shockwave,
    Impact,
    Teleport,
    PhaseTransition,
    DefeatExplosion,
    CrystalBurst,
    Dash,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted,
    ScoreChanged { score: u32 },
    HealthChanged { role: Role, health: f32 },
    Message { text: String, duration_secs: f32 },
    CharacterSwitched { active: Role },
    LevelChanged { level: usize },
    BossSpawned,
    BossHealthChanged { health: f32 },
    PhaseChanged { phase: u8 },
    BossDefeated,
    Effect { kind: EffectKind, position: Vec3 },
    GameOver { score: u32 },
    Won { score: u32 },
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        log::trace!("event: {event:?}");
        self.events.push(event);
    }

    pub fn message(&mut self, text: impl Into<String>, duration_secs: f32) {
        self.push(GameEvent::Message {
            text: text.into(),
            duration_secs,
        });
    }

    pub fn effect(&mut self, kind: EffectKind, position: Vec3) {
        self.push(GameEvent::Effect { kind, position });
    }

    pub fn health(&mut self, role: Role, health: f32) {
        self.push(GameEvent::HealthChanged { role, health });
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
