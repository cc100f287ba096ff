//! Crystal Quest simulation core.
//!
//! Two cooperating characters, crystals, patrolling enemies, power-ups,
//! teleporters and a three-phase boss, advanced in fixed integer-microsecond
//! ticks. Rendering, audio and the browser shell live outside this crate and
//! consume [`events::GameEvent`]s drained from the [`game::Game`].

pub mod abilities;
pub mod boss;
pub mod camera;
pub mod campaign;
pub mod collision;
pub mod config;
pub mod controller;
pub mod entity;
pub mod error;
pub mod events;
pub mod extension;
pub mod game;
pub mod interaction;
pub mod level;
pub mod lifecycle;
pub mod replay;
pub mod world;

pub use config::GameConfig;
pub use game::Game;
pub use lifecycle::Phase;
