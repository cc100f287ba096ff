//! Scripted input playback.
//!
//! A replay is a list of held-action snapshots, each repeated for a number of
//! fixed steps. A frame may also carry a lifecycle command and a camera
//! orbit/zoom nudge, both applied once before its first step. Feeding the
//! same replay to two games built from the same seed and levels yields
//! identical worlds and identical event streams.

use crate::error::{read_json, LoadError};
use crate::game::Game;
use cq_core::input::Action;
use cq_core::time::secs_to_us;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplayCommand {
    Start,
    Restart,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub held: Vec<Action>,
    /// Lifecycle command issued before the first repeat of this frame.
    #[serde(default)]
    pub command: Option<ReplayCommand>,
    /// Camera orbit as `[yaw, pitch]` radians.
    #[serde(default)]
    pub orbit: Option<[f32; 2]>,
    /// Scroll notches; positive zooms out. Zoom resets the orbit, so a
    /// frame that needs both should zoom first.
    #[serde(default)]
    pub zoom: Option<f32>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    pub held: Vec<Action>,
    pub command: Option<ReplayCommand>,
    pub orbit: Option<[f32; 2]>,
    pub zoom: Option<f32>,
}

impl ReplaySequence {
    pub fn expanded_steps(&self) -> Vec<ReplayStep> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for index in 0..frame.repeat.max(1) {
                let first = index == 0;
                out.push(ReplayStep {
                    held: frame.held.clone(),
                    command: frame.command.filter(|_| first),
                    orbit: frame.orbit.filter(|_| first),
                    zoom: frame.zoom.filter(|_| first),
                });
            }
        }
        out
    }

    pub fn step_us(&self) -> u64 {
        secs_to_us(self.fixed_dt)
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, LoadError> {
    let replay: ReplaySequence = read_json(path)?;
    validate_replay(&replay)?;
    Ok(replay)
}

pub fn validate_replay(replay: &ReplaySequence) -> Result<(), LoadError> {
    if replay.fixed_dt <= 0.0 {
        return Err(LoadError::invalid("replay", "fixed_dt must be > 0"));
    }
    if replay.frames.is_empty() {
        return Err(LoadError::invalid("replay", "frames list is empty"));
    }
    Ok(())
}

/// Drive `game` through every step of `replay`. Returns the number of ticks run.
pub fn play(game: &mut Game, replay: &ReplaySequence) -> usize {
    let dt_us = replay.step_us();
    let steps = replay.expanded_steps();
    for step in &steps {
        match step.command {
            Some(ReplayCommand::Start) => {
                game.start();
            }
            Some(ReplayCommand::Restart) => {
                game.reset();
                game.start();
            }
            None => {}
        }
        if let Some([yaw, pitch]) = step.orbit {
            game.camera_mut().orbit(yaw, pitch);
        }
        if let Some(steps) = step.zoom {
            game.camera_mut().zoom_by(steps);
        }
        game.input_mut().apply_snapshot(step.held.iter().copied());
        game.tick(dt_us);
    }
    log::info!(
        "Replayed {} steps, phase {:?}, score {}",
        steps.len(),
        game.phase(),
        game.world().score
    );
    steps.len()
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
