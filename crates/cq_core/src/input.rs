//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! The simulation consumes logical actions, never physical keys. Hosts map
//! their keyboard/gamepad codes onto [`Action`] and either push individual
//! transitions (`press` / `release`) or hand over a whole held-set snapshot
//! once per tick (`apply_snapshot`), which is how replays drive the game.
//!
//! - **Level-triggered (held):** movement and jump. Holding jump re-jumps on
//!   every landing.
//! - **Edge-triggered (just_pressed):** character switch and ability. A held
//!   key fires once; it has to be released before it fires again.
//!
//! `end_tick()` clears the just-pressed set after a simulation step consumed them.

use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
    Jump,
    Ability,
    Switch,
}

impl Action {
    pub const ALL: &'static [Action] = &[
        Action::Forward,
        Action::Back,
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Ability,
        Action::Switch,
    ];
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Action>,
    just_pressed: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    /// Replace the held set wholesale, deriving press edges from the difference
    /// with the previous snapshot.
    pub fn apply_snapshot<I>(&mut self, held: I)
    where
        I: IntoIterator<Item = Action>,
    {
        let next: HashSet<Action> = held.into_iter().collect();
        for &action in Action::ALL {
            match (self.held.contains(&action), next.contains(&action)) {
                (false, true) => self.press(action),
                (true, false) => self.release(action),
                _ => {}
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn is_just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }

    pub fn end_tick(&mut self) {
        self.just_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.press(Action::Jump);
        assert!(input.is_held(Action::Jump));
        assert!(input.is_just_pressed(Action::Jump));
    }

    #[test]
    fn repeated_press_does_not_refire_after_end_tick() {
        let mut input = InputState::new();
        input.press(Action::Switch);
        input.end_tick();
        input.press(Action::Switch);
        assert!(input.is_held(Action::Switch));
        assert!(!input.is_just_pressed(Action::Switch));
    }

    #[test]
    fn release_without_press_is_no_op() {
        let mut input = InputState::new();
        input.release(Action::Left);
        assert!(!input.is_held(Action::Left));
    }

    #[test]
    fn snapshot_derives_edges() {
        let mut input = InputState::new();
        input.apply_snapshot([Action::Forward, Action::Switch]);
        assert!(input.is_just_pressed(Action::Switch));
        assert!(input.is_held(Action::Forward));
        input.end_tick();

        input.apply_snapshot([Action::Switch]);
        assert!(!input.is_just_pressed(Action::Switch));
        assert!(!input.is_held(Action::Forward));
        input.end_tick();

        input.apply_snapshot([]);
        input.end_tick();
        input.apply_snapshot([Action::Switch]);
        assert!(input.is_just_pressed(Action::Switch));
    }

    #[test]
    fn end_tick_keeps_held_state() {
        let mut input = InputState::new();
        input.press(Action::Right);
        input.press(Action::Jump);
        input.end_tick();
        assert!(!input.is_just_pressed(Action::Right));
        assert!(input.is_held(Action::Right));
        assert!(input.is_held(Action::Jump));
    }

    #[test]
    fn clear_drops_everything() {
        let mut input = InputState::new();
        input.press(Action::Back);
        input.clear();
        assert!(!input.is_held(Action::Back));
        assert!(!input.is_just_pressed(Action::Back));
    }
}
