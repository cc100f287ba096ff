//! Hooks for add-on systems.
//!
//! Extensions are registered on the [`Game`](crate::game::Game) and called in
//! registration order at fixed points of the tick. They see the world and the
//! event queue but cannot drive the lifecycle directly.

use crate::events::EventQueue;
use crate::level::LevelDescriptor;
use crate::world::World;

pub trait Extension {
    fn name(&self) -> &str;

    /// After characters, enemies and abilities moved.
    fn after_movement(&mut self, _world: &mut World, _events: &mut EventQueue) {}

    /// After every contact for the tick has been resolved.
    fn after_collision(&mut self, _world: &mut World, _events: &mut EventQueue) {}

    /// After a level has been instantiated, before play resumes.
    fn after_load(
        &mut self,
        _world: &mut World,
        _level: &LevelDescriptor,
        _events: &mut EventQueue,
    ) {
    }
}
