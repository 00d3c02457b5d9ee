// Collaborators the simulation drives but does not implement.

use super::entity::{Entity, EntityId};
use super::registry::EntityRegistry;
use super::sounds::SoundName;

/// Rendering surface. Entities are inserted at the bottom of the draw order.
pub trait Stage: Send {
    fn attach(&mut self, entity: &Entity);

    fn detach(&mut self, entity_id: EntityId);

    /// Called once per tick after the simulation step.
    fn frame(&mut self, _entities: &EntityRegistry) {}
}

/// Audio output.
pub trait SoundPlayer: Send {
    /// Prepares a sound for playback; returns false if it could not be loaded.
    fn load(&mut self, _sound: SoundName) -> bool {
        true
    }

    fn play(&mut self, sound: SoundName, volume: f32);
}
