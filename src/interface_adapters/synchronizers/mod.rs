// One synchronizer per replicated concern. Each wraps the outbound sender and
// owns the handler for its packet tag.

pub mod character;
pub mod entity;
pub mod game;
pub mod map;
pub mod sound;
pub mod sprite;

pub use character::CharacterSynchronizer;
pub use entity::EntitySynchronizer;
pub use game::{GameSynchronizer, create_entity_from_packet, serialize_entity};
pub use map::MapSynchronizer;
pub use sound::SoundSynchronizer;
pub use sprite::SpriteSynchronizer;

use crate::domain::{Entity, EntityType};
use crate::interface_adapters::net::PacketSender;

/// What a handler did with a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Applied,
    /// The packet was for another entity.
    NotAddressed,
    /// The packet was valid but does not apply on this side.
    Ignored,
}

/// Synchronizers bound to one entity. Dropped together with the entity.
#[derive(Debug)]
pub struct EntityBindings {
    pub entity: EntitySynchronizer,
    pub character: Option<CharacterSynchronizer>,
    pub sprite: Option<SpriteSynchronizer>,
}

impl EntityBindings {
    pub fn bind(entity: &Entity, sender: &PacketSender) -> Self {
        let id = entity.id();
        let is_character = entity.entity_type() == EntityType::Character;

        Self {
            entity: EntitySynchronizer::new(id, sender.clone()),
            character: is_character.then(|| CharacterSynchronizer::new(id, sender.clone())),
            sprite: is_character.then(|| SpriteSynchronizer::new(id, sender.clone())),
        }
    }
}
