use super::Handled;
use crate::domain::{Animation, Entity, EntityId, GameError};
use crate::interface_adapters::net::PacketSender;
use crate::interface_adapters::protocol::{Packet, SpriteUpdatePacket};
use tracing::warn;

/// Replicates the current animation of one character.
#[derive(Debug)]
pub struct SpriteSynchronizer {
    entity_id: EntityId,
    sender: PacketSender,
}

impl SpriteSynchronizer {
    pub fn new(entity_id: EntityId, sender: PacketSender) -> Self {
        Self { entity_id, sender }
    }

    pub fn sync_animation(&self, animation: Animation) {
        self.sender.send(&Packet::SpriteUpdate(SpriteUpdatePacket {
            entity_id: self.entity_id.as_uuid(),
            new_sprite_name: animation.as_str().to_string(),
        }));
    }

    pub fn handle(
        &self,
        packet: &SpriteUpdatePacket,
        entity: &mut Entity,
    ) -> Result<Handled, GameError> {
        if packet.entity_id != self.entity_id.as_uuid() {
            return Ok(Handled::NotAddressed);
        }

        if !entity.is_remote() {
            warn!(entity_id = %self.entity_id, "sprite update for locally owned entity ignored");
            return Ok(Handled::Ignored);
        }

        let Some(animation) = Animation::from_name(&packet.new_sprite_name) else {
            warn!(
                entity_id = %self.entity_id,
                sprite = %packet.new_sprite_name,
                "unknown sprite animation ignored"
            );
            return Ok(Handled::Ignored);
        };

        entity.set_animation(animation)?;
        Ok(Handled::Applied)
    }
}
