use crate::domain::{DamageOutcome, Entity, EntityId, GameError};
use crate::interface_adapters::net::PacketSender;
use crate::interface_adapters::protocol::{CharacterStateDto, CharacterUpdatePacket, Packet};

/// Replicates health changes of one character as damage deltas.
#[derive(Debug)]
pub struct CharacterSynchronizer {
    entity_id: EntityId,
    sender: PacketSender,
}

impl CharacterSynchronizer {
    pub fn new(entity_id: EntityId, sender: PacketSender) -> Self {
        Self { entity_id, sender }
    }

    pub fn sync_damage(&self, points: u32) {
        self.sender.send(&Packet::CharacterUpdate(CharacterUpdatePacket {
            entity_id: self.entity_id.as_uuid(),
            new_entity_state: CharacterStateDto {
                damage: Some(points),
            },
        }));
    }

    /// Applies a received damage delta. `None` when the packet carried nothing for this character.
    pub fn handle(
        &self,
        packet: &CharacterUpdatePacket,
        entity: &mut Entity,
    ) -> Result<Option<DamageOutcome>, GameError> {
        if packet.entity_id != self.entity_id.as_uuid() {
            return Ok(None);
        }

        packet
            .new_entity_state
            .damage
            .map(|points| entity.damage(points))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::Tuning;
    use crate::domain::{Authority, EntityKind, Position};
    use crate::interface_adapters::net::loopback_pair;

    fn mirror() -> Entity {
        let mut entity = Entity::new(
            EntityKind::Character,
            Position::new(0.0, 0.0),
            Authority::Remote,
        );
        entity.initialize(&Tuning::default());
        entity
    }

    fn damage_packet(id: EntityId, damage: Option<u32>) -> CharacterUpdatePacket {
        CharacterUpdatePacket {
            entity_id: id.as_uuid(),
            new_entity_state: CharacterStateDto { damage },
        }
    }

    #[test]
    fn when_damage_delta_arrives_then_health_drops() {
        let (host, _guest) = loopback_pair(8);
        let mut entity = mirror();
        let sync = CharacterSynchronizer::new(entity.id(), host.sender.clone());

        let outcome = sync
            .handle(&damage_packet(entity.id(), Some(30)), &mut entity)
            .expect("character");

        assert_eq!(
            outcome,
            Some(DamageOutcome {
                health: 70,
                died: false
            })
        );
        assert_eq!(entity.health(), Some(70));
    }

    #[test]
    fn when_packet_is_for_another_character_or_empty_then_health_is_kept() {
        let (host, _guest) = loopback_pair(8);
        let mut entity = mirror();
        let sync = CharacterSynchronizer::new(entity.id(), host.sender.clone());

        let other = sync
            .handle(&damage_packet(EntityId::new(), Some(30)), &mut entity)
            .expect("no error");
        let empty = sync
            .handle(&damage_packet(entity.id(), None), &mut entity)
            .expect("no error");

        assert_eq!(other, None);
        assert_eq!(empty, None);
        assert_eq!(entity.health(), Some(100));
    }
}
