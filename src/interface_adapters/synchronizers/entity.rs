use super::Handled;
use crate::domain::{Entity, EntityId, GameError, Position};
use crate::interface_adapters::net::PacketSender;
use crate::interface_adapters::protocol::{EntityStateDto, EntityUpdatePacket, Packet};
use tracing::warn;

/// Replicates position and rotation of one entity.
#[derive(Debug)]
pub struct EntitySynchronizer {
    entity_id: EntityId,
    sender: PacketSender,
    last_synced: Option<(Position, f32)>,
}

impl EntitySynchronizer {
    pub fn new(entity_id: EntityId, sender: PacketSender) -> Self {
        Self {
            entity_id,
            sender,
            last_synced: None,
        }
    }

    /// Sends the fields that changed since the last push. Returns whether a packet went out.
    pub fn sync_transform(&mut self, position: Position, rotation: f32) -> bool {
        let (new_position, new_rotation) = match self.last_synced {
            None => (Some(position), Some(rotation)),
            Some((last_position, last_rotation)) => (
                (last_position != position).then_some(position),
                (last_rotation != rotation).then_some(rotation),
            ),
        };

        if new_position.is_none() && new_rotation.is_none() {
            return false;
        }

        self.sender.send(&Packet::EntityUpdate(EntityUpdatePacket {
            entity_id: self.entity_id.as_uuid(),
            new_entity_state: EntityStateDto {
                new_position: new_position.map(Into::into),
                new_rotation_radians: new_rotation,
            },
        }));
        self.last_synced = Some((position, rotation));
        true
    }

    /// Applies a received transform to a mirror. Locally owned entities ignore it.
    pub fn handle(
        &self,
        packet: &EntityUpdatePacket,
        entity: &mut Entity,
    ) -> Result<Handled, GameError> {
        if packet.entity_id != self.entity_id.as_uuid() {
            return Ok(Handled::NotAddressed);
        }

        let Some(mut mirror) = entity.as_mirror_mut() else {
            warn!(entity_id = %self.entity_id, "entity/update for locally owned entity ignored");
            return Ok(Handled::Ignored);
        };

        let state = packet.new_entity_state;
        mirror.apply_transform(state.new_position.map(Into::into), state.new_rotation_radians)?;
        Ok(Handled::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::Tuning;
    use crate::domain::{Authority, EntityKind};
    use crate::interface_adapters::net::loopback_pair;

    #[tokio::test]
    async fn when_only_rotation_changes_then_only_rotation_is_sent() {
        let (host, mut guest) = loopback_pair(8);
        let id = EntityId::new();
        let mut sync = EntitySynchronizer::new(id, host.sender.clone());

        assert!(sync.sync_transform(Position::new(1.0, 2.0), 0.0));
        assert!(!sync.sync_transform(Position::new(1.0, 2.0), 0.0));
        assert!(sync.sync_transform(Position::new(1.0, 2.0), 1.0));

        let first = guest.receiver.recv().await.expect("first update");
        let second = guest.receiver.recv().await.expect("second update");
        let Packet::EntityUpdate(first) = first else {
            panic!("expected entity/update");
        };
        let Packet::EntityUpdate(second) = second else {
            panic!("expected entity/update");
        };
        assert!(first.new_entity_state.new_position.is_some());
        assert_eq!(second.new_entity_state.new_position, None);
        assert_eq!(second.new_entity_state.new_rotation_radians, Some(1.0));
    }

    #[test]
    fn when_update_targets_another_entity_then_it_is_not_addressed() {
        let (host, _guest) = loopback_pair(8);
        let mut entity = Entity::new(EntityKind::Bullet, Position::new(0.0, 0.0), Authority::Remote);
        entity.initialize(&Tuning::default());
        let sync = EntitySynchronizer::new(entity.id(), host.sender.clone());
        let packet = EntityUpdatePacket {
            entity_id: EntityId::new().as_uuid(),
            new_entity_state: EntityStateDto::default(),
        };

        let handled = sync.handle(&packet, &mut entity).expect("no error");

        assert_eq!(handled, Handled::NotAddressed);
    }
}
