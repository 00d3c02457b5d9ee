// Entity lifecycle replication and the type-tag table that builds entities from packets.

use crate::domain::tuning::Tuning;
use crate::domain::{Authority, Entity, EntityId};
use crate::interface_adapters::net::PacketSender;
use crate::interface_adapters::protocol::{
    BlueprintDto, CreateEntityPacket, DestroyEntityPacket, Packet,
};

/// Construction packet for `entity`, written from the receiver's point of view.
pub fn serialize_entity(entity: &Entity) -> CreateEntityPacket {
    CreateEntityPacket {
        entity_id: entity.id().as_uuid(),
        initial_position: entity.initial_position().into(),
        // What this peer owns, the other peer mirrors.
        is_remote: !entity.is_remote(),
        blueprint: BlueprintDto::from(entity.kind()),
    }
}

pub fn create_entity_from_packet(packet: &CreateEntityPacket, tuning: &Tuning) -> Entity {
    Entity::with_id(
        EntityId::from_uuid(packet.entity_id),
        packet.blueprint.into_kind(&tuning.map),
        packet.initial_position.into(),
        Authority::from_is_remote(packet.is_remote),
    )
}

/// Sends entity creation, destruction and the bootstrap barrier.
#[derive(Debug)]
pub struct GameSynchronizer {
    sender: PacketSender,
}

impl GameSynchronizer {
    pub fn new(sender: PacketSender) -> Self {
        Self { sender }
    }

    pub fn sync_new_entity(&self, packet: CreateEntityPacket) {
        self.sender.send(&Packet::CreateEntity(packet));
    }

    pub fn sync_entity_destroy(&self, entity_id: EntityId) {
        self.sender.send(&Packet::DestroyEntity(DestroyEntityPacket {
            entity_id: entity_id.as_uuid(),
        }));
    }

    pub fn send_initialization_completed(&self) {
        self.sender.send(&Packet::InitializationCompleted);
    }
}
