use super::game::{create_entity_from_packet, serialize_entity};
use crate::domain::Entity;
use crate::domain::tuning::Tuning;
use crate::interface_adapters::net::PacketSender;
use crate::interface_adapters::protocol::{MapInitializePacket, Packet};

/// Ships the starting roster to the guest in one packet.
#[derive(Debug)]
pub struct MapSynchronizer {
    sender: PacketSender,
}

impl MapSynchronizer {
    pub fn new(sender: PacketSender) -> Self {
        Self { sender }
    }

    pub fn sync_map_initialization<'a, I>(&self, entities: I)
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        let packet = MapInitializePacket {
            entities: entities.into_iter().map(serialize_entity).collect(),
        };
        self.sender.send(&Packet::MapInitialize(packet));
    }
}

/// Builds the roster described by a `map/initialize` packet, in packet order.
pub fn entities_from_packet(packet: &MapInitializePacket, tuning: &Tuning) -> Vec<Entity> {
    packet
        .entities
        .iter()
        .map(|item| create_entity_from_packet(item, tuning))
        .collect()
}
