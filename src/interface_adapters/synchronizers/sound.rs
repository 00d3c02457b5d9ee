use crate::domain::SoundName;
use crate::interface_adapters::net::PacketSender;
use crate::interface_adapters::protocol::{Packet, SoundPlayPacket};

/// Tells the peer which sound effect just played.
#[derive(Debug)]
pub struct SoundSynchronizer {
    sender: PacketSender,
}

impl SoundSynchronizer {
    pub fn new(sender: PacketSender) -> Self {
        Self { sender }
    }

    pub fn sync_played_sound(&self, sound: SoundName) {
        self.sender.send(&Packet::SoundPlay(SoundPlayPacket {
            sound_name: sound.into(),
        }));
    }
}
