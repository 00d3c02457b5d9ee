// Shared primitives for wiring a host and a guest together inside one test.
#![allow(dead_code)]

use rect_game::domain::{EntityId, EntityType};
use rect_game::interface_adapters::headless::{HeadlessStage, LogSoundPlayer};
use rect_game::interface_adapters::net::{PacketReceiver, loopback_pair};
use rect_game::interface_adapters::protocol::Packet;
use rect_game::use_cases::{Game, GameSettings, PeerLink};
use std::time::Duration;

// One 60 Hz frame of real time.
pub const FRAME: Duration = Duration::from_millis(16);

// Fixed seed so every test sees the same arena.
pub const SEED: u64 = 7;

// Both peers plus the inbound side of each, so tests decide when packets arrive.
pub struct Peers {
    pub host: Game,
    pub guest: Game,
    // Packets the guest sent, waiting to be delivered to the host.
    pub host_inbox: PacketReceiver,
    // Packets the host sent, waiting to be delivered to the guest.
    pub guest_inbox: PacketReceiver,
    pub host_stage: HeadlessStage,
    pub guest_stage: HeadlessStage,
}

// Build a host/guest pair over the in-process transport; nothing is initialized yet.
pub fn peers() -> Peers {
    // Channel capacity is generous so no test ever trips the full-channel path.
    let (host_session, guest_session) = loopback_pair(4096);
    // Stages are shared handles; the tests keep a clone to inspect the draw list.
    let host_stage = HeadlessStage::new();
    let guest_stage = HeadlessStage::new();

    let host = Game::new(
        settings(),
        Box::new(host_stage.clone()),
        Box::new(LogSoundPlayer),
        Some(PeerLink {
            role: host_session.role,
            sender: host_session.sender,
        }),
    );
    let guest = Game::new(
        settings(),
        Box::new(guest_stage.clone()),
        Box::new(LogSoundPlayer),
        Some(PeerLink {
            role: guest_session.role,
            sender: guest_session.sender,
        }),
    );

    Peers {
        host,
        guest,
        host_inbox: host_session.receiver,
        guest_inbox: guest_session.receiver,
        host_stage,
        guest_stage,
    }
}

// Settings with the fixed seed.
pub fn settings() -> GameSettings {
    GameSettings {
        map_seed: SEED,
        ..GameSettings::default()
    }
}

// Initialize both sides and deliver the host's bootstrap to the guest.
pub fn started_peers() -> Peers {
    let mut peers = peers();
    peers.host.initialize().expect("host bootstrap");
    peers.guest.initialize().expect("guest bootstrap");
    deliver(&mut peers.guest_inbox, &mut peers.guest);
    peers
}

// Take every packet already queued, without applying it.
pub fn drain(inbox: &mut PacketReceiver) -> Vec<Packet> {
    std::iter::from_fn(|| inbox.try_recv()).collect()
}

// Apply every queued packet to `game`; returns how many were delivered.
pub fn deliver(inbox: &mut PacketReceiver, game: &mut Game) -> usize {
    let packets = drain(inbox);
    let count = packets.len();
    for packet in packets {
        game.handle_packet(packet);
    }
    count
}

// Run `ticks` frames on both sides, exchanging packets after each frame.
pub fn run_frames(peers: &mut Peers, ticks: usize) {
    for _ in 0..ticks {
        // Tick errors are logged by the game loop in production; here they fail the test.
        peers.host.tick(FRAME).expect("host tick");
        peers.guest.tick(FRAME).expect("guest tick");
        deliver(&mut peers.guest_inbox, &mut peers.guest);
        deliver(&mut peers.host_inbox, &mut peers.host);
    }
}

// The character `game` mirrors from the other side.
pub fn opponent(game: &Game) -> EntityId {
    game.registry()
        .iter()
        .find(|e| e.entity_type() == EntityType::Character && e.is_remote())
        .map(|e| e.id())
        .expect("opponent character")
}
