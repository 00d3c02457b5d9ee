// Transports and the packet channel the match talks through.

pub mod channel;
pub mod ws;

pub use channel::{MultiPlayerSession, NetError, PacketReceiver, PacketSender, loopback_pair};
pub use ws::{accept_guest, connect_to_host};
