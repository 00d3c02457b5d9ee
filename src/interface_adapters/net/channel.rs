// Bidirectional packet channel between the two peers.
// Frames travel as JSON text; transports only move strings.

use crate::interface_adapters::protocol::Packet;
use crate::use_cases::Role;

use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub enum NetError {
    Serialization(serde_json::Error),
    OutboundFull,
    OutboundClosed,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::Serialization(err) => write!(f, "packet serialization failed: {err}"),
            NetError::OutboundFull => f.write_str("outbound channel full"),
            NetError::OutboundClosed => f.write_str("outbound channel closed"),
        }
    }
}

impl std::error::Error for NetError {}

impl From<serde_json::Error> for NetError {
    fn from(e: serde_json::Error) -> Self {
        NetError::Serialization(e)
    }
}

/// Sending half. Cheap to clone; the channel closes once every clone is dropped.
#[derive(Debug, Clone)]
pub struct PacketSender {
    tx: mpsc::Sender<String>,
}

impl PacketSender {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }

    pub fn try_send(&self, packet: &Packet) -> Result<(), NetError> {
        let text = serde_json::to_string(packet)?;
        match self.tx.try_send(text) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(NetError::OutboundFull),
            Err(TrySendError::Closed(_)) => Err(NetError::OutboundClosed),
        }
    }

    /// Fire-and-forget send; failures are logged and the packet is dropped.
    pub fn send(&self, packet: &Packet) {
        match self.try_send(packet) {
            Ok(()) => {}
            Err(NetError::OutboundClosed) => {
                debug!(packet = packet.name(), "peer channel closed; dropping packet");
            }
            Err(e) => warn!(packet = packet.name(), error = %e, "dropping outbound packet"),
        }
    }
}

/// Receiving half. Decodes frames and drops the ones that do not parse.
#[derive(Debug)]
pub struct PacketReceiver {
    rx: mpsc::Receiver<String>,
    invalid_frames: u32,
    last_invalid_log: Instant,
}

impl PacketReceiver {
    pub fn new(rx: mpsc::Receiver<String>) -> Self {
        Self {
            rx,
            invalid_frames: 0,
            last_invalid_log: Instant::now()
                .checked_sub(LOG_THROTTLE)
                .unwrap_or_else(Instant::now),
        }
    }

    /// Next well-formed packet, or `None` once the peer is gone. Cancel safe.
    pub async fn recv(&mut self) -> Option<Packet> {
        loop {
            let text = self.rx.recv().await?;
            match serde_json::from_str::<Packet>(&text) {
                Ok(packet) => return Some(packet),
                Err(e) => {
                    self.invalid_frames += 1;
                    if should_log(&mut self.last_invalid_log) {
                        warn!(
                            error = %e,
                            count = self.invalid_frames,
                            "invalid packet from peer; dropping"
                        );
                    }
                }
            }
        }
    }

    /// Next well-formed packet already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<Packet> {
        while let Ok(text) = self.rx.try_recv() {
            match serde_json::from_str::<Packet>(&text) {
                Ok(packet) => return Some(packet),
                Err(e) => {
                    self.invalid_frames += 1;
                    debug!(
                        error = %e,
                        count = self.invalid_frames,
                        "invalid packet from peer; dropping"
                    );
                }
            }
        }
        None
    }

    pub fn invalid_frames(&self) -> u32 {
        self.invalid_frames
    }
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

/// One side of a two-player connection.
#[derive(Debug)]
pub struct MultiPlayerSession {
    pub role: Role,
    pub sender: PacketSender,
    pub receiver: PacketReceiver,
}

impl MultiPlayerSession {
    pub fn new(role: Role, sender: PacketSender, receiver: PacketReceiver) -> Self {
        Self {
            role,
            sender,
            receiver,
        }
    }

    /// Builds a session over raw frame channels.
    pub fn from_channels(
        role: Role,
        outbound: mpsc::Sender<String>,
        inbound: mpsc::Receiver<String>,
    ) -> Self {
        Self::new(role, PacketSender::new(outbound), PacketReceiver::new(inbound))
    }
}

/// In-process host/guest pair joined back to back.
pub fn loopback_pair(capacity: usize) -> (MultiPlayerSession, MultiPlayerSession) {
    let (host_tx, guest_rx) = mpsc::channel(capacity);
    let (guest_tx, host_rx) = mpsc::channel(capacity);

    (
        MultiPlayerSession::from_channels(Role::Host, host_tx, host_rx),
        MultiPlayerSession::from_channels(Role::Guest, guest_tx, guest_rx),
    )
}
