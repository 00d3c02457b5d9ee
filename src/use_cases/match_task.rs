use super::game::Game;
use super::types::{CharacterCommand, MatchError, MatchResult};
use crate::interface_adapters::net::PacketReceiver;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// Drives one match to completion: ticks, peer packets and local commands all
/// run on this task. Returns the result reported to the match-over hook.
pub async fn match_task(
    mut game: Game,
    mut receiver: PacketReceiver,
    mut input_rx: mpsc::Receiver<CharacterCommand>,
    tick_interval: Duration,
) -> MatchResult {
    if let Err(e) = game.initialize() {
        error!(error = %e, "match bootstrap failed");
        game.end(MatchResult::Error(MatchError::Stopped(e.to_string())));
    }

    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();
    let mut peer_open = true;
    let mut input_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let elapsed = now - last_tick;
                last_tick = now;

                if let Err(e) = game.tick(elapsed) {
                    warn!(error = %e, "tick aborted");
                }
            }

            packet = receiver.recv(), if peer_open => match packet {
                Some(packet) => game.handle_packet(packet),
                None => {
                    peer_open = false;
                    game.handle_peer_disconnect();
                }
            },

            command = input_rx.recv(), if input_open => match command {
                Some(command) => {
                    if let Err(e) = game.command_character(command) {
                        warn!(error = %e, ?command, "command failed");
                    }
                }
                // No more local input; the match still runs to its end.
                None => input_open = false,
            },
        }

        if let Some(result) = game.result().cloned() {
            info!(%result, role = ?game.role(), "match task finished");
            game.destroy();
            return result;
        }
    }
}
