// Framework bootstrap: tracing, transports and the match tasks.

use crate::frameworks::autopilot::Autopilot;
use crate::frameworks::config::{self, PeerRole};
use crate::interface_adapters::headless::{HeadlessStage, LogSoundPlayer};
use crate::interface_adapters::input::{KeyBindings, parse_line};
use crate::interface_adapters::net::{
    MultiPlayerSession, accept_guest, connect_to_host, loopback_pair,
};
use crate::use_cases::{CharacterCommand, Game, GameSettings, MatchResult, PeerLink, match_task};

use std::io::Result;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{Instrument, info_span};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Hosts one match on `listener`: waits for a guest, then plays with console input.
pub async fn run(listener: tokio::net::TcpListener) -> Result<MatchResult> {
    let session = accept_guest(listener, config::PACKET_CHANNEL_CAPACITY).await?;
    Ok(play(session, console_input()).await)
}

/// Joins the match hosted at `url` and plays with console input.
pub async fn join(url: &str) -> Result<MatchResult> {
    let session = connect_to_host(url, config::PACKET_CHANNEL_CAPACITY)
        .await
        .inspect_err(|e| {
            tracing::error!(%url, error = %e, "failed to reach host");
        })?;
    Ok(play(session, console_input()).await)
}

/// Runs both peers in this process over the loopback transport with scripted input.
pub async fn run_local() -> (MatchResult, MatchResult) {
    let (host, guest) = loopback_pair(config::PACKET_CHANNEL_CAPACITY);
    let tuning = GameSettings::default().tuning;

    let host_input = scripted_input(Autopilot::duelist(host.role, &tuning));
    let guest_input = scripted_input(Autopilot::duelist(guest.role, &tuning));

    tokio::join!(play(host, host_input), play(guest, guest_input))
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let role = config::peer_role()
        .map_err(std::io::Error::other)
        .inspect_err(|e| {
            tracing::error!(error = %e, "invalid configuration");
        })?;
    tracing::info!(%role, "starting");

    match role {
        PeerRole::Host => {
            let address = SocketAddr::from(([127, 0, 0, 1], config::game_port()));

            // Bind TCP listener with error handling
            let listener = tokio::net::TcpListener::bind(address)
                .await
                .inspect_err(|e| {
                    tracing::error!(%address, error = %e, "failed to bind");
                })?;

            let result = run(listener).await?;
            tracing::info!(%result, "host finished");
        }
        PeerRole::Guest => {
            let result = join(&config::peer_url()).await?;
            tracing::info!(%result, "guest finished");
        }
        PeerRole::Local => {
            let (host, guest) = run_local().await;
            tracing::info!(host = %host, guest = %guest, "local match finished");
        }
    }
    Ok(())
}

async fn play(
    session: MultiPlayerSession,
    input_rx: mpsc::Receiver<CharacterCommand>,
) -> MatchResult {
    let MultiPlayerSession {
        role,
        sender,
        receiver,
    } = session;

    let settings = GameSettings {
        map_seed: config::map_seed(),
        ..GameSettings::default()
    };
    let mut game = Game::new(
        settings,
        Box::new(HeadlessStage::new()),
        Box::new(LogSoundPlayer),
        Some(PeerLink { role, sender }),
    );
    game.on_end(move |result| tracing::info!(%role, %result, "match over"));

    match_task(game, receiver, input_rx, config::TICK_INTERVAL)
        .instrument(info_span!("match", %role))
        .await
}

fn scripted_input(pilot: Autopilot) -> mpsc::Receiver<CharacterCommand> {
    let (tx, rx) = mpsc::channel(config::INPUT_CHANNEL_CAPACITY);
    tokio::spawn(pilot.run(tx));
    rx
}

// One command per line on stdin, see `input::parse_line`.
fn console_input() -> mpsc::Receiver<CharacterCommand> {
    let (tx, rx) = mpsc::channel(config::INPUT_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut bindings = KeyBindings::character_defaults();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin closed");
                    break;
                }
            };

            let events = match parse_line(&line) {
                Ok(events) => events,
                Err(e) => {
                    tracing::warn!(error = %e, "input ignored");
                    continue;
                }
            };

            for command in events.into_iter().filter_map(|e| bindings.translate(e)) {
                match tx.try_send(command) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(?command, "input channel full; dropping command");
                    }
                    Err(TrySendError::Closed(_)) => return,
                }
            }
        }
    });

    rx
}
