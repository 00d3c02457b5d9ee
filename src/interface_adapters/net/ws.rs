// WebSocket transport: the host serves a single peer slot, the guest dials in.

use super::channel::MultiPlayerSession;
use crate::use_cases::Role;

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite;
use tracing::{Instrument, debug, info, info_span, warn};

/// Route the guest connects to.
pub const PEER_PATH: &str = "/ws";

#[derive(Clone)]
struct PeerSlot {
    // Taken by the first successful upgrade.
    tx: Arc<Mutex<Option<oneshot::Sender<WebSocket>>>>,
}

async fn ws_handler(ws: WebSocketUpgrade, State(slot): State<PeerSlot>) -> impl IntoResponse {
    let taken = slot.tx.lock().ok().and_then(|mut guard| guard.take());
    let Some(tx) = taken else {
        warn!("second peer rejected; match already has a guest");
        return (StatusCode::CONFLICT, "match already has a guest").into_response();
    };

    ws.on_upgrade(move |socket| async move {
        if tx.send(socket).is_err() {
            warn!("host stopped waiting before the guest connected");
        }
    })
}

/// Serves the peer route and waits for exactly one guest.
pub async fn accept_guest(
    listener: TcpListener,
    capacity: usize,
) -> std::io::Result<MultiPlayerSession> {
    let address = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let app = Router::new()
        .route(PEER_PATH, get(ws_handler))
        .with_state(PeerSlot {
            tx: Arc::new(Mutex::new(Some(tx))),
        });

    info!(%address, "waiting for guest");
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let socket = rx
        .await
        .map_err(|_| std::io::Error::other("peer server stopped before a guest connected"))?;
    // Upgraded sockets live on their own tasks; stop accepting new connections.
    server.abort();
    info!("guest connected");

    Ok(bridge_axum_socket(socket, capacity))
}

/// Dials the host at `url` (for example `ws://127.0.0.1:3001/ws`).
pub async fn connect_to_host(url: &str, capacity: usize) -> std::io::Result<MultiPlayerSession> {
    let (stream, _response) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(std::io::Error::other)?;
    info!(%url, "connected to host");

    Ok(bridge_tungstenite_stream(stream, capacity))
}

fn bridge_axum_socket(socket: WebSocket, capacity: usize) -> MultiPlayerSession {
    let (out_tx, mut out_rx) = mpsc::channel::<String>(capacity);
    let (in_tx, in_rx) = mpsc::channel::<String>(capacity);
    let (mut sink, mut stream) = socket.split();
    let span = info_span!("peer", role = %Role::Host);

    tokio::spawn(
        async move {
            while let Some(text) = out_rx.recv().await {
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    debug!(error = %e, "socket send failed");
                    break;
                }
            }
            let _ = sink.close().await;
        }
        .instrument(span.clone()),
    );

    tokio::spawn(
        async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        if in_tx.send(text.as_str().to_owned()).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(Message::Binary(_)) => warn!("binary frame ignored"),
                    Ok(Message::Ping(_) | Message::Pong(_)) => {}
                    Err(e) => {
                        debug!(error = %e, "socket receive failed");
                        break;
                    }
                }
            }
            info!("guest disconnected");
        }
        .instrument(span),
    );

    MultiPlayerSession::from_channels(Role::Host, out_tx, in_rx)
}

fn bridge_tungstenite_stream<S>(
    stream: tokio_tungstenite::WebSocketStream<S>,
    capacity: usize,
) -> MultiPlayerSession
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    use tungstenite::Message;

    let (out_tx, mut out_rx) = mpsc::channel::<String>(capacity);
    let (in_tx, in_rx) = mpsc::channel::<String>(capacity);
    let (mut sink, mut source) = stream.split();
    let span = info_span!("peer", role = %Role::Guest);

    tokio::spawn(
        async move {
            while let Some(text) = out_rx.recv().await {
                if let Err(e) = sink.send(Message::text(text)).await {
                    debug!(error = %e, "socket send failed");
                    break;
                }
            }
            let _ = sink.close().await;
        }
        .instrument(span.clone()),
    );

    tokio::spawn(
        async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        if in_tx.send(text.as_str().to_owned()).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(Message::Binary(_)) => warn!("binary frame ignored"),
                    Ok(_) => {}
                    Err(e) => {
                        debug!(error = %e, "socket receive failed");
                        break;
                    }
                }
            }
            info!("host disconnected");
        }
        .instrument(span),
    );

    MultiPlayerSession::from_channels(Role::Guest, out_tx, in_rx)
}
