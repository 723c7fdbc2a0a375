//! WebSocket subscriber connections.
//!
//! The socket is receive-only for clients: the server pushes one
//! `{"type":"UPDATE","items":[...]}` text frame per snapshot and ignores
//! anything the client sends except Close.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use tracing::{debug, warn};

use super::AppState;

/// `GET /api/ws`
pub async fn subscribe_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_connection(socket, state))
}

async fn run_connection(mut socket: WebSocket, state: AppState) {
    let service = state.service;
    let handle = service.subscribe(state.subscription);
    let id = handle.id;

    // Handshake is complete once we get here.
    if let Err(e) = service.open(id) {
        warn!(subscription = id.0, error = %e, "failed to open subscriber");
        service.close(id);
        return;
    }

    loop {
        tokio::select! {
            push = handle.recv_async() => match push {
                Ok(push) => {
                    let frame = Message::Text(push.json.to_string().into());
                    if let Err(e) = socket.send(frame).await {
                        debug!(subscription = id.0, error = %e, "socket send failed");
                        break;
                    }
                }
                // Dropped by the manager.
                Err(_) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!(subscription = id.0, error = %e, "socket error");
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    service.close(id);
}
