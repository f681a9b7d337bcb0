//! WebSocket endpoint: one handler task per socket, outbound frames queued
//! through a channel so the registry never blocks on a slow peer.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::any,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::relay;
use crate::rooms::{Client, SharedRegistry};

#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/", any(ws_handler)).with_state(state)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    state
        .registry
        .lock()
        .unwrap()
        .register(Client::new(client_id, outbound_tx));
    info!(client = %client_id, "client connected");

    let (mut sink, mut stream) = socket.split();
    let send_task = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => relay::dispatch(&state.registry, client_id, text.as_str()),
            Message::Close(_) => break,
            _ => {}
        }
    }

    relay::disconnect(&state.registry, client_id);
    send_task.abort();
    info!(client = %client_id, "client disconnected");
}
