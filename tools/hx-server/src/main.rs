//! WebSocket match server for the hex-grid tactical card game.
//!
//! One actor per match (see `actor.rs`), shared by both seats' sockets;
//! a connection's first message must be a join, after which every frame
//! in either direction is a bare `Command`/`Event`.
//!
//! Client -> server, first message on a socket:
//!   { "type": "join", "match_id": "room-1", "seat": "p1", "seed": 42 }
//! Every message after that is a bare `Command` (see `hx_types::command`):
//!   { "type": "move_unit", "unit_id": "u1", "target_tile_id": "r0c1" }
//!
//! Server -> client: a bare `Event` (see `hx_types::event`) per message.

mod actor;
mod config;
mod protocol;
mod registry;

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use hx_types::event::Event;

use crate::actor::ActorMessage;
use crate::config::ServerConfig;
use crate::registry::MatchRegistry;

struct AppState {
    registry: Arc<MatchRegistry>,
    config: ServerConfig,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let state = Arc::new(AppState {
        registry: Arc::new(MatchRegistry::default()),
        config,
    });

    let watchdog_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            watchdog_state.registry.reap_dead_matches().await;
        }
    });

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        eprintln!("Failed to bind to {addr}: {e}");
        std::process::exit(1);
    });
    tracing::info!(%addr, "hx-server listening");
    axum::serve(listener, app).await.unwrap();
}

async fn health() -> &'static str {
    "hx-server ok"
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html><head><title>hx-server</title></head>
<body>
<h1>Hex-grid tactical card match server</h1>
<p>Connect via WebSocket at <code>/ws</code> and send a join message first:</p>
<pre>{"type":"join","match_id":"room-1","seat":"p1","seed":42}</pre>
</body></html>"#,
    )
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let Some(Ok(Message::Text(first))) = receiver.next().await else {
        return;
    };
    let raw: serde_json::Value = match serde_json::from_str(&first) {
        Ok(v) => v,
        Err(e) => {
            let _ = send_event(&mut sender, &Event::Error {
                code: "protocol".into(),
                message: format!("invalid JSON: {e}"),
            })
            .await;
            return;
        }
    };
    let Some(join) = protocol::try_parse_join(&raw) else {
        let _ = send_event(&mut sender, &Event::Error {
            code: "protocol".into(),
            message: "first message on a connection must be a join".into(),
        })
        .await;
        return;
    };

    let seat = join.seat;
    let handle = state
        .registry
        .get_or_create(&join.match_id, join.seed.unwrap_or(42), state.config)
        .await;

    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<Event>();
    if handle
        .sender
        .send(ActorMessage::Connect { seat, outbox: outbox_tx })
        .is_err()
    {
        // Match actor already gone (game over, reaped). Nothing to do.
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbox_rx.recv().await {
            if send_event(&mut sender, &event).await.is_err() {
                return;
            }
        }
    });

    let inbound_handle = handle.clone();
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(m) => m,
                Err(_) => break,
            };
            let text = match msg {
                Message::Text(t) => t,
                Message::Close(_) => break,
                _ => continue,
            };
            match serde_json::from_str(&text) {
                Ok(command) => {
                    let _ = inbound_handle
                        .sender
                        .send(ActorMessage::Command { seat, command });
                }
                Err(_) => {
                    // Malformed frame mid-match: can't be attributed to a
                    // phase/seat gate, so it doesn't silently drop like a
                    // rejected rule command would.
                    tracing::debug!(?seat, "dropped unparseable command frame");
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => receive_task.abort(),
        _ = &mut receive_task => send_task.abort(),
    }

    let _ = handle.sender.send(ActorMessage::Disconnect { seat });
}

async fn send_event(
    sender: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    event: &Event,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).expect("Event always serializes");
    sender.send(Message::Text(json.into())).await
}
