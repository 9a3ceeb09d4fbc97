/**
 * WebSocket Connection Handler
 *
 * Upgrades `GET /` to a WebSocket and runs one connection until either side
 * closes it.
 *
 * # Connection Tasks
 *
 * - **Reader** (the upgraded task itself): decodes frames one at a time and
 *   hands them to the hub. A slow `sendMessage` render only delays this
 *   connection's own later frames.
 * - **Writer** (spawned): forwards direct replies and fan-out frames to the
 *   socket. Lagging behind the fan-out channel drops the missed frames.
 *
 * Every log line of a connection is recorded inside a span carrying a random
 * connection id.
 */
use axum::{
    extract::{
        ws::{Message as WsMessage, Utf8Bytes, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::Instrument;
use uuid::Uuid;

use crate::backend::realtime::hub::BroadcastHub;
use crate::shared::ServerFrame;

/// Direct replies a connection may have queued before its writer catches up
const REPLY_QUEUE: usize = 32;

/// Handle the WebSocket upgrade (GET /)
pub async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<BroadcastHub>) -> Response {
    ws.on_upgrade(move |socket| {
        let id = Uuid::new_v4();
        handle_socket(socket, hub).instrument(tracing::info_span!("connection", %id))
    })
}

async fn handle_socket(socket: WebSocket, hub: BroadcastHub) {
    let (mut sink, mut stream) = socket.split();
    let mut fan_out = hub.subscribe();
    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(REPLY_QUEUE);

    tracing::info!("[Socket] Connected ({} open)", hub.connected_clients());

    let writer = tokio::spawn(
        async move {
            loop {
                let text: Utf8Bytes = tokio::select! {
                    reply = reply_rx.recv() => match reply {
                        Some(reply) => reply.into(),
                        None => break,
                    },
                    frame = fan_out.recv() => match frame {
                        Ok(frame) => (&*frame).into(),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!("[Socket] Lagging behind, skipped {} frame(s)", skipped);
                            continue;
                        }
                        Err(RecvError::Closed) => break,
                    },
                };
                if let Err(e) = sink.send(WsMessage::Text(text)).await {
                    tracing::debug!("[Socket] Write failed: {}", e);
                    break;
                }
            }
        }
        .in_current_span(),
    );

    while let Some(incoming) = stream.next().await {
        let reply = match incoming {
            Ok(WsMessage::Text(text)) => hub.on_message(text.as_str()).await,
            Ok(WsMessage::Binary(bytes)) => match std::str::from_utf8(&bytes) {
                Ok(text) => hub.on_message(text).await,
                Err(_) => {
                    tracing::warn!("[Socket] Binary frame is not UTF-8");
                    ServerFrame::invalid_input().to_json().ok()
                }
            },
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("[Socket] Read failed: {}", e);
                break;
            }
        };

        if let Some(reply) = reply {
            if reply_tx.send(reply).await.is_err() {
                break;
            }
        }
    }

    drop(reply_tx);
    if let Err(e) = writer.await {
        tracing::debug!("[Socket] Writer task ended abnormally: {}", e);
    }
    tracing::info!("[Socket] Disconnected");
}
