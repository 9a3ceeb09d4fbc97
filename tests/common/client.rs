//! WebSocket client speaking the relay's JSON protocol

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::relay::TestRelay;

const FRAME_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ChatClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl ChatClient {
    /// Connect and wait until the relay has registered the connection
    ///
    /// The relay subscribes a connection to fan-out before reading its first
    /// frame, so a `getMessages` round-trip proves the subscription exists.
    pub async fn connect(relay: &TestRelay) -> Self {
        let (ws, _) = connect_async(relay.ws_url()).await.expect("connect to relay");
        let mut client = Self { ws };
        client.history().await;
        client
    }

    pub async fn send_text(&mut self, text: &str) {
        self.ws
            .send(WsMessage::Text(text.to_string().into()))
            .await
            .expect("send frame");
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) {
        self.ws
            .send(WsMessage::Binary(bytes.into()))
            .await
            .expect("send frame");
    }

    pub async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_message(&mut self, content: &str, author: &str) {
        self.send_json(json!({ "type": "sendMessage", "content": content, "author": author }))
            .await;
    }

    /// Request the history and return the `response` array
    pub async fn history(&mut self) -> Vec<Value> {
        self.send_json(json!({ "type": "getMessages" })).await;
        let reply = self.next_json().await;
        reply["response"]
            .as_array()
            .cloned()
            .unwrap_or_else(|| panic!("expected a history reply, got {reply}"))
    }

    /// Next text frame, decoded
    pub async fn next_json(&mut self) -> Value {
        loop {
            let frame = timeout(FRAME_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("connection closed")
                .expect("read frame");
            if let WsMessage::Text(text) = frame {
                return serde_json::from_str(text.as_str()).expect("JSON frame");
            }
        }
    }

    /// Assert that no text frame arrives within `window`
    pub async fn assert_silent(&mut self, window: Duration) {
        let deadline = tokio::time::Instant::now() + window;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match timeout(remaining, self.ws.next()).await {
                Err(_) => return,
                Ok(Some(Ok(WsMessage::Text(text)))) => panic!("unexpected frame: {}", text.as_str()),
                Ok(Some(Ok(_))) => continue,
                Ok(other) => panic!("connection ended: {:?}", other),
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
