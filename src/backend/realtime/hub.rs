/**
 * Broadcast Hub
 *
 * Owns the message history and the fan-out channel, and answers every
 * decoded client frame.
 *
 * # Frame Handling
 *
 * - `sendMessage` - render, store, then publish to every connection
 * - `getMessages` - reply with the full history to the requester only
 * - anything else - ignored
 * - undecodable input - error reply to the sender only
 *
 * # Ordering
 *
 * Rendering (including preview fetches) happens before any lock is taken.
 * Appending to the store and publishing to the channel happen together
 * under the store's write lock, so history order always equals broadcast
 * order.
 */
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::backend::chat::MessageStore;
use crate::backend::realtime::broadcast::{broadcast_frame, FrameBroadcast};
use crate::backend::render::Renderer;
use crate::shared::message::{parse_client_date, sentinel_date, truncate_chars};
use crate::shared::{ClientFrame, Message, RelayConfig, RequestKind, ServerFrame, SharedError};

#[derive(Clone, Debug)]
pub struct BroadcastHub {
    store: Arc<RwLock<MessageStore>>,
    renderer: Arc<Renderer>,
    tx: FrameBroadcast,
    max_author_chars: usize,
}

impl BroadcastHub {
    pub fn new(config: &RelayConfig, renderer: Renderer) -> Self {
        let (tx, _) = broadcast::channel(config.broadcast_capacity);
        Self {
            store: Arc::new(RwLock::new(MessageStore::new(config.message_limit))),
            renderer: Arc::new(renderer),
            tx,
            max_author_chars: config.max_author_chars,
        }
    }

    /// Register a new connection for fan-out
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<str>> {
        self.tx.subscribe()
    }

    /// Connections currently subscribed
    pub fn connected_clients(&self) -> usize {
        self.tx.receiver_count()
    }

    pub async fn history(&self) -> Vec<Message> {
        self.store.read().await.snapshot()
    }

    pub async fn stored_messages(&self) -> usize {
        self.store.read().await.len()
    }

    /// Handle one raw text frame
    ///
    /// # Returns
    ///
    /// The reply for the sending connection only, if any. Broadcasts go
    /// through the channel.
    pub async fn on_message(&self, raw: &str) -> Option<String> {
        let frame = match ClientFrame::parse(raw) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("[Hub] Rejected frame: {}", e);
                return reply(&ServerFrame::invalid_input());
            }
        };

        match frame.request_kind() {
            RequestKind::SendMessage => {
                if let Err(e) = self.send_message(frame).await {
                    tracing::error!("[Hub] Failed to publish message: {}", e);
                }
                None
            }
            RequestKind::GetMessages => {
                let history = self.history().await;
                tracing::debug!("[Hub] Sending history of {} message(s)", history.len());
                reply(&ServerFrame::History { response: history })
            }
            RequestKind::Other => {
                tracing::debug!("[Hub] Ignoring frame of type {:?}", frame.kind);
                None
            }
        }
    }

    /// Render, store and publish a `sendMessage` frame
    pub async fn send_message(&self, frame: ClientFrame) -> Result<Message, SharedError> {
        let content = self
            .renderer
            .render_html(frame.content.as_deref().unwrap_or_default())
            .await;
        let author = truncate_chars(frame.author.as_deref().unwrap_or_default(), self.max_author_chars);
        let date = frame
            .date
            .as_ref()
            .and_then(parse_client_date)
            .unwrap_or_else(sentinel_date);

        let message = Message::new(content, author.to_string(), date);
        let payload: Arc<str> = ServerFrame::Message(message.clone()).to_json()?.into();

        let mut store = self.store.write().await;
        if store.append(message.clone()).is_some() {
            tracing::debug!("[Hub] History full, evicted oldest message");
        }
        let delivered = broadcast_frame(&self.tx, payload);
        drop(store);

        tracing::info!("[Hub] Message from {:?} delivered to {} connection(s)", message.author, delivered);
        Ok(message)
    }
}

fn reply(frame: &ServerFrame) -> Option<String> {
    match frame.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("[Hub] Failed to serialize reply: {}", e);
            None
        }
    }
}
