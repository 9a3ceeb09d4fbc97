/**
 * Frame Broadcasting
 *
 * Fan-out of serialized server frames to every open connection.
 *
 * # Broadcasting
 *
 * Frames are serialized once and sent as `Arc<str>` over a
 * `tokio::sync::broadcast` channel, so every connection shares the same
 * buffer. Each connection's writer task owns one receiver; a receiver that
 * falls more than the channel capacity behind skips the frames it missed
 * instead of buffering without bound.
 */
use std::sync::Arc;
use tokio::sync::broadcast;

/// Sender side of the fan-out channel
///
/// Cloned into the hub; every connection subscribes to it.
///
/// # Usage
///
/// ```rust
/// use limechat::backend::realtime::FrameBroadcast;
/// use std::sync::Arc;
/// use tokio::sync::broadcast;
///
/// let (tx, _) = broadcast::channel::<Arc<str>>(1000);
/// let fan_out: FrameBroadcast = tx;
/// ```
pub type FrameBroadcast = broadcast::Sender<Arc<str>>;

/// Broadcast a serialized frame to all subscribers
///
/// # Returns
///
/// Number of connections the frame was queued for (0 if nobody is connected)
pub fn broadcast_frame(broadcast_tx: &FrameBroadcast, frame: Arc<str>) -> usize {
    match broadcast_tx.send(frame) {
        Ok(subscriber_count) => {
            tracing::debug!("[Hub] Frame broadcast to {} connection(s)", subscriber_count);
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Hub] No connections to receive frame");
            0
        }
    }
}
