//! Real-time Module
//!
//! Everything between a client's socket and the shared history: the
//! WebSocket connection handler, the hub that answers frames, and the
//! fan-out channel.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports and documentation
//! ├── broadcast.rs  - Fan-out channel type and send helper
//! ├── hub.rs        - Frame dispatch, history, publishing
//! └── socket.rs     - WebSocket upgrade and per-connection tasks
//! ```
//!
//! # Delivery
//!
//! An accepted message is serialized once and queued for every open
//! connection, the sender included. A `getMessages` reply or an error reply
//! goes to the requesting connection only.

/// Fan-out channel utilities
pub mod broadcast;

/// Frame dispatch and history
pub mod hub;

/// WebSocket connection handler
pub mod socket;

pub use broadcast::{broadcast_frame, FrameBroadcast};
pub use hub::BroadcastHub;
pub use socket::ws_handler;
