//! Chat Backend Module
//!
//! Server-side message history. Messages are kept in memory only, in
//! insertion order, up to a fixed capacity.
//!
//! # Example
//!
//! ```rust,no_run
//! use limechat::backend::chat::MessageStore;
//! use limechat::shared::Message;
//! use limechat::shared::message::sentinel_date;
//!
//! let mut store = MessageStore::new(750);
//! store.append(Message::new("<p>hi</p>\n".to_string(), "Alice".to_string(), sentinel_date()));
//! assert_eq!(store.len(), 1);
//! ```

/// Bounded message history
pub mod store;

pub use store::MessageStore;
