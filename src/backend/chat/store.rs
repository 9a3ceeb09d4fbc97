use crate::shared::Message;
use std::collections::VecDeque;

/// Bounded, insertion-ordered message history
///
/// Holds at most `capacity` messages; appending past the limit evicts the
/// oldest one.
#[derive(Clone, Debug)]
pub struct MessageStore {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl MessageStore {
    /// `capacity` is clamped to at least one message
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, returning the evicted message if the store was full
    pub fn append(&mut self, message: Message) -> Option<Message> {
        let evicted = if self.messages.len() >= self.capacity {
            self.messages.pop_front()
        } else {
            None
        };
        self.messages.push_back(message);
        evicted
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(crate::shared::config::DEFAULT_MESSAGE_LIMIT)
    }
}
