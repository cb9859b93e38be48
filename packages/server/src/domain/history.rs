//! Bounded per-group message history.

use std::collections::VecDeque;

use super::{entity::ChatMessage, value_object::Timestamp};

/// Number of messages kept per group unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Oldest-first window over the most recent messages of one group.
///
/// `push` is the only mutation. When the window is full the oldest entry is
/// evicted (strict FIFO).
#[derive(Debug, Clone)]
pub struct GroupHistory {
    capacity: usize,
    messages: VecDeque<ChatMessage>,
}

impl GroupHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a message, returning the evicted one if the window was full.
    pub fn push(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        if self.capacity == 0 {
            return Some(message);
        }
        let evicted = if self.messages.len() >= self.capacity {
            self.messages.pop_front()
        } else {
            None
        };
        self.messages.push_back(message);
        evicted
    }

    /// Point-in-time copy, oldest first.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.messages.back().map(ChatMessage::timestamp)
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

impl Default for GroupHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
