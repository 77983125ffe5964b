//! Message store
//!
//! Owns every posted message and the process-wide id counter. The store is
//! owned by the `ChatServer` actor, so allocation and mutation are already
//! serialized; ids are unique and strictly increasing in allocation order.

use std::collections::HashMap;

use crate::types::MessageId;

/// One stored chat message
///
/// Sender and room are fixed at creation; only the content may change,
/// and only at the sender's request.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub sender: String,
    pub room: String,
    pub content: String,
}

/// In-memory message store with monotonic id allocation
#[derive(Debug)]
pub struct MessageStore {
    messages: HashMap<MessageId, StoredMessage>,
    /// Next id to hand out; starts at 1 and never goes backwards
    next_id: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            messages: HashMap::new(),
            next_id: 1,
        }
    }

    /// Store a new message and return its id. Never fails.
    pub fn create(&mut self, sender: &str, room: &str, content: &str) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.insert(
            id,
            StoredMessage {
                sender: sender.to_string(),
                room: room.to_string(),
                content: content.to_string(),
            },
        );
        id
    }

    /// Replace a message's content
    ///
    /// Succeeds only if the message exists and `requester` is its sender;
    /// otherwise returns false with no side effects.
    pub fn edit(&mut self, id: MessageId, requester: &str, new_content: &str) -> bool {
        match self.messages.get_mut(&id) {
            Some(msg) if msg.sender == requester => {
                msg.content = new_content.to_string();
                true
            }
            _ => false,
        }
    }

    /// Remove a message entirely
    ///
    /// Same authorization rule as [`edit`](Self::edit). The id is never
    /// reassigned; later edits or deletes on it fail as not-found.
    pub fn delete(&mut self, id: MessageId, requester: &str) -> bool {
        match self.messages.get(&id) {
            Some(msg) if msg.sender == requester => {
                self.messages.remove(&id);
                true
            }
            _ => false,
        }
    }

    /// Look up a message (used by tests and diagnostics)
    pub fn get(&self, id: MessageId) -> Option<&StoredMessage> {
        self.messages.get(&id)
    }

    /// Number of live (non-deleted) messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
