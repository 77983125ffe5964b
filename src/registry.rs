//! Session registry
//!
//! Two-way mapping between usernames and connections. A username is held
//! for exactly as long as its connection lives; once the connection closes
//! the name is free for the next client.

use std::collections::HashMap;

use crate::types::ClientId;

/// username ⇄ connection mapping
///
/// Owned by the `ChatServer` actor; lookups during unicast therefore see
/// registrations fully applied or not at all.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    by_name: HashMap<String, ClientId>,
    by_client: HashMap<ClientId, String>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a username for a connection
    ///
    /// Returns false if another live connection already holds the name,
    /// in which case nothing is recorded.
    pub fn register(&mut self, username: &str, client: ClientId) -> bool {
        if self.by_name.contains_key(username) {
            return false;
        }
        self.by_name.insert(username.to_string(), client);
        self.by_client.insert(client, username.to_string());
        true
    }

    /// Release a username. No-op if it was never registered.
    pub fn unregister(&mut self, username: &str) {
        if let Some(client) = self.by_name.remove(username) {
            self.by_client.remove(&client);
        }
    }

    /// Connection currently holding a username
    pub fn client_of(&self, username: &str) -> Option<ClientId> {
        self.by_name.get(username).copied()
    }

    /// Username held by a connection
    pub fn username_of(&self, client: ClientId) -> Option<&str> {
        self.by_client.get(&client).map(String::as_str)
    }
}
