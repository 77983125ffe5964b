//! Room directory
//!
//! Maps room names to member connections. Rooms are created lazily on
//! first join and retained after they empty; at the target scale the set
//! of room names stays small enough that eviction is not worth the churn.

use std::collections::{HashMap, HashSet};

use crate::types::ClientId;

/// Named broadcast groups and their members
///
/// A client belongs to at most one room at a time (clients join exactly
/// once, during the handshake). Owned by the `ChatServer` actor, so every
/// membership read during a broadcast sees a consistent snapshot.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<String, HashSet<ClientId>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client to a room, creating the room on first join
    pub fn join(&mut self, room: &str, client: ClientId) {
        self.rooms.entry(room.to_string()).or_default().insert(client);
    }

    /// Remove a client from a room. The emptied room is kept.
    pub fn leave(&mut self, room: &str, client: ClientId) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(&client);
        }
    }

    /// Current members of a room, or an empty set for unknown rooms
    pub fn members_of(&self, room: &str) -> impl Iterator<Item = ClientId> + '_ {
        self.rooms.get(room).into_iter().flatten().copied()
    }

    /// Number of members currently in a room
    pub fn member_count(&self, room: &str) -> usize {
        self.rooms.get(room).map_or(0, HashSet::len)
    }

    /// Number of rooms ever created (empty rooms included)
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
