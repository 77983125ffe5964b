//! Room event logging contract
//!
//! The server reports every join, leave, post, edit, and delete as a
//! room-keyed, human-readable line. File placement and rotation belong to
//! the implementation, not the server core.

use std::sync::Arc;

use tracing::info;

/// Sink for room-scoped chat events
pub trait RoomLog: Send + Sync {
    /// Record one human-readable line for `room`. Implementations add
    /// their own timestamps.
    fn log(&self, room: &str, line: &str);
}

/// Default sink that forwards room events through `tracing`
///
/// The subscriber supplies timestamps and output routing, so the server
/// needs no file handling of its own.
#[derive(Debug, Default)]
pub struct TracingLog;

impl RoomLog for TracingLog {
    fn log(&self, room: &str, line: &str) {
        info!(room = %room, "{}", line);
    }
}

/// Shared handle to a room log sink
pub type SharedRoomLog = Arc<dyn RoomLog>;
