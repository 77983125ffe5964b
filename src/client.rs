//! Client struct definition
//!
//! Represents a registered connection: its identity and the outbound
//! channel its write task drains.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerMessage;
use crate::types::ClientId;

/// Connected client information
///
/// Username and room are fixed at handshake time; the connection handler
/// owns the socket, this record only holds the sending side of the
/// outbound channel.
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this connection
    pub id: ClientId,
    /// Username claimed at handshake
    pub username: String,
    /// Room joined at handshake
    pub room: String,
    /// Server → Client message channel
    pub sender: mpsc::Sender<ServerMessage>,
}

impl Client {
    pub fn new(
        id: ClientId,
        username: String,
        room: String,
        sender: mpsc::Sender<ServerMessage>,
    ) -> Self {
        Self {
            id,
            username,
            room,
            sender,
        }
    }

    /// Queue a message for this client without blocking
    ///
    /// A full channel means the peer is not draining its socket fast
    /// enough; the message is dropped for this client only so delivery to
    /// the rest of the room carries on.
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender.try_send(msg).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }
}
