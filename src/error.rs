//! Error types for the chat server
//!
//! Uses thiserror for ergonomic error definitions. Every error here is
//! terminal for a single connection at most; nothing propagates across
//! connections or to the accept loop.

use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error on the connection (fatal for that connection)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - the server actor is gone)
    #[error("Channel send error")]
    ChannelSend,

    /// Client closed or sent an empty field before completing the
    /// username/room handshake; no state was registered.
    #[error("Handshake incomplete")]
    HandshakeIncomplete,

    /// The requested username is held by another live connection
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),
}

/// Message send errors
///
/// Occurs when attempting to push a message onto a client's outbound channel.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The outbound channel is full; the recipient is too slow and this
    /// message is skipped rather than blocking the rest of the room.
    #[error("Channel full")]
    ChannelFull,
}
