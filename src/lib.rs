//! Multi-Room Text Chat Server Library
//!
//! A plain-text, multi-room chat server using the Actor pattern for state
//! management.
//!
//! # Features
//! - Newline-framed handshake (username, then room name)
//! - Named rooms, created lazily on first join
//! - Room broadcasts and `/msg` private messages
//! - `/edit` and `/delete` of your own messages by id
//! - Room-scoped event logging (join/leave/post/edit/delete)
//! - Disconnection handling
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning all state: the session
//!   registry, the room directory, and the message store
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use roomchat::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:5555").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, addr)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, addr.to_string(), cmd_tx));
//!     }
//! }
//! ```

pub mod client;
pub mod command;
pub mod error;
pub mod handler;
pub mod logger;
pub mod message;
pub mod registry;
pub mod room;
pub mod server;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use client::Client;
pub use command::{parse_line, Command, ParseOutcome};
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use logger::{RoomLog, SharedRoomLog, TracingLog};
pub use message::ServerMessage;
pub use registry::SessionRegistry;
pub use room::RoomDirectory;
pub use server::{ChatServer, ServerCommand};
pub use store::{MessageStore, StoredMessage};
pub use types::{ClientId, MessageId};
