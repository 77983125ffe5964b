//! Connection handler
//!
//! Owns one client connection from handshake to teardown. Inbound lines go
//! to the ChatServer actor; a separate write task drains the client's
//! outbound channel onto the socket, so a stalled peer never blocks the
//! actor.
//!
//! Lifecycle: accepted stream -> handshake (username line, room line) ->
//! active read loop -> disconnect cleanup. A failed handshake closes the
//! connection before anything is registered.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::error::AppError;
use crate::message::ServerMessage;
use crate::server::ServerCommand;
use crate::types::ClientId;

/// Per-client outbound channel capacity
///
/// A client that falls this many lines behind starts losing broadcasts
/// instead of stalling the room.
const OUTBOUND_BUFFER: usize = 32;

/// Handle one accepted connection
///
/// Generic over the stream so tests can drive it with in-memory pipes.
/// `peer` is a display label for logs (the remote address in production).
pub async fn handle_connection<S>(
    stream: S,
    peer: String,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let client_id = ClientId::new();
    debug!("New connection from {} as client {}", peer, client_id);

    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut lines = BufReader::new(read_half).lines();

    // --- Handshake: two newline-framed fields, username then room ---
    let Some(username) = read_field(&mut lines).await else {
        debug!("Client {} closed before sending a username", client_id);
        return Err(AppError::HandshakeIncomplete);
    };
    let Some(room) = read_field(&mut lines).await else {
        debug!("Client {} closed before sending a room", client_id);
        return Err(AppError::HandshakeIncomplete);
    };

    // Outbound channel, drained onto the socket by its own task
    let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER);
    let write_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            let line = format!("{}\n", msg);
            if write_half.write_all(line.as_bytes()).await.is_err() {
                debug!("Socket write failed, ending write task");
                break;
            }
        }
        let _ = write_half.shutdown().await;
    });

    // --- Register with the ChatServer actor ---
    let (ack_tx, ack_rx) = oneshot::channel();
    cmd_tx
        .send(ServerCommand::Join {
            client_id,
            username: username.clone(),
            room,
            sender: msg_tx,
            ack: ack_tx,
        })
        .await
        .map_err(|_| AppError::ChannelSend)?;

    match ack_rx.await {
        Ok(true) => {}
        Ok(false) => {
            // Rejection line is already queued; let the write task flush
            // it before the connection drops. msg_tx is gone with the
            // rejected Join, so the channel closes on its own.
            let _ = write_task.await;
            return Err(AppError::UsernameTaken(username));
        }
        Err(_) => return Err(AppError::ChannelSend),
    }

    info!("Client {} ({}) active as '{}'", client_id, peer, username);

    // --- Active read loop ---
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.strip_suffix('\r').unwrap_or(&line).to_string();
                if cmd_tx
                    .send(ServerCommand::Line { client_id, line })
                    .await
                    .is_err()
                {
                    debug!("Server closed, ending read loop for {}", client_id);
                    break;
                }
            }
            Ok(None) => {
                debug!("Client {} reached end of stream", client_id);
                break;
            }
            Err(e) => {
                debug!("Read error for client {}: {}", client_id, e);
                break;
            }
        }
    }

    // --- Teardown: deregister, then let the write task flush and close ---
    let _ = cmd_tx.send(ServerCommand::Disconnect { client_id }).await;
    let _ = write_task.await;

    info!("Client {} ('{}') disconnected", client_id, username);
    Ok(())
}

/// Read one handshake field. Returns None on end-of-stream, a read error,
/// or an empty field, all of which abort the handshake.
async fn read_field<R>(lines: &mut tokio::io::Lines<R>) -> Option<String>
where
    R: AsyncBufReadExt + Unpin,
{
    match lines.next_line().await {
        Ok(Some(line)) => {
            let field = line.trim().to_string();
            if field.is_empty() {
                None
            } else {
                Some(field)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ChatServer;
    use tokio::io::{AsyncReadExt, DuplexStream};

    struct TestClient {
        lines: tokio::io::Lines<BufReader<tokio::io::ReadHalf<DuplexStream>>>,
        writer: tokio::io::WriteHalf<DuplexStream>,
    }

    impl TestClient {
        /// Connect an in-memory client and complete the handshake
        async fn connect(cmd_tx: &mpsc::Sender<ServerCommand>, username: &str, room: &str) -> Self {
            let (local, remote) = tokio::io::duplex(1024);
            let cmd_tx = cmd_tx.clone();
            tokio::spawn(async move {
                let _ = handle_connection(remote, "test".into(), cmd_tx).await;
            });

            let (read_half, writer) = tokio::io::split(local);
            let mut client = Self {
                lines: BufReader::new(read_half).lines(),
                writer,
            };
            client.send_line(username).await;
            client.send_line(room).await;
            client
        }

        async fn send_line(&mut self, line: &str) {
            self.writer
                .write_all(format!("{}\n", line).as_bytes())
                .await
                .unwrap();
        }

        async fn recv_line(&mut self) -> String {
            self.lines
                .next_line()
                .await
                .unwrap()
                .expect("connection closed")
        }
    }

    fn start_server() -> mpsc::Sender<ServerCommand> {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        tokio::spawn(ChatServer::new(cmd_rx).run());
        cmd_tx
    }

    #[tokio::test]
    async fn test_handshake_and_chat_round_trip() {
        let cmd_tx = start_server();

        let mut alice = TestClient::connect(&cmd_tx, "alice", "general").await;
        assert_eq!(alice.recv_line().await, "alice has joined the room.");

        let mut bob = TestClient::connect(&cmd_tx, "bob", "general").await;
        assert_eq!(bob.recv_line().await, "bob has joined the room.");
        assert_eq!(alice.recv_line().await, "bob has joined the room.");

        alice.send_line("hi").await;
        assert_eq!(alice.recv_line().await, "alice: hi");
        assert_eq!(bob.recv_line().await, "alice: hi");

        alice.send_line("/edit 1 hello").await;
        assert_eq!(bob.recv_line().await, "alice edited their message: hello");
    }

    #[tokio::test]
    async fn test_disconnect_announced_to_room() {
        let cmd_tx = start_server();

        let mut alice = TestClient::connect(&cmd_tx, "alice", "general").await;
        assert_eq!(alice.recv_line().await, "alice has joined the room.");
        let mut bob = TestClient::connect(&cmd_tx, "bob", "general").await;
        assert_eq!(bob.recv_line().await, "bob has joined the room.");
        assert_eq!(alice.recv_line().await, "bob has joined the room.");

        drop(alice);
        assert_eq!(bob.recv_line().await, "alice has left the room.");

        // The username is free again for a fresh connection
        let mut alice2 = TestClient::connect(&cmd_tx, "alice", "general").await;
        assert_eq!(alice2.recv_line().await, "alice has joined the room.");
    }

    #[tokio::test]
    async fn test_incomplete_handshake_registers_nothing() {
        let cmd_tx = start_server();

        // Username but no room, then EOF
        let (local, remote) = tokio::io::duplex(1024);
        let handler = tokio::spawn(handle_connection(remote, "test".into(), cmd_tx.clone()));
        let (_read_half, mut writer) = tokio::io::split(local);
        writer.write_all(b"ghost\n").await.unwrap();
        writer.shutdown().await.unwrap();
        drop(writer);

        let result = handler.await.unwrap();
        assert!(matches!(result, Err(AppError::HandshakeIncomplete)));

        // "ghost" was never registered, so the name is available
        let mut ghost = TestClient::connect(&cmd_tx, "ghost", "general").await;
        assert_eq!(ghost.recv_line().await, "ghost has joined the room.");
    }

    #[tokio::test]
    async fn test_empty_username_rejected() {
        let cmd_tx = start_server();

        let (local, remote) = tokio::io::duplex(1024);
        let handler = tokio::spawn(handle_connection(remote, "test".into(), cmd_tx));
        let (_read_half, mut writer) = tokio::io::split(local);
        writer.write_all(b"\ngeneral\n").await.unwrap();

        let result = handler.await.unwrap();
        assert!(matches!(result, Err(AppError::HandshakeIncomplete)));
    }

    #[tokio::test]
    async fn test_duplicate_username_told_and_closed() {
        let cmd_tx = start_server();

        let mut alice = TestClient::connect(&cmd_tx, "alice", "general").await;
        assert_eq!(alice.recv_line().await, "alice has joined the room.");

        let mut imposter = TestClient::connect(&cmd_tx, "alice", "general").await;
        assert_eq!(
            imposter.recv_line().await,
            "Username alice is already taken."
        );

        // Server closes the rejected connection after the notice
        let mut reader = imposter.lines.into_inner();
        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }
}
