//! ChatServer actor implementation
//!
//! The central actor owns all shared state: the session registry, the room
//! directory, and the message store. Handlers talk to it over an mpsc
//! channel, so every membership snapshot, registry lookup, and message-id
//! allocation is serialized without locks.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::client::Client;
use crate::command::{parse_line, Command, ParseOutcome};
use crate::logger::{SharedRoomLog, TracingLog};
use crate::message::ServerMessage;
use crate::registry::SessionRegistry;
use crate::room::RoomDirectory;
use crate::store::MessageStore;
use crate::types::ClientId;

/// Commands sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// Handshake finished: register the connection under a username and
    /// put it in a room. `ack` carries false if the username is taken,
    /// in which case nothing was registered.
    Join {
        client_id: ClientId,
        username: String,
        room: String,
        sender: mpsc::Sender<ServerMessage>,
        ack: oneshot::Sender<bool>,
    },
    /// One inbound line from an active connection
    Line { client_id: ClientId, line: String },
    /// Connection reached end-of-stream or a terminal read error
    Disconnect { client_id: ClientId },
}

/// The main ChatServer actor
pub struct ChatServer {
    /// All registered clients: ClientId -> Client
    clients: HashMap<ClientId, Client>,
    rooms: RoomDirectory,
    registry: SessionRegistry,
    store: MessageStore,
    /// Sink for room-scoped join/leave/post/edit/delete events
    log: SharedRoomLog,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer logging room events through `tracing`
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self::with_logger(receiver, Arc::new(TracingLog))
    }

    /// Create a new ChatServer with a custom room-event sink
    pub fn with_logger(receiver: mpsc::Receiver<ServerCommand>, log: SharedRoomLog) -> Self {
        Self {
            clients: HashMap::new(),
            rooms: RoomDirectory::new(),
            registry: SessionRegistry::new(),
            store: MessageStore::new(),
            log,
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are
    /// dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Join {
                client_id,
                username,
                room,
                sender,
                ack,
            } => {
                let joined = self.handle_join(client_id, username, room, sender);
                let _ = ack.send(joined);
            }
            ServerCommand::Line { client_id, line } => {
                self.handle_line(client_id, &line);
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
        }
    }

    /// Register a handshaken connection and announce it to its room
    fn handle_join(
        &mut self,
        client_id: ClientId,
        username: String,
        room: String,
        sender: mpsc::Sender<ServerMessage>,
    ) -> bool {
        if !self.registry.register(&username, client_id) {
            info!("Client {} rejected: username '{}' taken", client_id, username);
            let _ = sender.try_send(ServerMessage::UsernameTaken {
                username: username.clone(),
            });
            return false;
        }

        self.rooms.join(&room, client_id);
        let client = Client::new(client_id, username.clone(), room.clone(), sender);
        self.clients.insert(client_id, client);

        info!("Client {} joined room '{}' as '{}'", client_id, room, username);

        let announce = ServerMessage::Joined { username };
        self.log.log(&room, &announce.to_string());
        self.broadcast(&room, announce);
        true
    }

    /// Tear down a registered connection and announce the departure
    ///
    /// The member leaves its room and releases its username before the
    /// departure broadcast, so the departed handle never receives it.
    fn handle_disconnect(&mut self, client_id: ClientId) {
        let Some(client) = self.clients.remove(&client_id) else {
            // Handshake never completed; nothing was registered
            return;
        };

        self.rooms.leave(&client.room, client_id);
        self.registry.unregister(&client.username);

        info!("Client {} ('{}') disconnected", client_id, client.username);

        let announce = ServerMessage::Left {
            username: client.username,
        };
        self.broadcast(&client.room, announce.clone());
        self.log.log(&client.room, &announce.to_string());
    }

    /// Route one inbound line through the command dispatcher
    fn handle_line(&mut self, client_id: ClientId, line: &str) {
        let Some(client) = self.clients.get(&client_id) else {
            return;
        };
        let username = client.username.clone();
        let room = client.room.clone();

        match parse_line(line) {
            ParseOutcome::Ignored => {}
            ParseOutcome::BadMessageId => {
                self.reply(client_id, ServerMessage::InvalidMessageId);
            }
            ParseOutcome::Command(Command::Private { to, text }) => {
                let msg = ServerMessage::Private {
                    from: username.clone(),
                    text,
                };
                if !self.unicast(&to, msg) {
                    self.reply(client_id, ServerMessage::UserNotFound { username: to });
                }
            }
            ParseOutcome::Command(Command::Edit { id, text }) => {
                if self.store.edit(id, &username, &text) {
                    let msg = ServerMessage::Edited {
                        from: username,
                        text,
                    };
                    self.log.log(&room, &format!("Edited Message: {}", msg));
                    self.broadcast(&room, msg);
                } else {
                    self.reply(client_id, ServerMessage::InvalidMessageId);
                }
            }
            ParseOutcome::Command(Command::Delete { id }) => {
                if self.store.delete(id, &username) {
                    let msg = ServerMessage::Deleted { from: username };
                    self.log.log(&room, &format!("Message deleted: {}", msg));
                    self.broadcast(&room, msg);
                } else {
                    self.reply(client_id, ServerMessage::InvalidMessageId);
                }
            }
            ParseOutcome::Command(Command::Post(text)) => {
                let id = self.store.create(&username, &room, &text);
                debug!("Message {} stored for room '{}'", id, room);
                let msg = ServerMessage::Chat {
                    from: username,
                    text,
                };
                self.log.log(&room, &format!("Message: {}", msg));
                self.broadcast(&room, msg);
            }
        }
    }

    /// Delivery engine: send to every current member of a room
    ///
    /// Membership is read inside the actor, so the snapshot is consistent
    /// with every join/leave processed so far. A member whose outbound
    /// channel is full or closed is skipped, not retried.
    fn broadcast(&self, room: &str, msg: ServerMessage) {
        for member_id in self.rooms.members_of(room) {
            let Some(member) = self.clients.get(&member_id) else {
                continue;
            };
            if let Err(e) = member.send(msg.clone()) {
                debug!("Skipping client {} during broadcast: {}", member_id, e);
            }
        }
    }

    /// Delivery engine: send to exactly one user, wherever they are
    ///
    /// Returns false if the username is not registered; the caller owes
    /// the requester a not-found reply.
    fn unicast(&self, username: &str, msg: ServerMessage) -> bool {
        let Some(client_id) = self.registry.client_of(username) else {
            return false;
        };
        if let Some(target) = self.clients.get(&client_id) {
            if let Err(e) = target.send(msg) {
                debug!("Unicast to '{}' dropped: {}", username, e);
            }
        }
        true
    }

    /// Send an error or status line back to the requesting client only
    fn reply(&self, client_id: ClientId, msg: ServerMessage) {
        if let Some(client) = self.clients.get(&client_id) {
            let _ = client.send(msg);
        }
    }
}
