//! Outbound wire text
//!
//! Everything the server writes to a client is a plain UTF-8 text line;
//! `ServerMessage` enumerates the line shapes and `Display` renders the
//! exact wire text. Clients treat received lines as display text, not as
//! a framed protocol unit.

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Someone joined the recipient's room
    Joined { username: String },
    /// Someone left the recipient's room
    Left { username: String },
    /// Regular room post
    Chat { from: String, text: String },
    /// Private message delivered via `/msg`
    Private { from: String, text: String },
    /// A room member edited one of their messages
    Edited { from: String, text: String },
    /// A room member deleted one of their messages
    Deleted { from: String },
    /// `/msg` target is not connected
    UserNotFound { username: String },
    /// `/edit` or `/delete` failed: unknown id, non-numeric id, or the
    /// requester is not the sender
    InvalidMessageId,
    /// Handshake rejected because the username is in use
    UsernameTaken { username: String },
}

impl std::fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Joined { username } => write!(f, "{} has joined the room.", username),
            Self::Left { username } => write!(f, "{} has left the room.", username),
            Self::Chat { from, text } => write!(f, "{}: {}", from, text),
            Self::Private { from, text } => write!(f, "(Private) {}: {}", from, text),
            Self::Edited { from, text } => {
                write!(f, "{} edited their message: {}", from, text)
            }
            Self::Deleted { from } => write!(f, "{} deleted their message.", from),
            Self::UserNotFound { username } => write!(f, "User {} not found.", username),
            Self::InvalidMessageId => {
                write!(f, "Invalid message ID or you're not the sender.")
            }
            Self::UsernameTaken { username } => {
                write!(f, "Username {} is already taken.", username)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_event_lines() {
        let joined = ServerMessage::Joined {
            username: "alice".into(),
        };
        assert_eq!(joined.to_string(), "alice has joined the room.");

        let left = ServerMessage::Left {
            username: "alice".into(),
        };
        assert_eq!(left.to_string(), "alice has left the room.");
    }

    #[test]
    fn test_chat_lines() {
        let chat = ServerMessage::Chat {
            from: "alice".into(),
            text: "hi there".into(),
        };
        assert_eq!(chat.to_string(), "alice: hi there");

        let private = ServerMessage::Private {
            from: "bob".into(),
            text: "psst".into(),
        };
        assert_eq!(private.to_string(), "(Private) bob: psst");
    }

    #[test]
    fn test_mutation_lines() {
        let edited = ServerMessage::Edited {
            from: "alice".into(),
            text: "hello".into(),
        };
        assert_eq!(edited.to_string(), "alice edited their message: hello");

        let deleted = ServerMessage::Deleted {
            from: "alice".into(),
        };
        assert_eq!(deleted.to_string(), "alice deleted their message.");
    }

    #[test]
    fn test_error_lines() {
        let not_found = ServerMessage::UserNotFound {
            username: "carol".into(),
        };
        assert_eq!(not_found.to_string(), "User carol not found.");
        assert_eq!(
            ServerMessage::InvalidMessageId.to_string(),
            "Invalid message ID or you're not the sender."
        );
    }
}
