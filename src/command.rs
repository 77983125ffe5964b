//! Inbound line parsing
//!
//! Each line a client sends is matched against the command prefixes in
//! order; anything else non-empty is a plain chat post. Prefix matching is
//! case-sensitive and includes the trailing space, and the remainder after
//! the first argument is taken verbatim, spaces and all.

use crate::types::MessageId;

/// One recognized inbound action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/msg <user> <text>`: private message to one user
    Private { to: String, text: String },
    /// `/edit <id> <text>`: replace a previous message's content
    Edit { id: MessageId, text: String },
    /// `/delete <id>`: remove a previous message
    Delete { id: MessageId },
    /// Any other non-empty line: a regular room post
    Post(String),
}

/// Result of parsing one inbound line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Command(Command),
    /// `/edit` or `/delete` whose id is not a non-negative integer.
    /// Reported to the caller like an authorization failure.
    BadMessageId,
    /// Empty line, or a command missing its argument separator. Dropped
    /// with no feedback, matching the established wire behavior.
    Ignored,
}

/// Parse one inbound line. First match wins.
pub fn parse_line(line: &str) -> ParseOutcome {
    if line.is_empty() {
        return ParseOutcome::Ignored;
    }

    if let Some(rest) = line.strip_prefix("/msg ") {
        return match rest.split_once(' ') {
            Some((to, text)) => ParseOutcome::Command(Command::Private {
                to: to.to_string(),
                text: text.to_string(),
            }),
            None => ParseOutcome::Ignored,
        };
    }

    if let Some(rest) = line.strip_prefix("/edit ") {
        return match rest.split_once(' ') {
            Some((id, text)) => match MessageId::parse(id) {
                Some(id) => ParseOutcome::Command(Command::Edit {
                    id,
                    text: text.to_string(),
                }),
                None => ParseOutcome::BadMessageId,
            },
            None => ParseOutcome::Ignored,
        };
    }

    if let Some(rest) = line.strip_prefix("/delete ") {
        return match MessageId::parse(rest) {
            Some(id) => ParseOutcome::Command(Command::Delete { id }),
            None => ParseOutcome::BadMessageId,
        };
    }

    ParseOutcome::Command(Command::Post(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(line: &str) -> Command {
        match parse_line(line) {
            ParseOutcome::Command(c) => c,
            other => panic!("expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_private_message() {
        assert_eq!(
            cmd("/msg carol hey there"),
            Command::Private {
                to: "carol".into(),
                text: "hey there".into(),
            }
        );
    }

    #[test]
    fn test_private_text_kept_verbatim() {
        assert_eq!(
            cmd("/msg carol  two  spaces "),
            Command::Private {
                to: "carol".into(),
                text: " two  spaces ".into(),
            }
        );
    }

    #[test]
    fn test_edit() {
        assert_eq!(
            cmd("/edit 3 new text here"),
            Command::Edit {
                id: MessageId(3),
                text: "new text here".into(),
            }
        );
    }

    #[test]
    fn test_delete() {
        assert_eq!(cmd("/delete 7"), Command::Delete { id: MessageId(7) });
    }

    #[test]
    fn test_plain_post() {
        assert_eq!(cmd("hello everyone"), Command::Post("hello everyone".into()));
    }

    #[test]
    fn test_prefix_without_trailing_space_is_a_post() {
        // "/msgcarol hi" does not match the "/msg " literal
        assert_eq!(cmd("/msgcarol hi"), Command::Post("/msgcarol hi".into()));
        assert_eq!(cmd("/msg"), Command::Post("/msg".into()));
    }

    #[test]
    fn test_missing_separator_is_ignored() {
        assert_eq!(parse_line("/msg carol"), ParseOutcome::Ignored);
        assert_eq!(parse_line("/edit 3"), ParseOutcome::Ignored);
    }

    #[test]
    fn test_empty_line_is_ignored() {
        assert_eq!(parse_line(""), ParseOutcome::Ignored);
    }

    #[test]
    fn test_non_numeric_id() {
        assert_eq!(parse_line("/edit abc text"), ParseOutcome::BadMessageId);
        assert_eq!(parse_line("/delete abc"), ParseOutcome::BadMessageId);
        assert_eq!(parse_line("/delete -4"), ParseOutcome::BadMessageId);
    }

    #[test]
    fn test_commands_are_case_sensitive() {
        assert_eq!(cmd("/MSG carol hi"), Command::Post("/MSG carol hi".into()));
    }
}
