//! Console command parsing.

use kestrel_common::{ChatId, IdentifierParseError};

pub(super) const HELP: &str = "\
commands:
  /list                 show joined and available chats
  /create <name>        create a chat
  /join <id>            join a chat
  /open <id>            open (or focus) a joined chat
  /close <id>           close an open chat
  /send <id> <text>     send a message
  /focus                show open chats
  /help                 show this help
  /quit                 exit
text without a leading / is sent to the focused chat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Command {
    List,
    Create(String),
    Join(ChatId),
    Open(ChatId),
    Close(ChatId),
    Send(ChatId, String),
    Say(String),
    Focus,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(super) enum CommandError {
    #[error("unknown command '{0}', try /help")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    ChatId(#[from] IdentifierParseError),
}

/// Parse one input line. Blank lines yield `None`.
pub(super) fn parse(line: &str) -> Option<Result<Command, CommandError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Ok(Command::Say(line.to_string())));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    Some(match name {
        "list" | "ls" => Ok(Command::List),
        "create" => non_empty(args, "/create <name>").map(|n| Command::Create(n.to_string())),
        "join" => chat_id(args, "/join <id>").map(Command::Join),
        "open" => chat_id(args, "/open <id>").map(Command::Open),
        "close" => chat_id(args, "/close <id>").map(Command::Close),
        "send" => parse_send(args),
        "focus" => Ok(Command::Focus),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    })
}

fn non_empty<'a>(args: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if args.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(args)
    }
}

fn chat_id(args: &str, usage: &'static str) -> Result<ChatId, CommandError> {
    Ok(non_empty(args, usage)?.parse::<ChatId>()?)
}

fn parse_send(args: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "/send <id> <text>";
    let (id, text) = args
        .split_once(char::is_whitespace)
        .ok_or(CommandError::Usage(USAGE))?;
    let text = non_empty(text.trim(), USAGE)?;
    Ok(Command::Send(id.parse()?, text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ChatId {
        ChatId::new(raw).unwrap()
    }

    fn ok(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    fn err(line: &str) -> CommandError {
        parse(line).unwrap().unwrap_err()
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert!(parse("").is_none());
        assert!(parse("   \t").is_none());
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(ok("/list"), Command::List);
        assert_eq!(ok("/ls"), Command::List);
        assert_eq!(ok("/focus"), Command::Focus);
        assert_eq!(ok("/help"), Command::Help);
        assert_eq!(ok("  /quit  "), Command::Quit);
    }

    #[test]
    fn parses_commands_with_ids() {
        assert_eq!(ok("/join 4"), Command::Join(id(4)));
        assert_eq!(ok("/open  12"), Command::Open(id(12)));
        assert_eq!(ok("/close 1"), Command::Close(id(1)));
    }

    #[test]
    fn create_keeps_spaces_in_name() {
        assert_eq!(ok("/create rust nerds"), Command::Create("rust nerds".into()));
    }

    #[test]
    fn send_splits_id_and_text() {
        assert_eq!(
            ok("/send 3 hello there"),
            Command::Send(id(3), "hello there".into())
        );
    }

    #[test]
    fn plain_text_is_say() {
        assert_eq!(ok("hello"), Command::Say("hello".into()));
    }

    #[test]
    fn reports_usage_errors() {
        assert_eq!(err("/create"), CommandError::Usage("/create <name>"));
        assert_eq!(err("/open"), CommandError::Usage("/open <id>"));
        assert_eq!(err("/send 3"), CommandError::Usage("/send <id> <text>"));
        assert_eq!(err("/send 3   "), CommandError::Usage("/send <id> <text>"));
    }

    #[test]
    fn reports_bad_ids() {
        assert!(matches!(err("/join abc"), CommandError::ChatId(_)));
        assert!(matches!(err("/open 0"), CommandError::ChatId(_)));
        assert!(matches!(err("/send x hi"), CommandError::ChatId(_)));
    }

    #[test]
    fn reports_unknown_commands() {
        assert_eq!(err("/dance"), CommandError::Unknown("dance".into()));
    }
}
