//! Terminal command parsing

use shared::{EntityId, SessionId};
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  start               start a new game
  search <name>       find players by name (at least 2 characters)
  guess <player id>   guess a player; a bare id works too
  state               show the current game
  resume <game id>    continue an existing game
  ping                measure round trip time
  help                show this help
  quit                leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Search(String),
    Guess(EntityId),
    State,
    Resume(SessionId),
    Ping,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a player id")]
    InvalidId(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Err(ParseError::Empty),
            "start" | "new" => Ok(Command::Start),
            "search" | "find" | "s" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("search"));
                }
                Ok(Command::Search(rest.to_string()))
            }
            "guess" | "g" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("guess"));
                }
                parse_id(rest).map(Command::Guess)
            }
            "state" | "status" => Ok(Command::State),
            "resume" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("resume"));
                }
                Ok(Command::Resume(SessionId::from(rest)))
            }
            "ping" => Ok(Command::Ping),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ if rest.is_empty() && word.chars().all(|c| c.is_ascii_digit()) => {
                parse_id(word).map(Command::Guess)
            }
            _ => Err(ParseError::Unknown(word.to_string())),
        }
    }
}

fn parse_id(text: &str) -> Result<EntityId, ParseError> {
    text.parse()
        .map_err(|_| ParseError::InvalidId(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!("start".parse::<Command>(), Ok(Command::Start));
        assert_eq!("  STATE ".parse::<Command>(), Ok(Command::State));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("help".parse::<Command>(), Ok(Command::Help));
    }

    #[test]
    fn test_search_keeps_whole_query() {
        assert_eq!(
            "search  LeBron James ".parse::<Command>(),
            Ok(Command::Search("LeBron James".to_string()))
        );
        assert_eq!(
            "search".parse::<Command>(),
            Err(ParseError::MissingArgument("search"))
        );
    }

    #[test]
    fn test_guess_forms() {
        assert_eq!("guess 2544".parse::<Command>(), Ok(Command::Guess(2544)));
        assert_eq!("2544".parse::<Command>(), Ok(Command::Guess(2544)));
        assert_eq!(
            "guess lebron".parse::<Command>(),
            Err(ParseError::InvalidId("lebron".to_string()))
        );
    }

    #[test]
    fn test_resume_takes_session_id() {
        assert_eq!(
            "resume 00ff".parse::<Command>(),
            Ok(Command::Resume(SessionId::from("00ff")))
        );
    }

    #[test]
    fn test_rejects_unknown_and_empty() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!(
            "dance now".parse::<Command>(),
            Err(ParseError::Unknown("dance".to_string()))
        );
    }
}
