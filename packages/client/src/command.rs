//! Parsing of interactive stdin commands.

use thiserror::Error;

use crate::media_link::{MediaLinkError, parse_media_link};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load a media id (already extracted from the link)
    Load(String),
    Play,
    Pause,
    Seek(f64),
    Cursor { x: f64, y: f64 },
    State,
    Help,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type /help for the list")]
    Unknown(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error(transparent)]
    InvalidLink(#[from] MediaLinkError),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        return Err(CommandError::Unknown(String::new()));
    };

    match name {
        "/load" => {
            let link = parts.next().ok_or(CommandError::MissingArgument("link"))?;
            Ok(Command::Load(parse_media_link(link)?))
        }
        "/play" => Ok(Command::Play),
        "/pause" => Ok(Command::Pause),
        "/seek" => {
            let seconds = parse_number(parts.next(), "seconds")?;
            Ok(Command::Seek(seconds))
        }
        "/cursor" => {
            let x = parse_number(parts.next(), "x")?;
            let y = parse_number(parts.next(), "y")?;
            Ok(Command::Cursor { x, y })
        }
        "/state" => Ok(Command::State),
        "/help" => Ok(Command::Help),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_number(arg: Option<&str>, name: &'static str) -> Result<f64, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument(name))?;
    arg.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber(arg.to_string()))
}
