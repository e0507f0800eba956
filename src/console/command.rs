/*!
 * Console Commands
 * Line parser for the operator console
 */

use crate::core::types::Size;
use thiserror::Error;

pub const HELP_TEXT: &str = "\
Available commands:
  create <size>  - admit a process of <size> memory units
  speed+<N>%     - raise the clock rate by N percent (e.g. speed+10%)
  speed-<N>%     - lower the clock rate by N percent (e.g. speed-5%)
  exit           - stop the simulator
  <anything else or Enter> - refresh the view";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Create(Size),
    /// Multiply the clock rate by this factor
    Speed(f64),
    Help,
    Exit,
    Refresh,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Process size must be a non-negative integer, got `{0}`")]
    InvalidSize(String),

    #[error("Malformed speed command `{0}`; use speed+<N>% or speed-<N>%")]
    InvalidSpeed(String),
}

impl ConsoleCommand {
    /// Parse one input line. Matching is case-insensitive and anything
    /// unrecognized, including an empty line, is a refresh.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim().to_lowercase();
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Ok(Self::Refresh);
        };

        match command {
            "exit" => Ok(Self::Exit),
            "help" | "/?" => Ok(Self::Help),
            "create" => match parts.next() {
                Some(arg) => arg
                    .parse::<Size>()
                    .map(Self::Create)
                    .map_err(|_| ParseError::InvalidSize(arg.to_string())),
                None => Ok(Self::Refresh),
            },
            _ => {
                if let Some(rest) = command.strip_prefix("speed+") {
                    parse_percentage(command, rest).map(|n| Self::Speed(1.0 + n / 100.0))
                } else if let Some(rest) = command.strip_prefix("speed-") {
                    parse_percentage(command, rest).map(|n| Self::Speed(1.0 - n / 100.0))
                } else {
                    Ok(Self::Refresh)
                }
            }
        }
    }
}

fn parse_percentage(command: &str, rest: &str) -> Result<f64, ParseError> {
    rest.trim_end_matches('%')
        .parse::<u32>()
        .map(f64::from)
        .map_err(|_| ParseError::InvalidSpeed(command.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create() {
        assert_eq!(ConsoleCommand::parse("create 256"), Ok(ConsoleCommand::Create(256)));
        assert_eq!(ConsoleCommand::parse("  CREATE 64 "), Ok(ConsoleCommand::Create(64)));
        assert_eq!(
            ConsoleCommand::parse("create big"),
            Err(ParseError::InvalidSize("big".into()))
        );
        assert_eq!(ConsoleCommand::parse("create"), Ok(ConsoleCommand::Refresh));
    }

    #[test]
    fn test_speed() {
        assert_eq!(ConsoleCommand::parse("speed+10%"), Ok(ConsoleCommand::Speed(1.1)));
        assert_eq!(ConsoleCommand::parse("speed-50%"), Ok(ConsoleCommand::Speed(0.5)));
        assert_eq!(ConsoleCommand::parse("SPEED+100"), Ok(ConsoleCommand::Speed(2.0)));
        assert_eq!(
            ConsoleCommand::parse("speed+fast%"),
            Err(ParseError::InvalidSpeed("speed+fast%".into()))
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(ConsoleCommand::parse("exit"), Ok(ConsoleCommand::Exit));
        assert_eq!(ConsoleCommand::parse("help"), Ok(ConsoleCommand::Help));
        assert_eq!(ConsoleCommand::parse("/?"), Ok(ConsoleCommand::Help));
        assert_eq!(ConsoleCommand::parse(""), Ok(ConsoleCommand::Refresh));
        assert_eq!(ConsoleCommand::parse("status"), Ok(ConsoleCommand::Refresh));
    }
}
