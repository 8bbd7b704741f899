//! Line commands read from stdin.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Begin,
    End,
    Send(String),
    Location { latitude: f64, longitude: f64 },
    Status,
    Reconnect,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
commands:
  begin              begin a walk
  end                end the current walk
  send <text>        send a raw text frame
  loc <lat> <lon>    publish a location sample
  status             show tracker state
  reconnect          reconnect after retries ran out
  quit               shut down";

impl Input {
    /// Parse one line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, InputError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let input = match word.to_ascii_lowercase().as_str() {
            "begin" => Self::Begin,
            "end" => Self::End,
            "send" if rest.is_empty() => return Err(InputError::Usage("send <text>")),
            "send" => Self::Send(rest.to_string()),
            "loc" => parse_location(rest).ok_or(InputError::Usage("loc <lat> <lon>"))?,
            "status" => Self::Status,
            "reconnect" => Self::Reconnect,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(InputError::Unknown(other.to_string())),
        };
        Ok(Some(input))
    }
}

fn parse_location(rest: &str) -> Option<Input> {
    let mut parts = rest.split_whitespace();
    let latitude: f64 = parts.next()?.parse().ok()?;
    let longitude: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some()
        || !(-90.0..=90.0).contains(&latitude)
        || !(-180.0..=180.0).contains(&longitude)
    {
        return None;
    }
    Some(Input::Location { latitude, longitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Input::parse("begin"), Ok(Some(Input::Begin)));
        assert_eq!(Input::parse("  END "), Ok(Some(Input::End)));
        assert_eq!(Input::parse(""), Ok(None));
        assert_eq!(Input::parse("send hello there"), Ok(Some(Input::Send("hello there".to_string()))));
        assert_eq!(
            Input::parse("loc 51.5 -0.12"),
            Ok(Some(Input::Location { latitude: 51.5, longitude: -0.12 }))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Input::parse("send"), Err(InputError::Usage("send <text>")));
        assert_eq!(Input::parse("loc 100 0"), Err(InputError::Usage("loc <lat> <lon>")));
        assert_eq!(Input::parse("loc 1"), Err(InputError::Usage("loc <lat> <lon>")));
        assert_eq!(Input::parse("fly"), Err(InputError::Unknown("fly".to_string())));
    }
}
