//! Command classification for assembled lines
//!
//! Matching is case-sensitive and exact: `heartbeat` must be the whole line,
//! and a move must start with the five bytes `move ` followed by two
//! decimal numbers.

use core::str::FromStr;

/// Liveness-only command keyword
pub const HEARTBEAT_KEYWORD: &[u8] = b"heartbeat";

/// Prefix selecting a velocity command
pub const MOVE_PREFIX: &[u8] = b"move ";

/// Why a `move ` payload could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Fewer than two numeric tokens after the prefix
    MissingValue,
    /// Token is not a decimal floating-point number
    InvalidNumber,
    /// Token parsed to NaN or infinity
    NotFinite,
}

/// A classified command line
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Liveness signal, no actuator change
    Heartbeat,
    /// Velocity pair in host-defined units
    Move { linear: f32, angular: f32 },
    /// Line matched no known command
    Unknown,
    /// Line had the move prefix but a malformed payload
    Invalid(ParseError),
}

impl Command {
    /// Classify a line (terminator already stripped)
    pub fn parse(line: &[u8]) -> Self {
        if line == HEARTBEAT_KEYWORD {
            return Command::Heartbeat;
        }

        match line.strip_prefix(MOVE_PREFIX) {
            Some(payload) => match parse_move(payload) {
                Ok((linear, angular)) => Command::Move { linear, angular },
                Err(e) => Command::Invalid(e),
            },
            None => Command::Unknown,
        }
    }

    /// Check if this command proves the host is alive
    pub fn is_accepted(&self) -> bool {
        matches!(self, Command::Heartbeat | Command::Move { .. })
    }
}

fn parse_move(payload: &[u8]) -> Result<(f32, f32), ParseError> {
    let mut tokens = payload
        .split(|&b| b == b' ')
        .filter(|token| !token.is_empty());

    let linear = parse_number(tokens.next())?;
    let angular = parse_number(tokens.next())?;

    // Trailing tokens are ignored
    Ok((linear, angular))
}

fn parse_number(token: Option<&[u8]>) -> Result<f32, ParseError> {
    let token = token.ok_or(ParseError::MissingValue)?;
    let text = core::str::from_utf8(token).map_err(|_| ParseError::InvalidNumber)?;
    let value = f32::from_str(text).map_err(|_| ParseError::InvalidNumber)?;

    if !value.is_finite() {
        return Err(ParseError::NotFinite);
    }

    Ok(value)
}
