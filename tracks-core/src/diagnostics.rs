//! Diagnostic lines reported by the controller
//!
//! Diagnostics are informational only. They are returned to the caller,
//! which decides where to print them (RTT log, serial echo, stdout); they
//! never feed back into control flow.

use core::fmt::{self, Write as _};

use heapless::String;
use tracks_protocol::{ParseError, LINE_MAX};

use crate::drive::DriveTargets;

/// Printable copy of a received line
pub type LineText = String<LINE_MAX>;

/// Longest rendered diagnostic line, terminator included
pub const DIAG_LINE_MAX: usize = 96;

/// One diagnostic rendered for the serial link
pub type DiagLine = String<DIAG_LINE_MAX>;

/// Copy a raw line into printable text, replacing non-printable bytes with `?`
pub fn line_text(line: &[u8]) -> LineText {
    let mut text = LineText::new();
    for &byte in line.iter().take(LINE_MAX) {
        let c = if byte.is_ascii_graphic() || byte == b' ' {
            byte as char
        } else {
            '?'
        };
        // Cannot fail: at most LINE_MAX single-byte chars
        let _ = text.push(c);
    }
    text
}

/// How loudly a diagnostic should be logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    Info,
    Warn,
}

/// Something the controller wants a human to know about
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// Controller initialized and waiting for commands
    Ready,
    /// A command line exceeded the line buffer and was dropped
    LineOverflow,
    /// Line matched no known command
    UnknownCommand(LineText),
    /// Move command with a malformed payload
    ParseError { line: LineText, error: ParseError },
    /// Move command applied to the tracks
    Drive(DriveTargets),
    /// Heartbeat window expired, tracks stopped
    HeartbeatLost,
    /// Drive powered down
    Shutdown,
}

impl Diagnostic {
    /// Get the log severity for this diagnostic
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::Ready | Diagnostic::Drive(_) | Diagnostic::Shutdown => Severity::Info,
            Diagnostic::LineOverflow
            | Diagnostic::UnknownCommand(_)
            | Diagnostic::ParseError { .. }
            | Diagnostic::HeartbeatLost => Severity::Warn,
        }
    }

    /// Render the diagnostic as a CRLF-terminated line
    pub fn to_line(&self) -> DiagLine {
        let mut line = DiagLine::new();
        // Cannot fail: the longest message plus LINE_MAX and CRLF fits
        let _ = write!(line, "{}\r\n", self);
        line
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Ready => f.write_str("Track Controller Initialized. Waiting for commands..."),
            Diagnostic::LineOverflow => f.write_str("WARN: Serial command buffer overflow!"),
            Diagnostic::UnknownCommand(line) => write!(f, "Unknown command: {}", line),
            Diagnostic::ParseError { line, .. } => {
                write!(f, "Error parsing move command: {}", line)
            }
            Diagnostic::Drive(targets) => write!(
                f,
                "left_pwm: {}, right_pwm: {}",
                targets.left.magnitude, targets.right.magnitude
            ),
            Diagnostic::HeartbeatLost => f.write_str("WARN: Heartbeat missing, stopping motors!"),
            Diagnostic::Shutdown => f.write_str("Track Controller stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::TrackTarget;
    use crate::traits::Direction;

    #[test]
    fn test_line_text_replaces_control_bytes() {
        assert_eq!(line_text(b"move 1 2").as_str(), "move 1 2");
        assert_eq!(line_text(&[b'a', 0x07, b'b', 0xC3]).as_str(), "a?b?");
    }

    #[test]
    fn test_rendered_text() {
        assert_eq!(
            Diagnostic::HeartbeatLost.to_string(),
            "WARN: Heartbeat missing, stopping motors!"
        );
        assert_eq!(
            Diagnostic::UnknownCommand(line_text(b"stop")).to_string(),
            "Unknown command: stop"
        );
        assert_eq!(
            Diagnostic::ParseError {
                line: line_text(b"move abc 1"),
                error: ParseError::InvalidNumber,
            }
            .to_string(),
            "Error parsing move command: move abc 1"
        );

        let targets = DriveTargets {
            left: TrackTarget {
                magnitude: 500,
                direction: Direction::Forward,
            },
            right: TrackTarget {
                magnitude: 250,
                direction: Direction::Backward,
            },
        };
        assert_eq!(
            Diagnostic::Drive(targets).to_string(),
            "left_pwm: 500, right_pwm: 250"
        );
    }

    #[test]
    fn test_longest_line_fits() {
        let line = [b'x'; LINE_MAX];
        let diag = Diagnostic::ParseError {
            line: line_text(&line),
            error: ParseError::InvalidNumber,
        };
        let rendered = diag.to_line();
        assert_eq!(rendered.len(), "Error parsing move command: ".len() + LINE_MAX + 2);
        assert!(rendered.ends_with("\r\n"));

        let unknown = Diagnostic::UnknownCommand(line_text(&line)).to_line();
        assert!(unknown.ends_with("\r\n"));
        assert!(unknown.starts_with("Unknown command: xxx"));
    }

    #[test]
    fn test_severity() {
        assert_eq!(Diagnostic::Ready.severity(), Severity::Info);
        assert_eq!(Diagnostic::LineOverflow.severity(), Severity::Warn);
        assert_eq!(Diagnostic::HeartbeatLost.severity(), Severity::Warn);
    }
}
