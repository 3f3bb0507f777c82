//! CLI error type

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid command line {line:?}: {reason}")]
    InvalidLine { line: String, reason: &'static str },

    #[error("Heartbeat period {period:?} must be non-zero and shorter than the {timeout:?} device timeout")]
    HeartbeatPeriod { period: Duration, timeout: Duration },

    #[error("Drive time {seconds}s is not a valid duration")]
    InvalidDuration { seconds: f32 },
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CliError::InvalidLine {
            line: "move 1\n2".to_string(),
            reason: "contains a line terminator",
        };
        assert_eq!(
            err.to_string(),
            "Invalid command line \"move 1\\n2\": contains a line terminator"
        );

        let err = CliError::HeartbeatPeriod {
            period: Duration::from_secs(5),
            timeout: Duration::from_secs(3),
        };
        assert!(err.to_string().starts_with("Heartbeat period 5s"));

        let err = CliError::InvalidDuration { seconds: -1.0 };
        assert_eq!(err.to_string(), "Drive time -1s is not a valid duration");
    }
}
