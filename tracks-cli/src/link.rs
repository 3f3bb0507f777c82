//! Serial link to the tracks controller
//!
//! Commands go out as one line each with a trailing `\n`. Everything the
//! device writes back is a diagnostic line and is only ever printed.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info, trace};
use tracks_protocol::LINE_MAX;

use crate::error::{CliError, Result};

/// Read timeout of the serial port
const READ_TIMEOUT: Duration = Duration::from_millis(20);

/// Longest device line kept before it is force-split
const DEVICE_LINE_MAX: usize = 256;

/// Build a `move` command line
pub fn move_line(linear: f32, angular: f32) -> String {
    format!("move {} {}", linear, angular)
}

/// Check that a line can be sent as a single command
pub fn validate_line(line: &str) -> Result<()> {
    let reason = if line.is_empty() {
        "empty"
    } else if line.contains(['\n', '\r']) {
        "contains a line terminator"
    } else if line.len() > LINE_MAX {
        "longer than the device line buffer"
    } else {
        return Ok(());
    };

    Err(CliError::InvalidLine {
        line: line.to_string(),
        reason,
    })
}

/// Splits device output into lines
#[derive(Debug, Default)]
pub struct LineReader {
    pending: Vec<u8>,
}

impl LineReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed received bytes, returning every line they complete
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in bytes {
            if byte == b'\n' || byte == b'\r' {
                if !self.pending.is_empty() {
                    lines.push(self.take());
                }
                continue;
            }

            self.pending.push(byte);
            if self.pending.len() >= DEVICE_LINE_MAX {
                lines.push(self.take());
            }
        }

        lines
    }

    fn take(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        line
    }
}

/// Open serial connection to the device
pub struct DeviceLink {
    port: Box<dyn SerialPort>,
    reader: LineReader,
}

impl DeviceLink {
    /// Open the serial port
    pub fn open(port_name: &str, baud: u32) -> Result<Self> {
        info!("Opening {} at {} baud", port_name, baud);

        let port = serialport::new(port_name, baud)
            .timeout(READ_TIMEOUT)
            .open()?;

        Ok(Self {
            port,
            reader: LineReader::new(),
        })
    }

    /// Send one command line
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        validate_line(line)?;
        debug!("TX: {}", line);

        let mut frame = Vec::with_capacity(line.len() + 1);
        frame.extend_from_slice(line.as_bytes());
        frame.push(b'\n');

        self.port.write_all(&frame)?;
        self.port.flush()?;
        Ok(())
    }

    /// Collect device lines received within one read timeout
    pub fn poll_lines(&mut self) -> Result<Vec<String>> {
        let mut buf = [0u8; 128];

        match self.port.read(&mut buf) {
            Ok(n) => {
                trace!("RX: {} bytes", n);
                Ok(self.reader.feed(&buf[..n]))
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
