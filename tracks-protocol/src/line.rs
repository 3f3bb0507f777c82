//! Line assembly for the host command protocol.
//!
//! Bytes arrive one at a time from the serial link with no framing other
//! than the line terminator:
//! - `\n` or `\r` ends a line
//! - blank lines (consecutive terminators) are ignored
//! - a line longer than [`LINE_MAX`] bytes is discarded up to its terminator

use heapless::Vec;

/// Maximum number of data bytes in one command line
pub const LINE_MAX: usize = 63;

/// A completed command line, without its terminator
pub type Line = Vec<u8, LINE_MAX>;

/// Errors that can occur while assembling lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`LINE_MAX`] bytes; its contents were dropped
    Overflow,
}

/// Accumulates raw bytes into newline-terminated command lines
#[derive(Debug, Clone, Default)]
pub struct LineAssembler {
    buffer: Line,
    /// Set after an overflow until the over-long line's terminator arrives
    discarding: bool,
}

#[inline]
fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

impl LineAssembler {
    /// Create a new, empty line assembler
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Drop any partial line and re-arm the assembler
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Number of bytes accumulated for the current line
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if no bytes are pending
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Check if the assembler is skipping the rest of an over-long line
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }

    /// Feed a single byte to the assembler
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-empty line,
    /// `Ok(None)` when more bytes are needed, or `Err(LineError::Overflow)`
    /// the first time a line grows past [`LINE_MAX`].
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        if is_terminator(byte) {
            if self.discarding {
                self.discarding = false;
                return Ok(None);
            }
            if self.buffer.is_empty() {
                return Ok(None);
            }
            return Ok(Some(core::mem::take(&mut self.buffer)));
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Err(LineError::Overflow);
        }

        Ok(None)
    }
}
