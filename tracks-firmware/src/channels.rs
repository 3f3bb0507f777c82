//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use tracks_core::diagnostics::DiagLine;

/// Capacity of the received byte queue
const RX_CHANNEL_SIZE: usize = 256;

/// Capacity of the outgoing diagnostic queue
const DIAG_CHANNEL_SIZE: usize = 8;

/// Bytes received from the host, consumed by the drive task
pub static RX_BYTES: Channel<CriticalSectionRawMutex, u8, RX_CHANNEL_SIZE> = Channel::new();

/// Diagnostic lines to echo to the host
pub static DIAG_LINES: Channel<CriticalSectionRawMutex, DiagLine, DIAG_CHANNEL_SIZE> =
    Channel::new();
