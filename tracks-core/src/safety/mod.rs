//! Safety monitoring
//!
//! Detects loss of the host link and forces the drive to a safe stop.

pub mod watchdog;

pub use watchdog::{HeartbeatWatchdog, LinkState, WatchdogEvent};
