//! Heartbeat watchdog implementation
//!
//! Tracks how long it has been since the host last sent an accepted
//! command. The machine has two states and no terminal state:
//!
//! ```text
//!            elapsed > timeout (fires once)
//!   ┌──────┐ ─────────────────────────────▶ ┌───────────┐
//!   │ LIVE │                                │ TIMED_OUT │
//!   └──────┘ ◀───────────────────────────── └───────────┘
//!               accepted command (refresh)
//! ```

/// Host link state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Accepted command seen within the heartbeat window
    Live,
    /// Heartbeat window expired; outputs have been blanked
    TimedOut,
}

/// Edge reported by [`HeartbeatWatchdog::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogEvent {
    /// Link just timed out; the caller must stop the drive
    Tripped,
}

/// Heartbeat state: when the host was last heard from, and whether the
/// current outage has already been acted on
#[derive(Debug, Clone)]
pub struct HeartbeatWatchdog {
    /// Monotonic time of the last accepted command (µs)
    last_seen_us: u64,
    /// Set once per outage when the trip fires
    warned: bool,
    /// Heartbeat window (µs)
    timeout_us: u64,
}

impl HeartbeatWatchdog {
    /// Create a watchdog that assumes the link is live at `now_us`
    pub fn new(now_us: u64, timeout_us: u64) -> Self {
        Self {
            last_seen_us: now_us,
            warned: false,
            timeout_us,
        }
    }

    /// Record an accepted command
    pub fn refresh(&mut self, now_us: u64) {
        self.last_seen_us = now_us;
        self.warned = false;
    }

    /// Time since the last accepted command (µs)
    pub fn elapsed(&self, now_us: u64) -> u64 {
        now_us.saturating_sub(self.last_seen_us)
    }

    /// Evaluate the heartbeat window
    ///
    /// Returns `Some(WatchdogEvent::Tripped)` exactly once per outage, on
    /// the first check after the window expires. Later checks during the
    /// same outage return `None`.
    pub fn check(&mut self, now_us: u64) -> Option<WatchdogEvent> {
        if self.warned || self.elapsed(now_us) <= self.timeout_us {
            return None;
        }

        self.warned = true;
        Some(WatchdogEvent::Tripped)
    }

    /// Current link state
    pub fn state(&self) -> LinkState {
        if self.warned {
            LinkState::TimedOut
        } else {
            LinkState::Live
        }
    }

    /// Time of the last accepted command (µs)
    pub fn last_seen_us(&self) -> u64 {
        self.last_seen_us
    }
}
