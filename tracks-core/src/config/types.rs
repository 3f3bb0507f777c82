//! Configuration type definitions

pub use tracks_protocol::LINE_MAX;

/// Duty-cycle resolution ceiling of the actuator (PWM counter top)
pub const DUTY_MAX: u16 = 1000;

/// Velocity to duty multiplier
pub const SCALE: f32 = 10.0;

/// Heartbeat window in microseconds
pub const HEARTBEAT_TIMEOUT_US: u64 = 3_000_000;

/// Drive controller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveConfig {
    /// Highest duty value written to a track
    pub duty_max: u16,
    /// Multiplier applied to a mix value before truncation
    pub scale: f32,
    /// Time without an accepted command before the drive is stopped (µs)
    pub heartbeat_timeout_us: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            duty_max: DUTY_MAX,
            scale: SCALE,
            heartbeat_timeout_us: HEARTBEAT_TIMEOUT_US,
        }
    }
}
