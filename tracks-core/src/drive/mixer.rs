//! Mixing, direction resolution and duty clamping
//!
//! ```text
//! left_mix  = linear - angular
//! right_mix = linear + angular
//! ```
//!
//! The direction line is wired inverted relative to the mix sign: a
//! negative mix drives the track FORWARD, zero or positive drives it
//! BACKWARD (zero duty at zero mix, so BACKWARD doubles as stop).

use crate::config::DriveConfig;
use crate::traits::{Direction, Track};

/// Actuator target for one track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackTarget {
    /// Duty cycle in `[0, duty_max]`
    pub magnitude: u16,
    /// Drive direction
    pub direction: Direction,
}

impl TrackTarget {
    /// Zero duty, backward: the state a track powers up in
    pub const STOPPED: Self = Self {
        magnitude: 0,
        direction: Direction::Backward,
    };
}

impl Default for TrackTarget {
    fn default() -> Self {
        Self::STOPPED
    }
}

/// Targets for both tracks from one move command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveTargets {
    pub left: TrackTarget,
    pub right: TrackTarget,
}

impl DriveTargets {
    /// Get the target for one track
    pub fn get(&self, track: Track) -> TrackTarget {
        match track {
            Track::Left => self.left,
            Track::Right => self.right,
        }
    }

    /// Zero both magnitudes, keeping directions
    pub fn blanked(self) -> Self {
        Self {
            left: TrackTarget {
                magnitude: 0,
                ..self.left
            },
            right: TrackTarget {
                magnitude: 0,
                ..self.right
            },
        }
    }
}

/// Mix a velocity pair into per-track targets
pub fn mix(linear: f32, angular: f32, config: &DriveConfig) -> DriveTargets {
    DriveTargets {
        left: resolve(linear - angular, config),
        right: resolve(linear + angular, config),
    }
}

/// Resolve a single mix value into a direction and clamped duty
///
/// Scaling truncates toward zero. The float-to-integer conversion
/// saturates (NaN becomes 0) before the clamp, so no input wraps.
pub fn resolve(mix_value: f32, config: &DriveConfig) -> TrackTarget {
    let (direction, speed) = if mix_value < 0.0 {
        (Direction::Forward, -mix_value)
    } else {
        (Direction::Backward, mix_value)
    };

    let scaled = (speed * config.scale) as i32;
    let magnitude = scaled.clamp(0, config.duty_max as i32) as u16;

    TrackTarget {
        magnitude,
        direction,
    }
}
