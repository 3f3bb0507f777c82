//! H-bridge track driver
//!
//! Each track is driven by three outputs:
//! - PWM input of the bridge (speed, `0..=duty_max`)
//! - Direction input (level selects the bridge polarity)
//! - Supply enable (gates the bridge module's VCC)
//!
//! Peripheral errors are not propagated to the controller. The first
//! failed write latches a fault flag which the owning task polls with
//! [`DifferentialDrive::has_fault`].
//!
//! ```ignore
//! let left = HBridgeTrack::new(left_pwm, left_dir, left_vcc, HBridgeConfig::default());
//! let right = HBridgeTrack::new(right_pwm, right_dir, right_vcc, HBridgeConfig::default());
//! let drive = DifferentialDrive::new(left, right);
//! let controller = DriveController::new(drive, DriveConfig::default(), now_us);
//! ```

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use tracks_core::config::DUTY_MAX;
use tracks_core::traits::{Actuator, Direction, Track};

/// H-bridge track configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HBridgeConfig {
    /// Duty value that maps to a fully-on PWM output
    pub duty_max: u16,
    /// Drive the direction line low for FORWARD instead of high
    pub direction_inverted: bool,
}

impl Default for HBridgeConfig {
    fn default() -> Self {
        Self {
            duty_max: DUTY_MAX,
            direction_inverted: false,
        }
    }
}

/// One H-bridge-driven track
pub struct HBridgeTrack<P, D, E> {
    pwm: P,
    dir: D,
    vcc: E,
    config: HBridgeConfig,
    duty: u16,
    direction: Direction,
    powered: bool,
    fault: bool,
}

impl<P, D, E> HBridgeTrack<P, D, E>
where
    P: SetDutyCycle,
    D: OutputPin,
    E: OutputPin,
{
    /// Create a new track driver
    ///
    /// Outputs are not touched until the first call; the board is
    /// expected to create the pins low.
    pub fn new(pwm: P, dir: D, vcc: E, config: HBridgeConfig) -> Self {
        Self {
            pwm,
            dir,
            vcc,
            config,
            duty: 0,
            direction: Direction::Backward,
            powered: false,
            fault: false,
        }
    }

    /// Set the duty cycle, clamped to `duty_max`
    pub fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(self.config.duty_max);
        let result = if self.config.duty_max == 0 {
            self.pwm.set_duty_cycle_fully_off()
        } else {
            self.pwm.set_duty_cycle_fraction(duty, self.config.duty_max)
        };

        self.fault |= result.is_err();
        self.duty = duty;
    }

    /// Set the direction line
    pub fn set_direction(&mut self, direction: Direction) {
        let result = self.dir.set_state(self.direction_level(direction));
        self.fault |= result.is_err();
        self.direction = direction;
    }

    /// Switch the bridge supply
    pub fn enable_power(&mut self, on: bool) {
        let result = self.vcc.set_state(PinState::from(on));
        self.fault |= result.is_err();
        self.powered = on;
    }

    /// Pin level for a direction (high = FORWARD unless inverted)
    fn direction_level(&self, direction: Direction) -> PinState {
        let forward = direction == Direction::Forward;
        PinState::from(forward != self.config.direction_inverted)
    }

    /// Last duty written
    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// Last direction written
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Check if the bridge supply is on
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Check if any peripheral write has failed
    pub fn has_fault(&self) -> bool {
        self.fault
    }

    /// Clear the latched fault flag
    pub fn clear_fault(&mut self) {
        self.fault = false;
    }

    /// Release the peripherals
    pub fn release(self) -> (P, D, E) {
        (self.pwm, self.dir, self.vcc)
    }
}

/// Left and right H-bridge tracks forming the drive actuator
pub struct DifferentialDrive<P, D, E> {
    left: HBridgeTrack<P, D, E>,
    right: HBridgeTrack<P, D, E>,
}

impl<P, D, E> DifferentialDrive<P, D, E>
where
    P: SetDutyCycle,
    D: OutputPin,
    E: OutputPin,
{
    /// Pair two track drivers
    pub fn new(left: HBridgeTrack<P, D, E>, right: HBridgeTrack<P, D, E>) -> Self {
        Self { left, right }
    }

    /// Get one track driver
    pub fn track(&self, track: Track) -> &HBridgeTrack<P, D, E> {
        match track {
            Track::Left => &self.left,
            Track::Right => &self.right,
        }
    }

    fn track_mut(&mut self, track: Track) -> &mut HBridgeTrack<P, D, E> {
        match track {
            Track::Left => &mut self.left,
            Track::Right => &mut self.right,
        }
    }

    /// Check if either track has a latched fault
    pub fn has_fault(&self) -> bool {
        self.left.has_fault() || self.right.has_fault()
    }

    /// Clear both tracks' fault flags
    pub fn clear_fault(&mut self) {
        self.left.clear_fault();
        self.right.clear_fault();
    }
}

impl<P, D, E> Actuator for DifferentialDrive<P, D, E>
where
    P: SetDutyCycle,
    D: OutputPin,
    E: OutputPin,
{
    fn set_duty(&mut self, track: Track, duty: u16) {
        self.track_mut(track).set_duty(duty);
    }

    fn set_direction(&mut self, track: Track, direction: Direction) {
        self.track_mut(track).set_direction(direction);
    }

    fn enable_power(&mut self, track: Track, on: bool) {
        self.track_mut(track).enable_power(on);
    }
}
