//! Track actuator trait
//!
//! An actuator owns the power stage of both tracks: a fixed-frequency PWM
//! output for speed, a digital line for direction, and a supply enable.

/// One side of the differential-drive chassis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Track {
    Left,
    Right,
}

impl Track {
    /// Both tracks, left first
    pub const ALL: [Track; 2] = [Track::Left, Track::Right];
}

/// Track drive direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Backward,
}

/// Trait for the per-track motor power stage
///
/// All operations are immediate and idempotent. Implementations do no
/// decision making: range checks, mixing and safety live in the controller.
pub trait Actuator {
    /// Set the duty cycle of a track (0 = stopped, `DUTY_MAX` = full power)
    fn set_duty(&mut self, track: Track, duty: u16);

    /// Set the drive direction of a track
    ///
    /// Independent of the duty cycle; changing direction does not touch duty.
    fn set_direction(&mut self, track: Track, direction: Direction);

    /// Gate the motor driver supply of a track
    ///
    /// Called once at startup (on) and optionally at shutdown (off).
    fn enable_power(&mut self, track: Track, on: bool);
}

impl<T: Actuator + ?Sized> Actuator for &mut T {
    fn set_duty(&mut self, track: Track, duty: u16) {
        (**self).set_duty(track, duty);
    }

    fn set_direction(&mut self, track: Track, direction: Direction) {
        (**self).set_direction(track, direction);
    }

    fn enable_power(&mut self, track: Track, on: bool) {
        (**self).enable_power(track, on);
    }
}
