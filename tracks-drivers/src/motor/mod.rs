//! Motor driver implementations
//!
//! Each track is a brushed DC motor behind an H-bridge module with a
//! separate PWM input, direction input and switched supply.

pub mod hbridge;

pub use hbridge::{DifferentialDrive, HBridgeConfig, HBridgeTrack};
