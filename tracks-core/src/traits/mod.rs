//! Collaborator traits
//!
//! These traits define the interface between the controller logic
//! and the hardware-specific implementations.

pub mod actuator;
pub mod io;

pub use actuator::{Actuator, Direction, Track};
pub use io::{ByteSource, Clock};
