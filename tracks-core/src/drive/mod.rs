//! Differential-drive mixing
//!
//! Converts a linear/angular velocity pair into a duty and direction for
//! each track.

pub mod mixer;

pub use mixer::{mix, resolve, DriveTargets, TrackTarget};
