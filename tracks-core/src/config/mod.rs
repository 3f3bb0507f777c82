//! Configuration constants
//!
//! Everything the controller can be tuned with is fixed at compile time.
//! [`DriveConfig`] groups the values so tests can inject their own.

pub mod types;

pub use types::*;
