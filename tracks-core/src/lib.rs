//! Board-agnostic core logic for the tracks controller firmware
//!
//! This crate contains all decision logic of the drive controller and
//! none of its I/O:
//!
//! - Collaborator traits (actuator, byte source, clock)
//! - Differential-drive mixing and duty clamping
//! - Heartbeat watchdog state machine
//! - Command interpreter ([`controller::DriveController`])
//! - Non-blocking control loop ([`runner::ControlLoop`])
//! - Diagnostic line definitions
//! - Configuration constants

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod drive;
pub mod runner;
pub mod safety;
pub mod traits;

pub use controller::DriveController;
pub use diagnostics::Diagnostic;
pub use runner::ControlLoop;
