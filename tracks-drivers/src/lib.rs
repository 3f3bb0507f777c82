//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tracks-core on top of `embedded-hal` 1.0 peripherals:
//!
//! - H-bridge track driver (PWM speed, direction line, supply enable)
//! - Differential pair of tracks implementing the core `Actuator`

#![no_std]
#![deny(unsafe_code)]

pub mod motor;
