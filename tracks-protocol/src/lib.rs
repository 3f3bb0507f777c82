//! Host Command Protocol
//!
//! This crate defines the text protocol spoken between the host computer
//! and the tracks controller over a byte-oriented serial link. The protocol
//! is deliberately human-typeable: one ASCII command per line.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────┐
//! │ LINE                     │ MEANING                              │
//! ├──────────────────────────┼──────────────────────────────────────┤
//! │ heartbeat                │ liveness signal only                 │
//! │ move <linear> <angular>  │ velocity pair, triggers drive mixing │
//! │ anything else            │ ignored, diagnosed                   │
//! └──────────────────────────┴──────────────────────────────────────┘
//! ```
//!
//! Lines are terminated by `\n` or `\r` (either one, pairs not required)
//! and hold at most [`LINE_MAX`] bytes.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;

pub use command::{Command, ParseError, HEARTBEAT_KEYWORD, MOVE_PREFIX};
pub use line::{Line, LineAssembler, LineError, LINE_MAX};
