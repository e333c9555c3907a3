//! MIDI wire layer for the Calcant pedal controller
//!
//! Covers exactly what the pedal hardware speaks: Control Change
//! messages on the outgoing side, and an incremental byte parser for
//! the inbound Control Change stream used to reconfigure the pedals at
//! runtime.
//!
//! # Wire format
//!
//! One channel voice message, 3 bytes:
//! ```text
//! ┌────────────────┬──────────────┬──────────────┐
//! │ STATUS         │ CONTROLLER   │ VALUE        │
//! │ 0xBn, n = ch-1 │ 0..=119      │ 0..=127      │
//! └────────────────┴──────────────┴──────────────┘
//! ```
//!
//! Data bytes always have the high bit clear; any byte with the high
//! bit set starts a new message, which is what lets the parser resync
//! after line noise.

#![no_std]
#![deny(unsafe_code)]

pub mod cc;
pub mod parser;

pub use cc::{Channel, ControlChange, CC_STATUS, DATA_MAX};
pub use parser::CcParser;
