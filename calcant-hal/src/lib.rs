//! Calcant Hardware Abstraction Layer
//!
//! This crate defines the hardware collaborator traits consumed by the
//! signal conditioning core. The core never touches a peripheral
//! directly; board crates implement these traits and the same
//! conditioning logic runs on any of them (or on the host, in tests).
//!
//! # Traits
//!
//! - [`adc::AnalogPin`] - One analog pedal input
//! - [`gpio::SwitchPin`] - One digital switch input
//! - [`midi::MidiOut`] - Fire-and-forget MIDI transport
//! - [`store::SettingsStore`] - Persistent settings record

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod midi;
pub mod store;

// Re-export key traits at crate root for convenience
pub use adc::{AnalogPin, RAW_MAX};
pub use gpio::SwitchPin;
pub use midi::MidiOut;
pub use store::{SettingsStore, StoreError};
