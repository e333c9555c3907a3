//! Board-agnostic signal conditioning core for the pedal controller
//!
//! This crate turns noisy analog pedal readings into stable, debounced,
//! range-mapped values and reports each accepted change exactly once:
//!
//! - Batch averaging with min/max outlier rejection
//! - Debounce memory on the averaged raw reading
//! - Dead-zone compensation for pots that never reach their extremes
//! - Linear range mapping with integer truncation
//! - Change notification by flag polling or an injected handler
//!
//! It also owns the persisted settings record and the inbound Control
//! Change dispatcher that reconfigures the live channels at runtime.
//! Hardware stays behind the `calcant-hal` traits, so everything here
//! runs on the host in tests.

#![no_std]
#![deny(unsafe_code)]

pub mod cc_pot;
pub mod footswitch;
pub mod pot;
pub mod remote;
pub mod scale;
pub mod settings;

pub use cc_pot::{CcPot, CurveError};
pub use footswitch::{Footswitch, SWITCH_DISABLED};
pub use pot::Pot;
pub use remote::{Remote, RemoteAction};
pub use settings::Settings;
