//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod midi;
pub mod pedals;

pub use midi::{midi_rx_task, midi_tx_task};
pub use pedals::pedals_task;
