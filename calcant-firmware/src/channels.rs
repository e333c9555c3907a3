//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy
//! tasks. Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use calcant_hal::MidiOut;
use calcant_protocol::ControlChange;

/// Channel capacity for outgoing wire messages
const MIDI_TX_SIZE: usize = 16;

/// Channel capacity for inbound configuration messages
const CONFIG_RX_SIZE: usize = 8;

/// Outgoing 3-byte messages, drained by the UART TX task in order
pub static MIDI_TX: Channel<CriticalSectionRawMutex, [u8; 3], MIDI_TX_SIZE> = Channel::new();

/// Configuration messages picked out of the inbound stream
pub static CONFIG_RX: Channel<CriticalSectionRawMutex, ControlChange, CONFIG_RX_SIZE> =
    Channel::new();

/// Handle that queues messages onto [`MIDI_TX`]
///
/// Both pedal channels hold one; a single TX task owns the UART, so
/// message order on the wire is the queue order.
#[derive(Clone, Copy)]
pub struct QueuedMidiOut;

impl MidiOut for QueuedMidiOut {
    fn send(&mut self, message: [u8; 3]) {
        if MIDI_TX.try_send(message).is_err() {
            defmt::warn!("MIDI TX queue full, dropping message");
        }
    }
}
