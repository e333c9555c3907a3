//! MIDI transport abstractions

/// Outgoing MIDI transport
///
/// Fire-and-forget: implementations queue or write the message without
/// acknowledgment, and may drop messages when the transport is
/// saturated. A message is one complete 3-byte channel voice message
/// (status, data, data).
pub trait MidiOut {
    /// Send one channel voice message
    fn send(&mut self, message: [u8; 3]);
}
