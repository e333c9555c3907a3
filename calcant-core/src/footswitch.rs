//! Debounced momentary footswitch channel
//!
//! Watches a two-state pin and sends one Control Change per accepted
//! transition: full-scale on press, zero on release. Transitions inside
//! the debounce window after the last accepted one are contact bounce
//! and are ignored. The caller supplies a millisecond clock with each
//! poll, so the core stays free of any timer dependency.

use calcant_hal::gpio::SwitchPin;
use calcant_hal::midi::MidiOut;
use calcant_protocol::{Channel, ControlChange, DATA_MAX};

/// Controller number that disables sending entirely
pub const SWITCH_DISABLED: u8 = 0;

/// Debounce window a fresh switch starts with
const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// A debounced switch that reports presses as Control Changes
pub struct Footswitch<P, M> {
    pin: P,
    midi: M,
    channel: Channel,
    controller: u8,
    pressed: bool,
    debounce_ms: u64,
    last_acted_ms: u64,
}

impl<P: SwitchPin, M: MidiOut> Footswitch<P, M> {
    pub fn new(pin: P, midi: M, channel: Channel, controller: u8) -> Self {
        Self {
            pin,
            midi,
            channel,
            controller,
            pressed: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            last_acted_ms: 0,
        }
    }

    pub fn set_debounce_ms(&mut self, window: u64) {
        self.debounce_ms = window;
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    /// Set the controller number; [`SWITCH_DISABLED`] mutes the switch
    /// while still tracking its state
    pub fn set_controller(&mut self, controller: u8) {
        self.controller = controller;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Sample the pin against the supplied clock
    ///
    /// Returns the new state when a transition is accepted, `None` when
    /// the pin is steady or still inside the debounce window. `now_ms`
    /// must be monotonic across calls.
    pub fn poll(&mut self, now_ms: u64) -> Option<bool> {
        let closed = self.pin.is_closed();
        if closed == self.pressed {
            return None;
        }
        if now_ms.wrapping_sub(self.last_acted_ms) < self.debounce_ms {
            return None;
        }

        self.pressed = closed;
        self.last_acted_ms = now_ms;
        if self.controller != SWITCH_DISABLED {
            let value = if closed { DATA_MAX } else { 0 };
            self.midi
                .send(ControlChange::new(self.channel, self.controller, value).to_bytes());
        }
        Some(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};

    struct SharedPin<'a>(&'a Cell<bool>);

    impl SwitchPin for SharedPin<'_> {
        fn is_closed(&self) -> bool {
            self.0.get()
        }
    }

    struct RecordingMidi<'a>(&'a RefCell<heapless::Vec<[u8; 3], 8>>);

    impl MidiOut for RecordingMidi<'_> {
        fn send(&mut self, message: [u8; 3]) {
            self.0.borrow_mut().push(message).ok();
        }
    }

    #[test]
    fn test_press_and_release_send_one_message_each() {
        let pin = Cell::new(false);
        let sent = RefCell::new(heapless::Vec::new());
        let mut sw = Footswitch::new(SharedPin(&pin), RecordingMidi(&sent), Channel::new(1), 64);

        // Poll every 10 ms; press at 100 ms, release at 300 ms
        for t in (0..500u64).step_by(10) {
            pin.set((100..300).contains(&t));
            sw.poll(t);
        }

        let sent = sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], [0xB0, 64, 127]);
        assert_eq!(sent[1], [0xB0, 64, 0]);
    }

    #[test]
    fn test_bounce_inside_window_ignored() {
        let pin = Cell::new(false);
        let sent = RefCell::new(heapless::Vec::new());
        let mut sw = Footswitch::new(SharedPin(&pin), RecordingMidi(&sent), Channel::new(1), 64);

        pin.set(true);
        assert_eq!(sw.poll(100), Some(true));
        // Contact bounce: open again 20 ms later, closed at 40 ms
        pin.set(false);
        assert_eq!(sw.poll(120), None);
        pin.set(true);
        assert_eq!(sw.poll(140), None);

        assert_eq!(sent.borrow().len(), 1);
        assert!(sw.is_pressed());
    }

    #[test]
    fn test_release_after_window_accepted() {
        let pin = Cell::new(false);
        let sent = RefCell::new(heapless::Vec::new());
        let mut sw = Footswitch::new(SharedPin(&pin), RecordingMidi(&sent), Channel::new(1), 64);

        pin.set(true);
        sw.poll(100);
        pin.set(false);
        assert_eq!(sw.poll(150), Some(false));
        assert!(!sw.is_pressed());
    }

    #[test]
    fn test_disabled_controller_tracks_silently() {
        let pin = Cell::new(false);
        let sent = RefCell::new(heapless::Vec::new());
        let mut sw = Footswitch::new(
            SharedPin(&pin),
            RecordingMidi(&sent),
            Channel::new(1),
            SWITCH_DISABLED,
        );

        pin.set(true);
        assert_eq!(sw.poll(100), Some(true));
        assert!(sw.is_pressed());
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_steady_pin_never_fires() {
        let pin = Cell::new(true);
        let sent = RefCell::new(heapless::Vec::new());
        let mut sw = Footswitch::new(SharedPin(&pin), RecordingMidi(&sent), Channel::new(1), 64);

        sw.poll(100);
        for t in (110..400u64).step_by(10) {
            assert_eq!(sw.poll(t), None);
        }
        assert_eq!(sent.borrow().len(), 1);
    }
}
