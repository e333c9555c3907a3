//! Control-message-emitting pedal channel
//!
//! `CcPot` composes a [`Pot`] with a message sink: each accepted change
//! becomes one outgoing Control Change. An optional lookup table turns
//! the linear pedal response into an arbitrary curve, in which case the
//! table entry, not the linear value, goes on the wire and into any
//! downstream change handler.

use calcant_hal::midi::MidiOut;
use calcant_hal::AnalogPin;
use calcant_protocol::{Channel, ControlChange, DATA_MAX};
use heapless::Vec;

use crate::pot::{ChangeHandler, Pot, PotChange};
use crate::scale;

/// Maximum lookup table entries
pub const MAX_CURVE_POINTS: usize = 32;

/// Dead zone a freshly constructed channel starts with, in percent
const DEFAULT_DEAD_ZONE: f32 = 1.0;

/// Lookup table rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurveError {
    TooManyPoints,
}

/// A pedal channel that sends a Control Change per accepted movement
pub struct CcPot<A, M> {
    pot: Pot<A>,
    midi: M,
    channel: Channel,
    controller: u8,
    curve: Option<Vec<u8, MAX_CURVE_POINTS>>,
}

impl<A: AnalogPin, M: MidiOut> CcPot<A, M> {
    /// Create a channel sending `controller` messages on `channel`
    pub fn new(adc: A, midi: M, channel: Channel, controller: u8) -> Self {
        Self {
            pot: Pot::new(adc, 0, DATA_MAX as i32, DEFAULT_DEAD_ZONE),
            midi,
            channel,
            controller,
            curve: None,
        }
    }

    /// Create a channel that also runs `handler` after each send
    ///
    /// The handler sees the value that actually went on the wire, so
    /// with a lookup table installed it gets the table entry.
    pub fn with_handler(
        adc: A,
        midi: M,
        channel: Channel,
        controller: u8,
        handler: ChangeHandler,
    ) -> Self {
        Self {
            pot: Pot::with_handler(adc, 0, DATA_MAX as i32, DEFAULT_DEAD_ZONE, handler),
            midi,
            channel,
            controller,
            curve: None,
        }
    }

    /// Install a response curve; an empty slice clears it
    pub fn set_curve(&mut self, points: &[u8]) -> Result<(), CurveError> {
        if points.is_empty() {
            self.curve = None;
            return Ok(());
        }
        let table = Vec::from_slice(points).map_err(|_| CurveError::TooManyPoints)?;
        self.curve = Some(table);
        Ok(())
    }

    /// Remove the response curve, back to the linear mapping
    pub fn clear_curve(&mut self) {
        self.curve = None;
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    pub fn set_controller(&mut self, controller: u8) {
        self.controller = controller;
    }

    pub fn set_dead_zone(&mut self, percent: f32) {
        self.pot.set_dead_zone(percent);
    }

    pub fn set_num_readings(&mut self, num: u16) {
        self.pot.set_num_readings(num);
    }

    pub fn set_debounce_threshold(&mut self, threshold: i32) {
        self.pot.set_debounce_threshold(threshold);
    }

    /// Last value sent, after any curve substitution
    pub fn value(&self) -> i32 {
        self.pot.value()
    }

    pub fn has_changed(&self) -> bool {
        self.pot.has_changed()
    }

    pub fn reset(&mut self) {
        self.pot.reset();
    }

    /// Sample, and on an accepted change send one Control Change
    ///
    /// The send happens before any downstream notification, so handler
    /// code observes a world where the message is already queued.
    pub fn scan(&mut self) {
        let Some(change) = self.pot.poll() else {
            return;
        };

        let out = self.output_value(change.new);
        self.midi
            .send(ControlChange::new(self.channel, self.controller, out).to_bytes());
        self.pot.notify(PotChange {
            new: out as i32,
            old: change.old,
        });
    }

    /// Wire value for a mapped reading: table entry if a curve is
    /// installed, the clamped linear value otherwise
    fn output_value(&self, mapped: i32) -> u8 {
        match &self.curve {
            Some(table) => {
                let (lo, hi) = self.pot.range();
                let last = table.len() as i32 - 1;
                let idx = if last == 0 {
                    0
                } else {
                    scale::remap(mapped, lo, hi, 0, last).clamp(0, last)
                };
                table[idx as usize].min(DATA_MAX)
            }
            None => mapped.clamp(0, DATA_MAX as i32) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    struct ConstAdc(u16);

    impl AnalogPin for ConstAdc {
        fn read(&mut self) -> u16 {
            self.0
        }
    }

    /// Records every 3-byte message pushed through it
    struct RecordingMidi<'a>(&'a RefCell<heapless::Vec<[u8; 3], 8>>);

    impl MidiOut for RecordingMidi<'_> {
        fn send(&mut self, message: [u8; 3]) {
            self.0.borrow_mut().push(message).ok();
        }
    }

    #[test]
    fn test_change_sends_one_message() {
        let sent = RefCell::new(heapless::Vec::new());
        let mut cc = CcPot::new(ConstAdc(1023), RecordingMidi(&sent), Channel::new(1), 11);

        cc.scan();
        cc.reset();
        cc.scan();
        cc.scan();

        let sent = sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], [0xB0, 11, 127]);
    }

    #[test]
    fn test_default_dead_zone_mid_scale() {
        // 1% dead zone: factor 10, live band 10..=1013.
        // 511 -> live 501 * 1023 / 1003 = 510 -> 510 * 127 / 1023 = 63
        let sent = RefCell::new(heapless::Vec::new());
        let mut cc = CcPot::new(ConstAdc(511), RecordingMidi(&sent), Channel::new(1), 11);

        cc.scan();
        assert_eq!(sent.borrow()[0], [0xB0, 11, 63]);
        assert_eq!(cc.value(), 63);

        // A notch higher crosses the truncation boundary to 64
        let sent_hi = RefCell::new(heapless::Vec::new());
        let mut hi = CcPot::new(ConstAdc(519), RecordingMidi(&sent_hi), Channel::new(1), 11);
        hi.scan();
        assert_eq!(sent_hi.borrow()[0], [0xB0, 11, 64]);
    }

    #[test]
    fn test_curve_substitutes_wire_value() {
        // 519 -> live 519 -> linear 64
        let sent = RefCell::new(heapless::Vec::new());
        let mut cc = CcPot::new(ConstAdc(519), RecordingMidi(&sent), Channel::new(1), 11);
        cc.set_curve(&[0, 15, 30, 70, 127]).unwrap();

        // Linear value 64 indexes entry 64 * 4 / 127 = 2
        cc.scan();
        assert_eq!(sent.borrow()[0], [0xB0, 11, 30]);
        // The substituted value is what the channel reports
        assert_eq!(cc.value(), 30);
    }

    #[test]
    fn test_curve_extremes_hit_table_ends() {
        let sent = RefCell::new(heapless::Vec::new());
        let mut low = CcPot::new(ConstAdc(0), RecordingMidi(&sent), Channel::new(1), 11);
        low.set_curve(&[5, 50, 120]).unwrap();
        low.scan();
        assert_eq!(sent.borrow()[0][2], 5);

        let sent_hi = RefCell::new(heapless::Vec::new());
        let mut high = CcPot::new(ConstAdc(1023), RecordingMidi(&sent_hi), Channel::new(1), 11);
        high.set_curve(&[5, 50, 120]).unwrap();
        high.scan();
        assert_eq!(sent_hi.borrow()[0][2], 120);
    }

    #[test]
    fn test_curve_entries_clamped_to_data_range() {
        let sent = RefCell::new(heapless::Vec::new());
        let mut cc = CcPot::new(ConstAdc(1023), RecordingMidi(&sent), Channel::new(1), 11);
        cc.set_curve(&[0, 255]).unwrap();
        cc.scan();
        assert_eq!(sent.borrow()[0][2], 127);
    }

    #[test]
    fn test_curve_too_long_rejected() {
        let sent = RefCell::new(heapless::Vec::new());
        let mut cc = CcPot::new(ConstAdc(0), RecordingMidi(&sent), Channel::new(1), 11);
        let long = [0u8; MAX_CURVE_POINTS + 1];
        assert_eq!(cc.set_curve(&long), Err(CurveError::TooManyPoints));
        // A failed install leaves the previous (linear) mapping intact
        cc.scan();
        assert_eq!(sent.borrow()[0][2], 0);
    }

    #[test]
    fn test_clear_curve_restores_linear() {
        let sent = RefCell::new(heapless::Vec::new());
        let mut cc = CcPot::new(ConstAdc(511), RecordingMidi(&sent), Channel::new(1), 11);
        cc.set_curve(&[0, 127]).unwrap();
        cc.scan();
        cc.reset();

        cc.clear_curve();
        // Clearing alone does not resend until the value changes, so
        // verify the linear mapping via a fresh channel instead
        let sent2 = RefCell::new(heapless::Vec::new());
        let mut linear = CcPot::new(ConstAdc(511), RecordingMidi(&sent2), Channel::new(1), 11);
        linear.scan();
        assert_eq!(sent2.borrow()[0][2], 63);
    }

    static SEEN_NEW: core::sync::atomic::AtomicI32 = core::sync::atomic::AtomicI32::new(-1);

    fn remember_new(new: i32, _old: i32) {
        SEEN_NEW.store(new, core::sync::atomic::Ordering::SeqCst);
    }

    #[test]
    fn test_handler_sees_curve_substituted_value() {
        use core::sync::atomic::Ordering;

        let sent = RefCell::new(heapless::Vec::new());
        let mut cc = CcPot::with_handler(
            ConstAdc(519),
            RecordingMidi(&sent),
            Channel::new(1),
            11,
            remember_new,
        );
        cc.set_curve(&[0, 15, 30, 70, 127]).unwrap();

        cc.scan();
        // Message already queued when the handler ran, with the table
        // entry in both places
        assert_eq!(sent.borrow()[0][2], 30);
        assert_eq!(SEEN_NEW.load(Ordering::SeqCst), 30);
        // Callback mode clears the flag itself
        assert!(!cc.has_changed());
    }

    #[test]
    fn test_reconfigured_channel_and_controller() {
        let sent = RefCell::new(heapless::Vec::new());
        let mut cc = CcPot::new(ConstAdc(1023), RecordingMidi(&sent), Channel::new(1), 11);
        cc.set_channel(Channel::new(5));
        cc.set_controller(7);
        cc.scan();
        assert_eq!(sent.borrow()[0], [0xB4, 7, 127]);
    }
}
