//! Pedal potentiometer channel
//!
//! One `Pot` owns one analog input and turns its noisy readings into a
//! stable, range-mapped value. Each scan takes a batch of samples,
//! drops the single highest and lowest (outlier rejection), averages
//! the rest, and debounces the average against the last accepted one.
//! The accepted raw value is then dead-zone corrected and remapped into
//! the configured output range.
//!
//! A change is reported exactly once, either through the `has_changed`
//! flag (polling mode; the caller clears it with [`Pot::reset`]) or
//! through a handler supplied at construction (callback mode; the flag
//! is cleared automatically after the handler returns). Exactly one of
//! the two is the live mode per instance.

use calcant_hal::adc::{AnalogPin, RAW_MAX};

use crate::scale;

/// Full-scale raw reading as used by the mapping math
pub(crate) const RAW_SPAN: i32 = RAW_MAX as i32;

/// Sentinel for "no mapped value reported yet"; outside any real range,
/// so the first scan after construction always reports a change
const NO_READING: i32 = i32::MIN;

/// Default samples per scan batch
const DEFAULT_NUM_READINGS: u16 = 10;

/// Default minimum averaged-raw delta accepted as genuine movement
const DEFAULT_DEBOUNCE_THRESHOLD: i32 = 5;

/// Change handler, called with the (new, old) mapped values
pub type ChangeHandler = fn(i32, i32);

/// One accepted change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PotChange {
    pub new: i32,
    pub old: i32,
}

/// A debounced, dead-zone corrected, range-mapped analog channel
pub struct Pot<A> {
    adc: A,
    range_min: i32,
    range_max: i32,
    dead_zone_percent: f32,
    dead_zone_factor: i32,
    num_readings: u16,
    debounce_threshold: i32,
    /// Debounce memory; survives across scans for the channel's lifetime
    last_raw_average: i32,
    last_mapped: i32,
    raw_value: i32,
    mapped_value: i32,
    has_changed: bool,
    on_change: Option<ChangeHandler>,
}

impl<A: AnalogPin> Pot<A> {
    /// Create a polling-mode channel
    ///
    /// `range_min <= range_max`; `dead_zone_percent` is expected in
    /// 0..=100 and is not re-validated here (callers at the boundary
    /// clamp before calling in).
    pub fn new(adc: A, range_min: i32, range_max: i32, dead_zone_percent: f32) -> Self {
        Self {
            adc,
            range_min,
            range_max,
            dead_zone_percent,
            dead_zone_factor: dead_zone_factor(dead_zone_percent),
            num_readings: DEFAULT_NUM_READINGS,
            debounce_threshold: DEFAULT_DEBOUNCE_THRESHOLD,
            last_raw_average: 0,
            last_mapped: NO_READING,
            raw_value: 0,
            mapped_value: 0,
            has_changed: false,
            on_change: None,
        }
    }

    /// Create a callback-mode channel
    ///
    /// The handler runs synchronously inside [`Pot::scan`] with the
    /// (new, old) mapped values, after which the change flag is cleared
    /// automatically; callback-mode callers never poll `has_changed`.
    pub fn with_handler(
        adc: A,
        range_min: i32,
        range_max: i32,
        dead_zone_percent: f32,
        handler: ChangeHandler,
    ) -> Self {
        let mut pot = Self::new(adc, range_min, range_max, dead_zone_percent);
        pot.on_change = Some(handler);
        pot
    }

    /// Set the samples taken per scan batch
    ///
    /// Must be at least 3: outlier rejection removes two samples per
    /// batch, and the averaging divides by `num - 2`. Smaller values
    /// are a precondition violation, not a handled case.
    pub fn set_num_readings(&mut self, num: u16) {
        debug_assert!(num >= 3);
        self.num_readings = num;
    }

    /// Set the minimum averaged-raw delta accepted as genuine movement
    pub fn set_debounce_threshold(&mut self, threshold: i32) {
        self.debounce_threshold = threshold;
    }

    /// Update the dead zone and recompute its raw-range factor
    ///
    /// `percent` is expected in 0..=100; out-of-range values invert or
    /// degenerate the dead-zone remap bounds and are the caller's
    /// responsibility to clamp.
    pub fn set_dead_zone(&mut self, percent: f32) {
        self.dead_zone_percent = percent;
        self.dead_zone_factor = dead_zone_factor(percent);
    }

    /// Current dead zone in percent
    pub fn dead_zone(&self) -> f32 {
        self.dead_zone_percent
    }

    /// Last mapped value, in `range_min..=range_max`
    pub fn value(&self) -> i32 {
        self.mapped_value
    }

    /// Last dead-zone corrected raw value, in `0..=RAW_MAX`
    pub fn raw_value(&self) -> i32 {
        self.raw_value
    }

    /// True from the moment a change is detected until [`Pot::reset`]
    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    /// Clear the change flag. Idempotent, no other side effects.
    pub fn reset(&mut self) {
        self.has_changed = false;
    }

    pub(crate) fn range(&self) -> (i32, i32) {
        (self.range_min, self.range_max)
    }

    /// Periodic entry point; sample, condition, and notify on change
    ///
    /// Never blocks beyond the time the batch of samples takes. Any
    /// change notification is fully delivered before this returns.
    pub fn scan(&mut self) {
        if let Some(change) = self.poll() {
            self.notify(change);
        }
    }

    /// Sample and condition without notifying; the message-emitting
    /// wrapper uses this to substitute its own notification path
    pub(crate) fn poll(&mut self) -> Option<PotChange> {
        let raw = self.sample_raw();

        // Stretch the live band so physical extremes reliably reach
        // 0 and full scale despite mechanical slop at the stops
        let live = scale::remap(
            raw,
            self.dead_zone_factor,
            RAW_SPAN - self.dead_zone_factor,
            0,
            RAW_SPAN,
        )
        .clamp(0, RAW_SPAN);

        let mapped = scale::remap(live, 0, RAW_SPAN, self.range_min, self.range_max);
        if mapped == self.last_mapped {
            return None;
        }

        let old = self.last_mapped;
        self.last_mapped = mapped;
        self.raw_value = live;
        self.mapped_value = mapped;
        Some(PotChange { new: mapped, old })
    }

    /// Run the change notification path for an accepted change
    ///
    /// `change.new` is the value actually reported; wrappers may have
    /// substituted it, and it becomes the channel's current value.
    pub(crate) fn notify(&mut self, change: PotChange) {
        self.mapped_value = change.new;
        self.has_changed = true;
        if let Some(handler) = self.on_change {
            handler(change.new, change.old);
            self.reset();
        }
    }

    /// Outlier-rejected batch average with debounce memory
    ///
    /// Sub-threshold deltas are treated as noise: the previous accepted
    /// average is returned unchanged and the memory is not updated.
    fn sample_raw(&mut self) -> i32 {
        let mut total = 0i32;
        let mut min = i32::MAX;
        let mut max = i32::MIN;

        for _ in 0..self.num_readings {
            let sample = self.adc.read() as i32;
            total += sample;
            min = min.min(sample);
            max = max.max(sample);
        }

        let average = (total - min - max) / (self.num_readings as i32 - 2);
        if (average - self.last_raw_average).abs() < self.debounce_threshold {
            return self.last_raw_average;
        }

        self.last_raw_average = average;
        average
    }
}

/// Dead zone in percent of full scale, as a raw-range margin
fn dead_zone_factor(percent: f32) -> i32 {
    (RAW_SPAN as f32 * percent / 100.0) as i32
}
