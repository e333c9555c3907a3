//! Analog input abstractions

/// Full-scale raw reading for pedal analog inputs.
///
/// The conditioning core works in this 10-bit range regardless of the
/// native converter resolution; implementations with wider converters
/// scale their readings down.
pub const RAW_MAX: u16 = 1023;

/// Analog input pin
///
/// Implementations handle the actual conversion for the specific chip,
/// including any settling delay between consecutive conversions. The
/// read path is total: hardware faults map to an in-range reading
/// (typically 0) rather than an error.
pub trait AnalogPin {
    /// Take one raw sample in `0..=RAW_MAX`
    fn read(&mut self) -> u16;
}
