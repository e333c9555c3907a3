//! Digital switch input abstractions

/// Debounce-free view of a switch contact
///
/// Implementations handle pull-up/pull-down polarity so that `true`
/// always means "pedal pressed". Debouncing happens above this trait.
pub trait SwitchPin {
    /// Check if the switch contact is currently closed
    fn is_closed(&self) -> bool;
}
