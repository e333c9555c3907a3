//! Settings storage abstractions
//!
//! Provides a trait for persisting the single serialized settings
//! record, implemented by board crates on top of their flash memory.

/// Errors from settings storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Storage operation failed
    Storage,
    /// No record has been written yet
    NotFound,
    /// Buffer too small for the record
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
}

/// Persistent settings store
///
/// Single-record storage for the serialized settings block.
/// Implementations should handle:
/// - Wear leveling across flash sectors
/// - Data integrity (CRC or similar)
/// - Atomic writes where possible
pub trait SettingsStore {
    /// Read the record into the provided buffer
    ///
    /// # Returns
    /// The number of bytes read, or an error.
    fn load(
        &mut self,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, StoreError>>;

    /// Write the record, replacing any previous one
    fn save(&mut self, data: &[u8]) -> impl core::future::Future<Output = Result<(), StoreError>>;
}
