//! Persisted user settings
//!
//! One small record holds everything the player can reprogram over the
//! wire. It carries an identity tag so a blank or foreign flash image
//! is detected on load and reseeded with defaults instead of being
//! interpreted as garbage configuration.

use calcant_hal::store::{SettingsStore, StoreError};
use serde::{Deserialize, Serialize};

/// Identity tag; changes when the record layout changes
pub const SETTINGS_MAGIC: u32 = 0x434C_4331;

/// Serialized record upper bound, with headroom over the current layout
pub const MAX_SETTINGS_SIZE: usize = 32;

const DEFAULT_EXPRESSION_CC: u8 = 11;
const DEFAULT_SUSTAIN_CC: u8 = 64;
const DEFAULT_DEAD_ZONE_PERCENT: f32 = 1.0;

/// User-programmable settings, persisted across power cycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    magic: u32,
    pub expression_cc: u8,
    pub sustain_cc: u8,
    pub expression_channel: u8,
    pub sustain_channel: u8,
    pub dead_zone_percent: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            magic: SETTINGS_MAGIC,
            expression_cc: DEFAULT_EXPRESSION_CC,
            sustain_cc: DEFAULT_SUSTAIN_CC,
            expression_channel: 1,
            sustain_channel: 1,
            dead_zone_percent: DEFAULT_DEAD_ZONE_PERCENT,
        }
    }
}

impl Settings {
    /// True when the record carries the current identity tag
    pub fn is_valid(&self) -> bool {
        self.magic == SETTINGS_MAGIC
    }

    /// Load the record, seeding defaults when none is usable
    ///
    /// A missing record, a record that fails to deserialize, and a
    /// record with a stale identity tag all collapse to the same
    /// outcome: defaults are written back and returned. Only a storage
    /// failure during that reseed surfaces as an error.
    pub async fn load_or_seed<S: SettingsStore>(store: &mut S) -> Result<Self, StoreError> {
        let mut buffer = [0u8; MAX_SETTINGS_SIZE];
        if let Ok(len) = store.load(&mut buffer).await {
            if let Ok(settings) = postcard::from_bytes::<Self>(&buffer[..len]) {
                if settings.is_valid() {
                    return Ok(settings);
                }
            }
        }

        let defaults = Self::default();
        defaults.save(store).await?;
        Ok(defaults)
    }

    /// Persist the record
    pub async fn save<S: SettingsStore>(&self, store: &mut S) -> Result<(), StoreError> {
        let mut buffer = [0u8; MAX_SETTINGS_SIZE];
        let data =
            postcard::to_slice(self, &mut buffer).map_err(|_| StoreError::BufferTooSmall)?;
        store.save(data).await
    }
}
