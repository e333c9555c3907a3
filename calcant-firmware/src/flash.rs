//! Flash-backed settings storage
//!
//! Uses sequential-storage for wear-leveled key-value storage in the
//! last 64KB of flash, kept out of the program image by memory.x.

use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use calcant_hal::store::{SettingsStore, StoreError};

/// Total flash size (2MB on Pico-class boards)
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
/// Settings partition at the top of flash
pub const SETTINGS_PARTITION_SIZE: usize = 64 * 1024;
pub const SETTINGS_PARTITION_START: usize = FLASH_SIZE - SETTINGS_PARTITION_SIZE;

/// Flash range for the settings partition
const SETTINGS_RANGE: core::ops::Range<u32> =
    (SETTINGS_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Single map key for the settings record
const SETTINGS_KEY: u8 = 0;

/// Scratch buffer size for sequential-storage item handling
const SCRATCH_SIZE: usize = 128;

/// Wear-leveled settings storage on the RP2040 flash
pub struct SettingsFlash<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> SettingsFlash<'d> {
    pub fn new(
        flash: Peri<'d, FLASH>,
        dma: Peri<'d, impl embassy_rp::dma::Channel>,
    ) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }
}

impl SettingsStore for SettingsFlash<'_> {
    async fn load(&mut self, buffer: &mut [u8]) -> Result<usize, StoreError> {
        let mut scratch = [0u8; SCRATCH_SIZE];

        let result = map::fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut scratch,
            &SETTINGS_KEY,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(StoreError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(StoreError::NotFound),
            Err(_) => Err(StoreError::Storage),
        }
    }

    async fn save(&mut self, data: &[u8]) -> Result<(), StoreError> {
        let mut scratch = [0u8; SCRATCH_SIZE];

        map::store_item(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut scratch,
            &SETTINGS_KEY,
            &data,
        )
        .await
        .map_err(|_| StoreError::Storage)
    }
}
