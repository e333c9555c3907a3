//! Calcant - Pedal MIDI Controller Firmware
//!
//! Main firmware binary for RP2040-based pedal controllers. Converts a
//! potentiometer expression pedal and a footswitch sustain pedal into
//! MIDI Control Change messages, with the mappings reconfigurable over
//! MIDI and persisted in flash.
//!
//! Named after the calcant, the worker who powered a pipe organ's
//! bellows by treading its pedals.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel as AdcChannel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use calcant_core::Settings;

use crate::flash::SettingsFlash;
use crate::tasks::pedals::{ExpressionPin, SustainPin};

mod channels;
mod flash;
mod tasks;

/// MIDI wire speed
const MIDI_BAUD: u32 = 31250;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Calcant firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Settings from flash, seeding defaults on first boot
    let mut store = SettingsFlash::new(p.FLASH, p.DMA_CH0);
    let settings = match Settings::load_or_seed(&mut store).await {
        Ok(settings) => {
            info!("Settings loaded from flash");
            settings
        }
        Err(e) => {
            // Running on defaults is better than not running at all
            warn!("Settings storage unavailable: {:?}", e);
            Settings::default()
        }
    };

    // MIDI UART on GPIO0 (TX) / GPIO1 (RX)
    let uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = MIDI_BAUD;
        cfg
    };

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("MIDI UART initialized at {} baud", MIDI_BAUD);

    // Expression pedal wiper on ADC0 (GPIO26)
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let wiper = AdcChannel::new_pin(p.PIN_26, Pull::None);
    let pedal = ExpressionPin::new(adc, wiper);

    // Sustain switch on GPIO15, pulled up, switch shorts to ground
    let switch = SustainPin::new(Input::new(p.PIN_15, Pull::Up));

    info!("Pedal inputs initialized");

    // Spawn tasks
    unwrap!(spawner.spawn(tasks::midi_tx_task(tx)));
    unwrap!(spawner.spawn(tasks::midi_rx_task(rx)));
    unwrap!(spawner.spawn(tasks::pedals_task(pedal, switch, store, settings)));

    info!("All tasks spawned, firmware running");
}
