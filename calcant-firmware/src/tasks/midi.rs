//! MIDI UART tasks
//!
//! The TX task is the only owner of the UART transmitter: everything
//! going on the wire funnels through [`MIDI_TX`], so messages from the
//! two pedal channels never interleave mid-message. The RX task parses
//! the inbound stream and forwards configuration-band messages to the
//! pedals task.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use calcant_core::Remote;
use calcant_protocol::CcParser;

use crate::channels::{CONFIG_RX, MIDI_TX};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// MIDI TX task - drains the outgoing message queue in order
#[embassy_executor::task]
pub async fn midi_tx_task(mut tx: BufferedUartTx) {
    info!("MIDI TX task started");

    loop {
        let message = MIDI_TX.receive().await;
        if let Err(e) = tx.write_all(&message).await {
            warn!("UART write error: {:?}", e);
        }
    }
}

/// MIDI RX task - parses inbound bytes and picks out configuration
/// messages
#[embassy_executor::task]
pub async fn midi_rx_task(mut rx: BufferedUartRx) {
    info!("MIDI RX task started");

    let mut parser = CcParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    if let Some(message) = parser.feed(byte) {
                        if Remote::is_config_controller(message.controller) {
                            if CONFIG_RX.try_send(message).is_err() {
                                warn!("Config channel full, dropping message");
                            }
                        } else {
                            trace!("Ignoring CC {}", message.controller);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
