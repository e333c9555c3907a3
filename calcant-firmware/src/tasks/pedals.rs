//! Pedal scanning task
//!
//! Owns both pedal channels and the settings store. One ticker drives
//! the expression pot scan and the sustain switch poll; between scans
//! it drains the configuration channel and applies any commands to the
//! live channels.

use defmt::*;
use embassy_rp::adc::{Adc, Blocking, Channel as AdcChannel};
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Ticker};

use calcant_core::{CcPot, Footswitch, Remote, RemoteAction, Settings};
use calcant_hal::{AnalogPin, SwitchPin};
use calcant_protocol::Channel;

use crate::channels::{QueuedMidiOut, CONFIG_RX};
use crate::flash::SettingsFlash;

/// Scan period; a full batch of pot samples happens each tick
const SCAN_PERIOD_MS: u64 = 2;

/// Expression pedal wiper on an ADC pin
pub struct ExpressionPin {
    adc: Adc<'static, Blocking>,
    channel: AdcChannel<'static>,
}

impl ExpressionPin {
    pub fn new(adc: Adc<'static, Blocking>, channel: AdcChannel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AnalogPin for ExpressionPin {
    fn read(&mut self) -> u16 {
        // 12-bit ADC scaled to the 10-bit raw range; a failed
        // conversion reads as 0, which conditioning absorbs as noise
        match self.adc.blocking_read(&mut self.channel) {
            Ok(sample) => sample >> 2,
            Err(_) => 0,
        }
    }
}

/// Sustain switch on a pulled-up input; pressing shorts it to ground
pub struct SustainPin {
    pin: Input<'static>,
}

impl SustainPin {
    pub fn new(pin: Input<'static>) -> Self {
        Self { pin }
    }
}

impl SwitchPin for SustainPin {
    fn is_closed(&self) -> bool {
        self.pin.is_low()
    }
}

/// Pedal scanning task
#[embassy_executor::task]
pub async fn pedals_task(
    pedal: ExpressionPin,
    switch: SustainPin,
    mut store: SettingsFlash<'static>,
    mut settings: Settings,
) {
    info!("Pedals task started");

    let remote = Remote::default();
    let mut expression = CcPot::new(
        pedal,
        QueuedMidiOut,
        Channel::new(settings.expression_channel),
        settings.expression_cc,
    );
    expression.set_dead_zone(settings.dead_zone_percent);
    let mut sustain = Footswitch::new(
        switch,
        QueuedMidiOut,
        Channel::new(settings.sustain_channel),
        settings.sustain_cc,
    );

    let mut ticker = Ticker::every(Duration::from_millis(SCAN_PERIOD_MS));

    loop {
        // Apply any pending configuration before the next scan
        while let Ok(message) = CONFIG_RX.try_receive() {
            match remote.handle(&mut settings, &message) {
                Some(RemoteAction::Updated) => {
                    debug!("Settings updated (CC {})", message.controller);
                    apply_settings(&settings, &mut expression, &mut sustain);
                }
                Some(RemoteAction::Save) => {
                    if let Err(e) = settings.save(&mut store).await {
                        warn!("Settings save failed: {:?}", e);
                    } else {
                        info!("Settings saved");
                    }
                }
                Some(RemoteAction::Load) => match Settings::load_or_seed(&mut store).await {
                    Ok(loaded) => {
                        settings = loaded;
                        apply_settings(&settings, &mut expression, &mut sustain);
                        info!("Settings loaded");
                    }
                    Err(e) => warn!("Settings load failed: {:?}", e),
                },
                Some(RemoteAction::Reset) => {
                    apply_settings(&settings, &mut expression, &mut sustain);
                    if let Err(e) = settings.save(&mut store).await {
                        warn!("Settings save failed after reset: {:?}", e);
                    } else {
                        info!("Factory defaults restored");
                    }
                }
                None => {}
            }
        }

        expression.scan();
        if let Some(pressed) = sustain.poll(Instant::now().as_millis()) {
            debug!("Sustain {}", if pressed { "pressed" } else { "released" });
        }

        ticker.next().await;
    }
}

/// Push the settings record into the live channels
fn apply_settings(
    settings: &Settings,
    expression: &mut CcPot<ExpressionPin, QueuedMidiOut>,
    sustain: &mut Footswitch<SustainPin, QueuedMidiOut>,
) {
    expression.set_controller(settings.expression_cc);
    expression.set_channel(Channel::new(settings.expression_channel));
    expression.set_dead_zone(settings.dead_zone_percent);
    sustain.set_controller(settings.sustain_cc);
    sustain.set_channel(Channel::new(settings.sustain_channel));
}
