//! Inbound configuration protocol
//!
//! A reserved controller band (102..=109, the MIDI undefined range)
//! carries configuration commands in ordinary Control Change messages,
//! so any sequencer or controller can reprogram the pedal. The
//! dispatcher mutates a [`Settings`] record and tells the caller what
//! follow-up the command asks for; it never touches storage itself.

use calcant_protocol::ControlChange;

use crate::settings::Settings;

/// Assign the expression pedal's controller number
pub const CC_SET_EXPRESSION_CC: u8 = 102;
/// Assign the sustain switch's controller number
pub const CC_SET_SUSTAIN_CC: u8 = 103;
/// Restore factory defaults; any even payload triggers
pub const CC_FACTORY_RESET: u8 = 104;
/// Persist the live settings; exact trigger payload required
pub const CC_SAVE_SETTINGS: u8 = 105;
/// Reload the persisted settings; exact trigger payload required
pub const CC_LOAD_SETTINGS: u8 = 106;
/// Set the dead zone in percent
pub const CC_SET_DEAD_ZONE: u8 = 107;
/// Assign the expression pedal's channel
pub const CC_SET_EXPRESSION_CHANNEL: u8 = 108;
/// Assign the sustain switch's channel
pub const CC_SET_SUSTAIN_CHANNEL: u8 = 109;

/// Payload that arms the save and load commands
pub const STORE_TRIGGER: u8 = 127;

/// Upper bound for the dead zone command, in percent
const DEAD_ZONE_MAX_PERCENT: u8 = 25;

/// What the caller must do after a handled command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteAction {
    /// Settings changed in place; reapply them to the live channels
    Updated,
    /// Persist the current settings
    Save,
    /// Reload settings from storage
    Load,
    /// Settings were reset to defaults; reapply and persist
    Reset,
}

/// Configuration command dispatcher
///
/// `low..=high` bounds the controller numbers that assignment commands
/// accept, keeping the configuration band itself (and anything above
/// it) out of reach so a misprogrammed pedal cannot squat on its own
/// admin channel.
#[derive(Debug, Clone, Copy)]
pub struct Remote {
    low: u8,
    high: u8,
}

impl Default for Remote {
    fn default() -> Self {
        // 120..=127 are channel mode messages; 102..=109 is us
        Self::new(0, 101)
    }
}

impl Remote {
    pub const fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }

    /// True for controller numbers in the configuration band
    pub fn is_config_controller(controller: u8) -> bool {
        (CC_SET_EXPRESSION_CC..=CC_SET_SUSTAIN_CHANNEL).contains(&controller)
    }

    /// Apply one inbound message to the settings record
    ///
    /// Returns `None` for controllers outside the configuration band
    /// and for save/load messages without the exact trigger payload.
    pub fn handle(
        &self,
        settings: &mut Settings,
        message: &ControlChange,
    ) -> Option<RemoteAction> {
        match message.controller {
            CC_SET_EXPRESSION_CC => {
                settings.expression_cc = self.clamp_assignable(message.value);
                Some(RemoteAction::Updated)
            }
            CC_SET_SUSTAIN_CC => {
                settings.sustain_cc = self.clamp_assignable(message.value);
                Some(RemoteAction::Updated)
            }
            CC_FACTORY_RESET if message.value % 2 == 0 => {
                *settings = Settings::default();
                Some(RemoteAction::Reset)
            }
            CC_SAVE_SETTINGS if message.value == STORE_TRIGGER => Some(RemoteAction::Save),
            CC_LOAD_SETTINGS if message.value == STORE_TRIGGER => Some(RemoteAction::Load),
            CC_SET_DEAD_ZONE => {
                settings.dead_zone_percent = message.value.min(DEAD_ZONE_MAX_PERCENT) as f32;
                Some(RemoteAction::Updated)
            }
            CC_SET_EXPRESSION_CHANNEL => {
                settings.expression_channel = message.value.clamp(1, 16);
                Some(RemoteAction::Updated)
            }
            CC_SET_SUSTAIN_CHANNEL => {
                settings.sustain_channel = message.value.clamp(1, 16);
                Some(RemoteAction::Updated)
            }
            _ => None,
        }
    }

    fn clamp_assignable(&self, controller: u8) -> u8 {
        controller.clamp(self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcant_protocol::Channel;

    fn cc(controller: u8, value: u8) -> ControlChange {
        ControlChange::new(Channel::new(1), controller, value)
    }

    #[test]
    fn test_assign_expression_controller() {
        let remote = Remote::default();
        let mut settings = Settings::default();

        let action = remote.handle(&mut settings, &cc(CC_SET_EXPRESSION_CC, 74));
        assert_eq!(action, Some(RemoteAction::Updated));
        assert_eq!(settings.expression_cc, 74);
    }

    #[test]
    fn test_assignments_clamped_to_band() {
        let remote = Remote::default();
        let mut settings = Settings::default();

        // 102..=109 is the configuration band; 127 lands on its rim
        remote.handle(&mut settings, &cc(CC_SET_SUSTAIN_CC, 127));
        assert_eq!(settings.sustain_cc, 101);

        let narrow = Remote::new(10, 20);
        remote.handle(&mut settings, &cc(CC_SET_EXPRESSION_CC, 5));
        assert_eq!(settings.expression_cc, 5);
        narrow.handle(&mut settings, &cc(CC_SET_EXPRESSION_CC, 5));
        assert_eq!(settings.expression_cc, 10);
    }

    #[test]
    fn test_factory_reset_even_payloads_only() {
        let remote = Remote::default();
        let mut settings = Settings::default();
        settings.expression_cc = 74;

        assert_eq!(remote.handle(&mut settings, &cc(CC_FACTORY_RESET, 1)), None);
        assert_eq!(settings.expression_cc, 74);

        let action = remote.handle(&mut settings, &cc(CC_FACTORY_RESET, 0));
        assert_eq!(action, Some(RemoteAction::Reset));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_need_exact_trigger() {
        let remote = Remote::default();
        let mut settings = Settings::default();

        assert_eq!(remote.handle(&mut settings, &cc(CC_SAVE_SETTINGS, 126)), None);
        assert_eq!(remote.handle(&mut settings, &cc(CC_LOAD_SETTINGS, 0)), None);

        assert_eq!(
            remote.handle(&mut settings, &cc(CC_SAVE_SETTINGS, STORE_TRIGGER)),
            Some(RemoteAction::Save)
        );
        assert_eq!(
            remote.handle(&mut settings, &cc(CC_LOAD_SETTINGS, STORE_TRIGGER)),
            Some(RemoteAction::Load)
        );
    }

    #[test]
    fn test_dead_zone_capped() {
        let remote = Remote::default();
        let mut settings = Settings::default();

        remote.handle(&mut settings, &cc(CC_SET_DEAD_ZONE, 10));
        assert_eq!(settings.dead_zone_percent, 10.0);

        remote.handle(&mut settings, &cc(CC_SET_DEAD_ZONE, 90));
        assert_eq!(settings.dead_zone_percent, 25.0);
    }

    #[test]
    fn test_channel_assignments_clamped() {
        let remote = Remote::default();
        let mut settings = Settings::default();

        remote.handle(&mut settings, &cc(CC_SET_EXPRESSION_CHANNEL, 0));
        assert_eq!(settings.expression_channel, 1);

        remote.handle(&mut settings, &cc(CC_SET_SUSTAIN_CHANNEL, 40));
        assert_eq!(settings.sustain_channel, 16);
    }

    #[test]
    fn test_ordinary_controllers_ignored() {
        let remote = Remote::default();
        let mut settings = Settings::default();
        let before = settings.clone();

        assert_eq!(remote.handle(&mut settings, &cc(11, 64)), None);
        assert_eq!(remote.handle(&mut settings, &cc(1, 127)), None);
        assert_eq!(settings, before);
    }

    #[test]
    fn test_band_membership() {
        assert!(!Remote::is_config_controller(101));
        assert!(Remote::is_config_controller(102));
        assert!(Remote::is_config_controller(109));
        assert!(!Remote::is_config_controller(110));
    }
}
