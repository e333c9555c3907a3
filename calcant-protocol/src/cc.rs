//! Control Change message type and encoding

/// Status byte for a Control Change on channel 1; the low nibble
/// carries `channel - 1`
pub const CC_STATUS: u8 = 0xB0;

/// Maximum 7-bit data value
pub const DATA_MAX: u8 = 0x7F;

/// Lowest MIDI channel number on the wire
pub const CHANNEL_MIN: u8 = 1;

/// Highest MIDI channel number on the wire
pub const CHANNEL_MAX: u8 = 16;

/// A MIDI channel, numbered 1..=16 as on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
    /// Create a channel, clamping the number into 1..=16
    pub const fn new(number: u8) -> Self {
        let number = if number < CHANNEL_MIN {
            CHANNEL_MIN
        } else if number > CHANNEL_MAX {
            CHANNEL_MAX
        } else {
            number
        };
        Self(number)
    }

    /// Channel number, 1..=16
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Recover the channel from a status byte's low nibble
    pub(crate) const fn from_status(status: u8) -> Self {
        Self((status & 0x0F) + 1)
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self(CHANNEL_MIN)
    }
}

/// A Control Change message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlChange {
    pub channel: Channel,
    pub controller: u8,
    pub value: u8,
}

impl ControlChange {
    /// Create a message, clamping controller and value to 7 bits
    pub const fn new(channel: Channel, controller: u8, value: u8) -> Self {
        let controller = if controller > DATA_MAX { DATA_MAX } else { controller };
        let value = if value > DATA_MAX { DATA_MAX } else { value };
        Self {
            channel,
            controller,
            value,
        }
    }

    /// Encode this message as it goes on the wire
    pub const fn to_bytes(self) -> [u8; 3] {
        [
            CC_STATUS | (self.channel.number() - 1),
            self.controller,
            self.value,
        ]
    }
}
