//! Incremental parser for the inbound Control Change stream
//!
//! Feed UART bytes one at a time; complete messages come out as they
//! finish. The parser tolerates MIDI running status (repeated
//! controller/value pairs after one status byte) and system real-time
//! bytes interleaved anywhere. Any non-CC status byte desynchronizes
//! the parser until the next CC status arrives.

use crate::cc::{Channel, ControlChange, CC_STATUS};

/// First system real-time status byte; these may appear between any
/// two bytes of another message and are ignored here
const REALTIME_MIN: u8 = 0xF8;

/// State machine for parsing incoming Control Change bytes
#[derive(Debug, Clone)]
pub struct CcParser {
    state: ParseState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for a CC status byte
    WaitingForStatus,
    /// Got a status, waiting for the controller number
    WaitingForController { channel: Channel },
    /// Got the controller, waiting for the value
    WaitingForValue { channel: Channel, controller: u8 },
}

impl Default for CcParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CcParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStatus,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStatus;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Some(message)` when a complete Control Change is
    /// parsed, `None` when more bytes are needed or the byte belongs
    /// to a message class this parser does not handle.
    pub fn feed(&mut self, byte: u8) -> Option<ControlChange> {
        // Real-time bytes never disturb the running message
        if byte >= REALTIME_MIN {
            return None;
        }

        if byte & 0x80 != 0 {
            self.state = if byte & 0xF0 == CC_STATUS {
                ParseState::WaitingForController {
                    channel: Channel::from_status(byte),
                }
            } else {
                // Some other channel voice or system message; skip its
                // data bytes until the next status
                ParseState::WaitingForStatus
            };
            return None;
        }

        match self.state {
            // Data byte with no status context, ignore
            ParseState::WaitingForStatus => None,
            ParseState::WaitingForController { channel } => {
                self.state = ParseState::WaitingForValue {
                    channel,
                    controller: byte,
                };
                None
            }
            ParseState::WaitingForValue {
                channel,
                controller,
            } => {
                // Running status: stay armed for another pair
                self.state = ParseState::WaitingForController { channel };
                Some(ControlChange {
                    channel,
                    controller,
                    value: byte,
                })
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete message found, if any; bytes after
    /// it are discarded. Callers that must see every message feed the
    /// stream one byte at a time through [`CcParser::feed`].
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<ControlChange> {
        for &byte in bytes {
            if let Some(message) = self.feed(byte) {
                return Some(message);
            }
        }
        None
    }
}
