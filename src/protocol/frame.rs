//! Binary command and response frames.
//!
//! All multi-byte fields are little-endian.

use crate::config::units::Counts;
use crate::error::ProtocolError;

/// Length of a get-position request.
pub const POSITION_REQUEST_LEN: usize = 6;

/// Length of a zero-encoder or move-to-count request.
///
/// Six header bytes (the last pair is the payload length, 6) followed by a
/// 2-byte channel id and a 4-byte count.
pub const COMMAND_LEN: usize = 12;

/// Length of a get-position response.
pub const POSITION_RESPONSE_LEN: usize = 12;

/// Offset of the channel byte in a get-position response.
pub const RESPONSE_CHANNEL_OFFSET: usize = 6;

const GET_POSITION: [u8; 2] = [0x0a, 0x04];
const ZERO_ENCODER: [u8; 6] = [0x09, 0x04, 0x06, 0x00, 0x00, 0x00];
const MOVE_TO_COUNT: [u8; 6] = [0x53, 0x04, 0x06, 0x00, 0x00, 0x00];
const POSITION_REPLY: [u8; 6] = [0x0b, 0x04, 0x06, 0x00, 0x81, 0x50];

/// Encoded request, at most [`COMMAND_LEN`] bytes.
pub type Frame = heapless::Vec<u8, COMMAND_LEN>;

/// A request the controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Read the encoder count of a channel.
    GetPosition {
        /// Channel id.
        channel: u8,
    },
    /// Reset the encoder count of a channel to zero.
    ZeroEncoder {
        /// Channel id.
        channel: u8,
    },
    /// Drive a channel to an absolute encoder count.
    MoveTo {
        /// Channel id.
        channel: u8,
        /// Target count.
        target: Counts,
    },
}

impl Command {
    /// Channel the command addresses.
    pub fn channel(&self) -> u8 {
        match *self {
            Command::GetPosition { channel }
            | Command::ZeroEncoder { channel }
            | Command::MoveTo { channel, .. } => channel,
        }
    }

    /// Number of response bytes the controller sends back.
    pub fn response_len(&self) -> usize {
        match self {
            Command::GetPosition { .. } => POSITION_RESPONSE_LEN,
            Command::ZeroEncoder { .. } | Command::MoveTo { .. } => 0,
        }
    }

    /// Encode the request.
    pub fn encode(&self) -> Frame {
        let mut frame = Frame::new();
        // Frames never exceed COMMAND_LEN, so the extends cannot fail
        match *self {
            Command::GetPosition { channel } => {
                let _ = frame.extend_from_slice(&GET_POSITION);
                let _ = frame.extend_from_slice(&[channel, 0x00, 0x00, 0x00]);
            }
            Command::ZeroEncoder { channel } => {
                let _ = frame.extend_from_slice(&ZERO_ENCODER);
                let _ = frame.extend_from_slice(&u16::from(channel).to_le_bytes());
                let _ = frame.extend_from_slice(&Counts::ZERO.to_le_bytes());
            }
            Command::MoveTo { channel, target } => {
                let _ = frame.extend_from_slice(&MOVE_TO_COUNT);
                let _ = frame.extend_from_slice(&u16::from(channel).to_le_bytes());
                let _ = frame.extend_from_slice(&target.to_le_bytes());
            }
        }
        frame
    }

    /// Decode a request frame. Returns `None` for anything the controller would not accept.
    pub fn decode(bytes: &[u8]) -> Option<Command> {
        match bytes.len() {
            POSITION_REQUEST_LEN if bytes[..2] == GET_POSITION && bytes[3..] == [0; 3] => {
                Some(Command::GetPosition { channel: bytes[2] })
            }
            COMMAND_LEN => {
                let channel = u8::try_from(u16::from_le_bytes([bytes[6], bytes[7]])).ok()?;
                let value = Counts::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
                if bytes[..6] == ZERO_ENCODER && value == Counts::ZERO {
                    Some(Command::ZeroEncoder { channel })
                } else if bytes[..6] == MOVE_TO_COUNT {
                    Some(Command::MoveTo { channel, target: value })
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Encode a get-position response as the controller sends it.
pub fn encode_position_response(channel: u8, counts: Counts) -> [u8; POSITION_RESPONSE_LEN] {
    let mut response = [0u8; POSITION_RESPONSE_LEN];
    response[..6].copy_from_slice(&POSITION_REPLY);
    response[RESPONSE_CHANNEL_OFFSET] = channel;
    response[8..].copy_from_slice(&counts.to_le_bytes());
    response
}

/// Decode a get-position response for `channel`.
///
/// # Errors
///
/// Returns `ProtocolError::ChannelMismatch` if the response names another channel.
pub fn decode_position_response(
    channel: u8,
    response: &[u8; POSITION_RESPONSE_LEN],
) -> Result<Counts, ProtocolError> {
    let received = response[RESPONSE_CHANNEL_OFFSET];
    if received != channel {
        return Err(ProtocolError::ChannelMismatch {
            expected: channel,
            received,
        });
    }
    Ok(Counts::from_le_bytes([
        response[8],
        response[9],
        response[10],
        response[11],
    ]))
}
