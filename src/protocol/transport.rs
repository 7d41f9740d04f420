//! Request/response exchange over a [`Link`].

use crate::config::units::Counts;
use crate::error::ProtocolError;
use crate::link::Link;

use super::frame::{decode_position_response, Command, POSITION_RESPONSE_LEN};

/// Sends frames and enforces the framing rules of the controller.
///
/// After every request the link's input buffer must be empty. Anything left over
/// means the byte stream is out of step with the device and the call fails.
#[derive(Debug)]
pub struct Transport<L: Link> {
    link: L,
}

impl<L: Link> Transport<L> {
    /// Wrap a link.
    pub fn new(link: L) -> Self {
        Self { link }
    }

    /// Borrow the link.
    #[inline]
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutably borrow the link.
    #[inline]
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Unwrap the link.
    pub fn into_inner(self) -> L {
        self.link
    }

    fn send(&mut self, command: &Command, response: &mut [u8]) -> Result<(), ProtocolError> {
        let frame = command.encode();
        self.link.write_all(&frame).map_err(|e| {
            log::warn!("write of {:?} failed: {:?}", command, e);
            ProtocolError::LinkIo
        })?;

        if !response.is_empty() {
            self.link.read_exact(response).map_err(|e| {
                log::warn!("read of {} response bytes failed: {:?}", response.len(), e);
                ProtocolError::LinkIo
            })?;
        }

        let leftover = self.link.bytes_pending().map_err(|e| {
            log::warn!("input buffer query failed: {:?}", e);
            ProtocolError::LinkIo
        })?;
        if leftover != 0 {
            return Err(ProtocolError::LeftoverBytes(leftover));
        }

        Ok(())
    }

    /// Read the raw encoder count of a channel.
    pub fn read_position(&mut self, channel: u8) -> Result<Counts, ProtocolError> {
        let command = Command::GetPosition { channel };
        let mut response = [0u8; POSITION_RESPONSE_LEN];
        self.send(&command, &mut response)?;
        decode_position_response(channel, &response)
    }

    /// Reset a channel's encoder count to zero.
    pub fn zero_encoder(&mut self, channel: u8) -> Result<(), ProtocolError> {
        self.send(&Command::ZeroEncoder { channel }, &mut [])
    }

    /// Command a channel to an absolute encoder count.
    pub fn move_to(&mut self, channel: u8, target: Counts) -> Result<(), ProtocolError> {
        self.send(&Command::MoveTo { channel, target }, &mut [])
    }

    /// Release the link.
    pub fn close(&mut self) -> Result<(), ProtocolError> {
        self.link.close().map_err(|e| {
            log::warn!("close failed: {:?}", e);
            ProtocolError::LinkIo
        })
    }
}
