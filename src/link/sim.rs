//! In-process controller simulator (std only).
//!
//! Decodes the same frames the hardware accepts and answers them byte-for-byte,
//! so the full motion stack can run without a serial port. Stages travel a fixed
//! number of counts per position query, which stands in for wall-clock motion.

use std::collections::VecDeque;
use std::fmt;
use std::vec::Vec;

use crate::config::units::Counts;
use crate::protocol::{encode_position_response, Command};

use super::Link;

/// Simulator transport errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Link was closed
    Closed,
    /// Frame did not decode to a known command
    UnknownCommand,
    /// Command addressed a channel the simulator does not have
    NoSuchChannel(u8),
    /// Fewer bytes were available than requested
    ShortRead {
        /// Bytes requested
        wanted: usize,
        /// Bytes available
        available: usize,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Closed => write!(f, "link closed"),
            SimError::UnknownCommand => write!(f, "unknown command frame"),
            SimError::NoSuchChannel(ch) => write!(f, "no channel {}", ch),
            SimError::ShortRead { wanted, available } => {
                write!(f, "wanted {} bytes, {} available", wanted, available)
            }
        }
    }
}

impl std::error::Error for SimError {}

#[derive(Debug, Clone, Default)]
struct SimAxis {
    position: i32,
    target: Option<i32>,
    /// Where the stage actually settles relative to the commanded target.
    settle_offset: i32,
    stalled: bool,
    /// Position queries left before a zero request takes effect.
    zero_countdown: Option<u32>,
}

impl SimAxis {
    fn advance(&mut self, travel: u32) {
        if let Some(countdown) = self.zero_countdown {
            if countdown == 0 {
                self.position = 0;
                self.zero_countdown = None;
            } else {
                self.zero_countdown = Some(countdown - 1);
            }
        }

        let Some(target) = self.target else {
            return;
        };
        if self.stalled {
            return;
        }
        let goal = target.saturating_add(self.settle_offset);
        let remaining = goal as i64 - self.position as i64;
        let step = remaining.clamp(-(travel as i64), travel as i64);
        self.position = (self.position as i64 + step) as i32;
        if self.position == goal {
            self.target = None;
        }
    }
}

/// Simulated multi-channel controller.
#[derive(Debug, Clone)]
pub struct SimulatedController {
    axes: Vec<SimAxis>,
    outbox: VecDeque<u8>,
    commands: Vec<Command>,
    travel_per_query: u32,
    zero_latency: u32,
    misroute: Option<u8>,
    garbage: usize,
    closed: bool,
}

impl SimulatedController {
    /// Travel per position query unless overridden.
    pub const DEFAULT_TRAVEL_PER_QUERY: u32 = 20;

    /// Create a simulator with `channels` axes, all at count zero.
    pub fn new(channels: usize) -> Self {
        Self {
            axes: vec![SimAxis::default(); channels],
            outbox: VecDeque::new(),
            commands: Vec::new(),
            travel_per_query: Self::DEFAULT_TRAVEL_PER_QUERY,
            zero_latency: 0,
            misroute: None,
            garbage: 0,
            closed: false,
        }
    }

    /// Set how many counts a moving axis covers per position query.
    pub fn with_travel_per_query(mut self, counts: u32) -> Self {
        self.travel_per_query = counts.max(1);
        self
    }

    /// Delay zero requests by this many position queries.
    pub fn with_zero_latency(mut self, queries: u32) -> Self {
        self.zero_latency = queries;
        self
    }

    /// Place an axis at a raw encoder count.
    pub fn set_position(&mut self, channel: u8, counts: Counts) {
        if let Some(axis) = self.axes.get_mut(channel as usize) {
            axis.position = counts.0;
            axis.target = None;
        }
    }

    /// Raw encoder count of an axis.
    pub fn position(&self, channel: u8) -> Option<Counts> {
        self.axes.get(channel as usize).map(|a| Counts(a.position))
    }

    /// Make an axis settle `offset` counts away from every commanded target.
    pub fn set_settle_offset(&mut self, channel: u8, offset: i32) {
        if let Some(axis) = self.axes.get_mut(channel as usize) {
            axis.settle_offset = offset;
        }
    }

    /// Stop an axis from moving.
    pub fn stall(&mut self, channel: u8) {
        if let Some(axis) = self.axes.get_mut(channel as usize) {
            axis.stalled = true;
        }
    }

    /// Answer the next position query with another channel's id.
    pub fn misroute_next_response(&mut self, channel: u8) {
        self.misroute = Some(channel);
    }

    /// Append stray bytes after the next position response.
    pub fn append_garbage(&mut self, bytes: usize) {
        self.garbage = bytes;
    }

    /// Every command received, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Forget recorded commands.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn axis_mut(&mut self, channel: u8) -> Result<&mut SimAxis, SimError> {
        self.axes
            .get_mut(channel as usize)
            .ok_or(SimError::NoSuchChannel(channel))
    }

    fn handle(&mut self, command: Command) -> Result<(), SimError> {
        let travel = self.travel_per_query;
        let zero_latency = self.zero_latency;
        match command {
            Command::GetPosition { channel } => {
                let axis = self.axis_mut(channel)?;
                axis.advance(travel);
                let counts = Counts(axis.position);
                let reported = self.misroute.take().unwrap_or(channel);
                self.outbox
                    .extend(encode_position_response(reported, counts));
                for _ in 0..std::mem::take(&mut self.garbage) {
                    self.outbox.push_back(0xff);
                }
            }
            Command::ZeroEncoder { channel } => {
                let axis = self.axis_mut(channel)?;
                axis.target = None;
                axis.zero_countdown = Some(zero_latency);
            }
            Command::MoveTo { channel, target } => {
                self.axis_mut(channel)?.target = Some(target.0);
            }
        }
        Ok(())
    }
}

impl Link for SimulatedController {
    type Error = SimError;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.closed {
            return Err(SimError::Closed);
        }
        let command = Command::decode(bytes).ok_or(SimError::UnknownCommand)?;
        self.commands.push(command);
        self.handle(command)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        if self.closed {
            return Err(SimError::Closed);
        }
        if self.outbox.len() < buf.len() {
            let available = self.outbox.len();
            self.outbox.clear();
            return Err(SimError::ShortRead {
                wanted: buf.len(),
                available,
            });
        }
        let n = buf.len();
        for (dst, src) in buf.iter_mut().zip(self.outbox.drain(..n)) {
            *dst = src;
        }
        Ok(())
    }

    fn bytes_pending(&mut self) -> Result<usize, Self::Error> {
        if self.closed {
            return Err(SimError::Closed);
        }
        Ok(self.outbox.len())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.closed = true;
        self.outbox.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_travels_per_query() {
        let mut sim = SimulatedController::new(1).with_travel_per_query(10);
        sim.write_all(&Command::MoveTo { channel: 0, target: Counts(25) }.encode())
            .unwrap();

        let mut response = [0u8; 12];
        let mut seen = Vec::new();
        for _ in 0..3 {
            sim.write_all(&Command::GetPosition { channel: 0 }.encode())
                .unwrap();
            sim.read_exact(&mut response).unwrap();
            seen.push(i32::from_le_bytes([response[8], response[9], response[10], response[11]]));
        }
        assert_eq!(seen, [10, 20, 25]);
    }

    #[test]
    fn test_zero_latency() {
        let mut sim = SimulatedController::new(1).with_zero_latency(1);
        sim.set_position(0, Counts(500));
        sim.write_all(&Command::ZeroEncoder { channel: 0 }.encode())
            .unwrap();

        let mut response = [0u8; 12];
        sim.write_all(&Command::GetPosition { channel: 0 }.encode())
            .unwrap();
        sim.read_exact(&mut response).unwrap();
        assert_eq!(sim.position(0), Some(Counts(500)));

        sim.write_all(&Command::GetPosition { channel: 0 }.encode())
            .unwrap();
        sim.read_exact(&mut response).unwrap();
        assert_eq!(sim.position(0), Some(Counts(0)));
    }

    #[test]
    fn test_rejects_unknown_frames() {
        let mut sim = SimulatedController::new(1);
        assert_eq!(sim.write_all(&[0x01, 0x02]), Err(SimError::UnknownCommand));
        assert_eq!(
            sim.write_all(&Command::GetPosition { channel: 4 }.encode()),
            Err(SimError::NoSuchChannel(4))
        );
    }

    #[test]
    fn test_short_read() {
        let mut sim = SimulatedController::new(1);
        let mut buf = [0u8; 4];
        assert_eq!(
            sim.read_exact(&mut buf),
            Err(SimError::ShortRead {
                wanted: 4,
                available: 0
            })
        );
    }
}
