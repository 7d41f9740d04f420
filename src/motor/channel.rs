//! Channel state store.
//!
//! Holds calibration, limits, the last encoder reading and the pending target
//! for one axis. Only the controller mutates it.

use crate::config::units::{Counts, Micrometers};
use crate::config::{AxisScale, ChannelConfig, StageModel};
use crate::error::{ConfigError, Error, Result};

use super::state::MotionState;

/// One populated controller channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    id: u8,
    model: StageModel,
    scale: AxisScale,
    tolerance_counts: u32,
    zero_guard: Option<Micrometers>,
    last_known: Option<Counts>,
    state: MotionState,
}

impl Channel {
    /// Create a channel from its configuration.
    ///
    /// Returns `None` if no stage is attached.
    pub fn from_config(id: u8, config: &ChannelConfig) -> Option<Self> {
        let model = config.stage?;
        Some(Self {
            id,
            model,
            scale: AxisScale::new(model, config.reversed),
            tolerance_counts: config.tolerance_counts,
            zero_guard: config.zero_guard,
            last_known: None,
            state: MotionState::Idle,
        })
    }

    /// Channel id.
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Attached stage model.
    #[inline]
    pub fn model(&self) -> StageModel {
        self.model
    }

    /// Conversion and limits for this axis.
    #[inline]
    pub fn scale(&self) -> &AxisScale {
        &self.scale
    }

    /// Count distance accepted as arrived.
    #[inline]
    pub fn tolerance_counts(&self) -> u32 {
        self.tolerance_counts
    }

    /// Maximum distance from zero at which re-zeroing is allowed.
    #[inline]
    pub fn zero_guard(&self) -> Option<Micrometers> {
        self.zero_guard
    }

    /// Last encoder count read from the device.
    #[inline]
    pub fn last_known(&self) -> Option<Counts> {
        self.last_known
    }

    /// Last known position in micrometers.
    #[inline]
    pub fn position_um(&self) -> Option<Micrometers> {
        self.last_known.map(|c| self.scale.to_um(c))
    }

    /// Current motion state.
    #[inline]
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Whether `reading` is within the tolerance window of `target`.
    #[inline]
    pub fn arrived(&self, reading: Counts, target: Counts) -> bool {
        reading.distance(target) <= self.tolerance_counts
    }

    pub(crate) fn record_reading(&mut self, counts: Counts) {
        self.last_known = Some(counts);
    }

    pub(crate) fn begin_move(&mut self, target: Counts) {
        self.state = MotionState::Moving { target };
    }

    /// Clear the pending target. Returns the target that was pending.
    pub(crate) fn end_move(&mut self) -> Option<Counts> {
        let target = self.state.target();
        self.state = MotionState::Idle;
        target
    }
}

/// Look up a populated channel.
pub(crate) fn lookup(channels: &[Option<Channel>], id: u8) -> Result<&Channel> {
    match channels.get(id as usize) {
        None => Err(Error::Config(ConfigError::UnknownChannel(id))),
        Some(None) => Err(Error::Config(ConfigError::ChannelUnpopulated(id))),
        Some(Some(channel)) => Ok(channel),
    }
}

/// Look up a populated channel for mutation.
pub(crate) fn lookup_mut(channels: &mut [Option<Channel>], id: u8) -> Result<&mut Channel> {
    match channels.get_mut(id as usize) {
        None => Err(Error::Config(ConfigError::UnknownChannel(id))),
        Some(None) => Err(Error::Config(ConfigError::ChannelUnpopulated(id))),
        Some(Some(channel)) => Ok(channel),
    }
}
