//! Controller configuration - root configuration structure.

use heapless::{String, Vec};
use serde::Deserialize;

use crate::error::ConfigError;

use super::channel::ChannelConfig;
use super::stage::StageModel;

/// Number of channels the controller provides.
pub const MAX_CHANNELS: usize = 3;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControllerConfig {
    /// Serial port path (used by `StageController::open`).
    #[serde(default)]
    pub port: Option<String<64>>,

    /// Serial baud rate.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Delay between position polls while waiting for a move.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u32,

    /// Give up polling after this much accumulated wait. Unset polls forever.
    #[serde(default)]
    pub move_timeout_ms: Option<u32>,

    /// Report every poll, not just state transitions.
    #[serde(default)]
    pub verbose: bool,

    /// Channel configurations, indexed by channel id.
    pub channels: Vec<ChannelConfig, MAX_CHANNELS>,
}

fn default_baud_rate() -> u32 {
    460_800
}

fn default_poll_interval_ms() -> u32 {
    100
}

impl ControllerConfig {
    /// Create a configuration from channel entries, with defaults elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooManyChannels` if more than [`MAX_CHANNELS`] are given.
    pub fn new(channels: &[ChannelConfig]) -> Result<Self, ConfigError> {
        let channels = Vec::from_slice(channels)
            .map_err(|_| ConfigError::TooManyChannels(channels.len()))?;
        Ok(Self {
            port: None,
            baud_rate: default_baud_rate(),
            poll_interval_ms: default_poll_interval_ms(),
            move_timeout_ms: None,
            verbose: false,
            channels,
        })
    }

    /// Create a configuration from positional stage and reversal tuples.
    ///
    /// # Errors
    ///
    /// Fails if the tuples differ in length, are empty, or exceed [`MAX_CHANNELS`].
    pub fn from_stages(
        stages: &[Option<StageModel>],
        reverse: &[bool],
    ) -> Result<Self, ConfigError> {
        if stages.len() != reverse.len() {
            return Err(ConfigError::LengthMismatch {
                stages: stages.len(),
                reverse: reverse.len(),
            });
        }
        if stages.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if stages.len() > MAX_CHANNELS {
            return Err(ConfigError::TooManyChannels(stages.len()));
        }

        let mut channels: Vec<ChannelConfig, MAX_CHANNELS> = Vec::new();
        for (stage, &reversed) in stages.iter().zip(reverse) {
            let channel = match stage {
                Some(model) => ChannelConfig::populated(*model, reversed),
                None => ChannelConfig::unpopulated(),
            };
            channels
                .push(channel)
                .map_err(|_| ConfigError::TooManyChannels(stages.len()))?;
        }

        Self::new(&channels)
    }

    /// Set the serial port path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PortTooLong` if the path exceeds 64 bytes.
    pub fn with_port(mut self, port: &str) -> Result<Self, ConfigError> {
        let port = String::try_from(port).map_err(|_| ConfigError::PortTooLong(port.len()))?;
        self.port = Some(port);
        Ok(self)
    }

    /// Set the poll interval.
    pub fn with_poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the polling deadline.
    pub fn with_move_timeout_ms(mut self, ms: u32) -> Self {
        self.move_timeout_ms = Some(ms);
        self
    }

    /// Get a channel configuration by id.
    pub fn channel(&self, id: u8) -> Option<&ChannelConfig> {
        self.channels.get(id as usize)
    }

    /// Ids of channels with a stage attached.
    pub fn populated_channels(&self) -> impl Iterator<Item = u8> + '_ {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_populated())
            .map(|(i, _)| i as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stages() {
        let config = ControllerConfig::from_stages(
            &[None, None, Some(StageModel::Zfm2030)],
            &[false, false, true],
        )
        .unwrap();

        assert_eq!(config.channels.len(), 3);
        assert!(!config.channel(0).unwrap().is_populated());
        assert!(config.channel(2).unwrap().reversed);
        assert_eq!(config.populated_channels().collect::<std::vec::Vec<_>>(), [2]);
        assert_eq!(config.baud_rate, 460_800);
        assert_eq!(config.poll_interval_ms, 100);
    }

    #[test]
    fn test_from_stages_length_mismatch() {
        let result = ControllerConfig::from_stages(&[Some(StageModel::Zfm2020)], &[false, true]);
        assert_eq!(
            result,
            Err(ConfigError::LengthMismatch { stages: 1, reverse: 2 })
        );
    }

    #[test]
    fn test_with_port() {
        let config = ControllerConfig::from_stages(&[Some(StageModel::Zfm2030)], &[false])
            .unwrap()
            .with_port("/dev/ttyUSB0")
            .unwrap();
        assert_eq!(config.port.as_deref(), Some("/dev/ttyUSB0"));

        let long = "/dev/serial/by-id/usb-Thorlabs_MCM3000_Controller_0123456789-if00-port0";
        assert!(long.len() > 64);
        let result = ControllerConfig::from_stages(&[Some(StageModel::Zfm2030)], &[false])
            .unwrap()
            .with_port(long);
        assert_eq!(result, Err(ConfigError::PortTooLong(long.len())));
    }

    #[test]
    fn test_from_stages_bounds() {
        assert_eq!(
            ControllerConfig::from_stages(&[], &[]),
            Err(ConfigError::NoChannels)
        );
        assert_eq!(
            ControllerConfig::from_stages(&[None; 4], &[false; 4]),
            Err(ConfigError::TooManyChannels(4))
        );
    }
}
