//! Builder pattern for StageController.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::config::{validate_config, ControllerConfig, MAX_CHANNELS};
use crate::error::{ConfigError, Error, Result};
use crate::link::Link;
use crate::motion::PollPolicy;
use crate::observe::{NoopObserver, Observer};

use super::channel::Channel;
use super::controller::StageController;

/// Builder for creating StageController instances.
pub struct ControllerBuilder<L, D, O = NoopObserver>
where
    L: Link,
    D: DelayNs,
    O: Observer,
{
    config: Option<ControllerConfig>,
    link: Option<L>,
    delay: Option<D>,
    observer: O,
    poll: Option<PollPolicy>,
}

impl<L, D> Default for ControllerBuilder<L, D, NoopObserver>
where
    L: Link,
    D: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<L, D> ControllerBuilder<L, D, NoopObserver>
where
    L: Link,
    D: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            link: None,
            delay: None,
            observer: NoopObserver,
            poll: None,
        }
    }
}

impl<L, D, O> ControllerBuilder<L, D, O>
where
    L: Link,
    D: DelayNs,
    O: Observer,
{
    /// Set the controller configuration.
    pub fn config(mut self, config: &ControllerConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    /// Set the link to the device.
    pub fn link(mut self, link: L) -> Self {
        self.link = Some(link);
        self
    }

    /// Set the delay provider used between polls.
    pub fn delay(mut self, delay: D) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Override the poll interval and deadline from the configuration.
    pub fn poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = Some(poll);
        self
    }

    /// Set the event observer.
    pub fn observer<O2: Observer>(self, observer: O2) -> ControllerBuilder<L, D, O2> {
        ControllerBuilder {
            config: self.config,
            link: self.link,
            delay: self.delay,
            observer,
            poll: self.poll,
        }
    }

    /// Build the controller.
    ///
    /// Reads every populated channel's encoder once so relative moves have a
    /// reference from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if a required part is missing, the configuration is
    /// invalid, or a seeding read fails.
    pub fn build(self) -> Result<StageController<L, D, O>> {
        let config = self
            .config
            .ok_or(Error::Config(ConfigError::Missing("config")))?;
        let link = self
            .link
            .ok_or(Error::Config(ConfigError::Missing("link")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::Missing("delay")))?;

        validate_config(&config)?;

        let mut channels: Vec<Option<Channel>, MAX_CHANNELS> = Vec::new();
        for (id, channel) in config.channels.iter().enumerate() {
            channels
                .push(Channel::from_config(id as u8, channel))
                .map_err(|_| Error::Config(ConfigError::TooManyChannels(config.channels.len())))?;
        }

        let poll = self.poll.unwrap_or_else(|| PollPolicy::from_config(&config));
        // A zero interval never advances the deadline
        if poll.interval_ms == 0 {
            return Err(Error::Config(ConfigError::InvalidPollInterval(0)));
        }

        StageController::initialize(link, delay, self.observer, channels, poll)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::config::{ChannelConfig, StageModel};
    use crate::link::SimulatedController;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn test_missing_link() {
        let config = ControllerConfig::from_stages(&[Some(StageModel::Zfm2030)], &[false]).unwrap();
        let result = ControllerBuilder::<SimulatedController, NoopDelay>::new()
            .config(&config)
            .delay(NoopDelay::new())
            .build();

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::Missing("link")))
        ));
    }

    #[test]
    fn test_invalid_config_rejected_before_io() {
        let config = ControllerConfig::new(&[
            ChannelConfig::populated(StageModel::Zfm2030, false).with_tolerance(0),
        ])
        .unwrap();
        let mut sim = SimulatedController::new(1);

        let result = ControllerBuilder::new()
            .config(&config)
            .link(&mut sim)
            .delay(NoopDelay::new())
            .build();

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidTolerance(0)))
        ));
        assert!(sim.commands().is_empty());
    }

    #[test]
    fn test_zero_poll_interval_override_rejected() {
        let config = ControllerConfig::from_stages(&[Some(StageModel::Zfm2030)], &[false]).unwrap();
        let mut sim = SimulatedController::new(1);

        let result = ControllerBuilder::new()
            .config(&config)
            .link(&mut sim)
            .delay(NoopDelay::new())
            .poll_policy(PollPolicy {
                interval_ms: 0,
                timeout_ms: Some(300),
            })
            .build();

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidPollInterval(0)))
        ));
        assert!(sim.commands().is_empty());
    }

    #[test]
    fn test_build_seeds_positions() {
        let config = ControllerConfig::from_stages(
            &[Some(StageModel::Zfm2030), None, Some(StageModel::LongTravel)],
            &[false, false, true],
        )
        .unwrap();
        let mut sim = SimulatedController::new(3);
        sim.set_position(2, crate::config::Counts(40));

        let controller = ControllerBuilder::new()
            .config(&config)
            .link(&mut sim)
            .delay(NoopDelay::new())
            .poll_policy(PollPolicy {
                interval_ms: 1,
                timeout_ms: Some(10),
            })
            .build()
            .unwrap();

        assert_eq!(controller.channel(0).unwrap().last_known(), Some(crate::config::Counts(0)));
        assert_eq!(controller.channel(2).unwrap().last_known(), Some(crate::config::Counts(40)));
        assert!(controller.channel(1).is_err());
        assert_eq!(controller.poll_policy().interval_ms, 1);
    }
}
