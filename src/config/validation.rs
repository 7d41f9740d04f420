//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{ChannelConfig, ControllerConfig};

/// Validate a controller configuration.
///
/// Checks:
/// - One to three channels are configured
/// - Poll interval is non-zero
/// - Every channel's tolerance window is at least one count
/// - Zero-offset guards are positive
pub fn validate_config(config: &ControllerConfig) -> Result<()> {
    if config.channels.is_empty() {
        return Err(Error::Config(ConfigError::NoChannels));
    }

    if config.poll_interval_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidPollInterval(
            config.poll_interval_ms,
        )));
    }

    for channel in config.channels.iter() {
        validate_channel(channel)?;
    }

    Ok(())
}

fn validate_channel(config: &ChannelConfig) -> Result<()> {
    // Zero tolerance can poll forever against encoder jitter
    if config.tolerance_counts == 0 {
        return Err(Error::Config(ConfigError::InvalidTolerance(
            config.tolerance_counts,
        )));
    }

    if let Some(guard) = config.zero_guard {
        if !(guard.0 > 0.0) {
            return Err(Error::Config(ConfigError::InvalidZeroGuard(guard.0)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::Micrometers;
    use crate::config::StageModel;

    #[test]
    fn test_zero_tolerance_rejected() {
        let config = ChannelConfig::populated(StageModel::Zfm2030, false).with_tolerance(0);

        let result = validate_channel(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidTolerance(0)))
        ));
    }

    #[test]
    fn test_negative_zero_guard_rejected() {
        let config = ChannelConfig::populated(StageModel::Zfm2030, false)
            .with_zero_guard(Micrometers(-5.0));

        assert!(matches!(
            validate_channel(&config),
            Err(Error::Config(ConfigError::InvalidZeroGuard(_)))
        ));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = ControllerConfig::from_stages(&[Some(StageModel::Zfm2020)], &[false])
            .unwrap()
            .with_poll_interval_ms(0);

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidPollInterval(0)))
        ));
    }
}
