//! Unit tests for configuration validation.

use stage_motion::config::{parse_config, validate_config, ChannelConfig, ControllerConfig, StageModel};
use stage_motion::error::{ConfigError, Error};
use stage_motion::Micrometers;

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let config = ControllerConfig::from_stages(
        &[Some(StageModel::Zfm2030), None, Some(StageModel::Zfm2020)],
        &[false, false, true],
    )
    .expect("Failed to build config");

    assert!(validate_config(&config).is_ok());
}

/// Test validation fails when no channels are configured.
#[test]
fn test_empty_channel_list() {
    let config = ControllerConfig::new(&[]).unwrap();

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::NoChannels))
    ));
}

/// Test validation fails for a zero poll interval.
#[test]
fn test_zero_poll_interval() {
    let config = ControllerConfig::from_stages(&[Some(StageModel::Zfm2030)], &[false])
        .unwrap()
        .with_poll_interval_ms(0);

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidPollInterval(0)))
    ));
}

/// Test validation fails for a zero tolerance window on any channel.
#[test]
fn test_zero_tolerance_on_second_channel() {
    let config = ControllerConfig::new(&[
        ChannelConfig::populated(StageModel::Zfm2030, false),
        ChannelConfig::populated(StageModel::LongTravel, false).with_tolerance(0),
    ])
    .unwrap();

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidTolerance(0)))
    ));
}

/// Test validation fails for a non-positive zero guard.
#[test]
fn test_negative_zero_guard() {
    let config = ControllerConfig::new(&[ChannelConfig::populated(StageModel::Zfm2030, false)
        .with_zero_guard(Micrometers(-5.0))])
    .unwrap();

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidZeroGuard(_)))
    ));
}

/// Test that parsing runs validation.
#[test]
fn test_parse_config_validates() {
    let toml_str = r#"
poll_interval_ms = 0

[[channels]]
stage = "A"
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::InvalidPollInterval(0)))
    ));
}

/// Test mismatched stage and reversal tuples.
#[test]
fn test_positional_length_mismatch() {
    let result = ControllerConfig::from_stages(&[Some(StageModel::Zfm2030), None], &[false]);

    assert_eq!(
        result,
        Err(ConfigError::LengthMismatch {
            stages: 2,
            reverse: 1
        })
    );
}

/// Test that an all-empty configuration is still valid.
#[test]
fn test_unpopulated_channels_are_valid() {
    let config = ControllerConfig::from_stages(&[None, None], &[false, false]).unwrap();

    assert!(validate_config(&config).is_ok());
    assert_eq!(config.populated_channels().count(), 0);
}
