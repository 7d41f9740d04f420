//! Unit tests for TOML configuration parsing.

use stage_motion::config::{load_config, ControllerConfig, StageModel};
use stage_motion::error::{ConfigError, Error};

/// Test parsing a full three-channel configuration from TOML.
#[test]
fn test_parse_controller_config() {
    let toml_str = r#"
port = "/dev/ttyUSB0"
baud_rate = 115200
poll_interval_ms = 50
move_timeout_ms = 10000
verbose = true

[[channels]]
stage = "ZFM2030"
tolerance_counts = 2
max_zero_offset_um = 100.0

[[channels]]

[[channels]]
stage = "B"
reversed = true
"#;

    let config: ControllerConfig = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.port.as_deref(), Some("/dev/ttyUSB0"));
    assert_eq!(config.baud_rate, 115_200);
    assert_eq!(config.poll_interval_ms, 50);
    assert_eq!(config.move_timeout_ms, Some(10_000));
    assert!(config.verbose);
    assert_eq!(config.channels.len(), 3);

    let first = config.channel(0).expect("Channel 0 not found");
    assert_eq!(first.stage, Some(StageModel::Zfm2030));
    assert_eq!(first.tolerance_counts, 2);
    assert_eq!(first.zero_guard.map(|g| g.0), Some(100.0));
    assert!(!first.reversed);

    assert!(!config.channel(1).unwrap().is_populated());

    let third = config.channel(2).unwrap();
    assert_eq!(third.stage, Some(StageModel::LongTravel));
    assert!(third.reversed);

    assert_eq!(config.populated_channels().collect::<Vec<_>>(), vec![0, 2]);
}

/// Test that omitted fields fall back to controller defaults.
#[test]
fn test_defaults() {
    let toml_str = r#"
[[channels]]
stage = "ZFM2020"
"#;

    let config: ControllerConfig = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.port, None);
    assert_eq!(config.baud_rate, 460_800);
    assert_eq!(config.poll_interval_ms, 100);
    assert_eq!(config.move_timeout_ms, None);
    assert!(!config.verbose);
    assert_eq!(config.channel(0).unwrap().tolerance_counts, 1);
    assert_eq!(config.channel(0).unwrap().zero_guard, None);
}

/// Test the stage aliases accepted in configuration files.
#[test]
fn test_stage_aliases() {
    let toml_str = r#"
[[channels]]
stage = "A"

[[channels]]
stage = "ZFM2030"
"#;

    let config: ControllerConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.channel(0).unwrap().stage, config.channel(1).unwrap().stage);
}

/// Test that more channels than the controller provides fail to parse.
#[test]
fn test_too_many_channels() {
    let toml_str = r#"
[[channels]]
[[channels]]
[[channels]]
[[channels]]
"#;

    let result: Result<ControllerConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err());
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("stage-motion-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
move_timeout_ms = 2000

[[channels]]
stage = "A"
reversed = true
"#,
    )
    .expect("Failed to write config file");

    let config = load_config(&path);
    let _ = std::fs::remove_file(&path);

    let config = config.expect("Failed to load config");
    assert_eq!(config.move_timeout_ms, Some(2000));
    assert!(config.channel(0).unwrap().reversed);
}

/// Test that a missing file is reported as an I/O error.
#[test]
fn test_load_missing_file() {
    let result = load_config("/nonexistent/stage-motion/config.toml");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::IoError(_)))
    ));
}
