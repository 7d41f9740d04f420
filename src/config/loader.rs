//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{bounded, ConfigError, Error, Result};

use super::ControllerConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use stage_motion::load_config;
///
/// let config = load_config("stages.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ControllerConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::Config(ConfigError::IoError(bounded(&e.to_string())))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<ControllerConfig> {
    let config: ControllerConfig = toml::from_str(content).map_err(|e| {
        Error::Config(ConfigError::ParseError(bounded(e.message())))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageModel;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[[channels]]
stage = "ZFM2030"
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.channels.len(), 1);
        assert_eq!(config.channel(0).unwrap().stage, Some(StageModel::Zfm2030));
        assert_eq!(config.channel(0).unwrap().tolerance_counts, 1);
    }

    #[test]
    fn test_parse_unpopulated_channels() {
        let toml = r#"
port = "/dev/ttyUSB0"
move_timeout_ms = 5000

[[channels]]

[[channels]]

[[channels]]
stage = "ZFM2020"
reversed = true
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(config.move_timeout_ms, Some(5000));
        assert_eq!(config.populated_channels().count(), 1);
        assert!(config.channel(2).unwrap().reversed);
    }

    #[test]
    fn test_unknown_stage_is_parse_error() {
        let toml = r#"
[[channels]]
stage = "PLS-X"
"#;

        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_long_parse_message_is_truncated() {
        let long = "x".repeat(300);
        assert_eq!(bounded::<128>(&long).len(), 128);
    }
}
