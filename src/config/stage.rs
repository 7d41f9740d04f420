//! Supported stage models and their calibration.

use serde::Deserialize;

use crate::error::ConfigError;

use super::limits::TravelLimit;
use super::units::Micrometers;

/// Stage model attached to a controller channel.
///
/// Each model fixes the encoder scale and the symmetric travel range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StageModel {
    /// ZFM2020 focus module, 12.7 mm each way.
    Zfm2020,
    /// ZFM2030 focus module, 12.7 mm each way.
    Zfm2030,
    /// Long-travel stage, 25.4 mm each way at 0.5 um per count.
    LongTravel,
}

impl StageModel {
    /// All supported models.
    pub const ALL: [Self; 3] = [Self::Zfm2020, Self::Zfm2030, Self::LongTravel];

    /// Look up a model by name. `"A"` and `"B"` select the generic calibrations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedStage` for unknown names.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "ZFM2020" => Ok(Self::Zfm2020),
            "ZFM2030" | "A" => Ok(Self::Zfm2030),
            "B" => Ok(Self::LongTravel),
            other => Err(ConfigError::UnsupportedStage(
                heapless::String::try_from(other).unwrap_or_default(),
            )),
        }
    }

    /// Canonical model name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zfm2020 => "ZFM2020",
            Self::Zfm2030 => "ZFM2030",
            Self::LongTravel => "B",
        }
    }

    /// Physical travel per encoder count.
    pub const fn um_per_count(self) -> f64 {
        match self {
            Self::Zfm2020 | Self::Zfm2030 => 0.2116667,
            Self::LongTravel => 0.5,
        }
    }

    /// Symmetric travel bound.
    pub const fn limit(self) -> TravelLimit {
        match self {
            Self::Zfm2020 | Self::Zfm2030 => TravelLimit::new(Micrometers(12_700.0)),
            Self::LongTravel => TravelLimit::new(Micrometers(25_400.0)),
        }
    }
}

impl TryFrom<&str> for StageModel {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_name(value)
    }
}

impl<'de> Deserialize<'de> for StageModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let name = heapless::String::<32>::deserialize(deserializer)?;
        StageModel::from_name(name.as_str()).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        for model in StageModel::ALL {
            assert_eq!(StageModel::from_name(model.name()), Ok(model));
        }
        assert_eq!(StageModel::from_name("A"), Ok(StageModel::Zfm2030));
        assert_eq!(StageModel::from_name("B"), Ok(StageModel::LongTravel));
    }

    #[test]
    fn test_unsupported_stage() {
        assert!(matches!(
            StageModel::from_name("ZFM9999"),
            Err(ConfigError::UnsupportedStage(_))
        ));
    }

    #[test]
    fn test_calibration_table() {
        assert_eq!(StageModel::Zfm2030.um_per_count(), 0.2116667);
        assert_eq!(StageModel::Zfm2030.limit().bound(), Micrometers(12_700.0));
        assert_eq!(StageModel::LongTravel.um_per_count(), 0.5);
        assert_eq!(StageModel::LongTravel.limit().bound(), Micrometers(25_400.0));
    }
}
