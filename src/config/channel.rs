//! Per-channel configuration from TOML.

use serde::Deserialize;

use super::stage::StageModel;
use super::units::Micrometers;

/// Configuration for one controller channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChannelConfig {
    /// Attached stage model. `None` leaves the channel unpopulated.
    #[serde(default)]
    pub stage: Option<StageModel>,

    /// Invert the sign of all position conversions on this axis.
    #[serde(default)]
    pub reversed: bool,

    /// Count distance within which a move is considered finished (>= 1).
    #[serde(default = "default_tolerance_counts")]
    pub tolerance_counts: u32,

    /// Refuse to zero the encoder further than this from the current zero.
    ///
    /// Unset leaves zero placement to the caller.
    #[serde(default, rename = "max_zero_offset_um")]
    pub zero_guard: Option<Micrometers>,
}

fn default_tolerance_counts() -> u32 {
    1
}

impl ChannelConfig {
    /// A channel with a stage attached and default tolerance.
    pub fn populated(stage: StageModel, reversed: bool) -> Self {
        Self {
            stage: Some(stage),
            reversed,
            tolerance_counts: default_tolerance_counts(),
            zero_guard: None,
        }
    }

    /// A channel with nothing attached.
    pub fn unpopulated() -> Self {
        Self {
            stage: None,
            reversed: false,
            tolerance_counts: default_tolerance_counts(),
            zero_guard: None,
        }
    }

    /// Whether a stage is attached.
    #[inline]
    pub fn is_populated(&self) -> bool {
        self.stage.is_some()
    }

    /// Set the tolerance window.
    pub fn with_tolerance(mut self, counts: u32) -> Self {
        self.tolerance_counts = counts;
        self
    }

    /// Set the zero-offset guard.
    pub fn with_zero_guard(mut self, max: Micrometers) -> Self {
        self.zero_guard = Some(max);
        self
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::unpopulated()
    }
}
