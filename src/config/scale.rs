//! Axis scale derived from channel configuration.

use super::channel::ChannelConfig;
use super::limits::TravelLimit;
use super::stage::StageModel;
use super::units::{Counts, Micrometers};

/// Conversion between physical displacement and encoder counts for one axis.
///
/// Computed once at initialization and used for every legalization and
/// position report. `to_um(to_counts(x))` is within half a count of `x`; the
/// device only accepts whole counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    /// Physical travel per encoder count.
    pub um_per_count: f64,

    /// Symmetric travel range.
    pub limit: TravelLimit,

    /// Invert the sign of every conversion.
    pub reversed: bool,
}

impl AxisScale {
    /// Build the scale for a stage model.
    pub fn new(model: StageModel, reversed: bool) -> Self {
        Self {
            um_per_count: model.um_per_count(),
            limit: model.limit(),
            reversed,
        }
    }

    /// Build the scale for a populated channel configuration.
    ///
    /// Returns `None` for unpopulated channels.
    pub fn from_config(config: &ChannelConfig) -> Option<Self> {
        config.stage.map(|model| Self::new(model, config.reversed))
    }

    #[inline]
    fn sign(&self) -> f64 {
        if self.reversed {
            -1.0
        } else {
            1.0
        }
    }

    /// Convert a physical position to the nearest encoder count.
    ///
    /// Values beyond the `i32` range saturate; non-finite input maps to zero, so
    /// callers must check finiteness first.
    #[inline]
    pub fn to_counts(&self, position: Micrometers) -> Counts {
        let counts = libm::round(position.0 / self.um_per_count) * self.sign();
        Counts(counts as i32)
    }

    /// Convert an encoder count to a physical position.
    #[inline]
    pub fn to_um(&self, counts: Counts) -> Micrometers {
        Micrometers(counts.0 as f64 * self.sign() * self.um_per_count).normalized()
    }

    /// Snap a physical position to count granularity.
    #[inline]
    pub fn snap(&self, position: Micrometers) -> Micrometers {
        self.to_um(self.to_counts(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zfm(reversed: bool) -> AxisScale {
        AxisScale::new(StageModel::Zfm2030, reversed)
    }

    #[test]
    fn test_rounds_to_nearest_count() {
        let scale = zfm(false);

        // 10 / 0.2116667 = 47.24
        assert_eq!(scale.to_counts(Micrometers(10.0)), Counts(47));
        assert!((scale.to_um(Counts(47)).value() - 9.9483349).abs() < 1e-9);
    }

    #[test]
    fn test_reversed_axis() {
        let scale = zfm(true);

        assert_eq!(scale.to_counts(Micrometers(10.0)), Counts(-47));
        assert!((scale.to_um(Counts(-47)).value() - 9.9483349).abs() < 1e-9);
    }

    #[test]
    fn test_zero_is_positive() {
        let scale = zfm(true);

        assert_eq!(scale.to_counts(Micrometers(-0.0)), Counts(0));
        assert!(scale.to_um(Counts(0)).value().is_sign_positive());
    }

    #[test]
    fn test_saturates_far_outside_range() {
        let scale = zfm(false);
        assert_eq!(scale.to_counts(Micrometers(1e12)), Counts(i32::MAX));
    }

    proptest! {
        #[test]
        fn round_trip_within_one_count(x in -12_700.0..12_700.0f64, reversed: bool) {
            for model in StageModel::ALL {
                let scale = AxisScale::new(model, reversed);
                let back = scale.to_um(scale.to_counts(Micrometers(x)));
                prop_assert!((back.value() - x).abs() < scale.um_per_count);
            }
        }

        #[test]
        fn reversal_flips_sign(x in -25_000.0..25_000.0f64) {
            for model in StageModel::ALL {
                let forward = AxisScale::new(model, false).to_counts(Micrometers(x));
                let reverse = AxisScale::new(model, true).to_counts(Micrometers(x));
                prop_assert_eq!(reverse, -forward);
            }
        }

        #[test]
        fn snapping_is_idempotent(n in -50_000i32..50_000, reversed: bool) {
            let scale = AxisScale::new(StageModel::LongTravel, reversed);
            let legal = scale.to_um(Counts(n));
            prop_assert_eq!(scale.snap(legal), legal);
        }
    }
}
