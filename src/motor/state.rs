//! Per-channel motion state.

use crate::config::units::Counts;

/// Motion state of one channel.
///
/// A channel is `Moving` from the moment a move command is sent until polling
/// confirms the stage reached the target, or the move is superseded or abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// No move pending.
    #[default]
    Idle,
    /// A move was issued and has not been confirmed.
    Moving {
        /// Commanded encoder count.
        target: Counts,
    },
}

impl MotionState {
    /// Pending target, if any.
    #[inline]
    pub fn target(&self) -> Option<Counts> {
        match *self {
            MotionState::Idle => None,
            MotionState::Moving { target } => Some(target),
        }
    }

    /// Whether a move is pending.
    #[inline]
    pub fn is_moving(&self) -> bool {
        matches!(self, MotionState::Moving { .. })
    }

    /// State name for display/debugging.
    pub fn name(&self) -> &'static str {
        match self {
            MotionState::Idle => "Idle",
            MotionState::Moving { .. } => "Moving",
        }
    }
}
