//! Move legalization.
//!
//! Resolves a requested move against the channel's reference position, snaps it
//! to whole encoder counts and rejects anything outside the travel range.

use crate::config::units::{Counts, Micrometers};
use crate::error::{Error, MotionError, Result};
use crate::motor::Channel;

/// A move that can be sent to the device as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegalMove {
    /// Achievable target position.
    pub position: Micrometers,
    /// Device count for that position.
    pub target: Counts,
}

/// Position moves are measured from.
///
/// A pending target wins over the last reading, so back-to-back non-blocking
/// moves compose against what was commanded rather than stale hardware state.
pub fn reference_position(channel: &Channel) -> Result<Micrometers> {
    let counts = channel
        .state()
        .target()
        .or(channel.last_known())
        .ok_or(Error::Motion(MotionError::PositionUnknown(channel.id())))?;
    Ok(channel.scale().to_um(counts))
}

/// Legalize a move on `channel`.
///
/// With `relative` set, `request` is added to the reference position; otherwise
/// it is the absolute target.
///
/// # Errors
///
/// Returns `MotionError::OutOfRange` if the snapped target is not strictly inside
/// the travel range, and `MotionError::PositionUnknown` for a relative move on a
/// channel that has never been read.
pub fn legalize(channel: &Channel, request: Micrometers, relative: bool) -> Result<LegalMove> {
    let scale = channel.scale();
    let limit = scale.limit.bound();

    let requested = if relative {
        reference_position(channel)? + request
    } else {
        request
    };

    if !requested.0.is_finite() {
        return Err(Error::Motion(MotionError::OutOfRange {
            requested_um: request.0,
            legalized_um: requested.0,
            limit_um: limit.0,
        }));
    }

    let target = scale.to_counts(requested);
    let position = scale.to_um(target);

    if !scale.limit.contains(position) {
        return Err(Error::Motion(MotionError::OutOfRange {
            requested_um: request.0,
            legalized_um: position.0,
            limit_um: limit.0,
        }));
    }

    Ok(LegalMove { position, target })
}
