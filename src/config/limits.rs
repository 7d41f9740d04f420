//! Travel limit types.

use super::units::Micrometers;

/// Symmetric travel range about the encoder zero.
///
/// Legal positions lie strictly inside `(-bound, +bound)`. Out-of-range targets
/// are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelLimit {
    bound: Micrometers,
}

impl TravelLimit {
    /// Create a limit from its positive bound.
    pub const fn new(bound: Micrometers) -> Self {
        Self { bound }
    }

    /// The positive bound.
    #[inline]
    pub fn bound(&self) -> Micrometers {
        self.bound
    }

    /// Check whether a position lies strictly inside the range.
    #[inline]
    pub fn contains(&self, position: Micrometers) -> bool {
        -self.bound.0 < position.0 && position.0 < self.bound.0
    }
}
