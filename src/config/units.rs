//! Unit types for physical quantities.
//!
//! Keeps physical displacement and device-native encoder counts apart at compile
//! time, so a count is never passed where micrometers are expected.

use core::ops::{Add, Neg, Sub};

use serde::Deserialize;

/// Linear displacement in micrometers.
///
/// Used for configuration and the user-facing API. Internally converted to [`Counts`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Micrometers(pub f64);

impl Micrometers {
    /// Zero displacement.
    pub const ZERO: Self = Self(0.0);

    /// Create a new Micrometers value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self(libm::fabs(self.0))
    }

    /// Replace negative zero with positive zero.
    #[inline]
    pub fn normalized(self) -> Self {
        if self.0 == 0.0 {
            Self(0.0)
        } else {
            self
        }
    }
}

impl Add for Micrometers {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Micrometers {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Micrometers {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Encoder position in device counts.
///
/// The controller carries counts as a signed 32-bit little-endian integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Counts(pub i32);

impl Counts {
    /// Encoder zero.
    pub const ZERO: Self = Self(0);

    /// Create a new Counts value.
    #[inline]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Distance to another count, saturating at `u32::MAX`.
    #[inline]
    pub fn distance(self, other: Counts) -> u32 {
        let d = (self.0 as i64 - other.0 as i64).unsigned_abs();
        u32::try_from(d).unwrap_or(u32::MAX)
    }

    /// Little-endian wire representation.
    #[inline]
    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Decode from the little-endian wire representation.
    #[inline]
    pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self(i32::from_le_bytes(bytes))
    }
}

impl Neg for Counts {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.saturating_neg())
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Micrometers.
    fn um(self) -> Micrometers;
}

impl UnitExt for f64 {
    #[inline]
    fn um(self) -> Micrometers {
        Micrometers(self)
    }
}
