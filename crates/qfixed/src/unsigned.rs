use core::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An unsigned fixed-point value with `FRAC` fractional bits, stored in a
/// `u32`. Used for depth (`z/w`, Q8.24).
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Unsigned<const FRAC: u32>(u32);

impl<const FRAC: u32> Unsigned<FRAC> {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u32::MAX);

    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Multiply two values of this format and rescale back down by `FRAC`
    /// bits in 64-bit scratch space.
    #[must_use]
    pub fn mul_rescale(self, rhs: Self) -> Self {
        let wide = (u64::from(self.0) * u64::from(rhs.0)) >> FRAC;
        Self(wide as u32)
    }
}

impl<const FRAC: u32> Add for Unsigned<FRAC> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl<const FRAC: u32> Sub for Unsigned<FRAC> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}
