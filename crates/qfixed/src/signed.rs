use core::ops::{Add, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A signed fixed-point value with `FRAC` fractional bits, stored in an
/// `i32` the way the hardware model stores it in a 32-bit signed register.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Signed<const FRAC: u32>(i32);

impl<const FRAC: u32> Signed<FRAC> {
    /// The representation of `1.0` in this format.
    pub const ONE: Self = Self(1 << FRAC);
    pub const ZERO: Self = Self(0);

    /// Wrap a raw register value (already in `FRAC`-fractional-bit form).
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw register value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert an integer (zero fractional bits) into this format.
    #[must_use]
    pub const fn from_int(v: i32) -> Self {
        Self(v << FRAC)
    }

    /// Truncating integer part (towards negative infinity), as hardware
    /// bit-slicing `[31:FRAC]` would produce.
    #[must_use]
    pub const fn floor_to_int(self) -> i32 {
        self.0 >> FRAC
    }

    /// Multiply two values of this format and rescale back down by `FRAC`
    /// bits, computing the intermediate product in 64-bit space so the
    /// rescale can never silently drop significant bits (the hardware
    /// model always performs its `a * b` multiplies in a wider scratch
    /// register before truncating).
    #[must_use]
    pub fn mul_rescale(self, rhs: Self) -> Self {
        let wide = (i64::from(self.0) * i64::from(rhs.0)) >> FRAC;
        Self(wide as i32)
    }

    /// Multiply by a plain (non-fixed-point) signed scalar, keeping this
    /// format's fractional scale (used for incremental `dx * 2`-style
    /// stepping, not a rescaling multiply).
    #[must_use]
    pub fn mul_int(self, rhs: i32) -> Self {
        Self(self.0.wrapping_mul(rhs))
    }

    /// Saturate to `[0, 255]` and truncate to 8 bits, matching
    /// `sat_and_truncate` in the rasterizer's color output path: values
    /// below `0` clamp to `0`, values above `255.0` clamp to `255`,
    /// otherwise the top 8 bits of the fractional part are taken.
    #[must_use]
    pub fn saturate_to_u8(self) -> u8 {
        if self.0 < 0 {
            0
        } else if self.0 > (255 << FRAC) {
            255
        } else {
            (self.0 >> FRAC) as u8
        }
    }

    /// Reinterpret the raw bits at a different fractional-bit count,
    /// rescaling the value (not just relabeling it). Used where the
    /// pipeline hands a value off between two components that disagree on
    /// fractional width (e.g. converting an accumulated weight into a
    /// cache coordinate).
    #[must_use]
    pub fn rescale<const OTHER: u32>(self) -> Signed<OTHER> {
        if OTHER >= FRAC {
            Signed::from_raw(self.0 << (OTHER - FRAC))
        } else {
            Signed::from_raw(self.0 >> (FRAC - OTHER))
        }
    }
}

impl<const FRAC: u32> Add for Signed<FRAC> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl<const FRAC: u32> Sub for Signed<FRAC> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl<const FRAC: u32> Neg for Signed<FRAC> {
    type Output = Self;
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Q12_12 = Signed<12>;

    #[test]
    fn from_int_and_floor_round_trip() {
        let v = Q12_12::from_int(-7);
        assert_eq!(v.floor_to_int(), -7);
    }

    #[test]
    fn rescale_widens_and_narrows() {
        let q12 = Signed::<12>::from_raw(1 << 12);
        let q24: Signed<24> = q12.rescale();
        assert_eq!(q24.raw(), 1 << 24);
        let back: Signed<12> = q24.rescale();
        assert_eq!(back.raw(), 1 << 12);
    }

    #[test]
    fn add_wraps_at_32_bits() {
        let a = Signed::<0>::from_raw(i32::MAX);
        let b = Signed::<0>::from_raw(1);
        assert_eq!((a + b).raw(), i32::MIN);
    }
}
