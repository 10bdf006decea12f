//! ST-to-cache-coordinate conversion: mip selection, half-texel bias,
//! clamp/wrap, and fractional-bit extraction for bilinear interpolation.
//!
//! Pure combinational math - no state, no bus traffic - so it is a
//! plain function rather than a tick-driven component.

use qfixed::Q24_12;

/// Half a texel in Q24.12 (`0.5` scaled by `1 << 12`).
const HALF_TEXEL: i32 = 1 << 11;

/// One sample's ST coordinate, its screen-space derivatives (used only
/// when mip selection is enabled), and the texture's shape/addressing
/// mode.
#[derive(Clone, Copy, Debug)]
pub struct UvCoordRequest {
    pub s: Q24_12,
    pub t: Q24_12,
    pub ds_dx: Q24_12,
    pub dt_dx: Q24_12,
    pub ds_dy: Q24_12,
    pub dt_dy: Q24_12,
    /// log2 texture width in texels.
    pub tex_w: u32,
    /// log2 texture height in texels.
    pub tex_h: u32,
    pub clamp_s: bool,
    pub clamp_t: bool,
    pub mip_enable: bool,
}

/// Integer texel coordinates (already masked into the effective mip
/// level's range) and the 12-bit fraction driving bilinear interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UvCoordOutput {
    pub sx: u32,
    pub sy: u32,
    pub px: u16,
    pub py: u16,
    pub mip: u32,
}

/// `floor(log2(raw))` for a positive raw fixed-point value, or
/// `i32::MIN` (treated as "arbitrarily small") for `raw <= 0`.
fn floor_log2(raw: i32) -> i32 {
    if raw <= 0 {
        i32::MIN
    } else {
        31 - (raw as u32).leading_zeros() as i32
    }
}

fn select_mip(req: &UvCoordRequest) -> u32 {
    if !req.mip_enable {
        return 0;
    }
    let max_mip = 0.max((req.tex_w as i32 - 2).min(req.tex_h as i32 - 2));

    let dx2 = req.ds_dx.mul_rescale(req.ds_dx) + req.dt_dx.mul_rescale(req.dt_dx);
    let dy2 = req.ds_dy.mul_rescale(req.ds_dy) + req.dt_dy.mul_rescale(req.dt_dy);
    let rho2_raw = dx2.raw().max(dy2.raw());

    // rho2_raw is in Q12.12; subtract 12 to undo the fixed-point scale
    // before halving for the log2/2 mip step.
    let log2_rho2 = floor_log2(rho2_raw).saturating_sub(12);
    (log2_rho2 / 2).clamp(0, max_mip) as u32
}

/// Convert one axis's ST coordinate to a texel index and fractional
/// bits at the given effective (post-mip) log2 size.
fn axis(coord_raw: i32, eff_log2: u32, clamp: bool) -> (u32, u16) {
    let shifted = coord_raw << eff_log2;
    let biased = shifted.wrapping_sub(HALF_TEXEL);
    let max_fixed = ((1i64 << eff_log2) - 1) << 12;
    let clamped = if clamp {
        i64::from(biased).clamp(0, max_fixed) as i32
    } else {
        biased
    };
    let mask = (1u32 << eff_log2) - 1;
    let texel = (clamped as u32 >> 12) & mask;
    let frac = (clamped as u32 & 0xFFF) as u16;
    (texel, frac)
}

/// Resolve a request into the integer sample position and bilinear
/// fraction the cache and filter stages need.
#[must_use]
pub fn sample_position(req: &UvCoordRequest) -> UvCoordOutput {
    let mip = select_mip(req);
    let eff_w = req.tex_w.saturating_sub(mip);
    let eff_h = req.tex_h.saturating_sub(mip);
    let (sx, px) = axis(req.s.raw(), eff_w, req.clamp_s);
    let (sy, py) = axis(req.t.raw(), eff_h, req.clamp_t);
    UvCoordOutput { sx, sy, px, py, mip }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> UvCoordRequest {
        UvCoordRequest {
            s: Q24_12::ZERO,
            t: Q24_12::ZERO,
            ds_dx: Q24_12::ZERO,
            dt_dx: Q24_12::ZERO,
            ds_dy: Q24_12::ZERO,
            dt_dy: Q24_12::ZERO,
            tex_w: 3,
            tex_h: 3,
            clamp_s: true,
            clamp_t: true,
            mip_enable: false,
        }
    }

    #[test]
    fn zero_st_clamps_the_half_texel_bias_to_zero() {
        let req = base_request();
        let out = sample_position(&req);
        assert_eq!((out.sx, out.sy), (0, 0));
        assert_eq!((out.px, out.py), (0, 0));
    }

    #[test]
    fn half_st_lands_mid_texel_on_an_eight_wide_texture() {
        let mut req = base_request();
        req.s = Q24_12::from_raw(1 << 11); // s = 0.5
        req.t = Q24_12::from_raw(1 << 11);
        let out = sample_position(&req);
        // (0.5 << 3) - 0.5 = 3.5 texels
        assert_eq!((out.sx, out.sy), (3, 3));
        assert_eq!((out.px, out.py), (2048, 2048));
    }

    #[test]
    fn wrap_mode_masks_a_negative_coordinate_into_range() {
        let mut req = base_request();
        req.clamp_s = false;
        req.s = Q24_12::from_raw(-(1 << 11)); // s = -0.5
        let out = sample_position(&req);
        // (-0.5 << 3) - 0.5 = -4.5 texels; wrapping modulo 8 gives 3.
        assert_eq!(out.sx, 3);
    }

    #[test]
    fn mip_selection_picks_level_zero_with_no_derivatives() {
        let mut req = base_request();
        req.mip_enable = true;
        let out = sample_position(&req);
        assert_eq!(out.mip, 0);
    }

    #[test]
    fn mip_selection_rises_with_large_derivatives() {
        let mut req = base_request();
        req.mip_enable = true;
        req.tex_w = 8;
        req.tex_h = 8;
        req.ds_dx = Q24_12::from_raw(4 << 12);
        let out = sample_position(&req);
        assert!(out.mip > 0);
    }
}
