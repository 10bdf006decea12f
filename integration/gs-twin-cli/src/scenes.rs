//! Built-in demo scenes, one per worked scenario (S1-S6) from the
//! rasterizer's design spec: a flat triangle, a textured triangle, a
//! tile fill, a depth test, a blend, and a fog lookup. Each scene is a
//! short, self-contained recipe of `TriangleInput`/`FillCommand` values
//! run to completion through a fresh [`GsTwin`] - there is no camera or
//! geometry pipeline upstream of this CLI, matching the rasterizer's own
//! non-goal of not doing 3-D vertex setup.

use gs_memory::{Memory, VecMemory};
use gs_registers::{BlendFactor, BlendOp, DepthCompare, TexFormat};
use gs_twin::{ColorBuffer, FillCommand, GsTwin, TriangleInput};
use gs_twin_core::Rgba8888;
use qfixed::{Q12_12, Q8_12};

use crate::checkerboard;

/// Every scene name [`render`] accepts, in worked-scenario order.
pub const SCENE_NAMES: [&str; 6] =
    ["flat-triangle", "textured-triangle", "fill", "depth-test", "blend", "fog"];

/// An untextured, unblended, depth-test-disabled triangle covering the
/// whole tile (`v0=(0,0)`, `v1=(32,0)`, `v2=(16,32)`) with a flat black
/// color - the baseline every scene below tweaks a handful of fields of.
fn base_triangle() -> TriangleInput {
    TriangleInput {
        v0: (0, 0),
        v1: (32, 0),
        v2: (16, 32),
        col_init: [Q8_12::ZERO; 4],
        col_dx: [Q8_12::ZERO; 4],
        col_dy: [Q8_12::ZERO; 4],
        one_ow_init: Q12_12::from_int(1),
        one_ow_dx: Q12_12::ZERO,
        one_ow_dy: Q12_12::ZERO,
        sow_init: Q12_12::ZERO,
        sow_dx: Q12_12::ZERO,
        sow_dy: Q12_12::ZERO,
        tow_init: Q12_12::ZERO,
        tow_dx: Q12_12::ZERO,
        tow_dy: Q12_12::ZERO,
        zow_init: Q12_12::ZERO,
        zow_dx: Q12_12::ZERO,
        zow_dy: Q12_12::ZERO,
        tex_en: false,
        tex_adr: 0,
        tex_w: 0,
        tex_h: 0,
        tex_fmt: TexFormat::Rgba8888,
        clamp_s: true,
        clamp_t: true,
        filter_en: false,
        mip_en: false,
        dtest_en: false,
        dcmp: DepthCompare::Always,
        bl_en: false,
        bl_src: BlendFactor::One,
        bl_dst: BlendFactor::Zero,
        bl_op: BlendOp::Add,
        fog_en: false,
        fog_col: [0, 0, 0],
        fog_tbl: [0; 64],
    }
}

fn flat_color(r: u8, g: u8, b: u8, a: u8) -> [Q8_12; 4] {
    [Q8_12::from_int(i32::from(r)), Q8_12::from_int(i32::from(g)), Q8_12::from_int(i32::from(b)), Q8_12::from_int(i32::from(a))]
}

/// Run one named scene to completion and return its resulting color
/// plane.
///
/// # Errors
/// Returns an error for an unrecognized scene name, or if the rasterizer
/// stalls or hits a texture bus timeout while draining the scene's
/// commands.
pub fn render(name: &str) -> anyhow::Result<ColorBuffer> {
    let mut twin = GsTwin::new();
    match name {
        "flat-triangle" => scene_flat_triangle(&mut twin)?,
        "textured-triangle" => scene_textured_triangle(&mut twin)?,
        "fill" => scene_fill(&mut twin)?,
        "depth-test" => scene_depth_test(&mut twin)?,
        "blend" => scene_blend(&mut twin)?,
        "fog" => scene_fog(&mut twin)?,
        other => anyhow::bail!("unknown scene {other:?}, expected one of {SCENE_NAMES:?}"),
    }
    Ok(twin.color().clone())
}

/// S1: a flat red triangle, no texturing, blending or depth test.
fn scene_flat_triangle(twin: &mut GsTwin) -> anyhow::Result<()> {
    let mut mem = VecMemory::new(1);
    let mut tri = base_triangle();
    tri.col_init = flat_color(255, 0, 0, 255);
    twin.draw_triangle(tri, &mut mem)?;
    Ok(())
}

/// S2: an 8x8 RGBA4444 checkerboard, bilinear-filtered, clamped, with
/// `1/w` constant and `s/w`, `t/w` linear across the triangle's bounding
/// box so `(s, t)` sweeps `[0, 1]^2` over the tile.
fn scene_textured_triangle(twin: &mut GsTwin) -> anyhow::Result<()> {
    let mut mem = VecMemory::from_words(checkerboard::encode_8x8(Rgba8888::WHITE, Rgba8888::OPAQUE_BLACK));
    let mut tri = base_triangle();
    tri.col_init = flat_color(255, 255, 255, 255);
    // 1/32 per pixel, in Q12.12, so sow/tow reach 1.0 at the tile's far edge.
    let step = Q12_12::from_raw((1 << 12) / 32);
    tri.sow_dx = step;
    tri.tow_dy = step;
    tri.tex_en = true;
    tri.tex_adr = 0;
    tri.tex_w = 3; // log2(8)
    tri.tex_h = 3;
    tri.tex_fmt = TexFormat::Rgba4444;
    tri.filter_en = true;
    twin.draw_triangle(tri, &mut mem)?;
    Ok(())
}

/// S3: a tile fill with a constant color and depth.
fn scene_fill(twin: &mut GsTwin) -> anyhow::Result<()> {
    let mut mem = VecMemory::new(1);
    let fc = FillCommand { col_init: flat_color(64, 128, 255, 255), zow_init: Q12_12::from_raw(0x00FF_FFFF) };
    twin.fill(fc, &mut mem)?;
    Ok(())
}

/// S4: pre-fill the depth plane to `0x800000`, then draw a white
/// triangle whose `z/w` sweeps `0..=0xFFFFFF` across x with
/// `LessOrEqual` depth testing enabled - only the half of the tile
/// where the incoming depth is shallow enough should be written.
fn scene_depth_test(twin: &mut GsTwin) -> anyhow::Result<()> {
    let mut mem = VecMemory::new(1);
    let seed = FillCommand { col_init: flat_color(0, 0, 0, 0), zow_init: Q12_12::from_raw(0x0080_0000) };
    twin.fill(seed, &mut mem)?;

    let mut tri = base_triangle();
    tri.col_init = flat_color(255, 255, 255, 255);
    tri.zow_dx = Q12_12::from_raw(0x00FF_FFFF / 32);
    tri.dtest_en = true;
    tri.dcmp = DepthCompare::LessOrEqual;
    twin.draw_triangle(tri, &mut mem)?;
    Ok(())
}

/// S5: `SrcAlpha`/`OneMinusSrcAlpha`/`Add` blending a half-transparent
/// red triangle over an opaque black tile.
fn scene_blend(twin: &mut GsTwin) -> anyhow::Result<()> {
    let mut mem = VecMemory::new(1);
    let backdrop = FillCommand { col_init: flat_color(0, 0, 0, 255), zow_init: Q12_12::ZERO };
    twin.fill(backdrop, &mut mem)?;

    let mut tri = base_triangle();
    tri.col_init = flat_color(200, 0, 0, 128);
    tri.bl_en = true;
    tri.bl_src = BlendFactor::SrcAlpha;
    tri.bl_dst = BlendFactor::OneMinusSrcAlpha;
    tri.bl_op = BlendOp::Add;
    twin.draw_triangle(tri, &mut mem)?;
    Ok(())
}

/// S6: a flat red triangle under a fog table that ramps from `0` to
/// `255` starting at fog index 16, with a constant `z/w` chosen so every
/// pixel's top 6 depth bits select index 31 (density 240).
fn scene_fog(twin: &mut GsTwin) -> anyhow::Result<()> {
    let mut mem = VecMemory::new(1);
    let mut tri = base_triangle();
    tri.col_init = flat_color(255, 0, 0, 255);
    tri.zow_init = Q12_12::from_raw(31i32 << 26);
    tri.fog_en = true;
    tri.fog_col = [0x80, 0x80, 0x80];
    let mut fog_tbl = [0u8; 64];
    for (i, d) in fog_tbl.iter_mut().enumerate() {
        if i > 16 {
            *d = (((i - 16) * 16).min(255)) as u8;
        }
    }
    tri.fog_tbl = fog_tbl;
    twin.draw_triangle(tri, &mut mem)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scene_name_renders_without_error() {
        for name in SCENE_NAMES {
            let buf = render(name).unwrap_or_else(|e| panic!("scene {name} failed: {e}"));
            assert_eq!(buf.pixels().len(), 32 * 32);
        }
    }

    #[test]
    fn flat_triangle_scene_matches_s1() {
        let buf = render("flat-triangle").unwrap();
        use gs_twin_core::ColorTarget;
        assert_eq!(buf.read_pixel(16, 16), Rgba8888::new(255, 0, 0, 255));
        assert_eq!(buf.read_pixel(31, 31), Rgba8888::TRANSPARENT_BLACK);
    }

    #[test]
    fn fill_scene_matches_s3() {
        let buf = render("fill").unwrap();
        use gs_twin_core::ColorTarget;
        assert_eq!(buf.read_pixel(0, 0), Rgba8888::new(64, 128, 255, 255));
        assert_eq!(buf.read_pixel(31, 31), Rgba8888::new(64, 128, 255, 255));
    }

    #[test]
    fn unknown_scene_name_is_rejected() {
        assert!(render("not-a-scene").is_err());
    }
}
