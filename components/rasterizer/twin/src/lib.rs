//! TriRaster: the fixed-function triangle rasterizer at the root of the
//! pico-gs pipeline. Latches a triangle's edge and attribute plane
//! equations, walks its bounding box one quad (2x2 pixels) at a time,
//! and for each covered, depth-tested corner optionally samples a
//! texture through an owned [`TexSampler`], shades, fogs, blends and
//! writes it out.
//!
//! Mirrors `tri_raster.py`'s `WAITING -> SETUP1..SETUP4 -> RASTERLOOP`
//! state machine, generalized with a texturing sub-sequence and an
//! orthogonal tile-clear `FILL` sequence that test.py's fuller testbench
//! exercises but the archived `tri_raster.py` source predates. See
//! `geometry.rs` for why the per-quad math is evaluated in closed form
//! rather than by replaying row-start registers.

mod fragment;
mod geometry;

use gs_memory::{BusError, Memory};
use gs_registers::{BlendFactor, BlendOp, DepthCompare, TexFormat};
use gs_texture::{TexSampleRequest, TexSampler};
use gs_twin_core::{ColorTarget, DepthTarget, Rgba8888};
use qfixed::{Q12_12, Q8_12, Q8_24};

use fragment::{corner_depth, finish_quad, interpolate, vertex_color, CORNER_OFFSETS};
use geometry::Geometry;

pub use fragment::QuadWrite;

/// Tile dimensions in pixels; rasterization never leaves this 32x32
/// region, matching the color/depth buffers' quad-addressed layout.
const TILE_DIM: i32 = 32;
/// Tile dimensions in quads (2x2-pixel groups).
const QUAD_DIM: i32 = TILE_DIM / 2;

/// One latched triangle's vertices, plane-equation coefficients and
/// per-fragment configuration. Everything here is `Copy`; a new triangle
/// simply replaces the latched value wholesale.
#[derive(Clone, Copy, Debug)]
pub struct TriangleInput {
    pub v0: (i32, i32),
    pub v1: (i32, i32),
    pub v2: (i32, i32),

    pub col_init: [Q8_12; 4],
    pub col_dx: [Q8_12; 4],
    pub col_dy: [Q8_12; 4],

    pub one_ow_init: Q12_12,
    pub one_ow_dx: Q12_12,
    pub one_ow_dy: Q12_12,

    pub sow_init: Q12_12,
    pub sow_dx: Q12_12,
    pub sow_dy: Q12_12,

    pub tow_init: Q12_12,
    pub tow_dx: Q12_12,
    pub tow_dy: Q12_12,

    pub zow_init: Q12_12,
    pub zow_dx: Q12_12,
    pub zow_dy: Q12_12,

    pub tex_en: bool,
    pub tex_adr: u32,
    /// `log2` of the texture's width/height, matching `TexSampleRequest`.
    pub tex_w: u32,
    pub tex_h: u32,
    pub tex_fmt: TexFormat,
    pub clamp_s: bool,
    pub clamp_t: bool,
    pub filter_en: bool,
    pub mip_en: bool,

    pub dtest_en: bool,
    pub dcmp: DepthCompare,

    pub bl_en: bool,
    pub bl_src: BlendFactor,
    pub bl_dst: BlendFactor,
    pub bl_op: BlendOp,

    pub fog_en: bool,
    pub fog_col: [u8; 3],
    pub fog_tbl: [u8; 64],
}

/// A tile-clear command: write a constant color and depth to every pixel
/// of the 32x32 tile, 2x2 quad at a time.
#[derive(Clone, Copy, Debug)]
pub struct FillCommand {
    pub col_init: [Q8_12; 4],
    pub zow_init: Q12_12,
}

/// What to latch this cycle. The caller is responsible for only issuing
/// a command while [`RasterOutput::busy`] is false, matching `i_en`
/// being gated by `state == WAITING` in hardware.
#[derive(Clone, Copy, Debug, Default)]
pub enum RasterCommand {
    #[default]
    None,
    StartTriangle(TriangleInput),
    Fill(FillCommand),
}

/// What the rasterizer produced this cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct RasterOutput {
    pub busy: bool,
    pub write: Option<QuadWrite>,
}

#[derive(Clone, Copy, Debug, Default)]
enum Stage {
    #[default]
    Idle,
    Setup1 {
        tri: TriangleInput,
    },
    Setup2 {
        tri: TriangleInput,
        geom: Geometry,
    },
    Setup3 {
        tri: TriangleInput,
        geom: Geometry,
    },
    Setup4 {
        tri: TriangleInput,
        geom: Geometry,
    },
    RasterLoop {
        tri: TriangleInput,
        geom: Geometry,
        px: i32,
        py: i32,
    },
    /// One corner at a time, driving the owned [`TexSampler`] until it
    /// acks. `corner` indexes into `active`/`tex_col`/`s`/`t`; corners
    /// where `active[corner]` is false are skipped without consuming an
    /// extra cycle.
    Texturing {
        tri: TriangleInput,
        geom: Geometry,
        px: i32,
        py: i32,
        vtx_col: [Rgba8888; 4],
        active: [bool; 4],
        zow: [Q8_24; 4],
        tex_col: [Rgba8888; 4],
        s: [Q12_12; 4],
        t: [Q12_12; 4],
        ds_dx: Q12_12,
        dt_dx: Q12_12,
        ds_dy: Q12_12,
        dt_dy: Q12_12,
        corner: usize,
    },
    Fill {
        fc: FillCommand,
        idx: u16,
    },
}

/// TriRaster: see module docs.
pub struct TriRaster {
    sampler: TexSampler,
    stage: Stage,
}

impl Default for TriRaster {
    fn default() -> Self {
        Self::new()
    }
}

impl TriRaster {
    #[must_use]
    pub fn new() -> Self {
        Self { sampler: TexSampler::new(), stage: Stage::default() }
    }

    /// `true` once a triangle or fill command has been latched and no
    /// new command may be issued.
    #[must_use]
    pub fn busy(&self) -> bool {
        !matches!(self.stage, Stage::Idle)
    }

    /// Advance one cycle.
    ///
    /// # Errors
    /// Propagates [`BusError::Timeout`] from the texture sampler's bus
    /// traffic during the texturing sub-sequence.
    pub fn tick(
        &mut self,
        cmd: RasterCommand,
        color: &mut impl ColorTarget,
        depth: &mut impl DepthTarget,
        mem: &mut impl Memory,
    ) -> Result<RasterOutput, BusError> {
        match std::mem::take(&mut self.stage) {
            Stage::Idle => Ok(self.tick_idle(cmd)),
            Stage::Setup1 { tri } => {
                let geom = geometry::setup(&tri, TILE_DIM);
                self.stage = Stage::Setup2 { tri, geom };
                Ok(RasterOutput { busy: true, write: None })
            }
            Stage::Setup2 { tri, geom } => {
                self.stage = Stage::Setup3 { tri, geom };
                Ok(RasterOutput { busy: true, write: None })
            }
            Stage::Setup3 { tri, geom } => {
                self.stage = Stage::Setup4 { tri, geom };
                Ok(RasterOutput { busy: true, write: None })
            }
            Stage::Setup4 { tri, geom } => {
                self.stage = Stage::RasterLoop { tri, geom, px: geom.qx0, py: geom.qy0 };
                Ok(RasterOutput { busy: true, write: None })
            }
            Stage::RasterLoop { tri, geom, px, py } => self.tick_raster_loop(tri, geom, px, py, color, depth),
            Stage::Texturing {
                tri,
                geom,
                px,
                py,
                vtx_col,
                active,
                zow,
                tex_col,
                s,
                t,
                ds_dx,
                dt_dx,
                ds_dy,
                dt_dy,
                corner,
            } => self.tick_texturing(
                tri, geom, px, py, vtx_col, active, zow, tex_col, s, t, ds_dx, dt_dx, ds_dy, dt_dy, corner, color,
                depth, mem,
            ),
            Stage::Fill { fc, idx } => Ok(self.tick_fill(fc, idx, color, depth)),
        }
    }

    fn tick_idle(&mut self, cmd: RasterCommand) -> RasterOutput {
        match cmd {
            RasterCommand::None => RasterOutput::default(),
            RasterCommand::StartTriangle(tri) => {
                log::trace!("tri_raster: latching triangle v0={:?} v1={:?} v2={:?}", tri.v0, tri.v1, tri.v2);
                self.stage = Stage::Setup1 { tri };
                RasterOutput { busy: true, write: None }
            }
            RasterCommand::Fill(fc) => {
                log::trace!("tri_raster: latching tile fill");
                self.stage = Stage::Fill { fc, idx: 0 };
                RasterOutput { busy: true, write: None }
            }
        }
    }

    fn tick_raster_loop(
        &mut self,
        tri: TriangleInput,
        geom: Geometry,
        px: i32,
        py: i32,
        color: &mut impl ColorTarget,
        depth: &mut impl DepthTarget,
    ) -> Result<RasterOutput, BusError> {
        if geom.qx0 > geom.qx1 || geom.qy0 > geom.qy1 {
            log::trace!("tri_raster: empty bounding box, skipping raster loop");
            self.stage = Stage::Idle;
            return Ok(RasterOutput { busy: false, write: None });
        }

        let mut active = [false; 4];
        let mut vtx_col = [Rgba8888::TRANSPARENT_BLACK; 4];
        let mut zow = [Q8_24::ZERO; 4];
        for (k, &(kx, ky)) in CORNER_OFFSETS.iter().enumerate() {
            let x = 2 * px + kx;
            let y = 2 * py + ky;
            let (w0, w1, w2) = geometry::edge_weights(&geom, x, y);
            let covered = geometry::is_covered(w0, w1, w2);
            zow[k] = corner_depth(&tri, px, py, kx, ky);
            let stored = depth.read_depth(x as u32, y as u32);
            let pass = tri.dcmp.evaluate(tri.dtest_en, zow[k].raw(), stored.raw());
            active[k] = covered && pass;
            vtx_col[k] = vertex_color(&tri, px, py, kx, ky);
        }

        if tri.tex_en && active.iter().any(|&a| a) {
            let mut s = [Q12_12::ZERO; 4];
            let mut t = [Q12_12::ZERO; 4];
            for (k, &(kx, ky)) in CORNER_OFFSETS.iter().enumerate() {
                let one_ow = interpolate(tri.one_ow_init, tri.one_ow_dx, tri.one_ow_dy, px, py, kx, ky);
                let sow = interpolate(tri.sow_init, tri.sow_dx, tri.sow_dy, px, py, kx, ky);
                let tow = interpolate(tri.tow_init, tri.tow_dx, tri.tow_dy, px, py, kx, ky);
                s[k] = sow.mul_rescale(one_ow);
                t[k] = tow.mul_rescale(one_ow);
            }
            let ds_dx = s[1] - s[0];
            let dt_dx = t[1] - t[0];
            let ds_dy = s[2] - s[0];
            let dt_dy = t[2] - t[0];
            self.stage = Stage::Texturing {
                tri,
                geom,
                px,
                py,
                vtx_col,
                active,
                zow,
                tex_col: [Rgba8888::TRANSPARENT_BLACK; 4],
                s,
                t,
                ds_dx,
                dt_dx,
                ds_dy,
                dt_dy,
                corner: 0,
            };
            return Ok(RasterOutput { busy: true, write: None });
        }

        let write = finish_quad(&tri, px, py, &active, &vtx_col, None, &zow, color, depth);
        self.stage = advance(tri, geom, px, py);
        Ok(RasterOutput { busy: self.busy(), write: Some(write) })
    }

    #[allow(clippy::too_many_arguments)]
    fn tick_texturing(
        &mut self,
        tri: TriangleInput,
        geom: Geometry,
        px: i32,
        py: i32,
        vtx_col: [Rgba8888; 4],
        active: [bool; 4],
        zow: [Q8_24; 4],
        mut tex_col: [Rgba8888; 4],
        s: [Q12_12; 4],
        t: [Q12_12; 4],
        ds_dx: Q12_12,
        dt_dx: Q12_12,
        ds_dy: Q12_12,
        dt_dy: Q12_12,
        mut corner: usize,
        color: &mut impl ColorTarget,
        depth: &mut impl DepthTarget,
        mem: &mut impl Memory,
    ) -> Result<RasterOutput, BusError> {
        while corner < 4 && !active[corner] {
            corner += 1;
        }

        if corner == 4 {
            let write = finish_quad(&tri, px, py, &active, &vtx_col, Some(&tex_col), &zow, color, depth);
            self.stage = advance(tri, geom, px, py);
            return Ok(RasterOutput { busy: self.busy(), write: Some(write) });
        }

        let req = TexSampleRequest {
            stb: true,
            s: s[corner],
            t: t[corner],
            ds_dx,
            dt_dx,
            ds_dy,
            dt_dy,
            tex_adr: tri.tex_adr,
            tex_w: tri.tex_w,
            tex_h: tri.tex_h,
            fmt: tri.tex_fmt,
            clamp_s: tri.clamp_s,
            clamp_t: tri.clamp_t,
            filter_enable: tri.filter_en,
            mip_enable: tri.mip_en,
        };
        let out = self.sampler.tick(req, mem)?;
        if out.ack {
            tex_col[corner] = out.sample;
            corner += 1;
        }
        self.stage = Stage::Texturing {
            tri,
            geom,
            px,
            py,
            vtx_col,
            active,
            zow,
            tex_col,
            s,
            t,
            ds_dx,
            dt_dx,
            ds_dy,
            dt_dy,
            corner,
        };
        Ok(RasterOutput { busy: true, write: None })
    }

    fn tick_fill(
        &mut self,
        fc: FillCommand,
        idx: u16,
        color: &mut impl ColorTarget,
        depth: &mut impl DepthTarget,
    ) -> RasterOutput {
        let px = i32::from(idx) % QUAD_DIM;
        let py = i32::from(idx) / QUAD_DIM;
        let zow = Q8_24::from_raw(fc.zow_init.raw() as u32);
        let fill_color = Rgba8888::new(
            fc.col_init[0].saturate_to_u8(),
            fc.col_init[1].saturate_to_u8(),
            fc.col_init[2].saturate_to_u8(),
            fc.col_init[3].saturate_to_u8(),
        );
        for &(kx, ky) in &CORNER_OFFSETS {
            let x = (2 * px + kx) as u32;
            let y = (2 * py + ky) as u32;
            color.write_pixel(x, y, fill_color);
            depth.write_depth(x, y, zow);
        }
        let write = QuadWrite {
            quad_x: px,
            quad_y: py,
            wr_en: [true; 4],
            color: [fill_color; 4],
            depth: [zow; 4],
        };
        let next_idx = idx + 1;
        self.stage =
            if i32::from(next_idx) >= QUAD_DIM * QUAD_DIM { Stage::Idle } else { Stage::Fill { fc, idx: next_idx } };
        RasterOutput { busy: self.busy(), write: Some(write) }
    }
}

/// Step to the next quad in row-major order, or to `Idle` once the last
/// quad of the bounding box has been written.
fn advance(tri: TriangleInput, geom: Geometry, px: i32, py: i32) -> Stage {
    if px == geom.qx1 && py == geom.qy1 {
        Stage::Idle
    } else if px == geom.qx1 {
        Stage::RasterLoop { tri, geom, px: geom.qx0, py: py + 1 }
    } else {
        Stage::RasterLoop { tri, geom, px: px + 1, py }
    }
}
