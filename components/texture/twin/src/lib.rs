//! TexSampler: wires ST-to-cache-coordinate conversion, the block
//! cache grid, and the bilinear filter into one texel sampling unit.
//!
//! Mirrors `texsample.py`'s top-level module: a request latches once
//! on `stb`, the cache may take several cycles to fill a missing
//! block, and the filter then spends 0 (nearest) or 2 (bilinear)
//! further cycles before the final ack.

use gs_memory::{BusError, Memory};
use gs_registers::TexFormat;
use gs_tex_bilinear_filter::{BilinearFilter, FilterRequest};
use gs_tex_l2_cache::{TexCache, TexCacheRequest};
use gs_tex_uv_coord::{sample_position, UvCoordRequest};
use gs_twin_core::Rgba8888;
use qfixed::Q24_12;

/// One cycle's sample request. `mip_enable` selects a mip level only
/// for the effective addressing mask it produces - mipmap chain
/// generation/storage is out of scope, so every level samples the same
/// resident texture image.
#[derive(Clone, Copy, Debug)]
pub struct TexSampleRequest {
    pub stb: bool,
    pub s: Q24_12,
    pub t: Q24_12,
    pub ds_dx: Q24_12,
    pub dt_dx: Q24_12,
    pub ds_dy: Q24_12,
    pub dt_dy: Q24_12,
    pub tex_adr: u32,
    pub tex_w: u32,
    pub tex_h: u32,
    pub fmt: TexFormat,
    pub clamp_s: bool,
    pub clamp_t: bool,
    pub filter_enable: bool,
    pub mip_enable: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TexSampleOutput {
    pub sample: Rgba8888,
    pub ack: bool,
}

#[derive(Clone, Copy, Debug, Default)]
enum Stage {
    #[default]
    Idle,
    /// Cache request latched and re-asserted every cycle until it acks.
    WaitingOnCache { cache_req: CacheReqFields, filter_enable: bool, px: u16, py: u16 },
    /// Cache has delivered its cluster; the bilinear filter is running
    /// (or already produced its nearest-path result on entry).
    Filtering,
}

#[derive(Clone, Copy, Debug, Default)]
struct CacheReqFields {
    tex_adr: u32,
    tex_w: u32,
    tex_h: u32,
    fmt: TexFormat,
    sx: u32,
    sy: u32,
}

/// TexSampler: see module docs.
pub struct TexSampler {
    cache: TexCache,
    filter: BilinearFilter,
    stage: Stage,
}

impl Default for TexSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl TexSampler {
    #[must_use]
    pub fn new() -> Self {
        Self { cache: TexCache::new(), filter: BilinearFilter::new(), stage: Stage::default() }
    }

    /// Advance one cycle.
    ///
    /// # Errors
    /// Propagates [`BusError::Timeout`] from the underlying cache grid.
    pub fn tick(
        &mut self,
        req: TexSampleRequest,
        mem: &mut impl Memory,
    ) -> Result<TexSampleOutput, BusError> {
        match self.stage {
            Stage::Idle => {
                if !req.stb {
                    let idle = TexCacheRequest {
                        tex_adr: 0,
                        tex_w: 0,
                        tex_h: 0,
                        fmt: TexFormat::Rgba4444,
                        sx: 0,
                        sy: 0,
                        stb: false,
                    };
                    self.cache.tick(idle, mem)?;
                    return Ok(TexSampleOutput::default());
                }

                let uv = sample_position(&UvCoordRequest {
                    s: req.s,
                    t: req.t,
                    ds_dx: req.ds_dx,
                    dt_dx: req.dt_dx,
                    ds_dy: req.ds_dy,
                    dt_dy: req.dt_dy,
                    tex_w: req.tex_w,
                    tex_h: req.tex_h,
                    clamp_s: req.clamp_s,
                    clamp_t: req.clamp_t,
                    mip_enable: req.mip_enable,
                });
                let eff_w = req.tex_w.saturating_sub(uv.mip);
                let eff_h = req.tex_h.saturating_sub(uv.mip);
                let cache_req =
                    CacheReqFields { tex_adr: req.tex_adr, tex_w: eff_w, tex_h: eff_h, fmt: req.fmt, sx: uv.sx, sy: uv.sy };

                let out = self.cache.tick(
                    TexCacheRequest {
                        tex_adr: cache_req.tex_adr,
                        tex_w: cache_req.tex_w,
                        tex_h: cache_req.tex_h,
                        fmt: cache_req.fmt,
                        sx: cache_req.sx,
                        sy: cache_req.sy,
                        stb: true,
                    },
                    mem,
                )?;

                if out.ack {
                    let filter_out = self.filter.tick(FilterRequest {
                        stb: true,
                        cache_ack: true,
                        cluster: out.cluster,
                        px: uv.px,
                        py: uv.py,
                        filter_enable: req.filter_enable,
                    });
                    self.stage = if filter_out.ack { Stage::Idle } else { Stage::Filtering };
                    Ok(TexSampleOutput { sample: filter_out.sample, ack: filter_out.ack })
                } else {
                    self.stage = Stage::WaitingOnCache {
                        cache_req,
                        filter_enable: req.filter_enable,
                        px: uv.px,
                        py: uv.py,
                    };
                    Ok(TexSampleOutput::default())
                }
            }
            Stage::WaitingOnCache { cache_req, filter_enable, px, py } => {
                let out = self.cache.tick(
                    TexCacheRequest {
                        tex_adr: cache_req.tex_adr,
                        tex_w: cache_req.tex_w,
                        tex_h: cache_req.tex_h,
                        fmt: cache_req.fmt,
                        sx: cache_req.sx,
                        sy: cache_req.sy,
                        stb: true,
                    },
                    mem,
                )?;
                if out.ack {
                    let filter_out = self.filter.tick(FilterRequest {
                        stb: true,
                        cache_ack: true,
                        cluster: out.cluster,
                        px,
                        py,
                        filter_enable,
                    });
                    self.stage = if filter_out.ack { Stage::Idle } else { Stage::Filtering };
                    Ok(TexSampleOutput { sample: filter_out.sample, ack: filter_out.ack })
                } else {
                    Ok(TexSampleOutput::default())
                }
            }
            Stage::Filtering => {
                let idle = FilterRequest {
                    stb: false,
                    cache_ack: false,
                    cluster: [Rgba8888::TRANSPARENT_BLACK; 4],
                    px: 0,
                    py: 0,
                    filter_enable: false,
                };
                let filter_out = self.filter.tick(idle);
                if filter_out.ack {
                    self.stage = Stage::Idle;
                }
                Ok(TexSampleOutput { sample: filter_out.sample, ack: filter_out.ack })
            }
        }
    }
}
