//! GsTwin: the transaction-level digital twin of the pico-gs triangle
//! rasterizer tile. Owns the 32x32 color and depth planes and a
//! [`TriRaster`], and drives the external per-triangle/per-fill command
//! protocol one tick at a time.
//!
//! Texture memory is a separate, bus-attached address space - the tile's
//! own color/depth planes are dedicated ports, never multiplexed onto
//! the shared bus `TriRaster`'s owned `TexSampler`/`TexCache`/
//! `BusArbiter` chain arbitrates. Callers supply that memory to every
//! tick, matching `TriRaster::tick`'s own signature.

mod buffer;

pub use buffer::{ColorBuffer, DepthBuffer, TILE_DIM};
pub use gs_rasterizer::{FillCommand, QuadWrite, RasterCommand, RasterOutput, TriangleInput};

use gs_memory::{BusError, Memory};
use gs_rasterizer::TriRaster;

/// Upper bound on ticks a single `StartTriangle`/`Fill` command may take
/// to drain before [`GsTwin::draw_triangle`]/[`GsTwin::fill`] give up.
/// Not a hardware concept - the real pipeline has no notion of giving up
/// on a command - but a simulator-only guard against an infinite loop
/// should a future bug leave the rasterizer permanently busy. One tile's
/// fill command alone costs exactly 256 ticks plus four setup ticks, so
/// this is generous headroom above any legitimate single-triangle cost.
const DRAIN_WATCHDOG_TICKS: u32 = 1 << 16;

/// Errors surfaced by the convenience run-to-completion helpers. Calling
/// [`GsTwin::tick`] directly only ever surfaces [`BusError`].
#[derive(Debug, thiserror::Error)]
pub enum GsTwinError {
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error("rasterizer did not return to idle within {0} ticks")]
    Stalled(u32),
}

/// The digital twin of one 32x32 rasterizer tile.
pub struct GsTwin {
    raster: TriRaster,
    color: ColorBuffer,
    depth: DepthBuffer,
}

impl Default for GsTwin {
    fn default() -> Self {
        Self::new()
    }
}

impl GsTwin {
    #[must_use]
    pub fn new() -> Self {
        Self { raster: TriRaster::new(), color: ColorBuffer::new(), depth: DepthBuffer::new() }
    }

    #[must_use]
    pub fn color(&self) -> &ColorBuffer {
        &self.color
    }

    #[must_use]
    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// `true` once a command is latched and no new one may be issued.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.raster.busy()
    }

    /// Advance the twin by one tick, matching `TriRaster::tick`'s
    /// `i_en`-gated external interface: issuing a command while
    /// [`GsTwin::busy`] is true is the caller's error, not this
    /// method's - it simply latches whatever the rasterizer is already
    /// mid-sequence on.
    ///
    /// # Errors
    /// Propagates [`BusError::Timeout`] from texture bus traffic.
    pub fn tick(&mut self, cmd: RasterCommand, mem: &mut impl Memory) -> Result<RasterOutput, BusError> {
        self.raster.tick(cmd, &mut self.color, &mut self.depth, mem)
    }

    /// Latch a triangle and run it to completion, returning every quad
    /// written along the way.
    ///
    /// # Errors
    /// [`GsTwinError::Bus`] on texture bus timeout, [`GsTwinError::Stalled`]
    /// if the rasterizer fails to return to idle within
    /// [`DRAIN_WATCHDOG_TICKS`].
    pub fn draw_triangle(&mut self, tri: TriangleInput, mem: &mut impl Memory) -> Result<Vec<QuadWrite>, GsTwinError> {
        self.run_to_completion(RasterCommand::StartTriangle(tri), mem)
    }

    /// Latch a tile fill and run it to completion.
    ///
    /// # Errors
    /// See [`GsTwin::draw_triangle`].
    pub fn fill(&mut self, fc: FillCommand, mem: &mut impl Memory) -> Result<Vec<QuadWrite>, GsTwinError> {
        self.run_to_completion(RasterCommand::Fill(fc), mem)
    }

    fn run_to_completion(
        &mut self,
        cmd: RasterCommand,
        mem: &mut impl Memory,
    ) -> Result<Vec<QuadWrite>, GsTwinError> {
        let mut writes = Vec::new();
        let mut out = self.tick(cmd, mem)?;
        if let Some(w) = out.write {
            writes.push(w);
        }
        for ticks in 0..DRAIN_WATCHDOG_TICKS {
            if !out.busy {
                log::trace!("gs_twin: command drained after {ticks} ticks, {} quads written", writes.len());
                return Ok(writes);
            }
            out = self.tick(RasterCommand::None, mem)?;
            if let Some(w) = out.write {
                writes.push(w);
            }
        }
        log::warn!("gs_twin: rasterizer still busy after {DRAIN_WATCHDOG_TICKS} ticks, giving up");
        Err(GsTwinError::Stalled(DRAIN_WATCHDOG_TICKS))
    }
}
