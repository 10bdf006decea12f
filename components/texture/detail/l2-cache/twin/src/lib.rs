//! TexCache: an 8x8 grid of [`BlockCache`]s covering a 32x32 texel
//! window, fanning their memory ports into a single [`BusArbiter`].

use gs_memory::BusArbiter;
use gs_registers::TexFormat;
use gs_tex_l1_cache::{BlockCache, BlockRequest};
use gs_twin_core::Rgba8888;

/// Blocks per side of the cached window; block size is fixed at 4x4
/// texels, so this covers a 32x32 texel area.
const BLOCKS_WIDE: u32 = 8;
const BLOCKS_HIGH: u32 = 8;
const TOTAL_BLOCKS: usize = (BLOCKS_WIDE * BLOCKS_HIGH) as usize;

/// One cycle's texture sample request: a 2x2 cluster at texel
/// coordinates `(sx, sy)`, already masked or clamped into
/// `[0, (1<<tex_w)-1] x [0, (1<<tex_h)-1]` by the caller.
#[derive(Clone, Copy, Debug)]
pub struct TexCacheRequest {
    pub tex_adr: u32,
    pub tex_w: u32,
    pub tex_h: u32,
    pub fmt: TexFormat,
    pub sx: u32,
    pub sy: u32,
    pub stb: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TexCacheOutput {
    pub cluster: [Rgba8888; 4],
    pub ack: bool,
}

/// 8x8 grid of decoded-block caches sharing one external memory port.
pub struct TexCache {
    slots: Vec<BlockCache>,
    arbiter: BusArbiter<TOTAL_BLOCKS>,
}

impl Default for TexCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TexCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: (0..TOTAL_BLOCKS).map(|_| BlockCache::new()).collect(),
            arbiter: BusArbiter::new(),
        }
    }

    fn slot_index(bx: u32, by: u32) -> usize {
        ((by & (BLOCKS_HIGH - 1)) * BLOCKS_WIDE + (bx & (BLOCKS_WIDE - 1))) as usize
    }

    /// Advance one cycle.
    ///
    /// # Errors
    /// Propagates [`gs_memory::BusError::Timeout`] from the internal
    /// arbiter if a slot holds the grant without ever being acked.
    pub fn tick(
        &mut self,
        request: TexCacheRequest,
        mem: &mut impl gs_memory::Memory,
    ) -> Result<TexCacheOutput, gs_memory::BusError> {
        if !request.stb {
            let mem_requests: Vec<_> = self.slots.iter().map(BlockCache::mem_request).collect();
            let mem_requests: [_; TOTAL_BLOCKS] = mem_requests.try_into().unwrap();
            let replies = self.arbiter.tick(&mem_requests, mem)?;
            for (slot, reply) in self.slots.iter_mut().zip(replies) {
                let idle = BlockRequest { tag: 0, fmt: TexFormat::Rgba8888, sx: 0, sy: 0, stb: false };
                slot.tick(idle, reply);
            }
            return Ok(TexCacheOutput::default());
        }

        let mask_w = (1u32 << request.tex_w) - 1;
        let mask_h = (1u32 << request.tex_h) - 1;
        let sx1 = (request.sx + 1) & mask_w;
        let sy1 = (request.sy + 1) & mask_h;

        // Corner order must match BlockCache::sample_cluster's
        // (sx,sy),(sx+1,sy),(sx,sy+1),(sx+1,sy+1) layout.
        let corners = [(request.sx, request.sy), (sx1, request.sy), (request.sx, sy1), (sx1, sy1)];
        let sub_x = (request.sx & 3) as u8;
        let sub_y = (request.sy & 3) as u8;
        let block_shift = request.fmt.word_shift();

        let mut slot_request = vec![None; TOTAL_BLOCKS];
        let mut corner_slot = [0usize; 4];
        for (k, &(cx, cy)) in corners.iter().enumerate() {
            let bx = cx >> 2;
            let by = cy >> 2;
            let slot = Self::slot_index(bx, by);
            corner_slot[k] = slot;
            let blocks_wide_full: u64 = 1u64 << (request.tex_w.saturating_sub(2));
            let tag = request.tex_adr
                + ((u64::from(by) * blocks_wide_full + u64::from(bx)) << u64::from(block_shift)) as u32;
            slot_request[slot] = Some(BlockRequest { tag, fmt: request.fmt, sx: sub_x, sy: sub_y, stb: true });
        }

        let mut requests = Vec::with_capacity(TOTAL_BLOCKS);
        let mut block_requests = Vec::with_capacity(TOTAL_BLOCKS);
        for (i, slot) in self.slots.iter().enumerate() {
            let mem_req = slot.mem_request();
            requests.push(mem_req);
            let block_req = slot_request[i]
                .unwrap_or(BlockRequest { tag: 0, fmt: request.fmt, sx: 0, sy: 0, stb: false });
            block_requests.push(block_req);
        }
        let requests: [_; TOTAL_BLOCKS] = requests.try_into().unwrap();
        let replies = self.arbiter.tick(&requests, mem)?;

        let mut outputs = Vec::with_capacity(TOTAL_BLOCKS);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            outputs.push(slot.tick(block_requests[i], replies[i]));
        }

        let mut cluster = [Rgba8888::TRANSPARENT_BLACK; 4];
        let mut ack = true;
        for (k, &slot) in corner_slot.iter().enumerate() {
            cluster[k] = outputs[slot].cluster[k];
            ack &= outputs[slot].ack;
        }

        Ok(TexCacheOutput { cluster, ack })
    }
}
