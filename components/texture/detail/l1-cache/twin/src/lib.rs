//! BlockCache: a read-only cache of a single decoded 4x4 texel block.
//!
//! Mirrors the bus-facing read cache (`memcache.py`'s `MemCache`)
//! generalized from one word per fetch to a whole block, with the block
//! decode folded in as a final step once every source word has arrived.

use gs_registers::TexFormat;
use gs_tex_block_decoder::{decode_block, BlockTexels};
use gs_twin_core::{BusReply, BusRequest, Rgba8888};

/// One cycle's request into a BlockCache: the block this caller wants
/// resident, the sub-position inside it to sample, and whether the
/// request is actually asserted this cycle.
#[derive(Clone, Copy, Debug)]
pub struct BlockRequest {
    pub tag: u32,
    pub fmt: TexFormat,
    pub sx: u8,
    pub sy: u8,
    pub stb: bool,
}

/// A BlockCache's output for one cycle: the sampled 2x2 cluster (valid
/// only when `ack` is set) and the ack itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockCacheOutput {
    pub cluster: [Rgba8888; 4],
    pub ack: bool,
}

#[derive(Clone, Debug, Default)]
enum State {
    #[default]
    Idle,
    Filling { tag: u32, fmt: TexFormat, words: Vec<u32> },
}

/// Caches one decoded 4x4 texel block. Requesting a different block
/// address than the one currently resident invalidates the entry and
/// starts a fill; the fill gathers every source word for the format
/// before decoding the block in a single step (behavior-preserving
/// relative to the hardware's incremental per-word fill, since the
/// hardware also withholds `o_ack` until the block is complete).
#[derive(Clone, Debug, Default)]
pub struct BlockCache {
    texels: BlockTexels,
    tag: u32,
    valid: bool,
    state: State,
}

impl BlockCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// This cycle's request to the backing bus, if the cache is
    /// mid-fill. Must be read (and routed through the arbiter) before
    /// calling [`BlockCache::tick`] with that cycle's reply.
    #[must_use]
    pub fn mem_request(&self) -> Option<BusRequest> {
        match &self.state {
            State::Idle => None,
            State::Filling { tag, words, .. } => {
                Some(BusRequest::read(tag + words.len() as u32))
            }
        }
    }

    /// Advance one cycle. `mem_reply` must be the arbiter's reply to the
    /// address [`BlockCache::mem_request`] returned for this same cycle
    /// (or a default reply if `mem_request` returned `None`).
    pub fn tick(&mut self, request: BlockRequest, mem_reply: BusReply) -> BlockCacheOutput {
        let ack = request.stb && self.valid && self.tag == request.tag;
        let cluster = self.texels.sample_cluster(request.sx, request.sy);

        match &mut self.state {
            State::Idle => {
                if request.stb && (!self.valid || self.tag != request.tag) {
                    self.state = State::Filling { tag: request.tag, fmt: request.fmt, words: Vec::new() };
                }
            }
            State::Filling { tag, fmt, words } => {
                if mem_reply.ack {
                    words.push(mem_reply.data);
                    let block_words = 1usize << fmt.word_shift();
                    if words.len() == block_words {
                        self.texels = decode_block(*fmt, words);
                        self.tag = *tag;
                        self.valid = true;
                        self.state = State::Idle;
                    }
                }
            }
        }

        BlockCacheOutput { cluster, ack }
    }
}
