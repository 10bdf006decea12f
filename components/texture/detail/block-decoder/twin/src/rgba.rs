use gs_twin_core::Rgba8888;

use crate::block_texels::BlockTexels;

/// Expand a 4-bit nibble to 8 bits by replicating it into the high
/// nibble, the way the hardware's `n << 4` does (not a full bit-replicate
/// - the low nibble stays zero).
const fn expand4(nibble: u32) -> u8 {
    ((nibble & 0xF) << 4) as u8
}

/// Decode an RGBA4444 block: 8 source words, each packing two texels
/// (low 16 bits = first texel, high 16 bits = second), channel order
/// R,G,B,A from least to most significant nibble.
#[must_use]
pub fn decode_rgba4444(words: &[u32; 8]) -> BlockTexels {
    let mut block = BlockTexels::default();
    for (word_idx, &word) in words.iter().enumerate() {
        let bank0 = (word_idx & 1) << 1;
        let offset = word_idx >> 1;

        let texel = |half: u32| {
            Rgba8888::new(
                expand4(half),
                expand4(half >> 4),
                expand4(half >> 8),
                expand4(half >> 12),
            )
        };
        block.set_bank_offset(bank0, offset, texel(word & 0xFFFF));
        block.set_bank_offset(bank0 + 1, offset, texel(word >> 16));
    }
    block
}

/// Decode an RGBA8888 block: 16 source words, one texel each, already in
/// packed `Rgba8888::to_u32` word order. Source words arrive in the
/// cache's own bank/offset order (`bank = i & 3`, `offset = i >> 2`),
/// the same Morton addressing the NXTC index word uses.
#[must_use]
pub fn decode_rgba8888(words: &[u32; 16]) -> BlockTexels {
    let mut block = BlockTexels::default();
    for (i, &word) in words.iter().enumerate() {
        block.set_bank_offset(i & 3, i >> 2, Rgba8888::from_u32(word));
    }
    block
}
