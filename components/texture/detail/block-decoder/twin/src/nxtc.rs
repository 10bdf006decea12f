use gs_twin_core::Rgba8888;

use crate::block_texels::BlockTexels;

/// Resolve a 2-bit NXTC index into a signed luma offset. Bit 0 selects
/// the sign, bit 1 selects the magnitude: `00 -> -scale/2`,
/// `01 -> +scale/2`, `10 -> -scale`, `11 -> +scale` - the canonical
/// `(-1/2, +1/2, -1, +1)` table, applied identically to the RGB block
/// and the Mode 1 alpha block.
#[must_use]
fn luma_offset(idx: u8, luma_scale: u8) -> i32 {
    let magnitude = if idx & 0b10 != 0 {
        i32::from(luma_scale)
    } else {
        i32::from(luma_scale) >> 1
    };
    if idx & 0b01 != 0 {
        magnitude
    } else {
        -magnitude
    }
}

#[must_use]
fn saturate(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Extract the 2-bit index for Morton-ordered texel `i` (`0..16`) from a
/// packed index word.
#[must_use]
const fn texel_index(indices: u32, i: u32) -> u8 {
    ((indices >> (i * 2)) & 0b11) as u8
}

/// Decode an NXTC Mode 0 block: `words[0]` bits `[23:0]` are the median
/// RGB (R in the low byte), bits `[31:24]` the luma scale; `words[1]` is
/// the packed per-texel 2-bit index, Morton-ordered to match the cache's
/// own bank/offset addressing.
#[must_use]
pub fn decode_nxtc_mode0(words: &[u32; 2]) -> BlockTexels {
    let mut block = BlockTexels::default();
    let median = words[0];
    let (mr, mg, mb) = (median as u8, (median >> 8) as u8, (median >> 16) as u8);
    let luma_scale = (median >> 24) as u8;
    let indices = words[1];

    for i in 0..16u32 {
        let idx = texel_index(indices, i);
        let offset = luma_offset(idx, luma_scale);
        let texel = Rgba8888::new(
            saturate(i32::from(mr) + offset),
            saturate(i32::from(mg) + offset),
            saturate(i32::from(mb) + offset),
            255,
        );
        block.set_bank_offset((i & 3) as usize, (i >> 2) as usize, texel);
    }
    block
}

/// Decode an NXTC Mode 1 block: the first two words are an RGB block
/// exactly as Mode 0; the remaining two words carry a single-channel
/// alpha block in the same median+scale+index layout (`words[2]` bits
/// `[7:0]` median alpha, bits `[31:24]` luma scale, `words[3]` indices).
#[must_use]
pub fn decode_nxtc_mode1(words: &[u32; 4]) -> BlockTexels {
    let mut block = decode_nxtc_mode0(&[words[0], words[1]]);

    let median_a = words[2] as u8;
    let luma_scale_a = (words[2] >> 24) as u8;
    let indices_a = words[3];

    for i in 0..16u32 {
        let idx = texel_index(indices_a, i);
        let offset = luma_offset(idx, luma_scale_a);
        let a = saturate(i32::from(median_a) + offset);
        let (bank, offset_idx) = ((i & 3) as usize, (i >> 2) as usize);
        let rgb = block.get_bank_offset(bank, offset_idx);
        block.set_bank_offset(bank, offset_idx, Rgba8888::new(rgb.r, rgb.g, rgb.b, a));
    }
    block
}
