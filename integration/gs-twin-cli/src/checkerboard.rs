//! A tiny RGBA4444 block encoder, used only to build the built-in
//! checkerboard demo texture. The exact inverse of
//! `gs-tex-block-decoder`'s `decode_rgba4444`: same bank/offset
//! addressing, same word layout, same nibble truncation.

use gs_twin_core::Rgba8888;

/// In-block `(x, y)` (each `0..4`) addressed by `(bank, offset)`,
/// inverting `bank_offset` from `gs-tex-block-decoder`:
/// `bank = (y&1)<<1 | (x&1)`, `offset = (y>>1)<<1 | (x>>1)`.
fn xy_for(bank: usize, offset: usize) -> (u8, u8) {
    let x = (((offset & 1) << 1) | (bank & 1)) as u8;
    let y = ((((offset >> 1) & 1) << 1) | ((bank >> 1) & 1)) as u8;
    (x, y)
}

/// Pack a texel into RGBA4444 by keeping each channel's high nibble,
/// the inverse of `decode_rgba4444`'s `expand4(nibble) = nibble << 4`.
fn pack4444(c: Rgba8888) -> u16 {
    let r = u16::from(c.r >> 4);
    let g = u16::from(c.g >> 4);
    let b = u16::from(c.b >> 4);
    let a = u16::from(c.a >> 4);
    r | (g << 4) | (b << 8) | (a << 12)
}

/// Encode one 4x4 block's 8 source words from a per-texel color
/// function, in the cache's own bank/offset word order: word `2*offset`
/// packs banks `{0, 1}`, word `2*offset + 1` packs banks `{2, 3}`.
fn encode_block(get: impl Fn(u8, u8) -> Rgba8888) -> [u32; 8] {
    let mut words = [0u32; 8];
    for offset in 0..4usize {
        let (x0, y0) = xy_for(0, offset);
        let (x1, y1) = xy_for(1, offset);
        let (x2, y2) = xy_for(2, offset);
        let (x3, y3) = xy_for(3, offset);
        let low_even = u32::from(pack4444(get(x0, y0)));
        let high_even = u32::from(pack4444(get(x1, y1)));
        let low_odd = u32::from(pack4444(get(x2, y2)));
        let high_odd = u32::from(pack4444(get(x3, y3)));
        words[2 * offset] = low_even | (high_even << 16);
        words[2 * offset + 1] = low_odd | (high_odd << 16);
    }
    words
}

/// Encode an 8x8 RGBA4444 checkerboard (one texel per square) as a flat
/// word buffer, laid out as the 2x2 grid of 4x4 blocks `TexCache`
/// addresses: block `(bx, by)` at word offset `(by*2 + bx) * 8`.
#[must_use]
pub fn encode_8x8(color_a: Rgba8888, color_b: Rgba8888) -> Vec<u32> {
    let texel_at = |gx: u32, gy: u32| if (gx + gy) % 2 == 0 { color_a } else { color_b };
    let mut words = Vec::with_capacity(32);
    for by in 0..2u32 {
        for bx in 0..2u32 {
            let block = encode_block(|lx, ly| texel_at(bx * 4 + u32::from(lx), by * 4 + u32::from(ly)));
            words.extend_from_slice(&block);
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_tex_block_decoder::decode_rgba4444;

    #[test]
    fn encode_block_round_trips_through_the_real_decoder() {
        // Multiples of 0x10 so `pack4444`'s nibble truncation is lossless.
        let a = Rgba8888::new(0x10, 0x20, 0x30, 0xF0);
        let b = Rgba8888::new(0xE0, 0xD0, 0xC0, 0xB0);
        let words = encode_block(|x, y| if (x + y) % 2 == 0 { a } else { b });
        let block = decode_rgba4444(&words);
        for y in 0..4u8 {
            for x in 0..4u8 {
                let expected = if (x + y) % 2 == 0 { a } else { b };
                assert_eq!(block.get(x, y), expected, "mismatch at ({x}, {y})");
            }
        }
    }

    #[test]
    fn encode_8x8_has_one_word_block_per_quadrant() {
        let words = encode_8x8(Rgba8888::WHITE, Rgba8888::OPAQUE_BLACK);
        assert_eq!(words.len(), 32);
    }
}
