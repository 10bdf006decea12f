//! Per-format texture block decompressors.
//!
//! A block is always 4x4 texels; only its encoding varies. [`decode_block`]
//! takes the raw words a [`BlockCache`](../gs_tex_l1_cache) fill has
//! gathered from memory and returns a fully decoded [`BlockTexels`],
//! dispatching on [`TexFormat`]. Each format's word count is fixed by
//! `TexFormat::word_shift` (`2^shift` 32-bit words per block).

mod block_texels;
mod nxtc;
mod rgba;

pub use block_texels::{bank_offset, BlockTexels};
pub use nxtc::{decode_nxtc_mode0, decode_nxtc_mode1};
pub use rgba::{decode_rgba4444, decode_rgba8888};

use gs_registers::TexFormat;

/// Decode a block's raw words according to `fmt`. `words` must hold
/// exactly `1 << fmt.word_shift()` entries; a caller that gathers words
/// per [`TexFormat::word_shift`] will always satisfy this.
///
/// # Panics
///
/// Panics if `words.len()` does not match the format's expected word
/// count - a BlockCache bug, not a runtime condition.
#[must_use]
pub fn decode_block(fmt: TexFormat, words: &[u32]) -> BlockTexels {
    match fmt {
        TexFormat::Rgba4444 => decode_rgba4444(words.try_into().expect("RGBA4444 block is 8 words")),
        TexFormat::Rgba8888 => decode_rgba8888(words.try_into().expect("RGBA8888 block is 16 words")),
        TexFormat::NxtcMode0 => decode_nxtc_mode0(words.try_into().expect("NXTC Mode 0 block is 2 words")),
        TexFormat::NxtcMode1 => decode_nxtc_mode1(words.try_into().expect("NXTC Mode 1 block is 4 words")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_matches_format_shift() {
        for fmt in [
            TexFormat::Rgba4444,
            TexFormat::Rgba8888,
            TexFormat::NxtcMode0,
            TexFormat::NxtcMode1,
        ] {
            let words = vec![0u32; 1usize << fmt.word_shift()];
            let _ = decode_block(fmt, &words);
        }
    }

    #[test]
    #[should_panic]
    fn wrong_word_count_panics() {
        let _ = decode_block(TexFormat::Rgba8888, &[0u32; 3]);
    }
}
