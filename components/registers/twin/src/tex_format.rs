use crate::error::UnknownVariant;

/// Which block decoder a `BlockCache` fill runs. Also determines the
/// block's word size via [`TexFormat::word_shift`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TexFormat {
    /// 16 bpp, two 4-bit texels packed per source word.
    #[default]
    Rgba4444 = 0,
    /// 32 bpp, one texel per source word.
    Rgba8888 = 1,
    /// RGB-only block compression: median color + 8-bit luma scale + 2
    /// bits/texel index.
    NxtcMode0 = 2,
    /// As `NxtcMode0` plus a second block carrying a compressed alpha
    /// channel in the same layout.
    NxtcMode1 = 3,
}

impl TexFormat {
    /// Decode a 2-bit field into a format selector.
    ///
    /// # Errors
    /// Returns an error if `bits` does not match any encoded variant.
    pub const fn from_bits(bits: u8) -> Result<Self, UnknownVariant<u8>> {
        match bits {
            0 => Ok(Self::Rgba4444),
            1 => Ok(Self::Rgba8888),
            2 => Ok(Self::NxtcMode0),
            3 => Ok(Self::NxtcMode1),
            bits => Err(UnknownVariant::new(bits)),
        }
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// `log2` of the block's size in 32-bit words, i.e. the left-shift
    /// that turns a block index into a word address: `(3, 4, 1, 2)` for
    /// `(Rgba4444, Rgba8888, NxtcMode0, NxtcMode1)`.
    #[must_use]
    pub const fn word_shift(self) -> u32 {
        match self {
            Self::Rgba4444 => 3,
            Self::Rgba8888 => 4,
            Self::NxtcMode0 => 1,
            Self::NxtcMode1 => 2,
        }
    }
}
