use crate::error::UnknownVariant;

/// One operand of the alpha-blend stage. Ten factors, matching the
/// hardware's closed set; each resolves to a per-channel multiplier in
/// `[0, 255]` computed from the source or destination color.
///
/// Numbering follows the worked blend example (src factor 3 = SrcAlpha,
/// dst factor 7 = OneMinusSrcAlpha): the four direct color/alpha factors
/// come first, then their four complements in the same order.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero = 0,
    One = 1,
    SrcColor = 2,
    SrcAlpha = 3,
    DstColor = 4,
    DstAlpha = 5,
    OneMinusSrcColor = 6,
    OneMinusSrcAlpha = 7,
    OneMinusDstColor = 8,
    OneMinusDstAlpha = 9,
}

impl BlendFactor {
    /// Decode a 4-bit field into a blend factor selector.
    ///
    /// # Errors
    /// Returns an error if `bits` is not one of the ten encoded variants.
    pub const fn from_bits(bits: u8) -> Result<Self, UnknownVariant<u8>> {
        match bits {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            2 => Ok(Self::SrcColor),
            3 => Ok(Self::SrcAlpha),
            4 => Ok(Self::DstColor),
            5 => Ok(Self::DstAlpha),
            6 => Ok(Self::OneMinusSrcColor),
            7 => Ok(Self::OneMinusSrcAlpha),
            8 => Ok(Self::OneMinusDstColor),
            9 => Ok(Self::OneMinusDstAlpha),
            bits => Err(UnknownVariant::new(bits)),
        }
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Resolve this factor's per-channel multiplier given one fragment's
    /// (`src`) and the framebuffer's (`dst`) R/G/B/A bytes. `channel` picks
    /// which of the three color channels `SrcColor`/`DstColor` read; the
    /// alpha-derived factors broadcast `src.a`/`dst.a` to every channel.
    #[must_use]
    pub fn multiplier(self, channel: usize, src: [u8; 4], dst: [u8; 4]) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 255,
            Self::SrcColor => src[channel],
            Self::OneMinusSrcColor => 255 - src[channel],
            Self::DstColor => dst[channel],
            Self::OneMinusDstColor => 255 - dst[channel],
            Self::SrcAlpha => src[3],
            Self::OneMinusSrcAlpha => 255 - src[3],
            Self::DstAlpha => dst[3],
            Self::OneMinusDstAlpha => 255 - dst[3],
        }
    }
}

/// Invalid blend factor codes (outside `0..=9`) resolve to opaque black,
/// per the configuration-error handling rule: the fragment pipeline
/// refuses to guess and instead produces an obviously-wrong, easily
/// spotted color.
pub const INVALID_BLEND_FACTOR_FALLBACK: [u8; 4] = [0, 0, 0, 255];
