//! Bit-accurate Q-format fixed-point types for RTL digital twin modeling.
//!
//! Every type here wraps a native integer (`i32`, `u32`) and tags it with
//! the number of fractional bits at the type level. Arithmetic is defined
//! to match a synchronous hardware datapath: `+`/`-` wrap at the storage
//! width exactly like a Verilog `intbv`, and multiplication always widens
//! to avoid silently losing the high bits of a 32x32 product - the caller
//! picks the rescale shift explicitly with [`Signed::mul_rescale`] /
//! [`Unsigned::mul_rescale`], mirroring the `>> 12` the hardware model
//! writes out by hand at each multiply site.
//!
//! Named aliases are provided for the formats this workspace's components
//! actually use ([`Q8_12`], [`Q12_12`], [`Q24_12`], [`Q8_24`]); reach for
//! [`Signed`]/[`Unsigned`] directly for anything else.

mod signed;
mod unsigned;

pub use signed::Signed;
pub use unsigned::Unsigned;

/// Per-channel color iterator format: signed, 12 fractional bits.
/// Saturates to `[0, 255]` on output (see [`Signed::saturate_to_u8`]).
pub type Q8_12 = Signed<12>;

/// Perspective attribute format (`1/w`, `s/w`, `t/w`): signed, 12
/// fractional bits, wider integer range than [`Q8_12`].
pub type Q12_12 = Signed<12>;

/// Texture coordinate format handed to the sampler: signed, 12
/// fractional bits, widest integer range (24 bits).
pub type Q24_12 = Signed<12>;

/// Depth format: unsigned, 24 fractional bits.
pub type Q8_24 = Unsigned<24>;
