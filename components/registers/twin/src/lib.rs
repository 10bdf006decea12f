//! Hand-written configuration enums for the rasterizer and texture
//! pipeline: texture block format, depth compare mode, and the blend
//! factor/op pair. Each mirrors the `from_bits`/`bits` accessor shape of
//! a register field, but unlike a SystemRDL-generated register file
//! these are a small, stable, hand-maintained set.

mod blend_factor;
mod blend_op;
mod depth_compare;
mod error;
mod tex_format;

pub use blend_factor::{BlendFactor, INVALID_BLEND_FACTOR_FALLBACK};
pub use blend_op::BlendOp;
pub use depth_compare::DepthCompare;
pub use error::UnknownVariant;
pub use tex_format::TexFormat;
