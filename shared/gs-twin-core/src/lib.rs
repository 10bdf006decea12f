//! Shared types used across the pico-gs digital twin component crates:
//! the packed color representation, the framebuffer-facing traits the
//! integration crate implements, and the bus request/reply shapes the
//! arbiter and its clients pass back and forth.
//!
//! Components are modeled the way the original hardware description
//! evaluates a clock edge: every `tick`-style method on a component
//! computes its next state purely from its current state and this
//! cycle's inputs, then commits that next state in one assignment at the
//! end of the call - the same discipline a synchronous `always` block
//! gets for free by construction.

mod bus;
mod color;
mod framebuffer;

pub use bus::{BusGrant, BusReply, BusRequest};
pub use color::Rgba8888;
pub use framebuffer::{ColorTarget, DepthTarget};

pub use qfixed::{Q12_12, Q24_12, Q8_12, Q8_24};
