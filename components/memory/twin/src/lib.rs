//! The bus arbiter and backing memory model shared by every cache level
//! in the texture pipeline.

mod arbiter;
mod error;
mod memory;

pub use arbiter::{BusArbiter, BUS_WATCHDOG_CYCLES};
pub use error::BusError;
pub use memory::{Memory, VecMemory};
