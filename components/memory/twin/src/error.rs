/// Simulator-only safety net absent from the hardware description: the
/// design itself never times out a stalled transaction, but a software
/// port can't afford to spin forever waiting on a slave that never acks.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    #[error("port {port} held the bus grant for {cycles} cycles without an ack")]
    Timeout { port: usize, cycles: u32 },
}
