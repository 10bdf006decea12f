/// One port's memory request for a single cycle, as driven onto the
/// arbiter's fan-in. `addr` is a 32-bit word address, matching the
/// original bus which addresses backing memory in 32-bit words rather
/// than bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusRequest {
    pub addr: u32,
    pub we: bool,
    pub wdata: u32,
}

impl BusRequest {
    #[must_use]
    pub const fn read(addr: u32) -> Self {
        Self { addr, we: false, wdata: 0 }
    }

    #[must_use]
    pub const fn write(addr: u32, wdata: u32) -> Self {
        Self { addr, we: true, wdata }
    }
}

/// The arbiter's reply to a single port for one cycle. Only the port
/// holding the grant ever observes `ack = true`; every other port sees
/// `ack = false` regardless of whether it has an outstanding request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BusReply {
    pub ack: bool,
    pub data: u32,
}

/// Which port currently holds the bus grant, if any. Exposed mainly for
/// tests that assert on arbitration fairness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusGrant {
    pub port: usize,
}
