use gs_twin_core::{BusReply, BusRequest};

use crate::error::BusError;
use crate::memory::Memory;

/// Ticks without an ack before a held grant is treated as a stalled
/// transaction. The hardware has no such limit; this is the
/// simulator-only watchdog the error handling design explicitly allows.
pub const BUS_WATCHDOG_CYCLES: u32 = 4096;

/// Priority bus arbiter: `N` requesting ports share one [`Memory`] port.
/// The lowest-indexed port with a pending request wins the grant and
/// holds it until its request is acknowledged.
///
/// Grant acquisition costs one dead cycle: the cycle a port wins
/// arbitration, its request has not yet reached the memory port (the
/// comb-forwarding path reads the *current* grant register, which still
/// reflects the previous winner); forwarding - and the possibility of an
/// ack - starts the cycle after.
#[derive(Clone, Copy, Debug)]
pub struct BusArbiter<const N: usize> {
    active_grant: usize,
    is_active: bool,
    stall_cycles: u32,
}

impl<const N: usize> Default for BusArbiter<N> {
    fn default() -> Self {
        Self { active_grant: 0, is_active: false, stall_cycles: 0 }
    }
}

impl<const N: usize> BusArbiter<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Which port currently holds the grant, if any.
    #[must_use]
    pub fn active_grant(&self) -> Option<usize> {
        self.is_active.then_some(self.active_grant)
    }

    /// Advance one cycle. `requests[i]` is `Some` iff port `i` has its
    /// `stb` line asserted this cycle.
    ///
    /// # Errors
    /// Returns [`BusError::Timeout`] if the currently granted port has
    /// gone [`BUS_WATCHDOG_CYCLES`] cycles without an ack.
    pub fn tick(
        &mut self,
        requests: &[Option<BusRequest>; N],
        mem: &mut impl Memory,
    ) -> Result<[BusReply; N], BusError> {
        let mut replies = [BusReply::default(); N];

        let was_active = self.is_active;
        let forwarded = was_active.then(|| requests[self.active_grant]).flatten();

        let acked = if let Some(req) = forwarded {
            let data = if req.we {
                mem.write(req.addr, req.wdata);
                0
            } else {
                mem.read(req.addr)
            };
            replies[self.active_grant] = BusReply { ack: true, data };
            true
        } else {
            false
        };

        if !was_active {
            if let Some(port) = (0..N).find(|&i| requests[i].is_some()) {
                log::trace!("bus arbiter: granting port {port}");
                self.active_grant = port;
                self.is_active = true;
                self.stall_cycles = 0;
            }
        } else if acked {
            self.is_active = false;
            self.stall_cycles = 0;
        } else {
            self.stall_cycles += 1;
            if self.stall_cycles >= BUS_WATCHDOG_CYCLES {
                return Err(BusError::Timeout {
                    port: self.active_grant,
                    cycles: self.stall_cycles,
                });
            }
        }

        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::VecMemory;

    #[test]
    fn lowest_index_wins_on_simultaneous_request() {
        let mut arb = BusArbiter::<2>::new();
        let mut mem = VecMemory::new(4);
        let requests = [Some(BusRequest::read(0)), Some(BusRequest::read(1))];

        arb.tick(&requests, &mut mem).unwrap();
        assert_eq!(arb.active_grant(), Some(0));
    }

    #[test]
    fn grant_forwards_only_once_active_and_releases_on_ack() {
        let mut arb = BusArbiter::<1>::new();
        let mut mem = VecMemory::from_words(vec![0xAAAA_5555]);
        let requests = [Some(BusRequest::read(0))];

        let replies = arb.tick(&requests, &mut mem).unwrap();
        assert!(!replies[0].ack, "grant cycle itself must not forward yet");

        let replies = arb.tick(&requests, &mut mem).unwrap();
        assert!(replies[0].ack);
        assert_eq!(replies[0].data, 0xAAAA_5555);
        assert_eq!(arb.active_grant(), None, "grant releases the cycle it acks");
    }

    #[test]
    fn at_most_one_master_granted_per_tick() {
        let mut arb = BusArbiter::<3>::new();
        let mut mem = VecMemory::new(4);
        let requests = [
            Some(BusRequest::read(0)),
            Some(BusRequest::read(1)),
            Some(BusRequest::read(2)),
        ];
        arb.tick(&requests, &mut mem).unwrap();
        let grants: Vec<_> = (0..3).filter(|_| arb.active_grant().is_some()).collect();
        assert_eq!(grants.len(), 1);
    }

    #[test]
    fn port_holding_grant_without_reasserting_stb_times_out() {
        // Port 0 wins the grant on tick 1, then drops `stb` without ever
        // getting an ack - a misbehaving client hogging the bus, which
        // the arbiter makes no attempt to prevent on its own.
        let mut arb = BusArbiter::<1>::new();
        let mut mem = VecMemory::new(4);

        arb.tick(&[Some(BusRequest::read(0))], &mut mem).unwrap();
        assert_eq!(arb.active_grant(), Some(0));

        let mut result = Ok([BusReply::default(); 1]);
        for _ in 0..BUS_WATCHDOG_CYCLES + 1 {
            result = arb.tick(&[None], &mut mem);
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(BusError::Timeout { port: 0, .. })));
    }
}
