use std::net::IpAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use tracing::trace;

use super::round::ProbeRound;
use crate::error::{LongpingError, Result};

/// Probe primitive used by prober tasks
#[async_trait::async_trait]
pub trait Pinger: Send + Sync {
    /// Send `packets` echo requests to `address`, waiting up to `timeout`
    /// for each reply, and report what came back
    async fn probe(&self, address: IpAddr, packets: u16, timeout: Duration) -> Result<ProbeRound>;
}

/// ICMP echo pinger
///
/// Holds one raw socket pair for the whole process, so it needs the
/// privileges raw sockets require. Requests go out one after another.
pub struct IcmpPinger {
    pinger: tokio_icmp_echo::Pinger,
    ident: u16,
    sequence: AtomicU16,
}

impl IcmpPinger {
    pub async fn new() -> Result<Self> {
        let pinger = tokio_icmp_echo::Pinger::new()
            .await
            .map_err(|e| LongpingError::ProbeTransport(format!("cannot open ICMP socket: {:?}", e)))?;

        Ok(Self { pinger, ident: rand::random(), sequence: AtomicU16::new(0) })
    }
}

#[async_trait::async_trait]
impl Pinger for IcmpPinger {
    async fn probe(&self, address: IpAddr, packets: u16, timeout: Duration) -> Result<ProbeRound> {
        let mut round = ProbeRound::new();

        for _ in 0..packets {
            let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
            let reply = self
                .pinger
                .ping(address, self.ident, sequence, timeout)
                .await
                .map_err(|e| LongpingError::ProbeTransport(format!("echo to {}: {:?}", address, e)))?;

            round.sent += 1;
            match reply {
                Some(rtt) => {
                    trace!(%address, sequence, ?rtt, "echo reply");
                    round.rtts.push(rtt);
                }
                None => trace!(%address, sequence, "echo timed out"),
            }
        }

        Ok(round)
    }
}
