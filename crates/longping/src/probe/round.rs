use std::time::{Duration, Instant, SystemTime};

use serde::{Deserialize, Serialize};

use crate::sample::Sample;

/// Raw outcome of one probe round
///
/// The echo primitive only reports how many requests went out and the RTT
/// of every reply, so per-packet send times are not known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRound {
    /// Monotonic time the round started, used to order samples
    pub started_at: Instant,
    /// Wall clock time the round started, only reported
    pub wall_time: SystemTime,
    /// Echo requests sent
    pub sent: u64,
    /// RTT of every distinct reply, in arrival order
    pub rtts: Vec<Duration>,
    /// Replies seen more than once
    pub duplicates: u64,
}

impl ProbeRound {
    /// Empty round starting now
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            wall_time: SystemTime::now(),
            sent: 0,
            rtts: Vec::new(),
            duplicates: 0,
        }
    }

    pub fn received(&self) -> u64 {
        self.rtts.len() as u64
    }

    pub fn lost(&self) -> u64 {
        self.sent.saturating_sub(self.received())
    }

    /// One sample per packet: replies first, then one per lost request
    ///
    /// Replies are stamped with the round start. Lost packets are stamped
    /// according to `policy`.
    pub fn samples(&self, policy: LossTimestamp, timeout: Duration) -> Vec<Sample> {
        let received = self.rtts.iter().map(|rtt| Sample::received(self.started_at, *rtt));
        let lost = (0..self.lost())
            .map(|index| Sample::lost(policy.estimate(self.started_at, timeout, index)));
        received.chain(lost).collect()
    }
}

impl Default for ProbeRound {
    fn default() -> Self {
        Self::new()
    }
}

/// Estimation policy for the send time of a lost packet
///
/// The offset policies can stamp a loss later than replies from the
/// following rounds when the timeout exceeds the probe interval. Those
/// replies are then evicted before the loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossTimestamp {
    /// The round start time
    #[default]
    RoundStart,
    /// Round start plus one probe timeout
    RoundStartPlusTimeout,
    /// Round start plus `index` probe timeouts for the `index`-th loss
    RoundStartPlusIndex,
}

impl LossTimestamp {
    pub fn estimate(&self, started_at: Instant, timeout: Duration, index: u64) -> Instant {
        let offset = match self {
            LossTimestamp::RoundStart => Duration::ZERO,
            LossTimestamp::RoundStartPlusTimeout => timeout,
            LossTimestamp::RoundStartPlusIndex => {
                timeout.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
            }
        };
        started_at.checked_add(offset).unwrap_or(started_at)
    }
}
