//! Probe samples and the window slots that hold them.

use std::time::{Duration, Instant};

/// One probe outcome
///
/// A lost probe carries an estimated `sent_at` and a zero `rtt`. Send times
/// are monotonic so wall clock steps cannot reorder a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub sent_at: Instant,
    pub rtt: Duration,
    pub received: bool,
}

impl Sample {
    /// A probe that got a reply after `rtt`
    pub fn received(sent_at: Instant, rtt: Duration) -> Self {
        Self { sent_at, rtt, received: true }
    }

    /// A probe that never got a reply
    pub fn lost(sent_at: Instant) -> Self {
        Self { sent_at, rtt: Duration::ZERO, received: false }
    }
}

/// Content of one window slot
///
/// `Empty` (never written) and `Lost` are distinct so loss accounting can
/// tell a filling window apart from a lossy one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    Empty,
    Received { sent_at: Instant, rtt: Duration },
    Lost { sent_at: Instant },
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn sent_at(&self) -> Option<Instant> {
        match self {
            Slot::Empty => None,
            Slot::Received { sent_at, .. } | Slot::Lost { sent_at } => Some(*sent_at),
        }
    }

    /// Round trip time, only for slots holding a reply
    pub fn rtt(&self) -> Option<Duration> {
        match self {
            Slot::Received { rtt, .. } => Some(*rtt),
            _ => None,
        }
    }
}

impl From<Sample> for Slot {
    fn from(sample: Sample) -> Self {
        if sample.received {
            Slot::Received { sent_at: sample.sent_at, rtt: sample.rtt }
        } else {
            Slot::Lost { sent_at: sample.sent_at }
        }
    }
}
