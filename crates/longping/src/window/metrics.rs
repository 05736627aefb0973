//! Loss, latency and jitter derived from a window's slots.

use std::time::Duration;

use serde::{Serialize, Serializer};

use super::store::WindowStore;
use crate::sample::Slot;

/// Metrics derived from one window
///
/// Latencies are zero when the window holds no replies. Empty slots count
/// as unreceived, so a window that is still filling overstates its loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WindowMetrics {
    /// Fraction of slots without a reply, 1.0 = 100% loss
    pub loss_ratio: f64,
    #[serde(rename = "avg_latency_ns", serialize_with = "as_nanos")]
    pub avg_latency: Duration,
    #[serde(rename = "min_latency_ns", serialize_with = "as_nanos")]
    pub min_latency: Duration,
    #[serde(rename = "max_latency_ns", serialize_with = "as_nanos")]
    pub max_latency: Duration,
    /// Mean absolute difference between consecutive reply RTTs in slot order
    #[serde(rename = "jitter_ns", serialize_with = "as_nanos")]
    pub jitter: Duration,
}

impl WindowMetrics {
    /// Recompute every metric from the current contents of `store`
    pub fn compute(store: &WindowStore) -> Self {
        let rtts: Vec<Duration> = store.slots().iter().filter_map(Slot::rtt).collect();

        Self {
            loss_ratio: loss_ratio(store.capacity(), rtts.len()),
            avg_latency: average(&rtts),
            min_latency: rtts.iter().min().copied().unwrap_or_default(),
            max_latency: rtts.iter().max().copied().unwrap_or_default(),
            jitter: jitter(&rtts),
        }
    }
}

fn loss_ratio(capacity: usize, received: usize) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    (capacity - received) as f64 / capacity as f64
}

fn average(rtts: &[Duration]) -> Duration {
    if rtts.is_empty() {
        return Duration::ZERO;
    }
    let total: u128 = rtts.iter().map(Duration::as_nanos).sum();
    from_nanos(total / rtts.len() as u128)
}

fn jitter(rtts: &[Duration]) -> Duration {
    if rtts.len() < 2 {
        return Duration::ZERO;
    }
    let total: u128 = rtts
        .windows(2)
        .map(|pair| pair[1].abs_diff(pair[0]).as_nanos())
        .sum();
    from_nanos(total / (rtts.len() - 1) as u128)
}

// Means of Durations never exceed the largest input, so this fits in u64.
fn from_nanos(nanos: u128) -> Duration {
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

fn as_nanos<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
}
