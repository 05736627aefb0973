use std::net::IpAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Serialize, Serializer};

use crate::window::{WindowKind, WindowMetrics, WindowSet};

/// Lifetime counters of one address, never decreasing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub sent: u64,
    pub received: u64,
    pub lost: u64,
    pub duplicate: u64,
}

/// Immutable copy of an IP monitor's metrics
///
/// Every field comes from the same round: windows and totals are copied
/// under one lock acquisition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub hostname: String,
    pub address: IpAddr,
    pub windows: WindowSet<WindowMetrics>,
    pub totals: Totals,
    /// Wall clock start of the last recorded round
    #[serde(rename = "last_round_at_ms", serialize_with = "as_optional_unix_millis")]
    pub last_round_at: Option<SystemTime>,
    #[serde(rename = "taken_at_ms", serialize_with = "as_unix_millis")]
    pub taken_at: SystemTime,
}

impl Snapshot {
    pub fn window(&self, kind: WindowKind) -> &WindowMetrics {
        self.windows.get(kind)
    }
}

fn unix_millis(time: &SystemTime) -> u64 {
    let millis = time.duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or_default();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

fn as_unix_millis<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(unix_millis(time))
}

fn as_optional_unix_millis<S: Serializer>(
    time: &Option<SystemTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(time) => serializer.serialize_some(&unix_millis(time)),
        None => serializer.serialize_none(),
    }
}
