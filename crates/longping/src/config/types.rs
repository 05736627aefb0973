//! Monitor settings types for Longping.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::probe::LossTimestamp;
use crate::{DEFAULT_LONG_CAPACITY, DEFAULT_MEDIUM_CAPACITY, DEFAULT_SHORT_CAPACITY};

/// Probe round timing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Time between the start of two rounds
    pub interval: Duration,

    /// How long to wait for each echo reply
    pub timeout: Duration,

    /// Echo requests sent per round
    pub packets_per_round: u16,

    /// How send times are estimated for lost packets
    pub loss_timestamp: LossTimestamp,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(1),
            packets_per_round: 1,
            loss_timestamp: LossTimestamp::default(),
        }
    }
}

/// Sample capacity of each window horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowCapacities {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

impl Default for WindowCapacities {
    fn default() -> Self {
        Self {
            short: DEFAULT_SHORT_CAPACITY,
            medium: DEFAULT_MEDIUM_CAPACITY,
            long: DEFAULT_LONG_CAPACITY,
        }
    }
}

/// Settings applied to every IP monitor created by a registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSettings {
    pub probe: ProbeSettings,
    pub windows: WindowCapacities,
}

impl MonitorSettings {
    /// Create a new settings builder
    pub fn builder() -> MonitorSettingsBuilder {
        MonitorSettingsBuilder::default()
    }
}

/// Builder for MonitorSettings
#[derive(Default)]
pub struct MonitorSettingsBuilder {
    pub(crate) settings: MonitorSettings,
}
