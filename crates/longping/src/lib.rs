//! Longping - long-horizon reachability statistics
//!
//! This library keeps short, medium and long rolling windows of ICMP probe
//! outcomes for every address a hostname resolves to, and derives packet
//! loss, latency and jitter from them. Exporters read immutable snapshots
//! on their own schedule.

pub mod config;
pub mod error;
pub mod monitor;
pub mod probe;
pub mod prober;
pub mod registry;
pub mod sample;
pub mod window;

// Re-export main types
pub use config::{MonitorSettings, MonitorSettingsBuilder, ProbeSettings, WindowCapacities};
pub use error::{LongpingError, Result};
pub use monitor::{IpMonitor, ProberState, Snapshot, Totals};
pub use probe::{IcmpPinger, LossTimestamp, Pinger, ProbeRound};
pub use prober::ProberTask;
pub use registry::{HostRegistry, HostSnapshot, Resolver, SystemResolver};
pub use sample::{Sample, Slot};
pub use window::{WindowKind, WindowMetrics, WindowSet, WindowStore};

/// Default capacity of the short window
pub const DEFAULT_SHORT_CAPACITY: usize = 15;

/// Default capacity of the medium window
pub const DEFAULT_MEDIUM_CAPACITY: usize = 100;

/// Default capacity of the long window
pub const DEFAULT_LONG_CAPACITY: usize = 1000;
