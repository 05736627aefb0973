//! Per-address statistics.
//!
//! An `IpMonitor` owns the three windows of one resolved address, its
//! running totals and the metrics derived from them. Its prober task is
//! the only writer; exporters read through `IpMonitor::snapshot`.

mod ip_monitor;
mod snapshot;
mod state;

pub use ip_monitor::IpMonitor;
pub use snapshot::{Snapshot, Totals};
pub use state::ProberState;
