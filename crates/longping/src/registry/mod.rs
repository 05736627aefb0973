//! Hostname registration.
//!
//! The registry resolves each hostname, creates one `IpMonitor` and one
//! `ProberTask` per address, and owns them until the host is deregistered.

mod host;
mod host_registry;
mod resolver;

pub use host::{HostEntry, HostSnapshot};
pub use host_registry::HostRegistry;
pub use resolver::{Resolver, SystemResolver};
