use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::monitor::{IpMonitor, Snapshot};

/// A registered hostname and the monitors created for its addresses
#[derive(Debug)]
pub struct HostEntry {
    hostname: String,
    monitors: Vec<Arc<IpMonitor>>,
    tasks: Vec<JoinHandle<()>>,
}

impl HostEntry {
    pub(crate) fn new(hostname: impl Into<String>) -> Self {
        Self { hostname: hostname.into(), monitors: Vec::new(), tasks: Vec::new() }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn monitors(&self) -> &[Arc<IpMonitor>] {
        &self.monitors
    }

    pub(crate) fn push(&mut self, monitor: Arc<IpMonitor>, task: JoinHandle<()>) {
        self.monitors.push(monitor);
        self.tasks.push(task);
    }

    /// Signal every prober task to stop without waiting for it
    pub(crate) fn cancel(&self) {
        self.monitors.iter().for_each(|monitor| monitor.cancel());
    }

    pub(crate) fn into_tasks(self) -> Vec<JoinHandle<()>> {
        self.tasks
    }

    pub fn snapshot(&self) -> HostSnapshot {
        HostSnapshot {
            hostname: self.hostname.clone(),
            monitors: self.monitors.iter().map(|monitor| monitor.snapshot()).collect(),
        }
    }
}

/// Snapshots of every monitor owned by one hostname
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostSnapshot {
    pub hostname: String,
    pub monitors: Vec<Snapshot>,
}
