use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{info, warn};

use super::host::{HostEntry, HostSnapshot};
use super::resolver::Resolver;
use crate::config::MonitorSettings;
use crate::error::{LongpingError, Result};
use crate::monitor::IpMonitor;
use crate::probe::Pinger;
use crate::prober::ProberTask;

/// Owner of every monitored hostname
///
/// Registering the same hostname twice adds a second monitor per address
/// to the existing entry. One `deregister` still stops all of them.
pub struct HostRegistry {
    settings: MonitorSettings,
    pinger: Arc<dyn Pinger>,
    resolver: Arc<dyn Resolver>,
    hosts: RwLock<HashMap<String, HostEntry>>,
}

impl HostRegistry {
    /// Create an empty registry; fails if `settings` cannot run a monitor
    pub fn new(
        settings: MonitorSettings,
        pinger: Arc<dyn Pinger>,
        resolver: Arc<dyn Resolver>,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings, pinger, resolver, hosts: RwLock::new(HashMap::new()) })
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Resolve `hostname` and start probing every address it has
    ///
    /// Nothing is created when resolution fails or yields no address.
    pub async fn register(&self, hostname: &str) -> Result<()> {
        let addresses = self.resolve(hostname).await?;

        let mut hosts = self.hosts.write().await;
        let entry = hosts.entry(hostname.to_string()).or_insert_with(|| HostEntry::new(hostname));

        for address in addresses {
            let monitor = Arc::new(IpMonitor::new(hostname, address, &self.settings.windows));
            let task = ProberTask::new(monitor.clone(), self.pinger.clone(), self.settings.probe.clone())
                .spawn();
            entry.push(monitor, task);

            info!(host = hostname, %address, "registered address");
        }

        Ok(())
    }

    /// Stop every prober of `hostname` and forget it
    ///
    /// Probers exit at their next tick; rounds already in flight finish.
    /// This does not wait for them.
    pub async fn deregister(&self, hostname: &str) -> Result<()> {
        let entry = self
            .hosts
            .write()
            .await
            .remove(hostname)
            .ok_or_else(|| LongpingError::NotFound(hostname.to_string()))?;

        entry.cancel();
        info!(host = hostname, monitors = entry.monitors().len(), "deregistered host");
        Ok(())
    }

    /// Deregister everything and wait up to `grace` for each prober to exit
    ///
    /// Probers still running after `grace` are aborted.
    pub async fn shutdown(&self, grace: Duration) {
        let entries: Vec<HostEntry> = self.hosts.write().await.drain().map(|(_, entry)| entry).collect();
        entries.iter().for_each(HostEntry::cancel);

        let tasks = entries.into_iter().flat_map(HostEntry::into_tasks).map(|task| async move {
            let abort = task.abort_handle();
            if timeout(grace, task).await.is_err() {
                abort.abort();
                return false;
            }
            true
        });

        let results = join_all(tasks).await;
        let aborted = results.iter().filter(|finished| !**finished).count();
        if aborted > 0 {
            warn!(aborted, "probers did not stop within the grace period");
        }
        info!(stopped = results.len() - aborted, "registry shut down");
    }

    pub async fn hostnames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.hosts.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.hosts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.hosts.read().await.is_empty()
    }

    /// Monitors of one hostname, in resolution order
    pub async fn monitors(&self, hostname: &str) -> Option<Vec<Arc<IpMonitor>>> {
        self.hosts.read().await.get(hostname).map(|entry| entry.monitors().to_vec())
    }

    pub async fn snapshot(&self, hostname: &str) -> Option<HostSnapshot> {
        self.hosts.read().await.get(hostname).map(HostEntry::snapshot)
    }

    /// Snapshots of every registered host, sorted by hostname
    pub async fn snapshots(&self) -> Vec<HostSnapshot> {
        let mut snapshots: Vec<HostSnapshot> =
            self.hosts.read().await.values().map(HostEntry::snapshot).collect();
        snapshots.sort_by(|a, b| a.hostname.cmp(&b.hostname));
        snapshots
    }

    async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>> {
        let resolved = self.resolver.resolve(hostname).await.map_err(|source| {
            LongpingError::Resolution { host: hostname.to_string(), source }
        })?;

        let mut addresses: Vec<IpAddr> = Vec::with_capacity(resolved.len());
        for address in resolved {
            if !addresses.contains(&address) {
                addresses.push(address);
            }
        }

        if addresses.is_empty() {
            return Err(LongpingError::NoAddresses(hostname.to_string()));
        }
        Ok(addresses)
    }
}

impl std::fmt::Debug for HostRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostRegistry").field("settings", &self.settings).finish_non_exhaustive()
    }
}
