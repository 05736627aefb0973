//! Periodic snapshot reporting.
//!
//! Reads every monitor's snapshot on a fixed cadence and emits one
//! structured log line per address.

use std::sync::Arc;
use std::time::Duration;

use longping::{HostRegistry, Snapshot, WindowKind};
use tracing::{debug, info};

pub struct SnapshotReporter {
    registry: Arc<HostRegistry>,
    interval: Duration,
}

impl SnapshotReporter {
    pub fn new(registry: Arc<HostRegistry>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    /// Start background reporting; abort the handle to stop it
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            // The first tick completes immediately and there is nothing to report yet.
            interval.tick().await;

            loop {
                interval.tick().await;
                let reported = self.report().await;
                debug!("Reported {} snapshots", reported);
            }
        })
    }

    /// Log the current snapshots, returning how many were logged
    pub async fn report(&self) -> usize {
        let mut reported = 0;
        for host in self.registry.snapshots().await {
            for snapshot in &host.monitors {
                log_snapshot(snapshot);
                reported += 1;
            }
        }
        reported
    }
}

fn log_snapshot(snapshot: &Snapshot) {
    let short = snapshot.window(WindowKind::Short);
    let medium = snapshot.window(WindowKind::Medium);
    let long = snapshot.window(WindowKind::Long);

    info!(
        host = %snapshot.hostname,
        address = %snapshot.address,
        sent = snapshot.totals.sent,
        received = snapshot.totals.received,
        lost = snapshot.totals.lost,
        duplicate = snapshot.totals.duplicate,
        loss_short = short.loss_ratio,
        loss_medium = medium.loss_ratio,
        loss_long = long.loss_ratio,
        avg_short_ns = nanos(short.avg_latency),
        avg_medium_ns = nanos(medium.avg_latency),
        avg_long_ns = nanos(long.avg_latency),
        min_long_ns = nanos(long.min_latency),
        max_long_ns = nanos(long.max_latency),
        jitter_short_ns = nanos(short.jitter),
        jitter_long_ns = nanos(long.jitter),
        "snapshot"
    );
}

/// Whole nanoseconds, saturating at `u64::MAX`
fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use longping::{MonitorSettings, Pinger, ProbeRound, SystemResolver};
    use std::net::IpAddr;

    struct InstantPinger;

    #[async_trait::async_trait]
    impl Pinger for InstantPinger {
        async fn probe(&self, _: IpAddr, packets: u16, _: Duration) -> longping::Result<ProbeRound> {
            let mut round = ProbeRound::new();
            round.sent = u64::from(packets);
            round.rtts = vec![Duration::from_micros(250); usize::from(packets)];
            Ok(round)
        }
    }

    #[test]
    fn test_nanos_saturates() {
        assert_eq!(nanos(Duration::from_micros(250)), 250_000);
        assert_eq!(nanos(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn test_reports_one_line_per_address() {
        let registry = Arc::new(
            HostRegistry::new(
                MonitorSettings::default(),
                Arc::new(InstantPinger),
                Arc::new(SystemResolver),
            )
            .unwrap(),
        );
        registry.register("127.0.0.1").await.unwrap();
        registry.register("::1").await.unwrap();

        let reporter = SnapshotReporter::new(registry.clone(), Duration::from_secs(15));
        assert_eq!(reporter.report().await, 2);

        registry.shutdown(Duration::from_secs(1)).await;
        assert_eq!(reporter.report().await, 0);
    }
}
