use std::net::IpAddr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use super::snapshot::{Snapshot, Totals};
use super::state::{ProberState, StateCell};
use crate::config::WindowCapacities;
use crate::error::Result;
use crate::probe::{LossTimestamp, ProbeRound};
use crate::window::{WindowKind, WindowMetrics, WindowSet, WindowStore};

/// Windows, totals and derived metrics of one resolved address
pub struct IpMonitor {
    hostname: String,
    address: IpAddr,
    stats: Mutex<Stats>,
    prober_state: StateCell,
    cancel: CancellationToken,
}

/// Everything guarded by the monitor lock
struct Stats {
    windows: WindowSet<WindowStore>,
    derived: WindowSet<WindowMetrics>,
    totals: Totals,
    last_round_at: Option<SystemTime>,
}

impl IpMonitor {
    pub fn new(hostname: impl Into<String>, address: IpAddr, capacities: &WindowCapacities) -> Self {
        let windows = WindowSet::with_capacities(capacities);
        let derived = windows.map(WindowMetrics::compute);

        Self {
            hostname: hostname.into(),
            address,
            stats: Mutex::new(Stats { windows, derived, totals: Totals::default(), last_round_at: None }),
            prober_state: StateCell::new(ProberState::Idle),
            cancel: CancellationToken::new(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    /// Record a finished round
    ///
    /// The samples go into all three windows, totals are advanced and the
    /// derived metrics recomputed, all under one lock acquisition. If any
    /// window rejects a sample nothing is committed and the error is
    /// returned.
    pub fn record_round(
        &self,
        round: &ProbeRound,
        policy: LossTimestamp,
        timeout: Duration,
    ) -> Result<()> {
        let samples = round.samples(policy, timeout);
        let mut stats = self.lock();

        let mut windows = stats.windows.clone();
        for kind in WindowKind::ALL {
            if let Err(e) = windows.get_mut(kind).extend(samples.iter().copied()) {
                error!(
                    host = %self.hostname,
                    address = %self.address,
                    window = %kind,
                    "window store corrupted: {}",
                    e
                );
                return Err(e);
            }
        }

        stats.derived = windows.map(WindowMetrics::compute);
        stats.windows = windows;
        stats.last_round_at = Some(round.wall_time);

        let totals = &mut stats.totals;
        totals.sent += round.sent;
        totals.received += round.received();
        totals.lost = totals.sent.saturating_sub(totals.received);
        totals.duplicate += round.duplicates;

        debug!(
            host = %self.hostname,
            address = %self.address,
            sent = round.sent,
            received = round.received(),
            loss_short = stats.derived.short.loss_ratio,
            "round recorded"
        );
        Ok(())
    }

    /// Consistent copy of the current metrics
    pub fn snapshot(&self) -> Snapshot {
        let stats = self.lock();
        Snapshot {
            hostname: self.hostname.clone(),
            address: self.address,
            windows: stats.derived,
            totals: stats.totals,
            last_round_at: stats.last_round_at,
            taken_at: SystemTime::now(),
        }
    }

    pub fn totals(&self) -> Totals {
        self.lock().totals
    }

    /// Copy of one window's slots
    pub fn window(&self, kind: WindowKind) -> WindowStore {
        self.lock().windows.get(kind).clone()
    }

    pub fn prober_state(&self) -> ProberState {
        self.prober_state.load()
    }

    pub(crate) fn set_prober_state(&self, state: ProberState) {
        self.prober_state.store(state);
    }

    /// Ask the prober task to stop at its next tick
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // Stats are only replaced wholesale after a successful round, so a
    // poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, Stats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for IpMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpMonitor")
            .field("hostname", &self.hostname)
            .field("address", &self.address)
            .field("prober_state", &self.prober_state())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::sync::OnceLock;
    use std::time::Instant;

    const ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));

    fn round(second: u64, sent: u64, rtts_ms: &[u64]) -> ProbeRound {
        static BASE: OnceLock<Instant> = OnceLock::new();
        ProbeRound {
            started_at: *BASE.get_or_init(Instant::now) + Duration::from_secs(second),
            wall_time: SystemTime::UNIX_EPOCH + Duration::from_secs(second),
            sent,
            rtts: rtts_ms.iter().map(|ms| Duration::from_millis(*ms)).collect(),
            duplicates: 0,
        }
    }

    fn record(monitor: &IpMonitor, round: &ProbeRound) {
        monitor
            .record_round(round, LossTimestamp::default(), Duration::from_secs(1))
            .unwrap();
    }

    #[test]
    fn test_new_monitor_reports_full_loss() {
        let monitor = IpMonitor::new("example.com", ADDRESS, &WindowCapacities::default());
        let snapshot = monitor.snapshot();

        assert_eq!(snapshot.address, ADDRESS);
        assert_eq!(snapshot.totals, Totals::default());
        assert!(snapshot.last_round_at.is_none());
        for (_, metrics) in snapshot.windows.iter() {
            assert_eq!(metrics.loss_ratio, 1.0);
            assert_eq!(metrics.avg_latency, Duration::ZERO);
        }
        assert_eq!(monitor.prober_state(), ProberState::Idle);
    }

    #[test]
    fn test_round_updates_every_window() {
        let monitor = IpMonitor::new("example.com", ADDRESS, &WindowCapacities::default());
        record(&monitor, &round(1, 2, &[10]));

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.totals, Totals { sent: 2, received: 1, lost: 1, duplicate: 0 });
        for kind in WindowKind::ALL {
            assert_eq!(monitor.window(kind).len(), 2);
            assert_eq!(snapshot.window(kind).avg_latency, Duration::from_millis(10));
        }
        assert_eq!(snapshot.window(WindowKind::Short).loss_ratio, 14.0 / 15.0);
    }

    #[test]
    fn test_totals_never_decrease() {
        let monitor = IpMonitor::new("example.com", ADDRESS, &WindowCapacities::default());
        let mut previous = monitor.totals();

        for second in 0..50 {
            let rtts: &[u64] = if second % 3 == 0 { &[] } else { &[12] };
            let mut next = round(second, 1, rtts);
            next.duplicates = second % 2;
            record(&monitor, &next);

            let current = monitor.totals();
            assert!(current.sent >= previous.sent);
            assert!(current.received >= previous.received);
            assert!(current.lost >= previous.lost);
            assert!(current.duplicate >= previous.duplicate);
            previous = current;
        }
        assert_eq!(previous.sent, 50);
        assert_eq!(previous.lost, 17);
    }

    #[test]
    fn test_unreachable_target_loss_rises_gradually() {
        let capacities = WindowCapacities { short: 5, medium: 10, long: 20 };
        let monitor = IpMonitor::new("example.com", ADDRESS, &capacities);
        for second in 0..20 {
            record(&monitor, &round(second, 1, &[15]));
        }

        let mut last = 0.0;
        for second in 20..25 {
            record(&monitor, &round(second, 1, &[]));
            let loss = monitor.snapshot().window(WindowKind::Short).loss_ratio;
            assert!(loss > last);
            last = loss;
        }
        assert_eq!(last, 1.0);
        assert_eq!(monitor.snapshot().window(WindowKind::Long).loss_ratio, 0.25);
    }

    #[test]
    fn test_wall_clock_step_back_does_not_freeze_windows() {
        let capacities = WindowCapacities { short: 5, medium: 10, long: 20 };
        let monitor = IpMonitor::new("example.com", ADDRESS, &capacities);
        for second in 1000..1005 {
            record(&monitor, &round(second, 1, &[15]));
        }

        // The wall clock jumps back a minute while the host stops answering.
        for second in 1005..1010 {
            let mut lost = round(second, 1, &[]);
            lost.wall_time -= Duration::from_secs(65);
            record(&monitor, &lost);
        }

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.window(WindowKind::Short).loss_ratio, 1.0);
        assert_eq!(snapshot.window(WindowKind::Short).avg_latency, Duration::ZERO);
        assert_eq!(snapshot.window(WindowKind::Medium).loss_ratio, 0.5);
        assert_eq!(
            snapshot.last_round_at,
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1009 - 65))
        );
    }

    #[test]
    fn test_rejected_round_commits_nothing() {
        let capacities = WindowCapacities { short: 0, medium: 10, long: 10 };
        let monitor = IpMonitor::new("example.com", ADDRESS, &capacities);

        let result =
            monitor.record_round(&round(1, 1, &[10]), LossTimestamp::default(), Duration::from_secs(1));
        assert!(result.is_err());
        assert_eq!(monitor.totals(), Totals::default());
        assert!(monitor.window(WindowKind::Medium).is_empty());
    }

    #[test]
    fn test_cancel_is_visible() {
        let monitor = IpMonitor::new("example.com", ADDRESS, &WindowCapacities::default());
        assert!(!monitor.is_cancelled());
        monitor.cancel();
        assert!(monitor.is_cancelled());
        assert!(monitor.cancellation_token().is_cancelled());
    }
}
