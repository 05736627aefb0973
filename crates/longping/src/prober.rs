//! Timer-driven probing of one IP monitor.
//!
//! Each tick the task checks for cancellation, runs one probe round and
//! records it. Rounds never overlap. Cancellation is only observed while
//! idle, so a round that has started is always recorded.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::config::ProbeSettings;
use crate::error::Result;
use crate::monitor::{IpMonitor, ProberState};
use crate::probe::Pinger;

/// Recurring probe loop bound to one IP monitor
pub struct ProberTask {
    monitor: Arc<IpMonitor>,
    pinger: Arc<dyn Pinger>,
    settings: ProbeSettings,
}

impl ProberTask {
    pub fn new(monitor: Arc<IpMonitor>, pinger: Arc<dyn Pinger>, settings: ProbeSettings) -> Self {
        Self { monitor, pinger, settings }
    }

    /// Start the loop on the current runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Tick until the monitor is cancelled or its windows are corrupted
    pub async fn run(self) {
        let token = self.monitor.cancellation_token();
        let mut timer = interval(self.settings.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            host = %self.monitor.hostname(),
            address = %self.monitor.address(),
            "prober started"
        );

        loop {
            self.monitor.set_prober_state(ProberState::Idle);

            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = timer.tick() => {}
            }

            if let Err(e) = self.tick().await {
                error!(
                    host = %self.monitor.hostname(),
                    address = %self.monitor.address(),
                    "prober stopping: {}",
                    e
                );
                break;
            }
        }

        self.monitor.set_prober_state(ProberState::Exited);
        info!(
            host = %self.monitor.hostname(),
            address = %self.monitor.address(),
            "prober stopped"
        );
    }

    /// One probe round. Transport failures skip the tick; only a window
    /// that refuses samples is returned as an error.
    async fn tick(&self) -> Result<()> {
        self.monitor.set_prober_state(ProberState::Probing);

        let round = match self
            .pinger
            .probe(self.monitor.address(), self.settings.packets_per_round, self.settings.timeout)
            .await
        {
            Ok(round) => round,
            Err(e) => {
                warn!(
                    host = %self.monitor.hostname(),
                    address = %self.monitor.address(),
                    "probe round skipped: {}",
                    e
                );
                return Ok(());
            }
        };

        self.monitor.set_prober_state(ProberState::Updating);
        self.monitor
            .record_round(&round, self.settings.loss_timestamp, self.settings.timeout)?;

        debug!(
            address = %self.monitor.address(),
            sent = round.sent,
            received = round.received(),
            "tick complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowCapacities;
    use crate::error::LongpingError;
    use crate::probe::ProbeRound;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7));

    /// Replies to every packet with a fixed RTT, failing every `fail_every`-th round
    struct CountingPinger {
        rounds: AtomicUsize,
        fail_every: usize,
    }

    #[async_trait::async_trait]
    impl Pinger for CountingPinger {
        async fn probe(&self, _: IpAddr, packets: u16, _: Duration) -> Result<ProbeRound> {
            let round = self.rounds.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_every != 0 && round % self.fail_every == 0 {
                return Err(LongpingError::ProbeTransport("network unreachable".into()));
            }
            let mut outcome = ProbeRound::new();
            outcome.sent = u64::from(packets);
            outcome.rtts = vec![Duration::from_millis(5); usize::from(packets)];
            Ok(outcome)
        }
    }

    fn settings() -> ProbeSettings {
        ProbeSettings { interval: Duration::from_millis(10), ..ProbeSettings::default() }
    }

    #[tokio::test]
    async fn test_transport_errors_skip_the_tick() {
        let monitor = Arc::new(IpMonitor::new("example.net", ADDRESS, &WindowCapacities::default()));
        let pinger = Arc::new(CountingPinger { rounds: AtomicUsize::new(0), fail_every: 2 });
        let handle = ProberTask::new(monitor.clone(), pinger.clone(), settings()).spawn();

        tokio::time::sleep(Duration::from_millis(200)).await;
        monitor.cancel();
        handle.await.unwrap();

        let rounds = pinger.rounds.load(Ordering::SeqCst) as u64;
        let totals = monitor.totals();
        assert!(rounds >= 4, "only {} rounds ran", rounds);
        assert_eq!(totals.sent, rounds - rounds / 2);
        assert_eq!(totals.received, totals.sent);
        assert_eq!(monitor.prober_state(), ProberState::Exited);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_tick() {
        let monitor = Arc::new(IpMonitor::new("example.net", ADDRESS, &WindowCapacities::default()));
        let pinger = Arc::new(CountingPinger { rounds: AtomicUsize::new(0), fail_every: 0 });
        monitor.cancel();

        ProberTask::new(monitor.clone(), pinger.clone(), settings()).run().await;

        assert_eq!(pinger.rounds.load(Ordering::SeqCst), 0);
        assert_eq!(monitor.prober_state(), ProberState::Exited);
    }

    #[tokio::test]
    async fn test_corrupt_window_stops_the_task() {
        let capacities = WindowCapacities { short: 0, medium: 1, long: 1 };
        let monitor = Arc::new(IpMonitor::new("example.net", ADDRESS, &capacities));
        let pinger = Arc::new(CountingPinger { rounds: AtomicUsize::new(0), fail_every: 0 });

        let handle = ProberTask::new(monitor.clone(), pinger.clone(), settings()).spawn();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("prober kept running")
            .unwrap();

        assert_eq!(pinger.rounds.load(Ordering::SeqCst), 1);
        assert_eq!(monitor.prober_state(), ProberState::Exited);
        assert!(!monitor.is_cancelled());
    }
}
