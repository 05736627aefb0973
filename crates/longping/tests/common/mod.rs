//! Shared fakes for the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use longping::{Pinger, ProbeRound, Resolver};

/// Resolves names from a fixed table
#[derive(Default)]
pub struct StaticResolver {
    table: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    pub fn with(mut self, hostname: &str, addresses: &[&str]) -> Self {
        let addresses = addresses.iter().map(|address| address.parse().unwrap()).collect();
        self.table.insert(hostname.to_string(), addresses);
        self
    }
}

#[async_trait::async_trait]
impl Resolver for StaticResolver {
    async fn resolve(&self, hostname: &str) -> io::Result<Vec<IpAddr>> {
        self.table
            .get(hostname)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such host"))
    }
}

/// Answers every packet with `rtt` after sleeping `delay`
pub struct ScriptedPinger {
    pub rtt: Option<Duration>,
    pub delay: Duration,
    pub rounds: AtomicUsize,
}

impl ScriptedPinger {
    pub fn replying(rtt: Duration) -> Self {
        Self { rtt: Some(rtt), delay: Duration::ZERO, rounds: AtomicUsize::new(0) }
    }

    pub fn silent() -> Self {
        Self { rtt: None, delay: Duration::ZERO, rounds: AtomicUsize::new(0) }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn rounds(&self) -> usize {
        self.rounds.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Pinger for ScriptedPinger {
    async fn probe(&self, _: IpAddr, packets: u16, _: Duration) -> longping::Result<ProbeRound> {
        let mut round = ProbeRound::new();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        round.sent = u64::from(packets);
        if let Some(rtt) = self.rtt {
            round.rtts = vec![rtt; usize::from(packets)];
        }
        self.rounds.fetch_add(1, Ordering::SeqCst);
        Ok(round)
    }
}

/// Poll `condition` every few milliseconds until it holds or `limit` passes
pub async fn eventually<F: Fn() -> bool>(limit: Duration, condition: F) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
