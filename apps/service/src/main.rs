use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use longping::{HostRegistry, IcmpPinger, SystemResolver};
use tokio::signal;
use tracing::{info, warn};

mod cli;
mod config;
mod reporter;

use cli::Args;
use config::Config;
use reporter::SnapshotReporter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_config(args.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    if !args.hosts.is_empty() {
        config.hosts = args.hosts;
    }

    if args.print_config {
        println!("{config}");
        return Ok(());
    }

    logger::init_with(config.log.level_filter(), config.log.format());
    run(config).await
}

async fn run(config: Config) -> Result<()> {
    if config.hosts.is_empty() {
        bail!("No hosts configured: set `hosts` in the config file, HOSTS, or pass --host");
    }

    let pinger = IcmpPinger::new()
        .await
        .context("ICMP probing needs raw socket privileges (root or CAP_NET_RAW)")?;
    let registry = Arc::new(HostRegistry::new(
        config.monitor_settings(),
        Arc::new(pinger),
        Arc::new(SystemResolver),
    )?);

    for host in &config.hosts {
        if let Err(e) = registry.register(host).await {
            warn!(host = %host, "Host will not be monitored: {}", e);
        }
    }
    if registry.is_empty().await {
        bail!("None of the configured hosts could be resolved");
    }
    info!("Monitoring {} hosts", registry.len().await);

    let reporter = SnapshotReporter::new(registry.clone(), config.report_interval()).start();

    let shutdown = shutdown_signal()?;
    let received = shutdown.await?;
    info!("{} received, shutting down", received);

    reporter.abort();
    registry.shutdown(config.round_budget() + config.monitor_settings().probe.interval).await;
    Ok(())
}

/// Start listening for Ctrl+C and SIGTERM, the signal supervisors stop with
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = Result<&'static str>>> {
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("Failed to listen for SIGTERM")?;

    Ok(async move {
        tokio::select! {
            result = signal::ctrl_c() => result.map(|_| "Ctrl+C").context("Failed to listen for Ctrl+C"),
            _ = terminate.recv() => Ok("SIGTERM"),
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = Result<&'static str>>> {
    Ok(async {
        signal::ctrl_c().await.context("Failed to listen for Ctrl+C")?;
        Ok("Ctrl+C")
    })
}
