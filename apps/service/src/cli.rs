use std::path::PathBuf;

use clap::Parser;

/// Long-horizon ICMP loss, latency and jitter monitor
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Config file (defaults to $XDG_CONFIG_HOME/longping/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to monitor, replaces the configured list (repeatable)
    #[arg(long = "host", value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub print_config: bool,
}
