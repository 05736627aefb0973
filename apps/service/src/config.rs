use std::time::Duration;
use std::{env, fmt, fs, io, path};

use longping::{LossTimestamp, MonitorSettings, ProbeSettings, WindowCapacities};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed { path: path::PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    WriteFailed { path: path::PathBuf, source: io::Error },

    #[error("Failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),

    #[error("No config path: neither XDG_CONFIG_HOME nor HOME is set")]
    ConfigPathUnavailable,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hostnames (or IP literals) to monitor
    pub hosts: Vec<String>,
    pub probe: Probe,
    pub windows: WindowCapacities,
    pub report: Report,
    pub log: Log,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Probe {
    pub interval_seconds: u64,
    pub timeout_seconds: u64,
    pub packets_per_round: u16,
    pub loss_timestamp: LossTimestamp,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    /// How often snapshots are logged
    pub interval_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Log {
    pub level: String,
    pub format: String,
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            interval_seconds: 1,
            timeout_seconds: 1,
            packets_per_round: 1,
            loss_timestamp: LossTimestamp::default(),
        }
    }
}

impl Default for Report {
    fn default() -> Self {
        Self { interval_seconds: 15 }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self { level: "info".into(), format: "compact".into() }
    }
}

impl Log {
    /// Configured level, info when unparseable
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }

    pub fn format(&self) -> logger::LogFormat {
        self.format.parse().unwrap_or_default()
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/longping/config.toml or
/// $HOME/.config/...)
#[allow(deprecated)]
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("longping/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Hosts")?;
        for host in &self.hosts {
            write_1(f, "Host", host)?;
        }
        write_title_1(f, "Probe")?;
        write_1(f, "Interval (s)", &self.probe.interval_seconds)?;
        write_1(f, "Timeout (s)", &self.probe.timeout_seconds)?;
        write_1(f, "Packets per round", &self.probe.packets_per_round)?;
        write_1(f, "Loss timestamp", &format!("{:?}", self.probe.loss_timestamp))?;
        write_title_1(f, "Windows")?;
        write_1(f, "Short", &self.windows.short)?;
        write_1(f, "Medium", &self.windows.medium)?;
        write_1(f, "Long", &self.windows.long)?;
        write_title_1(f, "Report")?;
        write_1(f, "Interval (s)", &self.report.interval_seconds)?;
        write_title_1(f, "Log")?;
        write_1(f, "Level", &self.log.level)?;
        write_1(f, "Format", &self.log.format)?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/longping/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    ///
    /// ```ignore
    /// let cfg = config::Config::from_config(None::<&path::Path>)?;
    /// println!("{}", cfg);
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|source| ConfigError::ReadFailed { path: config_path.clone(), source })?;
            Ok(toml::from_str(raw_string.as_str())?)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;
        let write_failed = |source| ConfigError::WriteFailed { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }

        fs::write(path, config_str).map_err(write_failed)
    }

    /// Apply the environment variables the daemon has always honoured
    ///
    /// `HOSTS` (whitespace separated), `PROBE_INTERVAL` and `PROBE_TIMEOUT`
    /// (seconds), `DEBUG=true`. Values that do not parse are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(hosts) = lookup("HOSTS") {
            let hosts: Vec<String> = hosts.split_whitespace().map(String::from).collect();
            if !hosts.is_empty() {
                self.hosts = hosts;
            }
        }
        if let Some(interval) = lookup("PROBE_INTERVAL").and_then(|value| value.parse().ok()) {
            self.probe.interval_seconds = interval;
        }
        if let Some(timeout) = lookup("PROBE_TIMEOUT").and_then(|value| value.parse().ok()) {
            self.probe.timeout_seconds = timeout;
        }
        if lookup("DEBUG").as_deref() == Some("true") {
            self.log.level = "debug".into();
        }
    }

    /// Settings handed to the host registry
    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            probe: ProbeSettings {
                interval: Duration::from_secs(self.probe.interval_seconds),
                timeout: Duration::from_secs(self.probe.timeout_seconds),
                packets_per_round: self.probe.packets_per_round,
                loss_timestamp: self.probe.loss_timestamp,
            },
            windows: self.windows,
        }
    }

    /// Longest a single probe round can take
    pub fn round_budget(&self) -> Duration {
        Duration::from_secs(self.probe.timeout_seconds)
            * u32::from(self.probe.packets_per_round.max(1))
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report.interval_seconds.max(1))
    }
}
