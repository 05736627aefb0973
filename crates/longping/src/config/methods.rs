//! Monitor settings methods for Longping.

use std::time::Duration;

use super::types::{MonitorSettings, MonitorSettingsBuilder, WindowCapacities};
use crate::error::{LongpingError, Result};
use crate::probe::LossTimestamp;

impl MonitorSettings {
    /// Reject settings no monitor can run with
    pub fn validate(&self) -> Result<()> {
        if self.probe.interval.is_zero() {
            return Err(LongpingError::InvalidSettings("probe interval must be non-zero".into()));
        }
        if self.probe.timeout.is_zero() {
            return Err(LongpingError::InvalidSettings("probe timeout must be non-zero".into()));
        }
        if self.probe.packets_per_round == 0 {
            return Err(LongpingError::InvalidSettings(
                "at least one packet per round is required".into(),
            ));
        }
        self.windows.validate()
    }
}

impl WindowCapacities {
    pub fn validate(&self) -> Result<()> {
        for (name, capacity) in [("short", self.short), ("medium", self.medium), ("long", self.long)]
        {
            if capacity == 0 {
                return Err(LongpingError::InvalidSettings(format!(
                    "{name} window capacity must be at least 1"
                )));
            }
        }
        Ok(())
    }
}

impl MonitorSettingsBuilder {
    /// Build the settings
    pub fn build(self) -> MonitorSettings {
        self.settings
    }

    /// Set the time between rounds
    pub fn interval(mut self, interval: Duration) -> Self {
        self.settings.probe.interval = interval;
        self
    }

    /// Set the per-packet reply timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.probe.timeout = timeout;
        self
    }

    pub fn packets_per_round(mut self, packets: u16) -> Self {
        self.settings.probe.packets_per_round = packets;
        self
    }

    pub fn loss_timestamp(mut self, policy: LossTimestamp) -> Self {
        self.settings.probe.loss_timestamp = policy;
        self
    }

    /// Set all three window capacities
    pub fn windows(mut self, capacities: WindowCapacities) -> Self {
        self.settings.windows = capacities;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = MonitorSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.probe.interval, Duration::from_secs(1));
        assert_eq!(settings.probe.timeout, Duration::from_secs(1));
        assert_eq!(settings.windows, WindowCapacities { short: 15, medium: 100, long: 1000 });
    }

    #[test]
    fn test_builder_overrides() {
        let settings = MonitorSettings::builder()
            .interval(Duration::from_millis(250))
            .packets_per_round(3)
            .loss_timestamp(LossTimestamp::RoundStart)
            .build();

        assert_eq!(settings.probe.interval, Duration::from_millis(250));
        assert_eq!(settings.probe.packets_per_round, 3);
        assert_eq!(settings.probe.loss_timestamp, LossTimestamp::RoundStart);
    }

    #[test]
    fn test_rejects_unusable_settings() {
        let zero_interval = MonitorSettings::builder().interval(Duration::ZERO).build();
        assert!(zero_interval.validate().is_err());

        let no_packets = MonitorSettings::builder().packets_per_round(0).build();
        assert!(no_packets.validate().is_err());

        let empty_window = MonitorSettings::builder()
            .windows(WindowCapacities { short: 0, ..WindowCapacities::default() })
            .build();
        let err = empty_window.validate().unwrap_err();
        assert!(err.to_string().contains("short window"));
    }
}
