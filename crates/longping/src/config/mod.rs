//! Monitor settings for Longping.
//!
//! This module defines probe timing and window sizing shared by every
//! IP monitor a registry creates.

mod methods;
mod types;

pub use types::{MonitorSettings, MonitorSettingsBuilder, ProbeSettings, WindowCapacities};
