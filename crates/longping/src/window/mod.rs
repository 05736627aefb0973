//! Fixed-capacity sample windows.
//!
//! This module contains:
//! - `WindowStore`: the slot container and its replace-oldest insertion
//! - `WindowMetrics`: loss, latency and jitter derived from one store
//! - `WindowSet`: the short/medium/long triple kept per address

mod metrics;
mod set;
mod store;

pub use metrics::WindowMetrics;
pub use set::{WindowKind, WindowSet};
pub use store::WindowStore;
