//! Probe primitives.
//!
//! This module contains the `Pinger` seam used by prober tasks, the ICMP
//! implementation behind it, and the conversion of a raw round outcome
//! into window samples.

mod pinger;
mod round;

pub use pinger::{IcmpPinger, Pinger};
pub use round::{LossTimestamp, ProbeRound};
