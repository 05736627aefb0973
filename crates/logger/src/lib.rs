//! Tracing subscriber setup shared by the Longping binaries.

mod subscriber;

pub use subscriber::{LogFormat, init_tracing, init_with};
