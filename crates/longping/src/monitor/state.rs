use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

/// Where a prober task is in its tick cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ProberState {
    /// Waiting for the next tick
    Idle = 0,
    /// A probe round is in flight
    Probing = 1,
    /// Recording the round into the windows
    Updating = 2,
    /// The task has stopped and will not tick again
    Exited = 3,
}

impl ProberState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ProberState::Idle,
            1 => ProberState::Probing,
            2 => ProberState::Updating,
            _ => ProberState::Exited,
        }
    }
}

impl std::fmt::Display for ProberState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProberState::Idle => write!(f, "idle"),
            ProberState::Probing => write!(f, "probing"),
            ProberState::Updating => write!(f, "updating"),
            ProberState::Exited => write!(f, "exited"),
        }
    }
}

/// Lock-free cell holding a `ProberState`
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: ProberState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn load(&self) -> ProberState {
        ProberState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, state: ProberState) {
        self.0.store(state as u8, Ordering::Release);
    }
}
