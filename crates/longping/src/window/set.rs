use serde::Serialize;

use crate::config::WindowCapacities;

/// Time horizon of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Short,
    Medium,
    Long,
}

impl WindowKind {
    pub const ALL: [WindowKind; 3] = [WindowKind::Short, WindowKind::Medium, WindowKind::Long];

    pub fn label(&self) -> &'static str {
        match self {
            WindowKind::Short => "short",
            WindowKind::Medium => "medium",
            WindowKind::Long => "long",
        }
    }
}

impl std::fmt::Display for WindowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per window horizon
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WindowSet<T> {
    pub short: T,
    pub medium: T,
    pub long: T,
}

impl<T> WindowSet<T> {
    pub fn get(&self, kind: WindowKind) -> &T {
        match kind {
            WindowKind::Short => &self.short,
            WindowKind::Medium => &self.medium,
            WindowKind::Long => &self.long,
        }
    }

    pub fn get_mut(&mut self, kind: WindowKind) -> &mut T {
        match kind {
            WindowKind::Short => &mut self.short,
            WindowKind::Medium => &mut self.medium,
            WindowKind::Long => &mut self.long,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> WindowSet<U> {
        WindowSet { short: f(&self.short), medium: f(&self.medium), long: f(&self.long) }
    }

    /// Pairs of horizon and value, short first
    pub fn iter(&self) -> impl Iterator<Item = (WindowKind, &T)> {
        WindowKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

impl WindowSet<super::WindowStore> {
    /// Empty stores sized from the configured capacities
    pub fn with_capacities(capacities: &WindowCapacities) -> Self {
        Self {
            short: super::WindowStore::new(capacities.short),
            medium: super::WindowStore::new(capacities.medium),
            long: super::WindowStore::new(capacities.long),
        }
    }
}
