//! Slot storage with replace-oldest insertion.

use std::time::Instant;

use crate::error::{LongpingError, Result};
use crate::sample::{Sample, Slot};

/// Circular container holding the `capacity` most recently sent samples
///
/// Slots are scanned in a fixed order starting at slot 0. Insertion fills
/// the first empty slot, or overwrites the slot with the smallest `sent_at`
/// once the store is full. This is a last-N-samples window, not a
/// last-N-seconds window.
#[derive(Debug, Clone)]
pub struct WindowStore {
    slots: Vec<Slot>,
    occupied: usize,
}

impl WindowStore {
    pub fn new(capacity: usize) -> Self {
        Self { slots: vec![Slot::Empty; capacity], occupied: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots that hold a sample
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    pub fn is_full(&self) -> bool {
        self.occupied == self.slots.len()
    }

    /// Slots in scan order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Place `sample` into the first empty slot, or over the oldest one
    ///
    /// Ties on `sent_at` go to the first slot in scan order. Failing to
    /// place a sample means the store is corrupt (or has no slots at all).
    pub fn insert(&mut self, sample: Sample) -> Result<()> {
        let mut oldest: Option<(usize, Instant)> = None;

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(sent_at) = slot.sent_at() else {
                *slot = sample.into();
                self.occupied += 1;
                return Ok(());
            };

            match oldest {
                Some((_, current)) if sent_at >= current => {}
                _ => oldest = Some((index, sent_at)),
            }
        }

        match oldest {
            Some((index, _)) => {
                self.slots[index] = sample.into();
                Ok(())
            }
            None => Err(LongpingError::InsertionInvariantViolation { capacity: self.capacity() }),
        }
    }

    /// Insert every sample in order, stopping at the first failure
    pub fn extend<I>(&mut self, samples: I) -> Result<()>
    where
        I: IntoIterator<Item = Sample>,
    {
        samples.into_iter().try_for_each(|sample| self.insert(sample))
    }
}
