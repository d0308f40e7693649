//! Bounded concurrency gate
//!
//! Caps how many expensive operations (one `git blame` process each) run at
//! the same time. Permits are slots in a bounded crossbeam channel: acquiring
//! sends into the channel, releasing receives from it.

use crossbeam_channel::{bounded, Receiver, Sender};
use thiserror::Error;

/// Default number of simultaneous permits
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("concurrency gate capacity must be at least 1")]
    ZeroCapacity,
}

/// A counting permit pool of fixed capacity.
#[derive(Debug, Clone)]
pub struct Gate {
    slots: Sender<()>,
    returns: Receiver<()>,
    capacity: usize,
}

impl Gate {
    pub fn new(capacity: usize) -> Result<Self, GateError> {
        if capacity == 0 {
            return Err(GateError::ZeroCapacity);
        }
        let (slots, returns) = bounded(capacity);
        Ok(Self {
            slots,
            returns,
            capacity,
        })
    }

    /// Block until a permit is free. The permit is released when dropped.
    pub fn acquire(&self) -> Permit<'_> {
        // Both ends are owned by `self`, so the channel can't be disconnected here.
        let _ = self.slots.send(());
        Permit { gate: self }
    }

    /// Take a permit only if one is free right now.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        self.slots.try_send(()).ok().map(|_| Permit { gate: self })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held
    pub fn available(&self) -> usize {
        self.capacity - self.slots.len()
    }

    fn release(&self) {
        let _ = self.returns.try_recv();
    }
}

impl Default for Gate {
    fn default() -> Self {
        let (slots, returns) = bounded(DEFAULT_CONCURRENCY);
        Self {
            slots,
            returns,
            capacity: DEFAULT_CONCURRENCY,
        }
    }
}

/// A held gate permit.
#[must_use = "the permit is released as soon as it is dropped"]
#[derive(Debug)]
pub struct Permit<'a> {
    gate: &'a Gate,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
