//! Pending client reads and their completion rendezvous.

use crate::client::SharedSink;
use iiod_core::Result;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

/// One outstanding client read attached to a device entry.
///
/// Created by the dispatcher on the caller's thread, moved into the entry's
/// subscriber list, and from then on owned by the reader task, which unlinks
/// it and fires `done` exactly once with the terminal status. The caller
/// keeps only its clone of the completion handle.
pub(crate) struct Subscriber {
    /// Samples still owed to this client.
    pub(crate) remaining: usize,
    pub(crate) sink: SharedSink,
    pub(crate) verbose: bool,
    pub(crate) done: Arc<Completion>,
}

/// Single-fire status slot a caller blocks on until its subscriber is
/// retired.
///
/// `signal` publishes the terminal status and wakes the waiter; the first
/// signal wins and later ones are dropped, so teardown paths can signal
/// without tracking whether the loop already did.
pub(crate) struct Completion {
    slot: Mutex<Option<Result<()>>>,
    cond: Condvar,
}

impl Completion {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            cond: Condvar::new(),
        }
    }

    /// Publish the terminal status and wake the waiting caller.
    pub(crate) fn signal(&self, status: Result<()>) {
        let mut slot = self.slot.lock();
        if slot.is_none() {
            *slot = Some(status);
            self.cond.notify_one();
        }
    }

    /// Block until signalled; returns the terminal status.
    pub(crate) fn wait(&self) -> Result<()> {
        let mut slot = self.slot.lock();
        loop {
            if let Some(status) = slot.as_ref() {
                return status.clone();
            }
            self.cond.wait(&mut slot);
        }
    }
}
