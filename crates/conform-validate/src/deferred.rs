//! # Deferred Delivery
//!
//! A FIFO of pending callback deliveries. Scheduling never runs anything;
//! deliveries happen only when the owner drains the queue, which stands in
//! for the host's "after the current call stack unwinds" point.
//!
//! The lock is held only to push or pop, never while a delivery runs, so a
//! delivery may schedule further deliveries. Those run in the same drain,
//! after everything scheduled before them.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

type Delivery = Box<dyn FnOnce() + Send>;

#[derive(Default)]
pub struct DeferredQueue {
    pending: Mutex<VecDeque<Delivery>>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&self, delivery: impl FnOnce() + Send + 'static) {
        let mut pending = self.pending.lock();
        pending.push_back(Box::new(delivery));
        tracing::trace!(pending = pending.len(), "delivery scheduled");
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Run deliveries in scheduling order until none are left. Returns how
    /// many ran.
    pub fn drain(&self) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.pending.lock().pop_front();
            let Some(delivery) = next else {
                break;
            };
            delivery();
            delivered += 1;
        }
        if delivered > 0 {
            tracing::trace!(delivered, "deferred deliveries drained");
        }
        delivered
    }
}

impl fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
