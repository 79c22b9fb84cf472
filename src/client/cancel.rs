//! Registry of cancellable in-flight requests.
//!
//! Each pending request that takes part in cancellation owns an entry keyed by
//! its cancel key. Registering a key that is already pending aborts the older
//! request first, which is how duplicated requests get auto-cancelled.

use futures::future::{AbortHandle, AbortRegistration};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket identifying one registration, used to unregister only our own entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

#[derive(Debug, Default)]
pub(crate) struct CancelRegistry {
    controllers: Mutex<HashMap<String, (Ticket, AbortHandle)>>,
    next_ticket: AtomicU64,
}

impl CancelRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Abort any pending request under `key` and register a new one.
    pub(crate) fn register(&self, key: &str) -> (Ticket, AbortRegistration) {
        let (handle, registration) = AbortHandle::new_pair();
        let ticket = Ticket(self.next_ticket.fetch_add(1, Ordering::Relaxed));

        let previous = self
            .controllers
            .lock()
            .insert(key.to_string(), (ticket, handle));

        if let Some((_, old)) = previous {
            tracing::debug!("Cancelling duplicated request {}", key);
            old.abort();
        }

        (ticket, registration)
    }

    /// Remove `key` if it is still owned by `ticket`.
    pub(crate) fn finish(&self, key: &str, ticket: Ticket) {
        let mut controllers = self.controllers.lock();
        if controllers.get(key).is_some_and(|(t, _)| *t == ticket) {
            controllers.remove(key);
        }
    }

    /// Abort the request under `key`. Returns `false` if none was pending.
    pub(crate) fn cancel(&self, key: &str) -> bool {
        match self.controllers.lock().remove(key) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Abort every pending request.
    pub(crate) fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.controllers.lock().drain().collect();
        let count = drained.len();
        for (_, (_, handle)) in drained {
            handle.abort();
        }
        count
    }

    pub(crate) fn pending(&self) -> usize {
        self.controllers.lock().len()
    }
}
