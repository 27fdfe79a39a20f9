//! Session-expired signal
//!
//! A tiny observer registry standing in for the browser-level
//! `stacktrail:unauthorized` event. The API gateway emits it when the backend
//! answers 401; the session store and any UI shell subscribe to it. Neither
//! side holds a reference to the other.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Name of the signal, kept for logs and for parity with the browser event.
pub const SESSION_EXPIRED_EVENT: &str = "stacktrail:unauthorized";

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`SessionSignal::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
}

/// Cloneable handle to a shared session-expired signal.
#[derive(Clone, Default)]
pub struct SessionSignal {
    inner: Arc<Registry>,
}

impl SessionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, called every time the signal fires.
    ///
    /// The session store must subscribe before any other listener so that
    /// later listeners already see it cleared.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Fire the signal. Listeners run synchronously, in subscription order,
    /// so a listener registered before the store still sees the old session.
    pub fn emit(&self) {
        // Snapshot first: a listener may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(
            event = SESSION_EXPIRED_EVENT,
            listeners = listeners.len(),
            "Emitting session signal"
        );

        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }
}

impl std::fmt::Debug for SessionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSignal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_emit_calls_every_listener() {
        let signal = SessionSignal::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            signal.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        signal.emit();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let signal = SessionSignal::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let id = {
            let hits = Arc::clone(&hits);
            signal.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };

        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));

        signal.emit();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn test_clones_share_listeners() {
        let signal = SessionSignal::new();
        let other = signal.clone();
        let hits = Arc::new(AtomicUsize::new(0));

        {
            let hits = Arc::clone(&hits);
            other.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        signal.emit();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_may_subscribe_during_emit() {
        let signal = SessionSignal::new();
        let inner = signal.clone();

        signal.subscribe(move || {
            inner.subscribe(|| {});
        });

        signal.emit();
        assert_eq!(signal.listener_count(), 2);
    }
}
