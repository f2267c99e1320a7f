//! Typed notification channels.
//!
//! Each event the framework raises is a declared [`EventChannel`] with a
//! fixed payload type. Listeners return a [`Signal`]; on cancellable
//! channels the first `Signal::Cancel` stops delivery and tells the emitter
//! to abort what it was about to do.

use std::fmt;
use std::sync::{Arc, RwLock};

/// Listener verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    #[default]
    Continue,
    Cancel,
}

type Listener<P> = Arc<dyn Fn(&P) -> Signal + Send + Sync>;

/// A named channel delivering `&P` to subscribed listeners in subscription order.
pub struct EventChannel<P: ?Sized> {
    name: String,
    listeners: RwLock<Vec<Listener<P>>>,
}

impl<P: ?Sized> fmt::Debug for EventChannel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("name", &self.name)
            .field("listeners", &self.len())
            .finish()
    }
}

impl<P: ?Sized> EventChannel<P> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subscribe a listener.
    pub fn on<F>(&self, listener: F)
    where
        F: Fn(&P) -> Signal + Send + Sync + 'static,
    {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(Arc::new(listener));
        }
    }

    /// Subscribe a listener that never cancels.
    pub fn observe<F>(&self, listener: F)
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.on(move |payload| {
            listener(payload);
            Signal::Continue
        });
    }

    /// Drop every listener.
    pub fn clear(&self) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.clear();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.read().map(|l| l.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `payload`. Returns `false` as soon as a listener cancels.
    ///
    /// Listeners run against a snapshot, so they may subscribe further
    /// listeners to this channel without deadlocking.
    pub fn fire(&self, payload: &P) -> bool {
        let snapshot: Vec<Listener<P>> = match self.listeners.read() {
            Ok(listeners) => listeners.clone(),
            Err(_) => return true,
        };
        for listener in snapshot {
            if listener(payload) == Signal::Cancel {
                tracing::debug!(event = %self.name, "Event cancelled by listener");
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_fire_without_listeners_continues() {
        let channel: EventChannel<str> = EventChannel::new("change");
        assert!(channel.fire("anything"));
    }

    #[test]
    fn test_cancel_stops_delivery() {
        let channel: EventChannel<u32> = EventChannel::new("before_save");
        let calls = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&calls);
        channel.on(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Signal::Cancel
        });
        let c = Arc::clone(&calls);
        channel.observe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!channel.fire(&1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_removes_listeners() {
        let channel: EventChannel<u32> = EventChannel::new("x");
        channel.on(|_| Signal::Cancel);
        assert_eq!(channel.len(), 1);
        channel.clear();
        assert!(channel.is_empty());
        assert!(channel.fire(&0));
    }
}
