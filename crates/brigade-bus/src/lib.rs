//! Notification bus for Brigade.
//!
//! A [`NotificationBus`] is an insertion-ordered registry of listeners that
//! delivers events synchronously to every current subscriber. Emitters and
//! listeners are fully decoupled: an emitter publishes to its own bus without
//! knowing which listeners exist, and listener registration is the watcher's
//! responsibility.
//!
//! Delivery discipline: `publish` snapshots the registry at entry and drops
//! the lock before invoking any listener, so subscribing or unsubscribing
//! mid-delivery never skips or duplicates delivery for the in-flight publish.
//! A listener that fails is logged and isolated; it never aborts the
//! broadcast.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::Serialize;

use brigade_types::{BrigadeError, Result};

// ---------------------------------------------------------------------------
// Listener trait
// ---------------------------------------------------------------------------

/// A consumer of published events.
pub trait Listener<E>: Send + Sync {
    /// Listener identifier used in log lines when delivery fails.
    fn name(&self) -> &str;

    /// Handle one event. Returning `Err` is isolated by the bus: the error is
    /// logged and delivery continues with the next subscriber.
    fn on_event(&self, event: &E) -> Result<()>;
}

// ---------------------------------------------------------------------------
// NotificationBus
// ---------------------------------------------------------------------------

struct Registry<E> {
    next_id: u64,
    entries: Vec<(u64, Arc<dyn Listener<E>>)>,
}

/// Insertion-ordered publish/subscribe registry.
///
/// Cloning a bus yields another handle to the **same** registry, so an
/// emitter can hand out subscription access while keeping publish rights.
pub struct NotificationBus<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for NotificationBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for NotificationBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<E>(registry: &Mutex<Registry<E>>) -> MutexGuard<'_, Registry<E>> {
    // Listener state lives outside the registry, so a poisoned lock only
    // means a panic elsewhere; the entry list itself is still consistent.
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<E> NotificationBus<E> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a listener and return a handle that can remove it again.
    ///
    /// Registration is idempotent: subscribing the same listener (the same
    /// `Arc`) twice has no additional effect and returns a handle to the
    /// existing registration.
    pub fn subscribe(&self, listener: Arc<dyn Listener<E>>) -> SubscriptionHandle<E> {
        let mut guard = lock(&self.registry);
        if let Some((id, _)) = guard
            .entries
            .iter()
            .find(|(_, existing)| std::ptr::addr_eq(Arc::as_ptr(existing), Arc::as_ptr(&listener)))
        {
            return SubscriptionHandle {
                id: *id,
                registry: Arc::downgrade(&self.registry),
            };
        }
        let id = guard.next_id;
        guard.next_id += 1;
        guard.entries.push((id, listener));
        SubscriptionHandle {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Remove a listener directly, without a handle. Returns whether the
    /// listener was actually present.
    pub fn unsubscribe(&self, listener: &Arc<dyn Listener<E>>) -> bool {
        let mut guard = lock(&self.registry);
        let before = guard.entries.len();
        guard
            .entries
            .retain(|(_, existing)| !std::ptr::addr_eq(Arc::as_ptr(existing), Arc::as_ptr(listener)));
        guard.entries.len() != before
    }

    /// Deliver `event` to every currently subscribed listener, in
    /// subscription order.
    ///
    /// The subscriber set is snapshotted at entry: listeners added during the
    /// broadcast do not see this event, and a listener removing itself
    /// mid-delivery does not disturb delivery to the others. A listener
    /// returning `Err` is logged via `tracing::warn!` and skipped over.
    pub fn publish(&self, event: &E) {
        let snapshot: Vec<Arc<dyn Listener<E>>> = {
            let guard = lock(&self.registry);
            guard.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in snapshot {
            if let Err(err) = listener.on_event(event) {
                tracing::warn!(
                    listener = listener.name(),
                    error = %err,
                    "listener failed during publish"
                );
            }
        }
    }

    /// Remove every listener.
    pub fn clear(&self) {
        lock(&self.registry).entries.clear();
    }

    /// Number of current subscribers.
    pub fn len(&self) -> usize {
        lock(&self.registry).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// SubscriptionHandle
// ---------------------------------------------------------------------------

/// Token returned by [`NotificationBus::subscribe`]. Invoking
/// [`unsubscribe`](SubscriptionHandle::unsubscribe) removes exactly that
/// registration and reports whether removal occurred.
pub struct SubscriptionHandle<E> {
    id: u64,
    registry: Weak<Mutex<Registry<E>>>,
}

impl<E> SubscriptionHandle<E> {
    /// Remove the listener this handle was issued for.
    ///
    /// Returns `true` if the listener was still registered, `false` on a
    /// second call (or after the bus itself was dropped).
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut guard = lock(&registry);
        let before = guard.entries.len();
        guard.entries.retain(|(id, _)| *id != self.id);
        guard.entries.len() != before
    }
}

// ---------------------------------------------------------------------------
// LogListener — stock subscriber that renders payloads as JSON
// ---------------------------------------------------------------------------

/// A listener that logs each payload as a JSON line.
pub struct LogListener {
    name: String,
}

impl LogListener {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<E: Serialize> Listener<E> for LogListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, event: &E) -> Result<()> {
        let payload = serde_json::to_string(event).map_err(BrigadeError::from)?;
        tracing::info!(listener = %self.name, %payload, "event received");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
