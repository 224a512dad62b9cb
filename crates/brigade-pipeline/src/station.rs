//! Station — one link in the order processing chain.
//!
//! A station is data, not a subclass: a trigger (capability test), an action
//! closure, and an owned `next` pointer. Traversal walks the chain
//! iteratively; the `Box` ownership of `next` makes cycles unrepresentable,
//! and a depth guard converts a pathologically long chain into an error
//! instead of unbounded work.

use std::sync::Arc;
use std::time::Duration;

use brigade_bus::NotificationBus;
use brigade_types::{BrigadeError, Notification, Order, OrderKind, Result};

use crate::scheduler::Scheduler;

/// Upper bound on stations visited in one traversal.
pub const MAX_CHAIN_DEPTH: usize = 64;

/// Delay before the terminal station announces a finished order.
pub const DEFAULT_ANNOUNCE_DELAY: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Trigger and Flow
// ---------------------------------------------------------------------------

/// The capability test deciding whether a station acts on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fires on orders of the given kind (producing stations).
    Kind(OrderKind),
    /// Fires on finished orders (the terminal announcer).
    Finished,
}

impl Trigger {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Trigger::Kind(kind) => order.kind() == *kind,
            Trigger::Finished => order.is_finished(),
        }
    }
}

/// What a triggered action tells the traversal to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Forward the order to the next station (if any).
    Continue,
    /// Terminal action performed; stop the traversal here.
    Stop,
}

type Action = Box<dyn Fn(&mut Order) -> Flow + Send + Sync>;

// ---------------------------------------------------------------------------
// Station
// ---------------------------------------------------------------------------

/// A single pipeline stage: trigger, action, and the next station in line.
///
/// Stations hold no per-order state, so concurrent traversals of different
/// orders through the same chain are safe.
pub struct Station {
    name: String,
    trigger: Trigger,
    action: Action,
    next: Option<Box<Station>>,
}

impl std::fmt::Debug for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Station")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

impl Station {
    /// Build a station from a trigger and an action closure.
    pub fn new(
        name: impl Into<String>,
        trigger: Trigger,
        action: impl Fn(&mut Order) -> Flow + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            trigger,
            action: Box::new(action),
            next: None,
        }
    }

    /// A producing station: on a matching kind it logs, adds `price` to the
    /// order total, finishes the order, and forwards it.
    pub fn produce(name: impl Into<String>, kind: OrderKind, price: u64) -> Self {
        let name = name.into();
        let station = name.clone();
        Self::new(name, Trigger::Kind(kind), move |order: &mut Order| {
            tracing::info!(station = %station, kind = %kind, "producing");
            order.add_price(price);
            order.finish();
            Flow::Continue
        })
    }

    /// The terminal station: on a finished order it logs readiness, schedules
    /// a deferred [`Notification::OrderReady`] publish, and stops the
    /// traversal. The chain call returns once the deferred task is scheduled,
    /// not when it fires; callers observe the announcement through the bus.
    pub fn announce(
        name: impl Into<String>,
        bus: NotificationBus<Notification>,
        scheduler: Arc<dyn Scheduler>,
        delay: Duration,
    ) -> Self {
        let name = name.into();
        let station = name.clone();
        Self::new(name, Trigger::Finished, move |order: &mut Order| {
            tracing::info!(station = %station, kind = %order.kind(), "order is ready");
            let ready = Notification::OrderReady {
                order: order.kind(),
                grand_total: order.grand_total(),
            };
            let bus = bus.clone();
            scheduler.schedule(delay, Box::new(move || bus.publish(&ready)));
            Flow::Stop
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn next(&self) -> Option<&Station> {
        self.next.as_deref()
    }

    /// Set the successor, returning a reference to it for chaining.
    ///
    /// Replace-tail semantics: any previously linked successor (and
    /// everything after it) is dropped.
    pub fn set_next(&mut self, next: Station) -> &mut Station {
        &mut **self.next.insert(Box::new(next))
    }

    /// Number of stations reachable from this one, self included.
    pub fn chain_len(&self) -> usize {
        let mut len = 1;
        let mut current = self;
        while let Some(next) = current.next.as_deref() {
            len += 1;
            current = next;
        }
        len
    }

    /// Walk the order down the chain.
    ///
    /// Each station whose trigger matches runs its action; the order is then
    /// forwarded unless the action said [`Flow::Stop`] or the tail was
    /// reached. An order no station recognizes ends silently with
    /// `is_finished() == false`; that is a normal terminal state, not an
    /// error. The only failure is [`BrigadeError::ChainTooDeep`].
    pub fn process(&self, order: &mut Order) -> Result<()> {
        let mut current = self;
        let mut depth = 0usize;
        loop {
            depth += 1;
            if depth > MAX_CHAIN_DEPTH {
                return Err(BrigadeError::ChainTooDeep {
                    limit: MAX_CHAIN_DEPTH,
                });
            }
            let flow = if current.trigger.matches(order) {
                (current.action)(order)
            } else {
                Flow::Continue
            };
            match flow {
                Flow::Stop => return Ok(()),
                Flow::Continue => match current.next.as_deref() {
                    Some(next) => current = next,
                    None => return Ok(()),
                },
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
