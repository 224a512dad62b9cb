//! Shared types, errors, and the event payload for the Brigade order pipeline.
//!
//! This crate provides the foundational types used across all other Brigade crates:
//! - `BrigadeError` — unified error taxonomy
//! - `Order` — the mutable work item that travels through a station chain
//! - `Notification` — the tagged event payload carried by the notification bus

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error type for all Brigade subsystems.
#[derive(Debug, thiserror::Error)]
pub enum BrigadeError {
    #[error("Chain too deep: traversal exceeded {limit} stations")]
    ChainTooDeep { limit: usize },

    #[error("Empty chain: at least one station is required")]
    EmptyChain,

    #[error("Listener '{listener}' failed: {message}")]
    ListenerError { listener: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// A convenience alias for `Result<T, BrigadeError>`.
pub type Result<T> = std::result::Result<T, BrigadeError>;

// ---------------------------------------------------------------------------
// OrderKind — the closed set of order categories
// ---------------------------------------------------------------------------

/// The category of an [`Order`]. Closed set; `Drink` has no producing station
/// in the stock kitchen chain, so drink orders pass through unserviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Sushi,
    Dessert,
    Special,
    Drink,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderKind::Sushi => "sushi",
            OrderKind::Dessert => "dessert",
            OrderKind::Special => "special meal",
            OrderKind::Drink => "drink",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Order — the work item flowing through the chain
// ---------------------------------------------------------------------------

/// The mutable unit of work traveling through a station chain.
///
/// The kind is fixed at creation. `grand_total` starts at zero and is raised
/// only by stations whose trigger matched the order. `finish` latches the
/// order into its terminal state; there is no way back to pending.
#[derive(Debug)]
pub struct Order {
    kind: OrderKind,
    grand_total: u64,
    finished: bool,
}

impl Order {
    /// Create a fresh, pending order of the given kind.
    pub fn new(kind: OrderKind) -> Self {
        Self {
            kind,
            grand_total: 0,
            finished: false,
        }
    }

    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    /// Add to the running total. Only the station that serviced the order
    /// should call this; overlapping triggers double-credit (a chain
    /// configuration error, not guarded here).
    pub fn add_price(&mut self, amount: u64) {
        self.grand_total += amount;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Move the order from pending to finished. Idempotent; calling it on an
    /// already-finished order has no effect.
    pub fn finish(&mut self) {
        self.finished = true;
    }
}

// ---------------------------------------------------------------------------
// Notification — tagged event payload for the bus
// ---------------------------------------------------------------------------

/// Events carried by the notification bus.
///
/// A closed tagged union so every listener can exhaustively branch; new kinds
/// are added as variants without breaking listeners that ignore them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Attack {
        source: String,
        amount_inflicted: u32,
    },
    Defense {
        amount_received: u32,
    },
    OrderReady {
        order: OrderKind,
        grand_total: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- BrigadeError ---

    #[test]
    fn error_display_chain_too_deep() {
        let err = BrigadeError::ChainTooDeep { limit: 64 };
        assert_eq!(err.to_string(), "Chain too deep: traversal exceeded 64 stations");
    }

    #[test]
    fn error_display_empty_chain() {
        let err = BrigadeError::EmptyChain;
        assert_eq!(err.to_string(), "Empty chain: at least one station is required");
    }

    #[test]
    fn error_display_listener_error() {
        let err = BrigadeError::ListenerError {
            listener: "renderer".into(),
            message: "broken pipe".into(),
        };
        assert_eq!(err.to_string(), "Listener 'renderer' failed: broken pipe");
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: BrigadeError = json_err.into();
        assert!(matches!(err, BrigadeError::Json(_)));
    }

    // --- Order lifecycle ---

    #[test]
    fn new_order_is_pending_with_zero_total() {
        let order = Order::new(OrderKind::Sushi);
        assert_eq!(order.kind(), OrderKind::Sushi);
        assert_eq!(order.grand_total(), 0);
        assert!(!order.is_finished());
    }

    #[test]
    fn add_price_accumulates() {
        let mut order = Order::new(OrderKind::Dessert);
        order.add_price(2000);
        order.add_price(500);
        assert_eq!(order.grand_total(), 2500);
    }

    #[test]
    fn finish_is_a_one_way_latch() {
        let mut order = Order::new(OrderKind::Special);
        assert!(!order.is_finished());
        order.finish();
        assert!(order.is_finished());
        // Second call is a no-op, not an error.
        order.finish();
        assert!(order.is_finished());
    }

    // --- OrderKind ---

    #[test]
    fn order_kind_serializes_to_snake_case() {
        assert_eq!(serde_json::to_string(&OrderKind::Sushi).unwrap(), "\"sushi\"");
        assert_eq!(
            serde_json::to_string(&OrderKind::Special).unwrap(),
            "\"special\""
        );
    }

    #[test]
    fn order_kind_display() {
        assert_eq!(OrderKind::Special.to_string(), "special meal");
        assert_eq!(OrderKind::Drink.to_string(), "drink");
    }

    // --- Notification ---

    #[test]
    fn attack_serializes_with_kind_tag() {
        let event = Notification::Attack {
            source: "Player 1".into(),
            amount_inflicted: 50,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "attack");
        assert_eq!(json["source"], "Player 1");
        assert_eq!(json["amount_inflicted"], 50);
    }

    #[test]
    fn notification_round_trips() {
        let event = Notification::OrderReady {
            order: OrderKind::Special,
            grand_total: 5000,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn defense_deserializes_from_tagged_json() {
        let back: Notification =
            serde_json::from_str(r#"{"kind":"defense","amount_received":30}"#).unwrap();
        assert_eq!(back, Notification::Defense { amount_received: 30 });
    }
}
