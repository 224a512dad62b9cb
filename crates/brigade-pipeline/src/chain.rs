//! Chain construction: link an ordered sequence of stations into a
//! singly-linked pipeline.

use std::sync::Arc;
use std::time::Duration;

use brigade_bus::NotificationBus;
use brigade_types::{BrigadeError, Notification, OrderKind, Result};

use crate::scheduler::Scheduler;
use crate::station::Station;

/// Collects stations in submission order and links them back-to-front.
///
/// `build` consumes the stations, so a built chain cannot be silently
/// re-linked afterwards; replacing a successor is only possible through the
/// explicit [`Station::set_next`], which documents its replace-tail
/// semantics.
#[derive(Default)]
pub struct ChainBuilder {
    stations: Vec<Station>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            stations: Vec::new(),
        }
    }

    /// Append a station to the end of the chain under construction.
    pub fn station(mut self, station: Station) -> Self {
        self.stations.push(station);
        self
    }

    /// Link the collected stations and return the chain head.
    ///
    /// Given [H0, H1, .., Hn] this sets `H0.next = H1`, .., `Hn.next = none`.
    /// An empty builder is rejected with [`BrigadeError::EmptyChain`].
    pub fn build(self) -> Result<Station> {
        let mut tail: Option<Station> = None;
        for mut station in self.stations.into_iter().rev() {
            if let Some(next) = tail.take() {
                station.set_next(next);
            }
            tail = Some(station);
        }
        tail.ok_or(BrigadeError::EmptyChain)
    }
}

/// The stock kitchen chain: Sushi(+1000) -> Dessert(+2000) -> Special(+5000)
/// -> Announce.
pub fn standard_kitchen(
    bus: NotificationBus<Notification>,
    scheduler: Arc<dyn Scheduler>,
    announce_delay: Duration,
) -> Result<Station> {
    ChainBuilder::new()
        .station(Station::produce("sushi chef", OrderKind::Sushi, 1000))
        .station(Station::produce("dessert chef", OrderKind::Dessert, 2000))
        .station(Station::produce("master chef", OrderKind::Special, 5000))
        .station(Station::announce("waiter", bus, scheduler, announce_delay))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brigade_types::Order;

    #[test]
    fn build_links_in_submission_order() {
        let head = ChainBuilder::new()
            .station(Station::produce("sushi chef", OrderKind::Sushi, 1000))
            .station(Station::produce("dessert chef", OrderKind::Dessert, 2000))
            .station(Station::produce("master chef", OrderKind::Special, 5000))
            .build()
            .unwrap();

        assert_eq!(head.chain_len(), 3);
        assert_eq!(head.name(), "sushi chef");
        assert_eq!(head.next().unwrap().name(), "dessert chef");
        assert_eq!(head.next().unwrap().next().unwrap().name(), "master chef");
        assert!(head.next().unwrap().next().unwrap().next().is_none());
    }

    #[test]
    fn empty_builder_is_rejected() {
        let err = ChainBuilder::new().build().unwrap_err();
        assert!(matches!(err, BrigadeError::EmptyChain));
    }

    #[test]
    fn single_production_with_disjoint_triggers() {
        // P1: disjoint triggers, the one matching station credits exactly
        // its own increment.
        let head = ChainBuilder::new()
            .station(Station::produce("sushi chef", OrderKind::Sushi, 1000))
            .station(Station::produce("dessert chef", OrderKind::Dessert, 2000))
            .station(Station::produce("master chef", OrderKind::Special, 5000))
            .build()
            .unwrap();

        let mut order = Order::new(OrderKind::Dessert);
        head.process(&mut order).unwrap();
        assert_eq!(order.grand_total(), 2000);
        assert!(order.is_finished());
    }

    #[test]
    fn appending_stations_after_the_match_changes_nothing() {
        // P3: the matching station's contribution is independent of what
        // comes after it.
        let short = ChainBuilder::new()
            .station(Station::produce("sushi chef", OrderKind::Sushi, 1000))
            .build()
            .unwrap();
        let long = ChainBuilder::new()
            .station(Station::produce("sushi chef", OrderKind::Sushi, 1000))
            .station(Station::produce("dessert chef", OrderKind::Dessert, 2000))
            .station(Station::produce("master chef", OrderKind::Special, 5000))
            .build()
            .unwrap();

        let mut a = Order::new(OrderKind::Sushi);
        short.process(&mut a).unwrap();
        let mut b = Order::new(OrderKind::Sushi);
        long.process(&mut b).unwrap();

        assert_eq!(a.grand_total(), 1000);
        assert_eq!(b.grand_total(), 1000);
    }

    #[test]
    fn overlapping_triggers_double_credit() {
        // Configuration invariant, not an engine guarantee: two stations
        // triggering on the same kind both apply their action.
        let head = ChainBuilder::new()
            .station(Station::produce("master chef", OrderKind::Special, 5000))
            .station(Station::produce("sous chef", OrderKind::Special, 7000))
            .build()
            .unwrap();

        let mut order = Order::new(OrderKind::Special);
        head.process(&mut order).unwrap();
        assert_eq!(order.grand_total(), 12000);
    }

    #[test]
    fn traversal_deeper_than_limit_is_reported() {
        let mut builder = ChainBuilder::new();
        for i in 0..=crate::station::MAX_CHAIN_DEPTH {
            builder = builder.station(Station::produce(
                format!("station {i}"),
                OrderKind::Sushi,
                1,
            ));
        }
        let head = builder.build().unwrap();

        let mut order = Order::new(OrderKind::Sushi);
        let err = head.process(&mut order).unwrap_err();
        assert!(matches!(err, BrigadeError::ChainTooDeep { .. }));
    }
}
