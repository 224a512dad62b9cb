//! Chained-handler order pipeline for Brigade.
//!
//! This crate implements the station chain (capability-tested handlers linked
//! into a singly-linked pipeline), the chain builder, the deferred-action
//! scheduler used by terminal stations, and the entity/observer combat
//! wiring example. The chain and the notification bus are separate,
//! composable mechanisms: `standard_kitchen` wires them together, while the
//! combat module uses the bus on its own.

pub mod chain;
pub mod combat;
pub mod scheduler;
pub mod station;

pub use chain::{standard_kitchen, ChainBuilder};
pub use combat::{Damageable, Fighter, Monster, Weapon, STARTING_HP};
pub use scheduler::{ManualScheduler, Scheduler, Task, TokioScheduler};
pub use station::{Flow, Station, Trigger, DEFAULT_ANNOUNCE_DELAY, MAX_CHAIN_DEPTH};
