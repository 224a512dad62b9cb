//! Entity/observer wiring example: an attacker computes its effect against a
//! capability-typed target, then publishes the outcome on its own bus.
//!
//! The attacker never knows which listeners exist; watching is entirely the
//! subscriber's business.

use brigade_bus::NotificationBus;
use brigade_types::Notification;

/// Hit points an entity starts with.
pub const STARTING_HP: u32 = 500;

/// Something that can receive damage.
pub trait Damageable {
    /// Apply `amount` of damage. Returns whether the target is still alive.
    fn take_damage(&mut self, amount: u32) -> bool;

    fn is_alive(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct Weapon {
    damage: u32,
}

impl Weapon {
    pub fn new(damage: u32) -> Self {
        Self { damage }
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }
}

// ---------------------------------------------------------------------------
// Fighter
// ---------------------------------------------------------------------------

/// An attacker with a weapon and its own notification bus.
pub struct Fighter {
    name: String,
    weapon: Weapon,
    bus: NotificationBus<Notification>,
}

impl Fighter {
    pub fn new(name: impl Into<String>, weapon: Weapon) -> Self {
        Self {
            name: name.into(),
            weapon,
            bus: NotificationBus::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bus(&self) -> &NotificationBus<Notification> {
        &self.bus
    }

    /// Strike the target, then publish the outcome. Returns whether the
    /// target survived.
    pub fn attack(&self, target: &mut dyn Damageable) -> bool {
        let damage = self.weapon.damage();
        let still_alive = target.take_damage(damage);
        self.bus.publish(&Notification::Attack {
            source: self.name.clone(),
            amount_inflicted: damage,
        });
        still_alive
    }
}

// ---------------------------------------------------------------------------
// Monster
// ---------------------------------------------------------------------------

/// A damageable entity that reports received damage on its own bus.
pub struct Monster {
    name: String,
    hp: u32,
    bus: NotificationBus<Notification>,
}

impl Monster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hp: STARTING_HP,
            bus: NotificationBus::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn bus(&self) -> &NotificationBus<Notification> {
        &self.bus
    }
}

impl Damageable for Monster {
    fn take_damage(&mut self, amount: u32) -> bool {
        self.hp = self.hp.saturating_sub(amount);
        self.bus.publish(&Notification::Defense {
            amount_received: amount,
        });
        self.is_alive()
    }

    fn is_alive(&self) -> bool {
        self.hp > 0
    }
}
