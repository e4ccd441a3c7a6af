//! Persisted player progress: coin wallet, unlocked variants, equipped variant
//!
//! Record shape: `{"coins": 12, "unlocked": [0, 2], "current": 2}`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::variants::Variant;

/// Result of a shop selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopOutcome {
    /// Coins deducted, variant unlocked and equipped
    Purchased { price: u32 },
    /// Already owned, now equipped
    Equipped,
    /// Already equipped, nothing changed
    AlreadyEquipped,
    /// Not enough coins, nothing changed
    InsufficientFunds { price: u32, balance: u32 },
}

impl ShopOutcome {
    /// Whether progress was mutated (and must be persisted)
    pub fn changed(&self) -> bool {
        matches!(self, ShopOutcome::Purchased { .. } | ShopOutcome::Equipped)
    }
}

/// Player progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    coins: u32,
    unlocked: BTreeSet<u8>,
    #[serde(rename = "current")]
    equipped: u8,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            coins: 0,
            unlocked: BTreeSet::from([Variant::Classic.index()]),
            equipped: Variant::Classic.index(),
        }
    }
}

impl Progress {
    /// Build progress from raw parts, restoring the invariants
    pub fn new(coins: u32, unlocked: impl IntoIterator<Item = u8>, equipped: u8) -> Self {
        Self {
            coins,
            unlocked: unlocked.into_iter().collect(),
            equipped,
        }
        .normalized()
    }

    /// Restore invariants on a freshly decoded record
    ///
    /// Index 0 is always unlocked, unknown indices are dropped and an equipped
    /// index outside the unlocked set falls back to 0.
    pub fn normalized(mut self) -> Self {
        self.unlocked.retain(|&i| Variant::from_index(i).is_some());
        self.unlocked.insert(Variant::Classic.index());
        if !self.unlocked.contains(&self.equipped) {
            self.equipped = Variant::Classic.index();
        }
        self
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn equipped(&self) -> Variant {
        Variant::from_index(self.equipped).unwrap_or_default()
    }

    pub fn is_unlocked(&self, variant: Variant) -> bool {
        self.unlocked.contains(&variant.index())
    }

    pub fn is_equipped(&self, variant: Variant) -> bool {
        self.equipped == variant.index()
    }

    /// Unlocked variants in shop order
    pub fn unlocked(&self) -> impl Iterator<Item = Variant> + '_ {
        self.unlocked.iter().filter_map(|&i| Variant::from_index(i))
    }

    /// Credit coins (pickups)
    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Shop selection: buy a locked variant or equip an owned one
    pub fn select(&mut self, variant: Variant) -> ShopOutcome {
        if self.is_unlocked(variant) {
            if self.is_equipped(variant) {
                return ShopOutcome::AlreadyEquipped;
            }
            self.equipped = variant.index();
            return ShopOutcome::Equipped;
        }

        let price = variant.price();
        if self.coins < price {
            return ShopOutcome::InsufficientFunds {
                price,
                balance: self.coins,
            };
        }

        self.coins -= price;
        self.unlocked.insert(variant.index());
        self.equipped = variant.index();
        ShopOutcome::Purchased { price }
    }
}
