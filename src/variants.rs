//! Cosmetic avatar variants sold in the shop
//!
//! A closed set indexed by a small integer; the index is what gets persisted.

use serde::{Deserialize, Serialize};

/// Static description of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantInfo {
    /// Name shown in the shop
    pub name: &'static str,
    /// Price in coins (0 = free)
    pub price: u32,
    /// Fallback fill color when no sprite is available
    pub color: [u8; 3],
    /// Sprite file name looked up by asset providers
    pub sprite_file: Option<&'static str>,
}

/// Selectable avatar identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Classic,
    Eagle,
    Dragon,
    Phoenix,
    Owl,
    Penguin,
}

const CATALOG: [VariantInfo; 6] = [
    VariantInfo {
        name: "Goldfinch",
        price: 0,
        color: [255, 215, 0],
        sprite_file: Some("bird_classic.png"),
    },
    VariantInfo {
        name: "Bald Eagle",
        price: 15,
        color: [139, 69, 19],
        sprite_file: Some("bird_eagle.jpg"),
    },
    VariantInfo {
        name: "Wyvern",
        price: 30,
        color: [34, 139, 34],
        sprite_file: Some("bird_dragon.png"),
    },
    VariantInfo {
        name: "Phoenix",
        price: 50,
        color: [255, 69, 0],
        sprite_file: Some("bird_phoenix.png"),
    },
    VariantInfo {
        name: "Snowy Owl",
        price: 75,
        color: [240, 240, 240],
        sprite_file: Some("bird_owl.png"),
    },
    VariantInfo {
        name: "Penguin",
        price: 100,
        color: [30, 30, 30],
        sprite_file: Some("bird_penguin.png"),
    },
];

impl Variant {
    /// All variants in shop order
    pub const ALL: [Variant; 6] = [
        Variant::Classic,
        Variant::Eagle,
        Variant::Dragon,
        Variant::Phoenix,
        Variant::Owl,
        Variant::Penguin,
    ];

    /// Persisted index
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn info(self) -> &'static VariantInfo {
        &CATALOG[self as usize]
    }

    pub fn price(self) -> u32 {
        self.info().price
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Fallback color as normalized RGBA
    pub fn color(self) -> [f32; 4] {
        let [r, g, b] = self.info().color;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, variant) in Variant::ALL.iter().enumerate() {
            assert_eq!(variant.index() as usize, i);
            assert_eq!(Variant::from_index(i as u8), Some(*variant));
        }
        assert_eq!(Variant::from_index(6), None);
    }

    #[test]
    fn test_default_variant_is_free() {
        assert_eq!(Variant::default(), Variant::Classic);
        assert_eq!(Variant::Classic.price(), 0);
    }

    #[test]
    fn test_prices_ascend_in_shop_order() {
        let prices: Vec<u32> = Variant::ALL.iter().map(|v| v.price()).collect();
        assert_eq!(prices, vec![0, 15, 30, 50, 75, 100]);
    }
}
