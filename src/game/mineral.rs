//! Ore catalogue: map codes, pickaxe requirements, yield and price ranges.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mineral {
    Copper,
    Silver,
    Gold,
}

/// Per-mineral numbers: (pickaxe tier, pieces per dig, GP per piece).
fn mineral_stats(m: Mineral) -> (u8, (u32, u32), (u32, u32)) {
    match m {
        Mineral::Copper => (1, (1, 5), (1, 3)),
        Mineral::Silver => (2, (1, 3), (5, 8)),
        Mineral::Gold => (3, (1, 2), (10, 18)),
    }
}

impl Mineral {
    pub const ALL: [Mineral; 3] = [Mineral::Copper, Mineral::Silver, Mineral::Gold];

    /// Order used when refilling the backpack from the warehouse: most valuable first.
    pub const BY_VALUE_DESC: [Mineral; 3] = [Mineral::Gold, Mineral::Silver, Mineral::Copper];

    pub fn code(self) -> char {
        match self {
            Mineral::Copper => 'C',
            Mineral::Silver => 'S',
            Mineral::Gold => 'G',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        match c {
            'C' => Some(Mineral::Copper),
            'S' => Some(Mineral::Silver),
            'G' => Some(Mineral::Gold),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mineral::Copper => "copper",
            Mineral::Silver => "silver",
            Mineral::Gold => "gold",
        }
    }

    /// Minimum pickaxe tier able to dig this ore.
    pub fn required_pickaxe(self) -> u8 {
        mineral_stats(self).0
    }

    pub fn yield_range(self) -> RangeInclusive<u32> {
        let (lo, hi) = mineral_stats(self).1;
        lo..=hi
    }

    pub fn price_range(self) -> RangeInclusive<u32> {
        let (lo, hi) = mineral_stats(self).2;
        lo..=hi
    }

    pub fn roll_yield<R: Rng + ?Sized>(self, rng: &mut R) -> u32 {
        rng.gen_range(self.yield_range())
    }

    pub fn roll_price<R: Rng + ?Sized>(self, rng: &mut R) -> u32 {
        rng.gen_range(self.price_range())
    }
}

impl fmt::Display for Mineral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weighted pick of a freshly spawned ore: 70% copper, 25% silver, 5% gold.
pub fn roll_spawn<R: Rng + ?Sized>(rng: &mut R) -> Mineral {
    let r: f64 = rng.gen();
    if r < 0.70 {
        Mineral::Copper
    } else if r < 0.95 {
        Mineral::Silver
    } else {
        Mineral::Gold
    }
}

/// Piece counts for each ore type. Used for both the backpack and the warehouse.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MineralCounts {
    pub copper: u32,
    pub silver: u32,
    pub gold: u32,
}

impl MineralCounts {
    pub fn new(copper: u32, silver: u32, gold: u32) -> Self {
        MineralCounts {
            copper,
            silver,
            gold,
        }
    }

    pub fn get(&self, m: Mineral) -> u32 {
        match m {
            Mineral::Copper => self.copper,
            Mineral::Silver => self.silver,
            Mineral::Gold => self.gold,
        }
    }

    pub fn get_mut(&mut self, m: Mineral) -> &mut u32 {
        match m {
            Mineral::Copper => &mut self.copper,
            Mineral::Silver => &mut self.silver,
            Mineral::Gold => &mut self.gold,
        }
    }

    pub fn total(&self) -> u32 {
        self.copper
            .saturating_add(self.silver)
            .saturating_add(self.gold)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Pairs in catalogue order (copper, silver, gold).
    pub fn iter(&self) -> impl Iterator<Item = (Mineral, u32)> + '_ {
        Mineral::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}
