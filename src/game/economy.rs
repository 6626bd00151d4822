//! Turning ore into GP, and moving ore between backpack and warehouse.
//!
//! Prices are drawn once per mineral per sale: every piece of silver sold in
//! one call fetches the same unit price.

use log::debug;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;

use super::mineral::{Mineral, MineralCounts};
use super::player::Player;
use crate::error::SellError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellSource {
    Backpack,
    Warehouse,
}

impl SellSource {
    fn counts(self, player: &Player) -> &MineralCounts {
        match self {
            SellSource::Backpack => &player.backpack,
            SellSource::Warehouse => &player.warehouse,
        }
    }

    fn counts_mut(self, player: &mut Player) -> &mut MineralCounts {
        match self {
            SellSource::Backpack => &mut player.backpack,
            SellSource::Warehouse => &mut player.warehouse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleLine {
    pub mineral: Mineral,
    pub quantity: u32,
    pub unit_price: u32,
    pub value: u32,
}

impl fmt::Display for SaleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You sell {} {} ore for {} GP.",
            self.quantity, self.mineral, self.value
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SellOutcome {
    Sold { lines: Vec<SaleLine>, total: u32 },
    NothingSold,
}

impl SellOutcome {
    pub fn total(&self) -> u32 {
        match self {
            SellOutcome::Sold { total, .. } => *total,
            SellOutcome::NothingSold => 0,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            SellOutcome::Sold { lines, .. } => lines.iter().map(|l| l.to_string()).collect(),
            SellOutcome::NothingSold => vec!["Nothing sold.".to_string()],
        }
    }
}

/// Sell from `source`. With `amounts`, only the named minerals are sold and
/// each amount must lie within `0..=available`; one bad amount rejects the
/// whole request untouched. Without `amounts`, everything in `source` is sold.
pub fn sell<R: Rng + ?Sized>(
    player: &mut Player,
    source: SellSource,
    amounts: Option<&BTreeMap<Mineral, i64>>,
    rng: &mut R,
) -> Result<SellOutcome, SellError> {
    let held = *source.counts(player);
    let plan: MineralCounts = match amounts {
        Some(req) => {
            let mut plan = MineralCounts::default();
            for (&mineral, &requested) in req {
                let available = held.get(mineral);
                if requested < 0 || requested > i64::from(available) {
                    return Err(SellError::InvalidAmount {
                        mineral,
                        requested,
                        available,
                    });
                }
                *plan.get_mut(mineral) = requested as u32;
            }
            plan
        }
        None => held,
    };

    let mut lines = Vec::new();
    let mut total: u32 = 0;
    for (mineral, quantity) in plan.iter() {
        if quantity == 0 {
            continue;
        }
        let unit_price = mineral.roll_price(rng);
        let value = unit_price.saturating_mul(quantity);
        let bin = source.counts_mut(player).get_mut(mineral);
        *bin -= quantity;
        total = total.saturating_add(value);
        lines.push(SaleLine {
            mineral,
            quantity,
            unit_price,
            value,
        });
    }
    player.gp = player.gp.saturating_add(total);

    if lines.is_empty() {
        return Ok(SellOutcome::NothingSold);
    }
    debug!("sold {:?} from {:?} for {} GP", plan, source, total);
    Ok(SellOutcome::Sold { lines, total })
}

/// Sell every piece in `source`; cannot fail.
pub fn sell_all<R: Rng + ?Sized>(player: &mut Player, source: SellSource, rng: &mut R) -> SellOutcome {
    sell(player, source, None, rng).unwrap_or(SellOutcome::NothingSold)
}

/// Move the whole backpack into the warehouse. Returns how many pieces moved.
pub fn store_all(player: &mut Player) -> u32 {
    let moved = player.backpack.total();
    for (mineral, n) in player.backpack.iter().collect::<Vec<_>>() {
        *player.warehouse.get_mut(mineral) += n;
    }
    player.backpack = MineralCounts::default();
    moved
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrieveOutcome {
    NoSpace,
    Moved(MineralCounts),
}

/// Refill the backpack from the warehouse, most valuable ore first.
pub fn retrieve(player: &mut Player) -> RetrieveOutcome {
    let mut space = player.space();
    if space == 0 {
        return RetrieveOutcome::NoSpace;
    }
    let mut moved = MineralCounts::default();
    for mineral in Mineral::BY_VALUE_DESC {
        let take = player.warehouse.get(mineral).min(space);
        if take == 0 {
            continue;
        }
        *player.warehouse.get_mut(mineral) -= take;
        *player.backpack.get_mut(mineral) += take;
        *moved.get_mut(mineral) = take;
        space -= take;
    }
    RetrieveOutcome::Moved(moved)
}
