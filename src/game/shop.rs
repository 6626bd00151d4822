//! Town shop: pickaxe tiers, bigger backpacks and the magic torch.

use super::player::{Player, MAX_PICKAXE};
use crate::config::GameRules;
use crate::error::ShopError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopItem {
    Pickaxe,
    Backpack,
    Torch,
}

impl ShopItem {
    pub fn from_key(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(ShopItem::Pickaxe),
            'b' => Some(ShopItem::Backpack),
            't' => Some(ShopItem::Torch),
            _ => None,
        }
    }
}

/// A line on the shop menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub item: ShopItem,
    pub cost: u32,
    pub label: String,
}

/// What the shop currently offers this player; sold-out items are omitted.
pub fn offers(player: &Player, rules: &GameRules) -> Vec<Offer> {
    let mut v = Vec::new();
    if player.pickaxe < MAX_PICKAXE {
        let tier = player.pickaxe + 1;
        if let Some(cost) = rules.pickaxe_price(tier) {
            let metal = if tier == 2 { "silver" } else { "gold" };
            v.push(Offer {
                item: ShopItem::Pickaxe,
                cost,
                label: format!(
                    "(P)ickaxe upgrade to Level {} to mine {} ore for {} GP",
                    tier, metal, cost
                ),
            });
        }
    }
    let cost = rules.backpack_upgrade_cost(player.capacity);
    v.push(Offer {
        item: ShopItem::Backpack,
        cost,
        label: format!(
            "(B)ackpack upgrade to carry {} items for {} GP",
            player.capacity + rules.backpack_step,
            cost
        ),
    });
    if !player.torch {
        v.push(Offer {
            item: ShopItem::Torch,
            cost: rules.torch_price,
            label: format!(
                "(T)orch (magic) purchase for {} GP (increases viewport to 5x5)",
                rules.torch_price
            ),
        });
    }
    v
}

fn charge(player: &mut Player, cost: u32) -> Result<(), ShopError> {
    if player.gp < cost {
        return Err(ShopError::InsufficientFunds {
            cost,
            balance: player.gp,
        });
    }
    player.gp -= cost;
    Ok(())
}

/// Buy `item`. Nothing changes unless the purchase succeeds.
pub fn buy(player: &mut Player, rules: &GameRules, item: ShopItem) -> Result<&'static str, ShopError> {
    match item {
        ShopItem::Pickaxe => {
            let tier = player.pickaxe + 1;
            let cost = match rules.pickaxe_price(tier) {
                Some(c) if player.pickaxe < MAX_PICKAXE => c,
                _ => return Err(ShopError::PickaxeMaxed),
            };
            charge(player, cost)?;
            player.pickaxe = tier;
            Ok("Congratulations! You can now mine deeper ore.")
        }
        ShopItem::Backpack => {
            charge(player, rules.backpack_upgrade_cost(player.capacity))?;
            player.capacity += rules.backpack_step;
            Ok("Congratulations! Your backpack holds more now.")
        }
        ShopItem::Torch => {
            if player.torch {
                return Err(ShopError::TorchOwned);
            }
            charge(player, rules.torch_price)?;
            player.torch = true;
            Ok("You purchased the Magic Torch! Your viewport is now 5x5.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich() -> (Player, GameRules) {
        let rules = GameRules::default();
        let mut p = Player::new("Ada", &rules);
        p.gp = 1_000;
        (p, rules)
    }

    #[test]
    fn pickaxe_upgrades_to_max_then_stops() {
        let (mut p, rules) = rich();
        buy(&mut p, &rules, ShopItem::Pickaxe).unwrap();
        assert_eq!((p.pickaxe, p.gp), (2, 950));
        buy(&mut p, &rules, ShopItem::Pickaxe).unwrap();
        assert_eq!((p.pickaxe, p.gp), (3, 800));
        assert_eq!(buy(&mut p, &rules, ShopItem::Pickaxe), Err(ShopError::PickaxeMaxed));
        assert!(offers(&p, &rules).iter().all(|o| o.item != ShopItem::Pickaxe));
    }

    #[test]
    fn backpack_cost_scales_with_capacity() {
        let (mut p, rules) = rich();
        buy(&mut p, &rules, ShopItem::Backpack).unwrap();
        assert_eq!((p.capacity, p.gp), (12, 980));
        buy(&mut p, &rules, ShopItem::Backpack).unwrap();
        assert_eq!((p.capacity, p.gp), (14, 956));
    }

    #[test]
    fn torch_is_bought_once() {
        let (mut p, rules) = rich();
        buy(&mut p, &rules, ShopItem::Torch).unwrap();
        assert!(p.torch);
        assert_eq!(p.view_radius(), 2);
        assert_eq!(buy(&mut p, &rules, ShopItem::Torch), Err(ShopError::TorchOwned));
        assert_eq!(p.gp, 950);
    }

    #[test]
    fn insufficient_funds_changes_nothing() {
        let rules = GameRules::default();
        let mut p = Player::new("Ada", &rules);
        p.gp = 19;
        let err = buy(&mut p, &rules, ShopItem::Backpack).unwrap_err();
        assert_eq!(err, ShopError::InsufficientFunds { cost: 20, balance: 19 });
        assert_eq!((p.capacity, p.gp), (10, 19));
    }

    #[test]
    fn offers_describe_next_upgrades() {
        let (p, rules) = rich();
        let labels: Vec<String> = offers(&p, &rules).into_iter().map(|o| o.label).collect();
        assert_eq!(labels.len(), 3);
        assert!(labels[0].contains("Level 2 to mine silver ore for 50 GP"));
        assert!(labels[1].contains("carry 12 items for 20 GP"));
    }
}
