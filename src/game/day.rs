//! The day cycle and the portal stone.
//!
//! Leaving the mine automatically (town portal tile, running out of turns, or
//! placing the portal stone) ends the day: the backpack is sold, the day
//! advances and ore regrows. Quitting to town by hand does none of that; it
//! only remembers where the miner stood.

use log::info;
use rand::Rng;
use std::collections::BTreeMap;

use super::economy::{self, SellOutcome, SellSource};
use super::grid::Tile;
use super::mineral;
use super::player::Player;
use super::session::{Level, Phase, Session};
use super::LevelId;
use crate::config::GameRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTrigger {
    /// Walked onto a `T` tile.
    TownPortal,
    /// Spent the last turn of the day.
    Exhausted,
    /// Placed the portal stone by hand.
    PortalStone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayReport {
    pub trigger: DayTrigger,
    pub sale: SellOutcome,
    /// The day that is now starting.
    pub day: u32,
    pub regenerated: usize,
}

/// Run the end-of-day sequence. Order matters: portal, sale, day and turns,
/// relocation, then regrowth across every loaded level.
pub fn end_of_day<R: Rng + ?Sized>(session: &mut Session, trigger: DayTrigger, rng: &mut R) -> DayReport {
    session.phase = Phase::EndOfDay;
    let player = &mut session.player;
    player.set_portal_here();
    let sale = economy::sell_all(player, SellSource::Backpack, rng);
    player.day = player.day.saturating_add(1);
    player.turns = session.rules.turns_per_day;
    player.relocate_to_town();

    let regenerated = regenerate(&mut session.levels, session.rules.regen_chance, rng);
    session.phase = Phase::InTown;
    info!(
        "day {} begins ({:?}); sold {} GP, balance {} GP, {} tiles regrew ore",
        session.player.day,
        trigger,
        sale.total(),
        session.player.gp,
        regenerated
    );
    DayReport {
        trigger,
        sale,
        day: session.player.day,
        regenerated,
    }
}

/// Place the portal stone where the miner stands and zap back to town.
pub fn place_portal<R: Rng + ?Sized>(session: &mut Session, rng: &mut R) -> DayReport {
    session.player.turns = session.player.turns.saturating_sub(1);
    end_of_day(session, DayTrigger::PortalStone, rng)
}

/// Walk out without ending the day: nothing is sold and no ore regrows.
pub fn quit_to_town(session: &mut Session) {
    session.player.set_portal_here();
    session.player.relocate_to_town();
    session.phase = Phase::InTown;
}

/// Each empty tile of every level independently sprouts ore with `chance`.
/// Returns the number of tiles that changed.
pub fn regenerate<R: Rng + ?Sized>(levels: &mut BTreeMap<LevelId, Level>, chance: f64, rng: &mut R) -> usize {
    let mut changed = 0;
    for level in levels.values_mut() {
        let empties: Vec<_> = level
            .grid
            .positions()
            .filter(|p| level.grid.get(*p) == Some(Tile::Empty))
            .collect();
        for pos in empties {
            if rng.gen_bool(chance) {
                level.grid.set(pos, Tile::Mineral(mineral::roll_spawn(rng)));
                changed += 1;
            }
        }
    }
    changed
}

pub fn has_won(player: &Player, rules: &GameRules) -> bool {
    player.gp >= rules.win_gp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::{Grid, Position};
    use crate::game::mineral::MineralCounts;
    use crate::game::session::DoorLinks;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> Session {
        let mut grids = BTreeMap::new();
        grids.insert(1, Grid::parse("     \n  D  \n     ").unwrap());
        grids.insert(2, Grid::parse("   \n   ").unwrap());
        let mut s = Session::new_game("Ada", &grids, GameRules::default(), DoorLinks::two_level());
        s.enter_mine();
        s
    }

    #[test]
    fn every_trigger_advances_exactly_one_day() {
        for trigger in [DayTrigger::TownPortal, DayTrigger::Exhausted, DayTrigger::PortalStone] {
            let mut s = session();
            s.player.turns = 7;
            s.player.pos = Position::new(4, 2);
            let mut rng = StdRng::seed_from_u64(3);
            let report = end_of_day(&mut s, trigger, &mut rng);
            assert_eq!(report.day, 2);
            assert_eq!(s.player.day, 2);
            assert_eq!(s.player.turns, 20);
            assert_eq!(s.player.pos, Position::ORIGIN);
            assert_eq!(s.player.level, 1);
            assert_eq!(s.player.portal(1), Position::new(4, 2));
            assert_eq!(s.phase, Phase::InTown);
        }
    }

    #[test]
    fn end_of_day_sells_backpack_but_not_warehouse() {
        let mut s = session();
        s.player.backpack = MineralCounts::new(2, 1, 0);
        s.player.warehouse = MineralCounts::new(5, 5, 5);
        let mut rng = StdRng::seed_from_u64(8);
        let report = end_of_day(&mut s, DayTrigger::PortalStone, &mut rng);
        assert!(s.player.backpack.is_empty());
        assert_eq!(s.player.warehouse, MineralCounts::new(5, 5, 5));
        assert!(report.sale.total() >= 2 + 5);
        assert_eq!(s.player.gp, report.sale.total());
    }

    #[test]
    fn portal_on_lower_level_is_kept_per_level() {
        let mut s = session();
        s.player.level = 2;
        s.player.pos = Position::new(2, 1);
        let mut rng = StdRng::seed_from_u64(8);
        end_of_day(&mut s, DayTrigger::Exhausted, &mut rng);
        assert_eq!(s.player.portal(2), Position::new(2, 1));
        assert_eq!(s.player.portal(1), Position::ORIGIN);
        assert_eq!(s.player.level, 1);
    }

    #[test]
    fn quit_to_town_keeps_day_turns_and_ore() {
        let mut s = session();
        s.player.turns = 9;
        s.player.pos = Position::new(3, 0);
        s.player.backpack = MineralCounts::new(4, 0, 0);
        let before = s.levels.clone();
        quit_to_town(&mut s);
        assert_eq!(s.player.day, 1);
        assert_eq!(s.player.turns, 9);
        assert_eq!(s.player.backpack.copper, 4);
        assert_eq!(s.player.gp, 0);
        assert_eq!(s.player.portal(1), Position::new(3, 0));
        assert_eq!(s.player.pos, Position::ORIGIN);
        assert_eq!(s.levels, before);
    }

    #[test]
    fn regeneration_only_touches_empty_tiles() {
        let mut s = session();
        let mut rng = StdRng::seed_from_u64(21);
        let changed = regenerate(&mut s.levels, 1.0, &mut rng);
        assert_eq!(changed, 14 + 6);
        let lvl = s.level(1).unwrap();
        assert_eq!(lvl.grid.get(Position::new(2, 1)), Some(Tile::Door));
        assert!(lvl
            .grid
            .positions()
            .filter(|p| *p != Position::new(2, 1))
            .all(|p| matches!(lvl.grid.get(p), Some(Tile::Mineral(_)))));
        assert_eq!(regenerate(&mut s.levels, 0.0, &mut rng), 0);
    }

    #[test]
    fn regeneration_rate_is_about_one_in_five() {
        let mut grids = BTreeMap::new();
        grids.insert(1, Grid::from_rows(&vec![" ".repeat(100); 100]).unwrap());
        let mut s = Session::new_game("Ada", &grids, GameRules::default(), DoorLinks::default());
        let mut rng = StdRng::seed_from_u64(77);
        let changed = regenerate(&mut s.levels, 0.2, &mut rng);
        assert!((1_800..2_200).contains(&changed), "changed {}", changed);
    }

    #[test]
    fn win_threshold_is_inclusive() {
        let rules = GameRules::default();
        let mut p = Player::new("Ada", &rules);
        p.gp = 799;
        assert!(!has_won(&p, &rules));
        p.gp = 800;
        assert!(has_won(&p, &rules));
    }
}
