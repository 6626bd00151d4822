//! Session context: the one owner of all mutable game state.
//!
//! Levels, the player, the rules and the door links travel together in a
//! [`Session`] that every engine operation borrows explicitly.

use log::{info, warn};
use std::collections::BTreeMap;
use std::path::Path;

use super::fog::FogLayer;
use super::grid::{Grid, Position};
use super::player::{Player, TOWN_LEVEL};
use super::LevelId;
use crate::config::{DoorConfig, GameRules, LevelConfig};
use crate::error::MapError;

/// A mine level: the true map and what the miner has seen of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub grid: Grid,
    pub fog: FogLayer,
}

impl Level {
    pub fn fogged(grid: Grid) -> Self {
        let fog = FogLayer::covering(&grid);
        Level { grid, fog }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InTown,
    InMine,
    /// Transient while the end-of-day sequence runs.
    EndOfDay,
}

/// Where each door leads. Tile-specific links win over level-wide ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoorLinks {
    by_level: BTreeMap<LevelId, LevelId>,
    by_tile: BTreeMap<(LevelId, Position), LevelId>,
}

impl DoorLinks {
    pub fn from_config(doors: &[DoorConfig]) -> Self {
        let mut links = DoorLinks::default();
        for d in doors {
            match (d.x, d.y) {
                (Some(x), Some(y)) => links.link_tile(d.from, Position::new(x, y), d.to),
                _ => links.link_level(d.from, d.to),
            }
        }
        links
    }

    /// Level 1 and level 2 lead into each other.
    pub fn two_level() -> Self {
        let mut links = DoorLinks::default();
        links.link_level(1, 2);
        links.link_level(2, 1);
        links
    }

    pub fn link_level(&mut self, from: LevelId, to: LevelId) {
        self.by_level.insert(from, to);
    }

    pub fn link_tile(&mut self, from: LevelId, at: Position, to: LevelId) {
        self.by_tile.insert((from, at), to);
    }

    pub fn destination(&self, level: LevelId, at: Position) -> Option<LevelId> {
        self.by_tile
            .get(&(level, at))
            .or_else(|| self.by_level.get(&level))
            .copied()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub levels: BTreeMap<LevelId, Level>,
    pub player: Player,
    pub rules: GameRules,
    pub doors: DoorLinks,
    pub phase: Phase,
}

impl Session {
    /// Start a fresh game on pristine copies of the level maps.
    pub fn new_game(
        name: &str,
        grids: &BTreeMap<LevelId, Grid>,
        rules: GameRules,
        doors: DoorLinks,
    ) -> Self {
        let levels: BTreeMap<LevelId, Level> = grids
            .iter()
            .map(|(id, g)| (*id, Level::fogged(g.clone())))
            .collect();
        let player = Player::new(name, &rules);
        let mut session = Session {
            levels,
            player,
            rules,
            doors,
            phase: Phase::InTown,
        };
        // The town square looks down into the first level.
        if let Some(level) = session.levels.get_mut(&TOWN_LEVEL) {
            level.fog.reveal_around(&level.grid, Position::ORIGIN, 1);
        }
        session
    }

    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.get(&id)
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(&self.player.level)
    }

    pub fn has_level(&self, id: LevelId) -> bool {
        self.levels.contains_key(&id)
    }

    /// Drop the miner at the remembered portal of the current level and look around.
    pub fn enter_mine(&mut self) {
        let level = self.player.level;
        self.player.pos = self.player.portal(level);
        self.phase = Phase::InMine;
        super::explore::reveal(self);
        info!(
            "{} enters level {} at ({}, {}) on day {}",
            crate::validation::escape_for_log(&self.player.name),
            level,
            self.player.pos.x,
            self.player.pos.y,
            self.player.day
        );
    }
}

/// Load every configured level. The first entry is required; later levels
/// that are missing on disk are skipped with a warning.
pub fn load_levels(levels: &[LevelConfig]) -> Result<BTreeMap<LevelId, Grid>, MapError> {
    let mut grids = BTreeMap::new();
    for (i, lc) in levels.iter().enumerate() {
        match Grid::load(Path::new(&lc.path)) {
            Ok(g) => {
                info!(
                    "Loaded level {} from {} ({}x{})",
                    lc.id,
                    lc.path,
                    g.width(),
                    g.height()
                );
                grids.insert(lc.id, g);
            }
            Err(MapError::NotFound(p)) if i > 0 => {
                warn!("Level {} map {} not found; its doors stay locked", lc.id, p);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(grids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn door_links_prefer_tile_overrides() {
        let mut links = DoorLinks::two_level();
        links.link_tile(1, Position::new(4, 4), 3);
        assert_eq!(links.destination(1, Position::new(1, 1)), Some(2));
        assert_eq!(links.destination(1, Position::new(4, 4)), Some(3));
        assert_eq!(links.destination(2, Position::new(4, 4)), Some(1));
        assert_eq!(links.destination(7, Position::ORIGIN), None);
    }

    #[test]
    fn door_links_from_config() {
        let links = DoorLinks::from_config(&[
            DoorConfig {
                from: 1,
                to: 2,
                x: None,
                y: None,
            },
            DoorConfig {
                from: 2,
                to: 3,
                x: Some(0),
                y: Some(5),
            },
        ]);
        assert_eq!(links.destination(1, Position::ORIGIN), Some(2));
        assert_eq!(links.destination(2, Position::new(0, 5)), Some(3));
        assert_eq!(links.destination(2, Position::ORIGIN), None);
    }

    #[test]
    fn new_game_reveals_town_corner_of_level_one() {
        let mut grids = BTreeMap::new();
        grids.insert(1, Grid::parse("  C \n    \n    ").unwrap());
        grids.insert(2, Grid::parse("    \n    ").unwrap());
        let s = Session::new_game("Ada", &grids, GameRules::default(), DoorLinks::two_level());
        assert_eq!(s.phase, Phase::InTown);
        assert_eq!(s.level(1).unwrap().fog.revealed_count(), 4);
        assert_eq!(s.level(2).unwrap().fog.revealed_count(), 0);
    }

    #[test]
    fn missing_optional_level_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let l1 = dir.path().join("level1.txt");
        std::fs::write(&l1, "C S\n G \n").unwrap();
        let cfg = vec![
            LevelConfig {
                id: 1,
                path: l1.to_string_lossy().to_string(),
            },
            LevelConfig {
                id: 2,
                path: dir.path().join("nope.txt").to_string_lossy().to_string(),
            },
        ];
        let grids = load_levels(&cfg).unwrap();
        assert_eq!(grids.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn missing_first_level_is_fatal() {
        let cfg = vec![LevelConfig {
            id: 1,
            path: "/nope/level1.txt".into(),
        }];
        assert!(matches!(load_levels(&cfg), Err(MapError::NotFound(_))));
    }
}
