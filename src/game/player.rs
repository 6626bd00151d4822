use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::grid::Position;
use super::mineral::MineralCounts;
use super::LevelId;
use crate::config::GameRules;

/// The level the town sits above; every return to town lands here.
pub const TOWN_LEVEL: LevelId = 1;

/// Highest pickaxe tier sold in town.
pub const MAX_PICKAXE: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub level: LevelId,
    pub pos: Position,
    /// Remembered mine-entry point per level.
    pub portals: BTreeMap<LevelId, Position>,
    pub capacity: u32,
    pub backpack: MineralCounts,
    pub warehouse: MineralCounts,
    pub gp: u32,
    pub day: u32,
    pub steps: u32,
    pub turns: u32,
    pub pickaxe: u8,
    pub torch: bool,
}

impl Player {
    pub fn new(name: &str, rules: &GameRules) -> Self {
        Player {
            name: name.to_string(),
            level: TOWN_LEVEL,
            pos: Position::ORIGIN,
            portals: BTreeMap::new(),
            capacity: rules.initial_capacity,
            backpack: MineralCounts::default(),
            warehouse: MineralCounts::default(),
            gp: 0,
            day: 1,
            steps: 0,
            turns: rules.turns_per_day,
            pickaxe: 1,
            torch: false,
        }
    }

    pub fn load(&self) -> u32 {
        self.backpack.total()
    }

    /// Free backpack slots.
    pub fn space(&self) -> u32 {
        self.capacity.saturating_sub(self.load())
    }

    /// Fog reveal radius: the magic torch widens the view to 5x5.
    pub fn view_radius(&self) -> usize {
        if self.torch {
            2
        } else {
            1
        }
    }

    pub fn portal(&self, level: LevelId) -> Position {
        self.portals.get(&level).copied().unwrap_or(Position::ORIGIN)
    }

    pub fn set_portal_here(&mut self) {
        self.portals.insert(self.level, self.pos);
    }

    /// Back to the town square on the top level.
    pub fn relocate_to_town(&mut self) {
        self.pos = Position::ORIGIN;
        self.level = TOWN_LEVEL;
    }
}
