//! Movement inside the mine.
//!
//! One call to [`move_player`] is one turn. Stepping onto ore digs it out in
//! the same action, so a tile the miner cannot dig (pickaxe too weak, or no
//! room in the backpack) is simply a tile the miner cannot enter.

use log::debug;
use rand::Rng;
use std::fmt;

use super::day::{self, DayReport, DayTrigger};
use super::grid::{Position, Tile};
use super::mineral::Mineral;
use super::session::Session;
use super::LevelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// WASD keys, case-insensitive.
    pub fn from_key(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Direction::North),
            's' => Some(Direction::South),
            'a' => Some(Direction::West),
            'd' => Some(Direction::East),
            _ => None,
        }
    }

    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    Edge,
    Pickaxe(Mineral),
    BackpackFull,
    /// The miner stands on the door, which becomes this level's portal.
    DoorLocked(LevelId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEvent {
    Stepped,
    Mined {
        mineral: Mineral,
        pieces: u32,
        /// Pieces the vein offered before the backpack limit applied.
        rolled: u32,
    },
    Door {
        from: LevelId,
        to: LevelId,
    },
    ReachedTown,
    Blocked(Blocked),
}

impl fmt::Display for MoveEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveEvent::Stepped => Ok(()),
            MoveEvent::Mined {
                mineral,
                pieces,
                rolled,
            } => {
                write!(f, "You mined {} piece(s) of {}.", pieces, mineral)?;
                if pieces < rolled {
                    write!(f, "\n...but you can only carry {} more piece(s)!", pieces)?;
                }
                Ok(())
            }
            MoveEvent::Door { to, .. } => {
                write!(f, "You pass through a door and enter mine level {}.", to)
            }
            MoveEvent::ReachedTown => f.write_str("You step onto the portal back to town."),
            MoveEvent::Blocked(Blocked::Edge) => {
                f.write_str("You cannot move past the edge of the map.")
            }
            MoveEvent::Blocked(Blocked::Pickaxe(_)) => {
                f.write_str("You can't go there - you can't mine that mineral yet.")
            }
            MoveEvent::Blocked(Blocked::BackpackFull) => {
                f.write_str("You can't carry any more, so you can't go that way.")
            }
            MoveEvent::Blocked(Blocked::DoorLocked(_)) => f.write_str("That door is locked."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub event: MoveEvent,
    /// Set when this turn ended the day (town portal tile or last turn spent).
    pub day_ended: Option<DayReport>,
}

/// Copy the grid into the fog around the miner. Radius 2 with the torch, else 1.
pub fn reveal(session: &mut Session) -> usize {
    let radius = session.player.view_radius();
    let center = session.player.pos;
    match session.levels.get_mut(&session.player.level) {
        Some(level) => level.fog.reveal_around(&level.grid, center, radius),
        None => 0,
    }
}

/// Take one movement turn in `dir`.
pub fn move_player<R: Rng + ?Sized>(session: &mut Session, dir: Direction, rng: &mut R) -> MoveResult {
    session.player.turns = session.player.turns.saturating_sub(1);
    let event = step(session, dir, rng);

    if event == MoveEvent::ReachedTown {
        let report = day::end_of_day(session, DayTrigger::TownPortal, rng);
        return MoveResult {
            event,
            day_ended: Some(report),
        };
    }
    let day_ended = if session.player.turns == 0 {
        Some(day::end_of_day(session, DayTrigger::Exhausted, rng))
    } else {
        None
    };
    MoveResult { event, day_ended }
}

fn step<R: Rng + ?Sized>(session: &mut Session, dir: Direction, rng: &mut R) -> MoveEvent {
    let level_id = session.player.level;
    let from = session.player.pos;
    let (dx, dy) = dir.delta();
    let Some(level) = session.levels.get(&level_id) else {
        log::error!("player is on unloaded level {}", level_id);
        return MoveEvent::Blocked(Blocked::Edge);
    };
    let Some(target) = level.grid.offset(from, dx, dy) else {
        return MoveEvent::Blocked(Blocked::Edge);
    };
    let tile = level.grid.get(target).unwrap_or(Tile::Empty);
    debug!("move {:?} from {:?} to {:?} onto {:?}", dir, from, target, tile);

    match tile {
        Tile::TownPortal => {
            session.player.pos = target;
            MoveEvent::ReachedTown
        }
        Tile::Door => walk_through_door(session, target),
        Tile::Mineral(mineral) => dig(session, target, mineral, rng),
        Tile::Empty | Tile::Terrain(_) => {
            walk_to(session, target);
            MoveEvent::Stepped
        }
    }
}

fn walk_to(session: &mut Session, target: Position) {
    session.player.pos = target;
    session.player.steps = session.player.steps.saturating_add(1);
    reveal(session);
}

fn walk_through_door(session: &mut Session, door: Position) -> MoveEvent {
    let from = session.player.level;
    session.player.pos = door;
    session.player.set_portal_here();
    let to = match session.doors.destination(from, door) {
        Some(to) if session.has_level(to) => to,
        Some(to) => {
            reveal(session);
            return MoveEvent::Blocked(Blocked::DoorLocked(to));
        }
        None => {
            reveal(session);
            return MoveEvent::Blocked(Blocked::DoorLocked(from));
        }
    };
    session.player.level = to;
    session.player.pos = session.player.portal(to);
    reveal(session);
    MoveEvent::Door { from, to }
}

fn dig<R: Rng + ?Sized>(session: &mut Session, at: Position, mineral: Mineral, rng: &mut R) -> MoveEvent {
    let player = &session.player;
    if player.pickaxe < mineral.required_pickaxe() {
        return MoveEvent::Blocked(Blocked::Pickaxe(mineral));
    }
    let space = player.space();
    if space == 0 {
        return MoveEvent::Blocked(Blocked::BackpackFull);
    }
    let rolled = mineral.roll_yield(rng);
    let pieces = rolled.min(space);
    *session.player.backpack.get_mut(mineral) += pieces;
    if let Some(level) = session.levels.get_mut(&session.player.level) {
        level.grid.set(at, Tile::Empty);
        level.fog.set(at, Tile::Empty);
    }
    walk_to(session, at);
    MoveEvent::Mined {
        mineral,
        pieces,
        rolled,
    }
}
