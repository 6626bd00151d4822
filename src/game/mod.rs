//! # Game Core
//!
//! Everything that happens between the town and the bottom of the mine.
//!
//! ## Components
//!
//! - [`grid`] - per-level tile grid loaded from a text map
//! - [`fog`] - fog of war layer mirroring each grid
//! - [`mineral`] - ore catalogue and per-ore counters
//! - [`player`] - the miner's persistent record
//! - [`session`] - explicit context owning levels, player, rules and door links
//! - [`explore`] - movement, mining and fog reveal
//! - [`economy`] - selling ore and warehouse transfers
//! - [`shop`] - pickaxe, backpack and torch upgrades
//! - [`day`] - end-of-day transition, quitting to town, ore regeneration
//! - [`render`] - text projections of the map and the player
//!
//! All randomness is passed in as a `rand::Rng` so a seeded `StdRng` replays
//! a game exactly.

pub mod day;
pub mod economy;
pub mod explore;
pub mod fog;
pub mod grid;
pub mod mineral;
pub mod player;
pub mod render;
pub mod session;
pub mod shop;

/// Mine level identifier; level 1 sits directly below the town.
pub type LevelId = u8;

pub use grid::{Grid, Position, Tile};
pub use mineral::{Mineral, MineralCounts};
pub use player::Player;
pub use session::{DoorLinks, Level, Phase, Session};
