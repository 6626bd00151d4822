//! # Sundrop Caves - a turn-based mining adventure for the terminal
//!
//! A miner explores a fog-covered mine one turn at a time, digs copper, silver
//! and gold, sells it in town and upgrades their gear, racing to reach the GP
//! needed to retire in as few days as possible.
//!
//! ## Features
//!
//! - **Fog of War**: each level keeps its own record of what the miner has seen.
//! - **Day Cycle**: a fixed number of turns per day; leaving the mine sells the
//!   backpack and ore regrows overnight.
//! - **Economy**: randomized prices, a warehouse, and a shop for pickaxes,
//!   backpacks and a magic torch.
//! - **Multiple Levels**: doors link levels, each remembering its own portal.
//! - **Persistence**: JSON save games and a top-five leaderboard.
//! - **Deterministic**: all randomness comes from an injected `rand::Rng`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rand::SeedableRng;
//! use sundrop::config::Config;
//! use sundrop::console::{Console, Controller};
//! use sundrop::game::session::load_levels;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("sundrop.toml")?;
//!     let grids = load_levels(&config.levels)?;
//!     let mut controller = Controller::new(config, grids, rand::rngs::StdRng::from_entropy());
//!     let stdin = std::io::stdin();
//!     controller.run(&mut Console::new(stdin.lock(), std::io::stdout()))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - grids, fog, the player and the rules engines
//! - [`console`] - menu state machine over a line-based terminal
//! - [`storage`] - save games and the leaderboard
//! - [`config`] - configuration loading and validation
//! - [`error`] - error types shared across modules
//! - [`validation`] - sanitizing player-provided text
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │    Console      │ ← Menus and prompts
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │  Game Session   │ ← Exploration, economy, day cycle
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │    Storage      │ ← Saves and scores
//! └─────────────────┘
//! ```

pub mod config;
pub mod console;
pub mod error;
pub mod game;
pub mod storage;
pub mod validation;
