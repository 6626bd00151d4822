//! # Configuration Management Module
//!
//! All tunable numbers of the game live here, loaded from a TOML file with
//! sensible defaults for every section. A missing config file is not an error:
//! the built-in defaults reproduce the classic Sundrop Caves rules.
//!
//! ## Configuration Structure
//!
//! - [`GameRules`] - turn allotment, win threshold, shop prices, regeneration
//! - [`StorageConfig`] - where saves and the leaderboard are written
//! - [`LevelConfig`] - map resources per mine level
//! - [`DoorConfig`] - which level a door leads to
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! turns_per_day = 20
//! win_gp = 800
//! initial_capacity = 10
//!
//! [storage]
//! data_dir = "./data"
//!
//! [[levels]]
//! id = 1
//! path = "maps/level1.txt"
//!
//! [[doors]]
//! from = 1
//! to = 2
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sundrop::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("sundrop.toml")?;
//!     println!("Win at {} GP", config.game.win_gp);
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::game::LevelId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameRules,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Mine levels in load order; the first one is required.
    #[serde(default = "default_levels")]
    pub levels: Vec<LevelConfig>,
    #[serde(default = "default_doors")]
    pub doors: Vec<DoorConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub turns_per_day: u32,
    /// GP needed to retire and win.
    pub win_gp: u32,
    pub initial_capacity: u32,
    pub torch_price: u32,
    pub pickaxe_tier2_price: u32,
    pub pickaxe_tier3_price: u32,
    /// Slots gained per backpack upgrade.
    pub backpack_step: u32,
    /// Backpack upgrade costs `capacity * backpack_price_per_slot`.
    pub backpack_price_per_slot: u32,
    /// Chance for each empty tile to sprout ore at the end of a day.
    pub regen_chance: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        GameRules {
            turns_per_day: 20,
            win_gp: 800,
            initial_capacity: 10,
            torch_price: 50,
            pickaxe_tier2_price: 50,
            pickaxe_tier3_price: 150,
            backpack_step: 2,
            backpack_price_per_slot: 2,
            regen_chance: 0.2,
        }
    }
}

impl GameRules {
    /// Price of upgrading to `tier`, or `None` for tiers the shop does not sell.
    pub fn pickaxe_price(&self, tier: u8) -> Option<u32> {
        match tier {
            2 => Some(self.pickaxe_tier2_price),
            3 => Some(self.pickaxe_tier3_price),
            _ => None,
        }
    }

    pub fn backpack_upgrade_cost(&self, capacity: u32) -> u32 {
        capacity.saturating_mul(self.backpack_price_per_slot)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub save_file: String,
    pub scores_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: "./data".to_string(),
            save_file: "savegame.json".to_string(),
            scores_file: "scores.json".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn save_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.save_file)
    }

    pub fn scores_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.scores_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelConfig {
    pub id: LevelId,
    pub path: String,
}

/// A door on level `from` leads to level `to`. With `x`/`y` set it applies to
/// that one door tile only; otherwise to every door on the level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoorConfig {
    pub from: LevelId,
    pub to: LevelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
            file: Some("sundrop.log".to_string()),
        }
    }
}

fn default_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig {
            id: 1,
            path: "maps/level1.txt".to_string(),
        },
        LevelConfig {
            id: 2,
            path: "maps/level2.txt".to_string(),
        },
    ]
}

fn default_doors() -> Vec<DoorConfig> {
    vec![
        DoorConfig {
            from: 1,
            to: 2,
            x: None,
            y: None,
        },
        DoorConfig {
            from: 2,
            to: 1,
            x: None,
            y: None,
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            game: GameRules::default(),
            storage: StorageConfig::default(),
            levels: default_levels(),
            doors: default_doors(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the built-in defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Config::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Create a default configuration file
    pub fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            return Err(anyhow!("at least one [[levels]] entry is required"));
        }
        if self.game.turns_per_day == 0 {
            return Err(anyhow!("game.turns_per_day must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.game.regen_chance) {
            return Err(anyhow!(
                "game.regen_chance must be within 0.0..=1.0, got {}",
                self.game.regen_chance
            ));
        }
        if self.game.initial_capacity == 0 {
            return Err(anyhow!("game.initial_capacity must be at least 1"));
        }
        Ok(())
    }
}
