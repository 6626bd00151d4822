use thiserror::Error;

use crate::game::mineral::Mineral;

/// Errors raised while loading or parsing a mine level resource.
#[derive(Debug, Error)]
pub enum MapError {
    /// The map resource does not exist on disk.
    #[error("map file {0} not found")]
    NotFound(String),

    /// The map resource exists but has no rows.
    #[error("map file {0} is empty")]
    Empty(String),

    /// The map uses the fog placeholder character, which would not survive a save.
    #[error("map row {row} column {col} uses reserved character '?'")]
    ReservedChar { row: usize, col: usize },

    /// Persisted rows do not form a rectangle matching the level's map.
    #[error("level {level}: {what} has {found} rows of width {width}, expected {expected_h}x{expected_w}")]
    ShapeMismatch {
        level: u8,
        what: &'static str,
        found: usize,
        width: usize,
        expected_h: usize,
        expected_w: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sale requests that fail validation. A failed request changes nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SellError {
    #[error("Invalid amount for {mineral}: {requested} (you have {available}).")]
    InvalidAmount {
        mineral: Mineral,
        requested: i64,
        available: u32,
    },
}

/// Shop purchases that cannot be completed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("You do not have enough GP for that upgrade.")]
    InsufficientFunds { cost: u32, balance: u32 },

    #[error("Your pickaxe is already at the highest level.")]
    PickaxeMaxed,

    #[error("You already own the magic torch.")]
    TorchOwned,
}

/// Errors surfaced by save/load and leaderboard persistence.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Returned when loading a save that is not present.
    #[error("no saved game found at {0}")]
    SaveNotFound(String),

    /// The save refers to a level that has no map resource.
    #[error("saved game is missing level {0}")]
    MissingLevel(u8),
}
