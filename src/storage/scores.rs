//! Top-five leaderboard of finished runs.
//!
//! Fewer days wins; ties go to fewer steps, then to more GP. The timestamp is
//! kept for display only.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::path::Path;

use super::{read_locked, write_json_atomic};
use crate::error::GameError;
use crate::game::Player;

/// Entries kept on the board.
pub const MAX_SCORES: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub days: u32,
    pub steps: u32,
    pub gp: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_at: Option<DateTime<Utc>>,
}

impl ScoreEntry {
    /// Snapshot a winning player. The day counter has already moved on to the
    /// next morning, so the days taken is one less.
    pub fn from_player(player: &Player) -> Self {
        ScoreEntry {
            name: player.name.clone(),
            days: player.day.saturating_sub(1),
            steps: player.steps,
            gp: player.gp,
            achieved_at: Some(Utc::now()),
        }
    }

    fn rank_key(&self) -> (u32, u32, Reverse<u32>) {
        (self.days, self.steps, Reverse(self.gp))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert and re-rank. Returns the 1-based place the entry took, or `None`
    /// when it did not make the cut. Earlier entries win exact ties.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let key = entry.rank_key();
        let pos = self
            .entries
            .iter()
            .position(|e| e.rank_key() > key)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_SCORES);
        (pos < MAX_SCORES).then_some(pos + 1)
    }

    fn normalize(&mut self) {
        self.entries.sort_by_key(ScoreEntry::rank_key);
        self.entries.truncate(MAX_SCORES);
    }
}

/// Read the board; a missing file is an empty board.
pub fn load_scores(path: &Path) -> Result<Leaderboard, GameError> {
    let Some(content) = read_locked(path)? else {
        return Ok(Leaderboard::default());
    };
    let mut board: Leaderboard = serde_json::from_str(&content)?;
    board.normalize();
    Ok(board)
}

pub fn save_scores(path: &Path, board: &Leaderboard) -> Result<(), GameError> {
    let json = serde_json::to_string_pretty(board)?;
    write_json_atomic(path, &json)?;
    Ok(())
}

/// Add `entry` to the board on disk. Returns the place it took, if any.
pub fn record_score(path: &Path, entry: ScoreEntry) -> Result<Option<usize>, GameError> {
    let mut board = load_scores(path)?;
    let name = crate::validation::escape_for_log(&entry.name);
    let (days, steps, gp) = (entry.days, entry.steps, entry.gp);
    let place = board.insert(entry);
    save_scores(path, &board)?;
    info!(
        "score for {}: {} days, {} steps, {} GP -> place {:?}",
        name, days, steps, gp, place
    );
    Ok(place)
}

pub fn format_scores(board: &Leaderboard) -> String {
    if board.is_empty() {
        return "No high scores yet.\n".to_string();
    }
    let mut out = String::from("--- Top Scores ---\n");
    for (i, s) in board.entries().iter().enumerate() {
        out.push_str(&format!(
            "{}. {} - Days: {}, Steps: {}, GP: {}\n",
            i + 1,
            s.name,
            s.days,
            s.steps,
            s.gp
        ));
    }
    out.push_str("------------------\n");
    out
}
