//! # Storage Module - Save Games and Leaderboard
//!
//! Everything the game writes to disk is plain JSON under the configured data
//! directory:
//!
//! ```text
//! data/
//! ├── savegame.json   ← maps, fog and the player record
//! └── scores.json     ← top five finishing runs
//! ```
//!
//! Writes are full-file replacements: the new content goes to a temp file in
//! the same directory and is renamed over the old one while an exclusive
//! `fs2` lock is held on a `.lock` sidecar. Readers take a shared lock on the
//! same sidecar.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sundrop::storage::{load_game, save_game};
//! # fn demo(session: &sundrop::game::Session) -> Result<(), sundrop::error::GameError> {
//! let path = std::path::Path::new("./data/savegame.json");
//! save_game(path, session)?;
//! let snapshot = load_game(path)?;
//! # let _ = snapshot;
//! # Ok(())
//! # }
//! ```

pub mod scores;

use fs2::FileExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::GameRules;
use crate::error::GameError;
use crate::game::fog::FogLayer;
use crate::game::player::TOWN_LEVEL;
use crate::game::session::{DoorLinks, Level, Phase, Session};
use crate::game::{Grid, LevelId, Player};

/// On-disk shape of a saved game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveGame {
    /// Current map rows per level, ore already mined or regrown included.
    pub maps: BTreeMap<LevelId, Vec<String>>,
    /// Fog rows per level; `?` marks ground never seen.
    pub fogs: BTreeMap<LevelId, Vec<String>>,
    pub player: Player,
}

impl SaveGame {
    pub fn capture(session: &Session) -> Self {
        let mut maps = BTreeMap::new();
        let mut fogs = BTreeMap::new();
        for (id, level) in &session.levels {
            maps.insert(*id, level.grid.rows());
            fogs.insert(*id, level.fog.rows());
        }
        SaveGame {
            maps,
            fogs,
            player: session.player.clone(),
        }
    }

    /// Rebuild a session in town from this snapshot.
    pub fn restore(self, rules: GameRules, doors: DoorLinks) -> Result<Session, GameError> {
        let mut levels = BTreeMap::new();
        for (id, rows) in &self.maps {
            let grid = Grid::from_rows(rows.as_slice())?;
            let fog = match self.fogs.get(id) {
                Some(fog_rows) => FogLayer::from_rows(*id, fog_rows.as_slice(), &grid)?,
                None => {
                    warn!("save has no fog for level {}; starting it unexplored", id);
                    FogLayer::covering(&grid)
                }
            };
            levels.insert(*id, Level { grid, fog });
        }
        if !levels.contains_key(&TOWN_LEVEL) {
            return Err(GameError::MissingLevel(TOWN_LEVEL));
        }
        if !levels.contains_key(&self.player.level) {
            return Err(GameError::MissingLevel(self.player.level));
        }
        Ok(Session {
            levels,
            player: self.player,
            rules,
            doors,
            phase: Phase::InTown,
        })
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "data".into());
    name.push(".lock");
    path.with_file_name(name)
}

fn open_lock(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(lock_path(path))
}

/// Remove a half-written temp file when the step that produced `result` failed.
fn discard_on_error(tmp_path: &Path, result: std::io::Result<()>) -> std::io::Result<()> {
    if result.is_err() {
        let _ = fs::remove_file(tmp_path);
    }
    result
}

/// Replace `path` with `content` atomically under an exclusive lock.
pub fn write_json_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let lock_file = open_lock(path)?;
    lock_file.lock_exclusive()?;
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("data.json");
    let mut counter = 0u32;
    let tmp_path = loop {
        let cand = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&cand) {
            Ok(mut tmp) => {
                let written = tmp
                    .write_all(content.as_bytes())
                    .and_then(|_| tmp.flush())
                    .and_then(|_| tmp.sync_all());
                drop(tmp);
                discard_on_error(&cand, written)?;
                break cand;
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };
    discard_on_error(&tmp_path, fs::rename(&tmp_path, path))?;
    if let Ok(dirf) = File::open(dir) {
        let _ = dirf.sync_all();
    }
    lock_file.unlock()?;
    Ok(())
}

/// Read `path` under a shared lock. `None` when the file does not exist.
pub fn read_locked(path: &Path) -> std::io::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let lock_file = open_lock(path)?;
    lock_file.lock_shared()?;
    let content = fs::read_to_string(path);
    lock_file.unlock()?;
    match content {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn save_game(path: &Path, session: &Session) -> Result<(), GameError> {
    let json = serde_json::to_string_pretty(&SaveGame::capture(session))?;
    write_json_atomic(path, &json)?;
    info!(
        "saved game for {} on day {} to {}",
        crate::validation::escape_for_log(&session.player.name),
        session.player.day,
        path.display()
    );
    Ok(())
}

pub fn load_game(path: &Path) -> Result<SaveGame, GameError> {
    let Some(content) = read_locked(path)? else {
        return Err(GameError::SaveNotFound(path.display().to_string()));
    };
    let save: SaveGame = serde_json::from_str(&content)?;
    debug!(
        "loaded save from {} with {} level(s)",
        path.display(),
        save.maps.len()
    );
    Ok(save)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_content_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("file.json");
        write_json_atomic(&path, "{\"a\":1}").unwrap();
        write_json_atomic(&path, "{\"a\":2}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":2}");
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    fn temp_leftovers(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
            .count()
    }

    #[test]
    fn failed_temp_write_removes_the_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join(".file.json.tmp-1-0");
        fs::write(&tmp, "{\"a\"").unwrap();
        let err = discard_on_error(
            &tmp,
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full")),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(!tmp.exists());

        fs::write(&tmp, "{}").unwrap();
        discard_on_error(&tmp, Ok(())).unwrap();
        assert!(tmp.exists());
    }

    #[test]
    fn failed_rename_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();
        assert!(write_json_atomic(&target, "{}").is_err());
        assert_eq!(temp_leftovers(dir.path()), 0);
    }

    #[test]
    fn missing_save_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("savegame.json");
        assert!(matches!(load_game(&path), Err(GameError::SaveNotFound(_))));
        assert!(read_locked(&path).unwrap().is_none());
    }

    #[test]
    fn restore_requires_town_level() {
        let rules = GameRules::default();
        let mut maps = BTreeMap::new();
        maps.insert(2, vec!["  ".to_string()]);
        let save = SaveGame {
            maps,
            fogs: BTreeMap::new(),
            player: Player::new("Ada", &rules),
        };
        assert!(matches!(
            save.restore(rules, DoorLinks::two_level()),
            Err(GameError::MissingLevel(1))
        ));
    }

    #[test]
    fn restore_rejects_fog_of_wrong_shape() {
        let rules = GameRules::default();
        let mut maps = BTreeMap::new();
        maps.insert(1, vec!["CC".to_string(), "  ".to_string()]);
        let mut fogs = BTreeMap::new();
        fogs.insert(1, vec!["??".to_string()]);
        let save = SaveGame {
            maps,
            fogs,
            player: Player::new("Ada", &rules),
        };
        let err = save.restore(rules, DoorLinks::two_level()).unwrap_err();
        assert!(err.to_string().contains("fog"));
    }
}
