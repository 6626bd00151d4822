//! Test utilities & fixtures.
//! Small in-memory maps and temp-dir backed configs so tests never touch the
//! bundled `maps/` or a real data directory.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use sundrop::config::{Config, GameRules, LevelConfig};
use sundrop::game::{DoorLinks, Grid, LevelId, Session};

/// Parse `(level, map text)` pairs into grids.
#[allow(dead_code)]
pub fn grids(levels: &[(LevelId, &str)]) -> BTreeMap<LevelId, Grid> {
    levels
        .iter()
        .map(|(id, text)| (*id, Grid::parse(text).expect("map parses")))
        .collect()
}

/// Fresh game in town with levels 1 and 2 linked by their doors.
#[allow(dead_code)]
pub fn session(levels: &[(LevelId, &str)]) -> Session {
    Session::new_game(
        "Tester",
        &grids(levels),
        GameRules::default(),
        DoorLinks::two_level(),
    )
}

/// Fresh game already standing at the level 1 portal.
#[allow(dead_code)]
pub fn mine_session(levels: &[(LevelId, &str)]) -> Session {
    let mut s = session(levels);
    s.enter_mine();
    s
}

#[allow(dead_code)]
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// First seed whose first draw from `roll` equals `want`.
#[allow(dead_code)]
pub fn seed_where(want: u32, roll: impl Fn(&mut StdRng) -> u32) -> u64 {
    (0..10_000u64)
        .find(|s| roll(&mut rng(*s)) == want)
        .expect("some seed produces the wanted draw")
}

/// Config whose data directory and level maps live in a fresh temp dir.
#[allow(dead_code)]
pub fn temp_config(level1: &str, level2: Option<&str>) -> (tempfile::TempDir, Config) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut config = Config::default();
    config.storage.data_dir = tmp.path().join("data").to_string_lossy().to_string();
    let l1 = tmp.path().join("level1.txt");
    std::fs::write(&l1, level1).unwrap();
    config.levels = vec![LevelConfig {
        id: 1,
        path: l1.to_string_lossy().to_string(),
    }];
    if let Some(text) = level2 {
        let l2 = tmp.path().join("level2.txt");
        std::fs::write(&l2, text).unwrap();
        config.levels.push(LevelConfig {
            id: 2,
            path: l2.to_string_lossy().to_string(),
        });
    }
    (tmp, config)
}
