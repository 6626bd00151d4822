mod common;

use sundrop::config::Config;
use sundrop::console::{Console, Controller};
use sundrop::game::session::load_levels;
use sundrop::game::{DoorLinks, MineralCounts};
use sundrop::storage::{self, scores};

const LEVEL1: &str = "  C \n    \n  D ";
const LEVEL2: &str = " SS\n   ";

fn play(config: &Config, script: &str, seed: u64) -> String {
    let grids = load_levels(&config.levels).expect("levels load");
    let mut controller = Controller::new(config.clone(), grids, common::rng(seed));
    let mut console = Console::new(script.as_bytes(), Vec::new());
    controller.run(&mut console).expect("run");
    String::from_utf8_lossy(console.output()).to_string()
}

#[test]
fn new_game_save_and_quit() {
    let (_tmp, config) = common::temp_config(LEVEL1, Some(LEVEL2));
    let out = play(&config, "x\nn\n  Ada \nv\nq\ny\nq\n", 1);
    assert!(out.contains("Welcome to Sundrop Caves!"));
    assert!(out.contains("How quickly can you get the 800 GP"));
    assert!(out.contains("Invalid choice."));
    assert!(out.contains("Pleased to meet you, Ada. Welcome to Sundrop Town!"));
    assert!(out.contains("DAY 1"));
    assert!(out.contains("Game saved."));
    assert!(out.trim_end().ends_with("Goodbye!"));
    assert!(config.storage.save_path().exists());
}

#[test]
fn load_without_save_reports_it() {
    let (_tmp, config) = common::temp_config(LEVEL1, None);
    let out = play(&config, "l\nh\nq\n", 2);
    assert!(out.contains("No saved game found."));
    assert!(out.contains("No high scores yet."));
}

#[test]
fn portal_stone_ends_the_day_back_in_town() {
    let (_tmp, config) = common::temp_config(LEVEL1, Some(LEVEL2));
    let out = play(&config, "n\nBo\ne\nd\nz\np\ni\nq\ny\nq\n", 3);
    assert!(out.contains("Turns left: 20    Load: 0 / 10    Steps: 0"));
    assert!(out.contains("Turns left: 19    Load: 0 / 10    Steps: 1"));
    assert!(out.contains("Invalid action."));
    assert!(out.contains("You place your portal stone here and zap back to town."));
    assert!(out.contains("Nothing sold."));
    assert!(out.contains("DAY 2"));
    assert!(out.contains("Portal position (current level 1): (1, 0)"));
}

#[test]
fn quitting_the_mine_does_not_end_the_day() {
    let (_tmp, config) = common::temp_config(LEVEL1, Some(LEVEL2));
    let out = play(&config, "n\nBo\ne\ns\nq\nn\nq\ny\ne\nm\nq\ny\nq\ny\nq\n", 4);
    assert!(!out.contains("DAY 2"));
    assert!(!out.contains("zap back to town"));
    // Re-entering resumes at the remembered spot.
    assert!(out.contains("Turns left: 19    Load: 0 / 10    Steps: 1"));
    assert!(out.contains("|M"));
}

#[test]
fn shop_warehouse_and_sell_menus() {
    let (_tmp, config) = common::temp_config(LEVEL1, None);
    let out = play(&config, "n\nCy\nb\nx\nt\nl\nw\ns\nr\nv\nl\ns\np\nw\nb\nl\nq\ny\nq\n", 5);
    assert!(out.contains("(P)ickaxe upgrade to Level 2 to mine silver ore for 50 GP"));
    assert!(out.contains("(B)ackpack upgrade to carry 12 items for 20 GP"));
    assert!(out.contains("You do not have enough GP for that upgrade."));
    assert!(out.contains("You have nothing to store."));
    assert!(out.contains("Retrieved ore from warehouse into backpack where possible."));
    assert!(out.contains("Warehouse contents - Gold: 0, Silver: 0, Copper: 0"));
    assert!(out.contains("Nothing sold."));
    assert!(out.contains("Invalid choice."));
}

#[test]
fn reaching_the_goal_wins_and_records_a_score() {
    let (_tmp, config) = common::temp_config(LEVEL1, Some(LEVEL2));
    let grids = load_levels(&config.levels).unwrap();
    let mut s = sundrop::game::Session::new_game(
        "Winner",
        &grids,
        config.game.clone(),
        DoorLinks::two_level(),
    );
    s.player.gp = 795;
    s.player.day = 4;
    s.player.backpack = MineralCounts::new(0, 0, 1);
    storage::save_game(&config.storage.save_path(), &s).unwrap();

    let out = play(&config, "l\ne\np\nh\nq\n", 6);
    assert!(out.contains("Game loaded. Returning to town."));
    assert!(out.contains("Woo-hoo! Well done, Winner"));
    assert!(out.contains("And it only took you 5 days and 0 steps! You win!"));
    assert!(out.contains("You made the high score list at #1!"));
    assert!(out.contains("1. Winner - Days: 4, Steps: 0, GP: "));

    let board = scores::load_scores(&config.storage.scores_path()).unwrap();
    assert_eq!(board.entries().len(), 1);
    assert!(board.entries()[0].gp >= 805);
}

#[test]
fn undecodable_input_is_just_an_invalid_choice() {
    let (_tmp, config) = common::temp_config(LEVEL1, None);
    let grids = load_levels(&config.levels).expect("levels load");
    let mut controller = Controller::new(config.clone(), grids, common::rng(8));
    let mut console = Console::new(&b"\xff\xfe\nq\n"[..], Vec::new());
    controller.run(&mut console).expect("bad bytes are not fatal");
    let out = String::from_utf8_lossy(console.output()).to_string();
    assert!(out.contains("Invalid choice."));
    assert!(out.trim_end().ends_with("Goodbye!"));
}

#[test]
fn end_of_input_stops_cleanly() {
    let (_tmp, config) = common::temp_config(LEVEL1, None);
    let out = play(&config, "n\nDee\ne\nd\n", 7);
    assert!(out.contains("Action? "));
    assert!(!out.contains("Goodbye!"));
}
