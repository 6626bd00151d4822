//! Text projections of the game state. Nothing here mutates anything, and
//! nothing here reads a grid directly: what the miner has not seen stays hidden.

use super::fog::FogLayer;
use super::grid::{Position, FOG_CHAR};
use super::player::Player;
use super::session::Session;

/// Small window around the miner: `M` in the middle, `#` past the edge,
/// blank for ground not yet seen.
pub fn viewport(session: &Session) -> String {
    let player = &session.player;
    let radius = player.view_radius() as i64;
    let size = (radius * 2 + 1) as usize;
    let border = format!("+{}+", "-".repeat(size));
    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    let fog = session.current_level().map(|l| &l.fog);
    for dy in -radius..=radius {
        out.push('|');
        for dx in -radius..=radius {
            if dx == 0 && dy == 0 {
                out.push('M');
                continue;
            }
            let x = player.pos.x as i64 + dx;
            let y = player.pos.y as i64 + dy;
            let cell = match fog {
                Some(f) if x >= 0 && y >= 0 && (x as usize) < f.width() && (y as usize) < f.height() => {
                    f.get(Position::new(x as usize, y as usize))
                        .map_or(' ', |t| t.to_char())
                }
                _ => '#',
            };
            out.push(cell);
        }
        out.push_str("|\n");
    }
    out.push_str(&border);
    out.push('\n');
    out
}

/// Whole level as far as it has been explored, with optional portal (`P`)
/// and miner (`M`) markers.
pub fn full_map(fog: &FogLayer, portal: Option<Position>, miner: Option<Position>) -> String {
    let border = format!("+{}+", "-".repeat(fog.width()));
    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    for y in 0..fog.height() {
        out.push('|');
        for x in 0..fog.width() {
            let pos = Position::new(x, y);
            let c = if miner == Some(pos) {
                'M'
            } else if portal == Some(pos) {
                'P'
            } else {
                fog.get(pos).map_or(FOG_CHAR, |t| t.to_char())
            };
            out.push(c);
        }
        out.push_str("|\n");
    }
    out.push_str(&border);
    out.push('\n');
    out
}

/// One-line status shown under the viewport while in the mine.
pub fn mine_status(player: &Player) -> String {
    format!(
        "Turns left: {}    Load: {} / {}    Steps: {}",
        player.turns,
        player.load(),
        player.capacity,
        player.steps
    )
}

pub fn player_info(player: &Player) -> String {
    let rule = "------------------------------";
    let p = player.portal(player.level);
    let w = &player.warehouse;
    let mut lines = vec![
        "----- Player Information -----".to_string(),
        format!("Name: {}", player.name),
        format!(
            "Portal position (current level {}): ({}, {})",
            player.level, p.x, p.y
        ),
        format!("Pickaxe level: {}", player.pickaxe),
        format!("Gold: {}", player.backpack.gold),
        format!("Silver: {}", player.backpack.silver),
        format!("Copper: {}", player.backpack.copper),
        rule.to_string(),
        format!("Load: {} / {}", player.load(), player.capacity),
        rule.to_string(),
        format!("GP: {}", player.gp),
        rule.to_string(),
        format!(
            "Warehouse - Gold: {}, Silver: {}, Copper: {}",
            w.gold, w.silver, w.copper
        ),
        rule.to_string(),
        format!("Steps taken: {}", player.steps),
        rule.to_string(),
        format!("Torch owned: {}", if player.torch { "Yes" } else { "No" }),
    ];
    lines.push(rule.to_string());
    lines.join("\n") + "\n"
}
