//! Per-level tile grid loaded from a plain-text map resource.
//!
//! One line per row; short lines are padded with spaces so every row has the
//! width of the longest line. Grids are row-major like the rest of the game state.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::mineral::Mineral;
use crate::error::MapError;

/// Placeholder used for unrevealed fog cells; not allowed inside map resources.
pub const FOG_CHAR: char = '?';

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Chebyshev (king-move) distance.
    pub fn chebyshev(self, other: Position) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Mineral(Mineral),
    Door,
    TownPortal,
    /// Anything else on the map: walkable and shown as-is.
    Terrain(char),
}

impl Tile {
    pub fn from_char(c: char) -> Tile {
        match c {
            ' ' => Tile::Empty,
            'D' => Tile::Door,
            'T' => Tile::TownPortal,
            other => match Mineral::from_code(other) {
                Some(m) => Tile::Mineral(m),
                None => Tile::Terrain(other),
            },
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Mineral(m) => m.code(),
            Tile::Door => 'D',
            Tile::TownPortal => 'T',
            Tile::Terrain(c) => c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Build a grid from text rows, padding short rows with empty tiles.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Grid, MapError> {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        if width == 0 {
            return Err(MapError::Empty("<rows>".into()));
        }
        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        for (row, line) in rows.iter().enumerate() {
            let mut n = 0;
            for (col, c) in line.as_ref().chars().enumerate() {
                if c == FOG_CHAR {
                    return Err(MapError::ReservedChar { row, col });
                }
                tiles.push(Tile::from_char(c));
                n += 1;
            }
            tiles.extend(std::iter::repeat(Tile::Empty).take(width - n));
        }
        Ok(Grid {
            width,
            height,
            tiles,
        })
    }

    pub fn parse(text: &str) -> Result<Grid, MapError> {
        let rows: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        Grid::from_rows(&rows)
    }

    /// Read a map resource from disk.
    pub fn load(path: &Path) -> Result<Grid, MapError> {
        let shown = path.display().to_string();
        if !path.exists() {
            return Err(MapError::NotFound(shown));
        }
        let text = std::fs::read_to_string(path)?;
        Grid::parse(&text).map_err(|e| match e {
            MapError::Empty(_) => MapError::Empty(shown),
            other => other,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Neighbouring position, or `None` past the edge of the map.
    pub fn offset(&self, from: Position, dx: i64, dy: i64) -> Option<Position> {
        let x = from.x as i64 + dx;
        let y = from.y as i64 + dy;
        if self.in_bounds(x, y) {
            Some(Position::new(x as usize, y as usize))
        } else {
            None
        }
    }

    fn idx(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    pub fn get(&self, pos: Position) -> Option<Tile> {
        if pos.x < self.width && pos.y < self.height {
            Some(self.tiles[self.idx(pos)])
        } else {
            None
        }
    }

    pub fn set(&mut self, pos: Position, tile: Tile) {
        if pos.x < self.width && pos.y < self.height {
            let i = self.idx(pos);
            self.tiles[i] = tile;
        }
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let w = self.width;
        (0..self.height).flat_map(move |y| (0..w).map(move |x| Position::new(x, y)))
    }

    pub fn rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width)
            .map(|row| row.iter().map(|t| t.to_char()).collect())
            .collect()
    }
}
