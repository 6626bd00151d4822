//! Fog of war: what the miner has seen of each level.
//!
//! Each cell is either unrevealed or a cached copy of the grid tile as it was
//! when last revealed. Rendering must go through this layer, never the grid.

use super::grid::{Grid, Position, Tile, FOG_CHAR};
use crate::error::MapError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FogLayer {
    width: usize,
    height: usize,
    cells: Vec<Option<Tile>>,
}

impl FogLayer {
    /// Fully fogged layer sized to `grid`.
    pub fn covering(grid: &Grid) -> Self {
        FogLayer {
            width: grid.width(),
            height: grid.height(),
            cells: vec![None; grid.width() * grid.height()],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn idx(&self, pos: Position) -> Option<usize> {
        (pos.x < self.width && pos.y < self.height).then(|| pos.y * self.width + pos.x)
    }

    /// Cached tile, or `None` while unrevealed.
    pub fn get(&self, pos: Position) -> Option<Tile> {
        self.idx(pos).and_then(|i| self.cells[i])
    }

    pub fn is_revealed(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Overwrite a revealed cell (used when the tile under the miner changes).
    pub fn set(&mut self, pos: Position, tile: Tile) {
        if let Some(i) = self.idx(pos) {
            self.cells[i] = Some(tile);
        }
    }

    /// Copy every in-bounds tile within Chebyshev `radius` of `center` from the grid.
    /// Returns the number of cells written.
    pub fn reveal_around(&mut self, grid: &Grid, center: Position, radius: usize) -> usize {
        let r = radius as i64;
        let mut written = 0;
        for dy in -r..=r {
            for dx in -r..=r {
                let Some(pos) = grid.offset(center, dx, dy) else {
                    continue;
                };
                if let (Some(i), Some(tile)) = (self.idx(pos), grid.get(pos)) {
                    self.cells[i] = Some(tile);
                    written += 1;
                }
            }
        }
        written
    }

    pub fn revealed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// One string per row, `?` for unrevealed cells.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|c| c.map_or(FOG_CHAR, Tile::to_char))
                    .collect()
            })
            .collect()
    }

    /// Rebuild from persisted rows; the shape must match the level's grid.
    pub fn from_rows<S: AsRef<str>>(level: u8, rows: &[S], grid: &Grid) -> Result<Self, MapError> {
        let mismatch = |found: usize, width: usize| MapError::ShapeMismatch {
            level,
            what: "fog",
            found,
            width,
            expected_h: grid.height(),
            expected_w: grid.width(),
        };
        if rows.len() != grid.height() {
            let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
            return Err(mismatch(rows.len(), width));
        }
        let mut cells = Vec::with_capacity(grid.width() * grid.height());
        for row in rows {
            let before = cells.len();
            cells.extend(row.as_ref().chars().map(|c| {
                if c == FOG_CHAR {
                    None
                } else {
                    Some(Tile::from_char(c))
                }
            }));
            let width = cells.len() - before;
            if width != grid.width() {
                return Err(mismatch(rows.len(), width));
            }
        }
        Ok(FogLayer {
            width: grid.width(),
            height: grid.height(),
            cells,
        })
    }
}
