#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative dungeon map state for the Dungeon Crawl simulation.
//!
//! The [`TileMap`] owns the dense grid of raw cell codes decoded by the
//! caller (typically from a map image whose pixels pack `(R<<16)|(G<<8)|B`)
//! and answers the only questions the simulation systems ask of it: is a
//! tile open, what code does it carry, and how do world-unit positions map
//! onto tile indices. The grid is read-only after construction.

use dungeon_core::{CellCode, CellCoord, MapError};

/// Dense, read-only grid of dungeon cell codes.
///
/// Construction validates the solid-border invariant: every cell on the
/// outermost rows and columns must be blocked. The pathfinder expands
/// neighbors and the physics pass samples 2×2 tile blocks without explicit
/// range checks on interior tiles, so gameplay content must never reach the
/// grid edge.
#[derive(Clone, Debug)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tile_length: f32,
    cells: Vec<CellCode>,
}

impl TileMap {
    /// Builds a tile map from row-major raw cell codes.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] when the grid is empty or ragged, when the tile
    /// length is not a positive finite number, or when any border cell is
    /// open.
    pub fn new(rows: Vec<Vec<u32>>, tile_length: f32) -> Result<Self, MapError> {
        if !(tile_length.is_finite() && tile_length > 0.0) {
            return Err(MapError::NonPositiveTileLength(tile_length));
        }

        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MapError::NotRectangular {
                    row: index,
                    expected: width,
                    found: row.len(),
                });
            }
        }

        let mut cells = Vec::with_capacity(width * height);
        for row in &rows {
            cells.extend(row.iter().copied().map(CellCode::new));
        }

        let map = Self {
            columns: u32::try_from(width).map_err(|_| MapError::Empty)?,
            rows: u32::try_from(height).map_err(|_| MapError::Empty)?,
            tile_length,
            cells,
        };
        map.validate_border()?;
        Ok(map)
    }

    fn validate_border(&self) -> Result<(), MapError> {
        for column in 0..self.columns {
            for row in [0, self.rows - 1] {
                let cell = CellCoord::new(column, row);
                if self.is_open(cell) {
                    return Err(MapError::OpenBorder { cell });
                }
            }
        }
        for row in 0..self.rows {
            for column in [0, self.columns - 1] {
                let cell = CellCoord::new(column, row);
                if self.is_open(cell) {
                    return Err(MapError::OpenBorder { cell });
                }
            }
        }
        Ok(())
    }

    /// Number of tile columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the map measured in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the map measured in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Raw code stored at the provided tile, if it lies within the grid.
    #[must_use]
    pub fn code(&self, cell: CellCoord) -> Option<CellCode> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the tile is traversable.
    ///
    /// Tiles outside the grid count as blocked.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        self.code(cell).is_some_and(|code| code.is_open())
    }

    /// Signed-index variant of the blocked test for callers that derive
    /// neighbor indices arithmetically and may step below zero.
    #[must_use]
    pub fn is_blocked_signed(&self, column: i64, row: i64) -> bool {
        let Ok(column) = u32::try_from(column) else {
            return true;
        };
        let Ok(row) = u32::try_from(row) else {
            return true;
        };
        !self.is_open(CellCoord::new(column, row))
    }

    /// Rounds a world-space position to the nearest tile.
    ///
    /// Returns `None` when the rounded index falls outside the grid.
    #[must_use]
    pub fn tile_at(&self, x: f32, y: f32) -> Option<CellCoord> {
        let column = (x / self.tile_length).round();
        let row = (y / self.tile_length).round();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        let cell = CellCoord::new(column as u32, row as u32);
        if cell.column() < self.columns && cell.row() < self.rows {
            Some(cell)
        } else {
            None
        }
    }

    /// World-space position of the provided tile's center.
    #[must_use]
    pub fn tile_center(&self, cell: CellCoord) -> (f32, f32) {
        (
            cell.column() as f32 * self.tile_length,
            cell.row() as f32 * self.tile_length,
        )
    }
}
