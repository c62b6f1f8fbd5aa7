#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dungeon Crawl simulation crates.
//!
//! This crate defines the vocabulary that connects the authoritative tile
//! map, the pathfinding and physics systems, and the adapters that drive
//! them: grid coordinates, raw cell codes, actor identifiers, and the error
//! types surfaced by map construction and path solving. It holds no state
//! and depends on no other workspace member.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid tile expressed as column and row coordinates.
///
/// Replaces the packed `x | (y << 16)` integer keys of the original
/// implementation with a structural composite key; equality and hashing are
/// derived, and neighbor arithmetic stays explicit at the call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Raw terrain code stored in one tile of the dungeon map.
///
/// Codes originate from map images with each pixel packed as
/// `(R << 16) | (G << 8) | B`. The simulation core only classifies a code as
/// wall, market wall, or open; any occupant metadata carried in the channels
/// of an open tile is exposed raw and never interpreted here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCode(u32);

impl CellCode {
    /// Code marking an impassable wall tile.
    pub const WALL: CellCode = CellCode(0);
    /// Reserved code marking a market wall: blocked like a wall, rendered
    /// differently by the presentation layer.
    pub const MARKET_WALL: CellCode = CellCode(0xff_0000);

    /// Wraps a raw packed cell value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the raw packed value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the tile is a plain wall.
    #[must_use]
    pub const fn is_wall(&self) -> bool {
        self.0 == Self::WALL.0
    }

    /// Reports whether the tile carries the reserved market-wall code.
    #[must_use]
    pub const fn is_market_wall(&self) -> bool {
        self.0 == Self::MARKET_WALL.0
    }

    /// Reports whether actors and searches may traverse the tile.
    ///
    /// A tile is open exactly when it is neither a wall nor a market wall.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.is_wall() && !self.is_market_wall()
    }

    /// Red channel of the packed value.
    #[must_use]
    pub const fn red(&self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    /// Green channel of the packed value.
    #[must_use]
    pub const fn green(&self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    /// Blue channel of the packed value.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

/// Unique identifier assigned to an actor registered with the physics map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Names which end of a path solve a diagnostic refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    /// The tile the search departs from.
    Start,
    /// The tile the search aims for.
    End,
}

/// Fatal precondition failures reported by the pathfinder.
///
/// Exhausting the round budget without the frontiers meeting is *not* an
/// error; it is reported as an absent waypoint in the solve result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The start or end position rounds to a blocked tile.
    #[error("{endpoint:?} position resolves to blocked tile {cell:?}")]
    UnreachableEndpoint {
        /// Which end of the requested route is blocked.
        endpoint: Endpoint,
        /// The blocked tile the position rounded to.
        cell: CellCoord,
    },
    /// The start or end position rounds to a tile outside the grid.
    #[error("{endpoint:?} position lies outside the map")]
    OutOfBounds {
        /// Which end of the requested route is out of range.
        endpoint: Endpoint,
    },
}

/// Failures detected while constructing a tile map.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum MapError {
    /// The provided grid holds no rows or no columns.
    #[error("map grid must contain at least one row and one column")]
    Empty,
    /// One row's length disagrees with the first row's.
    #[error("map row {row} holds {found} cells, expected {expected}")]
    NotRectangular {
        /// Index of the offending row.
        row: usize,
        /// Cell count of the first row.
        expected: usize,
        /// Cell count of the offending row.
        found: usize,
    },
    /// A border cell is open; the solid-border invariant keeps every grid
    /// access by the search and collision passes in bounds.
    #[error("border cell {cell:?} must be blocked")]
    OpenBorder {
        /// The offending border cell.
        cell: CellCoord,
    },
    /// The tile edge length is zero or negative.
    #[error("tile length must be positive, got {0}")]
    NonPositiveTileLength(f32),
}

#[cfg(test)]
mod tests {
    use super::{ActorId, CellCode, CellCoord, Endpoint, SolveError};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn wall_codes_are_blocked_and_everything_else_is_open() {
        assert!(!CellCode::WALL.is_open());
        assert!(!CellCode::MARKET_WALL.is_open());
        assert!(CellCode::new(0x00_ff00).is_open());
        assert!(CellCode::new(1).is_open());
    }

    #[test]
    fn channel_accessors_unpack_rgb() {
        let code = CellCode::new(0x12_3456);
        assert_eq!(code.red(), 0x12);
        assert_eq!(code.green(), 0x34);
        assert_eq!(code.blue(), 0x56);
        assert!(!code.is_market_wall());
        assert_eq!(CellCode::MARKET_WALL.red(), 0xff);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(12, 200));
    }

    #[test]
    fn cell_code_round_trips_through_bincode() {
        assert_round_trip(&CellCode::MARKET_WALL);
    }

    #[test]
    fn actor_id_round_trips_through_bincode() {
        assert_round_trip(&ActorId::new(7));
    }

    #[test]
    fn solve_error_reports_the_blocked_endpoint() {
        let error = SolveError::UnreachableEndpoint {
            endpoint: Endpoint::Start,
            cell: CellCoord::new(3, 4),
        };
        let message = error.to_string();
        assert!(message.contains("Start"));
        assert!(message.contains("blocked"));
    }
}
