#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bidirectional grid pathfinder for the Dungeon Crawl simulation.
//!
//! Two breadth-first frontiers grow toward each other, one from the start
//! tile and one from the end tile, expanding level by level in round-robin
//! order until they touch or the round budget runs out. The search is a
//! reachability heuristic rather than a shortest-path guarantee: neighbor
//! expansion follows a fixed priority (right, left, down, up) and the first
//! contact between the frontiers wins. From the reconstructed path a single
//! "probable waypoint" is derived — the farthest path tile whose
//! one-sample line-of-sight check back toward the start stays clear — which
//! callers use as a steering hint rather than following the path tile by
//! tile.

use std::collections::HashMap;

use dungeon_core::{CellCoord, Endpoint, SolveError};
use dungeon_world::TileMap;
use glam::Vec2;

/// Result of a completed [`PathFinder::solve`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveReport {
    /// Probable next waypoint toward the goal, or `None` when the round
    /// budget ran out before the frontiers met.
    pub waypoint: Option<CellCoord>,
    /// Number of the round in which the frontiers met, or the full budget
    /// when they never did.
    pub rounds: u32,
}

/// Identifies the tile pair where the two frontiers touched.
#[derive(Clone, Copy, Debug)]
struct Meeting {
    /// Tile of the expanding direction whose neighbor hit the other side.
    own: CellCoord,
    /// The neighbor tile already held by the other direction's frontier.
    met: CellCoord,
    /// Which direction was expanding when contact happened.
    side: Endpoint,
}

/// Triple of frontier rings cycled by `round % 3`.
///
/// At round `r` the ring at `r % 3` holds the previous level, `(r + 1) % 3`
/// the level being expanded, and `(r + 2) % 3` receives the new level. The
/// buffers persist across solves so a steady caller allocates nothing.
#[derive(Debug, Default)]
struct FrontierRings {
    rings: [Vec<CellCoord>; 3],
}

impl FrontierRings {
    fn clear(&mut self) {
        for ring in &mut self.rings {
            ring.clear();
        }
    }
}

/// Reusable bidirectional search state.
///
/// All working buffers live on the value and `solve` takes `&mut self`, so
/// exclusive access — the reimplementation of the source's "one solve in
/// flight" rule — is enforced by the borrow checker. Callers that need
/// concurrent solves create one `PathFinder` per caller.
#[derive(Debug, Default)]
pub struct PathFinder {
    from_start: FrontierRings,
    from_end: FrontierRings,
    breadcrumbs: HashMap<CellCoord, CellCoord>,
    path: Vec<CellCoord>,
    rounds: u32,
}

impl PathFinder {
    /// Creates a pathfinder with empty working buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches for a route between two world-space positions and derives
    /// the probable next waypoint.
    ///
    /// Positions are rounded to the nearest tile. `max_rounds` bounds the
    /// number of bidirectional expansion rounds; exhausting it without the
    /// frontiers meeting is a normal "no path in range" outcome reported as
    /// an absent waypoint.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] when either position rounds to a blocked tile
    /// or falls outside the map. No working state is mutated on this path,
    /// so a subsequent call observes nothing from the failed one.
    pub fn solve(
        &mut self,
        map: &TileMap,
        start: Vec2,
        end: Vec2,
        max_rounds: u32,
    ) -> Result<SolveReport, SolveError> {
        let start_tile = Self::endpoint_tile(map, start, Endpoint::Start)?;
        let end_tile = Self::endpoint_tile(map, end, Endpoint::End)?;

        self.breadcrumbs.clear();
        self.path.clear();
        self.from_start.clear();
        self.from_end.clear();
        self.rounds = 0;

        if start_tile == end_tile {
            return Ok(SolveReport {
                waypoint: Some(start_tile),
                rounds: 0,
            });
        }

        // Ring 1 is the "current" level of round zero.
        self.from_start.rings[1].push(start_tile);
        self.from_end.rings[1].push(end_tile);

        let mut meeting = None;
        for round in 0..max_rounds {
            self.rounds = round;
            let previous = (round % 3) as usize;
            let current = ((round + 1) % 3) as usize;
            let next = ((round + 2) % 3) as usize;

            // The start side tests contact against the end side's current
            // level; the end side, expanding second, tests against the start
            // side's freshly built next level.
            if let Some((own, met)) = expand_level(
                map,
                &mut self.from_start,
                previous,
                current,
                next,
                &self.from_end.rings[current],
                &mut self.breadcrumbs,
            ) {
                meeting = Some(Meeting {
                    own,
                    met,
                    side: Endpoint::Start,
                });
                break;
            }
            if let Some((own, met)) = expand_level(
                map,
                &mut self.from_end,
                previous,
                current,
                next,
                &self.from_start.rings[next],
                &mut self.breadcrumbs,
            ) {
                meeting = Some(Meeting {
                    own,
                    met,
                    side: Endpoint::End,
                });
                break;
            }
        }

        let Some(meeting) = meeting else {
            self.rounds = max_rounds;
            return Ok(SolveReport {
                waypoint: None,
                rounds: max_rounds,
            });
        };

        self.reconstruct(meeting);
        let waypoint = self.probable_waypoint(map, start, start_tile);
        Ok(SolveReport {
            waypoint: Some(waypoint),
            rounds: self.rounds,
        })
    }

    fn endpoint_tile(map: &TileMap, position: Vec2, endpoint: Endpoint) -> Result<CellCoord, SolveError> {
        let cell = map
            .tile_at(position.x, position.y)
            .ok_or(SolveError::OutOfBounds { endpoint })?;
        if map.is_open(cell) {
            Ok(cell)
        } else {
            Err(SolveError::UnreachableEndpoint { endpoint, cell })
        }
    }

    /// Stitches both breadcrumb chains into one start-to-end tile sequence
    /// and drops the leading start tile.
    fn reconstruct(&mut self, meeting: Meeting) {
        self.path.clear();

        let mut cursor = Some(meeting.own);
        while let Some(coord) = cursor {
            self.path.push(coord);
            cursor = self.breadcrumbs.get(&coord).copied();
        }
        self.path.reverse();

        let mut cursor = Some(meeting.met);
        while let Some(coord) = cursor {
            self.path.push(coord);
            cursor = self.breadcrumbs.get(&coord).copied();
        }

        if meeting.side == Endpoint::End {
            self.path.reverse();
        }
        let _ = self.path.remove(0);
    }

    /// Walks the path from the start and keeps the last tile whose
    /// one-sample ray back toward the start lands on an open tile.
    ///
    /// The sample point sits one tile unit from the candidate tile along the
    /// angle toward the fractional start position; this is a deliberate
    /// single-point approximation of a line-of-sight test, not a raycast.
    fn probable_waypoint(&self, map: &TileMap, start: Vec2, start_tile: CellCoord) -> CellCoord {
        let tile_length = map.tile_length();
        let start_column = start.x / tile_length;
        let start_row = start.y / tile_length;

        let mut waypoint = start_tile;
        for &coord in &self.path {
            let column = coord.column() as f32;
            let row = coord.row() as f32;
            let angle = (start_row - row).atan2(start_column - column);
            let sample_column = (column + angle.cos()).round() as i64;
            let sample_row = (row + angle.sin()).round() as i64;
            if map.is_blocked_signed(sample_column, sample_row) {
                break;
            }
            waypoint = coord;
        }
        waypoint
    }

    /// Tile path reconstructed by the most recent successful solve, ordered
    /// from the tile after the start toward the end. Debug visualization
    /// only.
    #[must_use]
    pub fn path(&self) -> &[CellCoord] {
        &self.path
    }

    /// Frontier ring contents of one search direction after the most recent
    /// solve. Debug visualization only.
    #[must_use]
    pub fn rings(&self, side: Endpoint) -> [&[CellCoord]; 3] {
        let frontier = match side {
            Endpoint::Start => &self.from_start,
            Endpoint::End => &self.from_end,
        };
        [
            frontier.rings[0].as_slice(),
            frontier.rings[1].as_slice(),
            frontier.rings[2].as_slice(),
        ]
    }

    /// Round counter left by the most recent solve. Debug visualization
    /// only.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }
}

/// Expands every tile of one direction's current level into its grid
/// neighbors, recording breadcrumbs for each discovery.
///
/// Returns the `(expanding tile, met tile)` pair as soon as a neighbor is
/// found in the other direction's frontier. Neighbor priority is right,
/// left, down, up; tiles already present in this direction's previous or
/// current level are skipped.
fn expand_level(
    map: &TileMap,
    side: &mut FrontierRings,
    previous: usize,
    current: usize,
    next: usize,
    other_current: &[CellCoord],
    breadcrumbs: &mut HashMap<CellCoord, CellCoord>,
) -> Option<(CellCoord, CellCoord)> {
    let mut next_ring = std::mem::take(&mut side.rings[next]);
    next_ring.clear();

    let mut contact = None;
    'levels: for index in 0..side.rings[current].len() {
        let coord = side.rings[current][index];
        for neighbor in neighbor_candidates(coord).into_iter().flatten() {
            if !map.is_open(neighbor) {
                continue;
            }
            if side.rings[previous].contains(&neighbor) || side.rings[current].contains(&neighbor) {
                continue;
            }
            if other_current.contains(&neighbor) {
                contact = Some((coord, neighbor));
                break 'levels;
            }
            next_ring.push(neighbor);
            let _ = breadcrumbs.insert(neighbor, coord);
        }
    }

    side.rings[next] = next_ring;
    contact
}

/// Grid-aligned neighbors in fixed priority order: right, left, down, up.
fn neighbor_candidates(coord: CellCoord) -> [Option<CellCoord>; 4] {
    [
        Some(CellCoord::new(coord.column() + 1, coord.row())),
        coord
            .column()
            .checked_sub(1)
            .map(|column| CellCoord::new(column, coord.row())),
        Some(CellCoord::new(coord.column(), coord.row() + 1)),
        coord
            .row()
            .checked_sub(1)
            .map(|row| CellCoord::new(coord.column(), row)),
    ]
}
