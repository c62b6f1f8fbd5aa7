use dungeon_core::{CellCoord, Endpoint, SolveError};
use dungeon_system_pathfinding::PathFinder;
use dungeon_world::TileMap;
use glam::Vec2;

const OPEN: u32 = 0x00_ff00;

fn map_from_ascii(rows: &[&str]) -> TileMap {
    let grid = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|cell| match cell {
                    '#' => 0,
                    'M' => 0xff_0000,
                    _ => OPEN,
                })
                .collect()
        })
        .collect();
    TileMap::new(grid, 2.0).expect("scenario maps are valid")
}

fn tile_position(map: &TileMap, column: u32, row: u32) -> Vec2 {
    let (x, y) = map.tile_center(CellCoord::new(column, row));
    Vec2::new(x, y)
}

fn dungeon() -> TileMap {
    map_from_ascii(&[
        "############",
        "#....#.....#",
        "#.##.#.###.#",
        "#.#..M...#.#",
        "#.#.####.#.#",
        "#...#....#.#",
        "#.###.##.#.#",
        "#..........#",
        "############",
    ])
}

#[test]
fn failed_solve_leaves_no_residue_for_the_next_call() {
    let map = dungeon();
    let start = tile_position(&map, 1, 1);
    let end = tile_position(&map, 10, 7);

    let mut fresh = PathFinder::new();
    let baseline = fresh.solve(&map, start, end, 20).expect("open endpoints");

    let mut reused = PathFinder::new();
    let failure = reused.solve(&map, start, tile_position(&map, 5, 3), 20);
    assert_eq!(
        failure,
        Err(SolveError::UnreachableEndpoint {
            endpoint: Endpoint::End,
            cell: CellCoord::new(5, 3),
        })
    );

    let repeat = reused.solve(&map, start, end, 20).expect("open endpoints");
    assert_eq!(repeat, baseline);
    assert_eq!(reused.path(), fresh.path());
}

#[test]
fn repeated_solves_reuse_buffers_deterministically() {
    let map = dungeon();
    let mut finder = PathFinder::new();
    let start = tile_position(&map, 1, 1);
    let end = tile_position(&map, 10, 7);

    let first = finder.solve(&map, start, end, 20).expect("open endpoints");
    let second = finder.solve(&map, start, end, 20).expect("open endpoints");

    assert_eq!(first, second);
    let waypoint = first.waypoint.expect("goal reachable within budget");
    assert!(map.is_open(waypoint));
}

#[test]
fn unreachable_goal_within_budget_is_not_an_error() {
    let map = dungeon();
    let mut finder = PathFinder::new();

    let report = finder
        .solve(
            &map,
            tile_position(&map, 1, 1),
            tile_position(&map, 10, 7),
            2,
        )
        .expect("open endpoints");

    assert_eq!(report.waypoint, None);
    assert_eq!(report.rounds, 2);
}

#[test]
fn frontier_rings_are_exposed_for_visualization() {
    let map = dungeon();
    let mut finder = PathFinder::new();

    let report = finder
        .solve(
            &map,
            tile_position(&map, 1, 1),
            tile_position(&map, 10, 7),
            20,
        )
        .expect("open endpoints");
    assert!(report.waypoint.is_some());

    let populated: usize = finder
        .rings(Endpoint::Start)
        .iter()
        .chain(finder.rings(Endpoint::End).iter())
        .map(|ring| ring.len())
        .sum();
    assert!(populated > 0, "a successful solve leaves frontier state behind");
}
