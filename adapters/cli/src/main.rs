#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line driver for the Dungeon Crawl simulation core.
//!
//! Loads a map, runs one pathfinder solve between two world-space points,
//! then seeds a small cast of overlapping actors and steps the physics
//! solver for a few ticks, printing what a rendering front end would
//! consume.

mod map_text;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_system_pathfinding::PathFinder;
use dungeon_system_physics::{ActorSpec, PhysicsMap};
use glam::Vec2;

/// Dungeon Crawl simulation driver: one route solve plus a short physics
/// run on the same map.
#[derive(Debug, Parser)]
#[command(name = "dungeon")]
struct Cli {
    /// ASCII map file (`#` wall, `M` market wall, `.` open); the built-in
    /// demo dungeon when omitted.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Edge length of one tile in world units.
    #[arg(long, default_value_t = 2.0)]
    tile_length: f32,

    /// World-space x coordinate the route starts from.
    #[arg(long, default_value_t = 2.0)]
    from_x: f32,

    /// World-space y coordinate the route starts from.
    #[arg(long, default_value_t = 2.0)]
    from_y: f32,

    /// World-space x coordinate the route aims for.
    #[arg(long, default_value_t = 20.0)]
    to_x: f32,

    /// World-space y coordinate the route aims for.
    #[arg(long, default_value_t = 14.0)]
    to_y: f32,

    /// Bidirectional search rounds before the solve gives up.
    #[arg(long, default_value_t = 10)]
    rounds: u32,

    /// Physics ticks to run after the solve.
    #[arg(long, default_value_t = 8)]
    ticks: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let text = match &cli.map {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading map file {}", path.display()))?,
        None => map_text::DEMO_MAP.to_string(),
    };
    let map = map_text::parse(&text, cli.tile_length).context("parsing map")?;
    println!(
        "map: {} x {} tiles ({} x {} world units, tile length {})",
        map.columns(),
        map.rows(),
        map.width(),
        map.height(),
        map.tile_length()
    );

    let start = Vec2::new(cli.from_x, cli.from_y);
    let end = Vec2::new(cli.to_x, cli.to_y);
    let mut finder = PathFinder::new();
    let report = finder
        .solve(&map, start, end, cli.rounds)
        .context("solving route")?;
    match report.waypoint {
        Some(tile) => println!(
            "probable waypoint: tile ({}, {}) found in round {}, path of {} tiles",
            tile.column(),
            tile.row(),
            report.rounds,
            finder.path().len()
        ),
        None => println!("no route within {} rounds", report.rounds),
    }

    let mut physics = PhysicsMap::new();
    let cast = [
        (
            "hero",
            physics.add_actor(ActorSpec::at(start).with_radius(0.5), true, true),
        ),
        (
            "barrel",
            physics.add_actor(
                ActorSpec::at(start + Vec2::new(0.4, 0.0))
                    .with_radius(0.5)
                    .with_mass(30.0),
                false,
                true,
            ),
        ),
        (
            "crab",
            physics.add_actor(
                ActorSpec::at(start + Vec2::new(0.0, 0.6))
                    .with_radius(0.35)
                    .with_mass(5.0),
                false,
                true,
            ),
        ),
    ];

    for _ in 0..cli.ticks {
        physics.simulate(&map);
    }

    for (name, id) in cast {
        let pose = physics
            .pose(id)
            .context("registered actors always have a pose")?;
        println!("{name}: ({:.3}, {:.3})", pose.x, pose.y);
    }
    let offset = physics.container_offset();
    println!("container offset: ({:.3}, {:.3})", offset.x, offset.y);

    Ok(())
}
