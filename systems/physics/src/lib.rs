#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Circle-collision physics layer for the Dungeon Crawl simulation.
//!
//! The [`PhysicsMap`] keeps one collision proxy per registered actor and
//! resolves, once per [`PhysicsMap::simulate`] tick, wall penetration and
//! mutual actor penetration on the horizontal plane. There is no velocity or
//! momentum integration: every correction is a positional displacement
//! applied this tick, and height is entirely the caller's concern. Proxies
//! that stop moving fall asleep after a short grace period and are skipped
//! by the wall pass until something disturbs them again.

use dungeon_core::ActorId;
use dungeon_world::TileMap;
use glam::Vec2;

/// Fraction of a wall overlap corrected per tick by the skin nudge.
const PUSH_STRENGTH_WALL: f32 = 0.5;
/// Fraction of an actor-actor overlap corrected per tick.
const PUSH_STRENGTH_ACTORS: f32 = 0.5;
/// Half-extent of the axis-aligned "hard block" square around a wall tile
/// center, in world units.
const BLOCK_HALF_SIZE: f32 = 1.2;
/// Margin of the secondary circular "shy zone" that keeps actors off wall
/// corners.
const BLOCK_EXTRA_RADIUS: f32 = 0.1;
/// Ticks a proxy keeps re-checking collisions after its motion stops, so a
/// body coasting to rest settles without a one-tick pop.
const AWAKE_GRACE_TICKS: u8 = 2;

/// Collision radius assumed when an actor specifies none.
pub const DEFAULT_RADIUS: f32 = 1.0;
/// Mass assumed when an actor specifies none.
pub const DEFAULT_MASS: f32 = 10.0;
/// Smallest radius accepted at registration; degenerate values are clamped
/// here rather than producing NaN during resolution.
pub const MIN_RADIUS: f32 = 0.05;
/// Smallest mass accepted at registration.
pub const MIN_MASS: f32 = 0.05;

/// Registration parameters for one actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSpec {
    /// Initial position on the horizontal plane.
    pub position: Vec2,
    /// Collision radius; [`DEFAULT_RADIUS`] when absent.
    pub radius: Option<f32>,
    /// Mass weighting pushback distribution; [`DEFAULT_MASS`] when absent.
    pub mass: Option<f32>,
}

impl ActorSpec {
    /// Creates a spec at the provided position with default radius and mass.
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            radius: None,
            mass: None,
        }
    }

    /// Overrides the collision radius.
    #[must_use]
    pub const fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Overrides the mass.
    #[must_use]
    pub const fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }
}

/// Read-only view of one proxy for debug rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProxySnapshot {
    /// Identifier of the registered actor.
    pub id: ActorId,
    /// Current proxy position on the horizontal plane.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Mass used for pushback weighting.
    pub mass: f32,
    /// Whether the proxy participates in collision passes this tick.
    pub awake: bool,
}

/// One registered actor: the externally visible pose plus the collision
/// proxy the solver mutates.
///
/// The explicit record replaces the dynamic per-object bags of the original
/// implementation; every field the solver touches is named here.
#[derive(Clone, Copy, Debug)]
struct Slot {
    id: ActorId,
    /// Transform the caller reads and writes between ticks.
    pose: Vec2,
    /// Proxy position the collision passes operate on.
    body: Vec2,
    /// Proxy position at the end of the previous tick, for sleep detection.
    last: Vec2,
    /// Pairwise corrections accumulated this tick, applied at the end so
    /// resolution order introduces no bias.
    delta: Vec2,
    radius: f32,
    mass: f32,
    awake: u8,
}

/// Per-actor collision registry and per-tick penetration solver.
#[derive(Debug, Default)]
pub struct PhysicsMap {
    slots: Vec<Slot>,
    main: Option<usize>,
    container_offset: Vec2,
    next_id: u32,
}

impl PhysicsMap {
    /// Creates an empty physics map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an actor and returns its identifier.
    ///
    /// Radius and mass fall back to the defaults and are clamped to positive
    /// minimums. The main actor is the reference the map recenters around
    /// each tick; marking a second actor as main replaces the reference.
    /// Proxies registered asleep stay dormant until an external pose change
    /// wakes them.
    pub fn add_actor(&mut self, spec: ActorSpec, is_main: bool, starts_awake: bool) -> ActorId {
        let id = ActorId::new(self.next_id);
        self.next_id += 1;

        self.slots.push(Slot {
            id,
            pose: spec.position,
            body: spec.position,
            last: spec.position,
            delta: Vec2::ZERO,
            radius: spec.radius.unwrap_or(DEFAULT_RADIUS).max(MIN_RADIUS),
            mass: spec.mass.unwrap_or(DEFAULT_MASS).max(MIN_MASS),
            awake: if starts_awake { AWAKE_GRACE_TICKS } else { 0 },
        });
        if is_main {
            self.main = Some(self.slots.len() - 1);
        }
        id
    }

    fn index_of(&self, id: ActorId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    /// Current pose of the actor, or `None` for an unknown identifier.
    #[must_use]
    pub fn pose(&self, id: ActorId) -> Option<Vec2> {
        self.index_of(id).map(|index| self.slots[index].pose)
    }

    /// Moves an actor externally (AI, animation, player input).
    ///
    /// The new pose becomes the proxy's authoritative position at the start
    /// of the next tick. Unknown identifiers are ignored.
    pub fn set_pose(&mut self, id: ActorId, position: Vec2) {
        if let Some(index) = self.index_of(id) {
            self.slots[index].pose = position;
        }
    }

    /// Offset that recenters the rendered map on the main actor, refreshed
    /// each tick.
    #[must_use]
    pub const fn container_offset(&self) -> Vec2 {
        self.container_offset
    }

    /// Snapshots of every registered proxy, in registration order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<ProxySnapshot> {
        self.slots
            .iter()
            .map(|slot| ProxySnapshot {
                id: slot.id,
                position: slot.body,
                radius: slot.radius,
                mass: slot.mass,
                awake: slot.awake > 0,
            })
            .collect()
    }

    /// Advances the solver by one tick.
    ///
    /// Fixed order: sync poses into proxies, recenter on the main actor,
    /// sleep bookkeeping, wall pass, pairwise actor pass, then apply the
    /// accumulated corrections back onto the poses of awake proxies.
    pub fn simulate(&mut self, map: &TileMap) {
        // Externally moved actors are authoritative over their proxies.
        for slot in &mut self.slots {
            slot.body = slot.pose;
        }

        if let Some(main) = self.main {
            self.container_offset = -self.slots[main].pose;
        }

        for slot in &mut self.slots {
            if slot.body == slot.last {
                slot.awake = slot.awake.saturating_sub(1);
            } else {
                slot.awake = AWAKE_GRACE_TICKS;
            }
        }

        self.resolve_walls(map);
        self.resolve_actor_pairs();

        for slot in &mut self.slots {
            if slot.awake > 0 {
                slot.body += slot.delta;
                slot.delta = Vec2::ZERO;
                slot.pose = slot.body;
            }
            slot.last = slot.body;
        }
    }

    /// Pushes every awake proxy out of the walls in the 2×2 tile block
    /// nearest to it.
    ///
    /// Each wall cell applies up to two corrections: a directional push out
    /// of the hard-block square along the axis of larger center offset
    /// (ties go to the row axis), then a proportional nudge off a slightly
    /// shrunk square so circles do not hug corners. Wall contact always
    /// re-arms the awake counter; a body is never allowed to sleep while
    /// penetrating.
    fn resolve_walls(&mut self, map: &TileMap) {
        let tile_length = map.tile_length();
        let half_tile = tile_length * 0.5;
        let shy_half_size = BLOCK_HALF_SIZE - BLOCK_EXTRA_RADIUS;

        for slot in &mut self.slots {
            if slot.awake == 0 {
                continue;
            }

            let mut x = slot.body.x;
            let mut y = slot.body.y;
            let right_column = ((slot.body.x + half_tile) / tile_length).round() as i64;
            let bottom_row = ((slot.body.y + half_tile) / tile_length).round() as i64;

            for row in (bottom_row - 1)..=bottom_row {
                for column in (right_column - 1)..=right_column {
                    if !map.is_blocked_signed(column, row) {
                        continue;
                    }
                    let tile_x = column as f32 * tile_length;
                    let tile_y = row as f32 * tile_length;

                    if x > tile_x - BLOCK_HALF_SIZE
                        && x < tile_x + BLOCK_HALF_SIZE
                        && y > tile_y - BLOCK_HALF_SIZE
                        && y < tile_y + BLOCK_HALF_SIZE
                    {
                        let dx = tile_x - x;
                        let dy = tile_y - y;
                        if dx.abs() > dy.abs() {
                            x -= dx.signum() * (BLOCK_HALF_SIZE - dx.abs());
                        } else {
                            y -= dy.signum() * (BLOCK_HALF_SIZE - dy.abs());
                        }
                        slot.awake = AWAKE_GRACE_TICKS;
                    }

                    let closest_x = x.clamp(tile_x - shy_half_size, tile_x + shy_half_size);
                    let closest_y = y.clamp(tile_y - shy_half_size, tile_y + shy_half_size);
                    let dx = closest_x - x;
                    let dy = closest_y - y;
                    let distance = (dx * dx + dy * dy).sqrt();
                    if distance < BLOCK_EXTRA_RADIUS + slot.radius {
                        let overlap = BLOCK_EXTRA_RADIUS + slot.radius - distance;
                        x -= dx * overlap * PUSH_STRENGTH_WALL;
                        y -= dy * overlap * PUSH_STRENGTH_WALL;
                        slot.awake = AWAKE_GRACE_TICKS;
                    }
                }
            }

            slot.body = Vec2::new(x, y);
        }
    }

    /// Resolves every overlapping proxy pair, splitting the correction
    /// inversely by mass and accumulating into pending deltas so the result
    /// does not depend on pair order.
    fn resolve_actor_pairs(&mut self) {
        for first in 0..self.slots.len() {
            for second in (first + 1)..self.slots.len() {
                let (head, tail) = self.slots.split_at_mut(second);
                let a = &mut head[first];
                let b = &mut tail[0];
                if a.awake == 0 && b.awake == 0 {
                    continue;
                }

                let min_distance = a.radius + b.radius;
                let offset = a.body - b.body;
                let distance = offset.length();
                if distance >= min_distance {
                    continue;
                }

                a.awake = AWAKE_GRACE_TICKS;
                b.awake = AWAKE_GRACE_TICKS;

                // Coincident centers leave a zero offset and therefore no
                // push direction; the pair stays put rather than going NaN.
                let overlap_fraction = 1.0 - distance / min_distance;
                let push = offset * (overlap_fraction * PUSH_STRENGTH_ACTORS);
                let mass_fraction_a = a.mass / (a.mass + b.mass);
                a.delta += push * (1.0 - mass_fraction_a);
                b.delta -= push * mass_fraction_a;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_core::CellCoord;

    const OPEN: u32 = 0x00_ff00;

    fn single_room() -> TileMap {
        let w = 0;
        TileMap::new(vec![vec![w, w, w], vec![w, OPEN, w], vec![w, w, w]], 2.0)
            .expect("valid map")
    }

    fn double_room() -> TileMap {
        let w = 0;
        TileMap::new(
            vec![vec![w, w, w, w], vec![w, OPEN, OPEN, w], vec![w, w, w, w]],
            2.0,
        )
        .expect("valid map")
    }

    #[test]
    fn registration_applies_defaults_and_clamps() {
        let mut physics = PhysicsMap::new();
        let defaulted = physics.add_actor(ActorSpec::at(Vec2::new(2.0, 2.0)), false, true);
        let degenerate = physics.add_actor(
            ActorSpec::at(Vec2::new(2.0, 2.0))
                .with_radius(-3.0)
                .with_mass(0.0),
            false,
            true,
        );

        let snapshots = physics.snapshots();
        let first = snapshots
            .iter()
            .find(|snapshot| snapshot.id == defaulted)
            .expect("registered");
        assert_eq!(first.radius, DEFAULT_RADIUS);
        assert_eq!(first.mass, DEFAULT_MASS);

        let second = snapshots
            .iter()
            .find(|snapshot| snapshot.id == degenerate)
            .expect("registered");
        assert_eq!(second.radius, MIN_RADIUS);
        assert_eq!(second.mass, MIN_MASS);
    }

    #[test]
    fn container_recenters_on_the_main_actor() {
        let map = single_room();
        let mut physics = PhysicsMap::new();
        let main = physics.add_actor(
            ActorSpec::at(Vec2::new(2.0, 2.0)).with_radius(0.5),
            true,
            true,
        );

        physics.simulate(&map);
        assert_eq!(physics.container_offset(), Vec2::new(-2.0, -2.0));

        physics.set_pose(main, Vec2::new(2.4, 1.8));
        physics.simulate(&map);
        assert_eq!(physics.container_offset(), Vec2::new(-2.4, -1.8));
    }

    #[test]
    fn stationary_proxies_fall_asleep_after_the_grace_period() {
        let map = single_room();
        let mut physics = PhysicsMap::new();
        let id = physics.add_actor(
            ActorSpec::at(Vec2::new(2.0, 2.0)).with_radius(0.5),
            false,
            true,
        );

        physics.simulate(&map);
        assert!(physics.snapshots()[0].awake, "still coasting on tick one");
        physics.simulate(&map);
        assert!(!physics.snapshots()[0].awake, "grace expired");

        physics.set_pose(id, Vec2::new(2.1, 2.0));
        physics.simulate(&map);
        assert!(physics.snapshots()[0].awake, "external movement wakes the proxy");
    }

    #[test]
    fn unknown_identifiers_are_ignored() {
        let mut physics = PhysicsMap::new();
        let _ = physics.add_actor(ActorSpec::at(Vec2::ZERO), false, false);

        assert_eq!(physics.pose(ActorId::new(99)), None);
        physics.set_pose(ActorId::new(99), Vec2::ONE);
    }

    #[test]
    fn proxy_snapshots_follow_registration_order() {
        let mut physics = PhysicsMap::new();
        let first = physics.add_actor(ActorSpec::at(Vec2::ZERO), false, false);
        let second = physics.add_actor(ActorSpec::at(Vec2::ONE), false, false);

        let snapshots = physics.snapshots();
        assert_eq!(snapshots[0].id, first);
        assert_eq!(snapshots[1].id, second);
        assert!(snapshots[0].id < snapshots[1].id);
    }

    #[test]
    fn wall_tile_block_sampling_stays_inside_the_map() {
        // An actor parked on the border corner samples tiles at negative
        // indices; those must count as blocked instead of panicking.
        let map = double_room();
        let mut physics = PhysicsMap::new();
        let id = physics.add_actor(
            ActorSpec::at(Vec2::new(-0.4, -0.4)).with_radius(0.5),
            false,
            true,
        );

        physics.simulate(&map);
        let pose = physics.pose(id).expect("registered");
        assert!(pose.x.is_finite() && pose.y.is_finite());
        let _ = map.code(CellCoord::new(0, 0));
    }
}
