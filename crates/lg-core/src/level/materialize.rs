//! Room, door and hallway materialization
//!
//! Turns the connected partition tree into [`Room`] records with doors and
//! one [`Hallway`] per adjacency edge. Both doors of an edge are derived from
//! a single world-space offset on the shared boundary, so they always line up
//! with the hallway between them.

use strum::IntoEnumIterator;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::consts::{EDGE_EPSILON, approx_eq};
use crate::error::GeometryError;
use crate::rng::RandomSource;

use super::connectivity::adjacency_edges;
use super::partition::PartitionTree;
use super::rect::Side;
use super::room::{Door, Hallway, Room};

/// Accumulator for one generation run
///
/// Rooms are built on first request and memoized; regenerating needs a fresh
/// context.
#[derive(Debug, Clone)]
pub struct PartitionContext {
    tree: PartitionTree,
    hallways: Vec<Hallway>,
    rooms: Option<Vec<Room>>,
}

impl PartitionContext {
    /// Wrap a connected partition tree
    pub fn new(tree: PartitionTree) -> Self {
        Self {
            tree,
            hallways: Vec::new(),
            rooms: None,
        }
    }

    pub fn tree(&self) -> &PartitionTree {
        &self.tree
    }

    /// Hallways cut so far (empty until rooms are built)
    pub fn hallways(&self) -> &[Hallway] {
        &self.hallways
    }

    pub fn is_materialized(&self) -> bool {
        self.rooms.is_some()
    }

    /// Build rooms, doors and hallways once, then keep returning them
    pub fn rooms<R: RandomSource>(
        &mut self,
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<&[Room], GeometryError> {
        if self.rooms.is_none() {
            let (rooms, hallways) = materialize(&self.tree, config, rng)?;
            self.hallways = hallways;
            self.rooms = Some(rooms);
        }
        Ok(self.rooms.as_deref().unwrap_or_default())
    }

    /// Take the built rooms and hallways out of the context
    pub fn into_parts(self) -> (Vec<Room>, Vec<Hallway>) {
        (self.rooms.unwrap_or_default(), self.hallways)
    }
}

fn materialize<R: RandomSource>(
    tree: &PartitionTree,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<(Vec<Room>, Vec<Hallway>), GeometryError> {
    let mut rooms: Vec<Room> = (0..tree.leaf_count())
        .map(|leaf| Room::new(leaf, tree.leaf(leaf).rect))
        .collect();

    let min_overlap = config.min_overlap();
    let width = config.hallway_width;
    let inset = config.door_inset();

    let edges = adjacency_edges(tree);
    let mut hallways = Vec::with_capacity(edges.len());

    for (a, b) in edges {
        let ra = rooms[a].area;
        let rb = rooms[b].area;

        let share = ra
            .share_edge(&rb, min_overlap)
            .ok_or(GeometryError::MissingSharedEdge { a, b })?;
        let back = rb
            .share_edge(&ra, min_overlap)
            .ok_or(GeometryError::MissingSharedEdge { a: b, b: a })?;
        if back.side != share.side.opposite()
            || !approx_eq(share.world_start(&ra), back.world_start(&rb))
            || !approx_eq(share.length, back.length)
        {
            return Err(GeometryError::AsymmetricEdge { a, b });
        }

        let lo = share.world_start(&ra);
        let hi = share.world_end(&ra);
        let offset = choose_hallway_start(lo, hi, width, inset, rng);

        rooms[a].add_door(Door::new(share.side, offset - ra.side_origin(share.side), width));
        rooms[b].add_door(Door::new(back.side, offset - rb.side_origin(back.side), width));

        let line = ra.side_coordinate(share.side);
        let position = if share.side.is_vertical() {
            (line, 0.0, offset)
        } else {
            (offset, 0.0, line)
        };
        hallways.push(Hallway::new(position, !share.side.is_vertical()));
    }

    debug!(
        rooms = rooms.len(),
        hallways = hallways.len(),
        "rooms materialized"
    );
    Ok((rooms, hallways))
}

/// Pick where a hallway of `width` starts on the shared interval `[lo, hi]`
///
/// The hallway keeps `inset` clear of both ends when the interval allows it,
/// otherwise it only has to fit.
pub fn choose_hallway_start<R: RandomSource>(
    lo: f64,
    hi: f64,
    width: f64,
    inset: f64,
    rng: &mut R,
) -> f64 {
    let (min, max) = if hi - lo - 2.0 * inset >= width {
        (lo + inset, hi - inset - width)
    } else {
        (lo, hi - width)
    };
    rng.range_f64(min, max)
}

/// Solid stretch of wall between doors, in room-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub side: Side,
    pub start: f64,
    pub length: f64,
}

impl WallSegment {
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

/// Walls of a room with a gap left for every door
///
/// Each side runs from `padding` to `side_length - padding` (the floor edge).
pub fn wall_segments(room: &Room, padding: f64) -> Vec<WallSegment> {
    let mut segments = Vec::new();

    for side in Side::iter() {
        let end = room.area.side_length(side) - padding;
        let mut cursor = padding;

        for door in room.doors_on(side) {
            if door.start - cursor > EDGE_EPSILON {
                segments.push(WallSegment {
                    side,
                    start: cursor,
                    length: door.start - cursor,
                });
            }
            cursor = cursor.max(door.end());
        }

        if end - cursor > EDGE_EPSILON {
            segments.push(WallSegment {
                side,
                start: cursor,
                length: end - cursor,
            });
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::connectivity::connect_partition;
    use crate::level::partition::partition_space;
    use crate::level::rect::Rect;
    use crate::rng::GameRng;

    fn context(seed: u64) -> (PartitionContext, GeneratorConfig, GameRng) {
        let config = GeneratorConfig::default();
        let mut rng = GameRng::new(seed);
        let mut tree = partition_space(config.world_rect(), config.min_room_side, &mut rng);
        connect_partition(&mut tree, config.min_overlap()).unwrap();
        (PartitionContext::new(tree), config, rng)
    }

    #[test]
    fn test_one_hallway_per_edge() {
        let (mut ctx, config, mut rng) = context(42);
        let room_count = ctx.rooms(&config, &mut rng).unwrap().len();
        assert_eq!(room_count, ctx.tree().leaf_count());
        assert_eq!(ctx.hallways().len(), room_count - 1);
    }

    #[test]
    fn test_rooms_are_memoized() {
        let (mut ctx, config, mut rng) = context(3);
        let first = ctx.rooms(&config, &mut rng).unwrap().to_vec();
        let hallways = ctx.hallways().to_vec();
        let second = ctx.rooms(&config, &mut rng).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(hallways, ctx.hallways());
        assert!(ctx.is_materialized());
    }

    #[test]
    fn test_doors_align_across_boundary() {
        let (mut ctx, config, mut rng) = context(17);
        let rooms = ctx.rooms(&config, &mut rng).unwrap().to_vec();
        let edges = adjacency_edges(ctx.tree());

        // Doors are appended in edge order, so walk the edges and consume doors
        let mut next = vec![0usize; rooms.len()];
        for (a, b) in edges {
            let da = rooms[a].doors[next[a]];
            let db = rooms[b].doors[next[b]];
            next[a] += 1;
            next[b] += 1;

            assert_eq!(da.side.opposite(), db.side);
            assert_eq!(da.length, config.hallway_width);
            assert_eq!(db.length, config.hallway_width);
            let wa = rooms[a].area.side_origin(da.side) + da.start;
            let wb = rooms[b].area.side_origin(db.side) + db.start;
            assert!(approx_eq(wa, wb), "{} vs {}", wa, wb);
            assert!(rooms[a].door_within_side(&da));
            assert!(rooms[b].door_within_side(&db));
        }
    }

    #[test]
    fn test_hallway_sits_on_boundary() {
        let (mut ctx, config, mut rng) = context(5);
        let rooms = ctx.rooms(&config, &mut rng).unwrap().to_vec();
        for ((a, _), hallway) in adjacency_edges(ctx.tree()).into_iter().zip(ctx.hallways()) {
            let door = rooms[a].doors.iter().find(|d| {
                let along = rooms[a].area.side_origin(d.side) + d.start;
                let (x, _, y) = hallway.position;
                approx_eq(along, if d.side.is_vertical() { y } else { x })
            });
            let door = door.unwrap();
            assert_eq!(hallway.is_vertical, !door.side.is_vertical());
            let (x, _, y) = hallway.position;
            let line = rooms[a].area.side_coordinate(door.side);
            assert!(approx_eq(line, if door.side.is_vertical() { x } else { y }));
        }
    }

    #[test]
    fn test_hallway_start_keeps_inset() {
        let mut rng = GameRng::new(1);
        for _ in 0..200 {
            let start = choose_hallway_start(10.0, 30.0, 4.0, 1.5, &mut rng);
            assert!((11.5..=24.5).contains(&start));
        }
    }

    #[test]
    fn test_hallway_start_falls_back_when_tight() {
        let mut rng = GameRng::new(1);
        for _ in 0..200 {
            let start = choose_hallway_start(0.0, 5.0, 4.0, 1.5, &mut rng);
            assert!((0.0..=1.0).contains(&start));
        }
    }

    #[test]
    fn test_wall_segments_without_doors() {
        let room = Room::new(0, Rect::new(0.0, 0.0, 10.0, 8.0));
        let segments = wall_segments(&room, 1.0);
        assert_eq!(segments.len(), 4);
        let top = segments.iter().find(|s| s.side == Side::Top).unwrap();
        assert_eq!((top.start, top.length), (1.0, 8.0));
        let left = segments.iter().find(|s| s.side == Side::Left).unwrap();
        assert_eq!((left.start, left.length), (1.0, 6.0));
    }

    #[test]
    fn test_wall_segments_leave_door_gaps() {
        let mut room = Room::new(0, Rect::new(0.0, 0.0, 20.0, 10.0));
        room.add_door(Door::new(Side::Bottom, 12.0, 4.0));
        room.add_door(Door::new(Side::Bottom, 3.0, 4.0));

        let bottom: Vec<_> = wall_segments(&room, 1.0)
            .into_iter()
            .filter(|s| s.side == Side::Bottom)
            .collect();
        assert_eq!(bottom.len(), 3);
        assert_eq!((bottom[0].start, bottom[0].end()), (1.0, 3.0));
        assert_eq!((bottom[1].start, bottom[1].end()), (7.0, 12.0));
        assert_eq!((bottom[2].start, bottom[2].end()), (16.0, 19.0));
    }

    #[test]
    fn test_wall_segments_skip_empty_stretches() {
        let mut room = Room::new(0, Rect::new(0.0, 0.0, 6.0, 10.0));
        room.add_door(Door::new(Side::Top, 1.0, 4.0));
        let top: Vec<_> = wall_segments(&room, 1.0)
            .into_iter()
            .filter(|s| s.side == Side::Top)
            .collect();
        assert!(top.is_empty());
    }
}
