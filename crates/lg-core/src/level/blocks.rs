//! Block descriptors for renderers
//!
//! Every block is an axis-aligned box given by its minimum corner and size in
//! world space (y up). Floors sit below `y = 0`, walls stand on top of them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::config::GeneratorConfig;

use super::materialize::{WallSegment, wall_segments};
use super::rect::{Rect, Side};
use super::room::{Hallway, Room};

/// What a block represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum BlockKind {
    Floor,
    Wall,
    HallwayFloor,
    HallwayWall,
}

/// One box of level geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    /// Owning room, `None` for hallway pieces
    pub room: Option<usize>,
    /// Minimum corner
    pub position: (f64, f64, f64),
    pub size: (f64, f64, f64),
}

impl Block {
    /// Footprint on the level plane
    pub fn plane_rect(&self) -> Rect {
        Rect::new(self.position.0, self.position.2, self.size.0, self.size.2)
    }

    fn slab(kind: BlockKind, room: Option<usize>, rect: Rect, y: f64, height: f64) -> Self {
        Self {
            kind,
            room,
            position: (rect.x, y, rect.y),
            size: (rect.width, height, rect.height),
        }
    }
}

/// Build floors, walls and hallway pieces for a whole level
pub fn build_blocks(rooms: &[Room], hallways: &[Hallway], config: &GeneratorConfig) -> Vec<Block> {
    let mut blocks = Vec::new();
    let floor_y = -config.floor_thickness;

    for room in rooms {
        if let Some(floor) = room.area.inset(config.padding) {
            blocks.push(Block::slab(
                BlockKind::Floor,
                Some(room.id),
                floor,
                floor_y,
                config.floor_thickness,
            ));
        }

        for segment in wall_segments(room, config.padding) {
            let rect = wall_rect(&room.area, &segment, config.padding, config.wall_thickness);
            blocks.push(Block::slab(
                BlockKind::Wall,
                Some(room.id),
                rect,
                0.0,
                config.wall_height,
            ));
        }
    }

    let width = config.hallway_width;
    let depth = config.wall_thickness;
    for hallway in hallways {
        let floor = hallway.footprint(config.padding, width);
        blocks.push(Block::slab(
            BlockKind::HallwayFloor,
            None,
            floor,
            floor_y,
            config.floor_thickness,
        ));

        let flanks = if hallway.is_vertical {
            [
                Rect::new(floor.x - depth, floor.y, depth, floor.height),
                Rect::new(floor.right(), floor.y, depth, floor.height),
            ]
        } else {
            [
                Rect::new(floor.x, floor.y - depth, floor.width, depth),
                Rect::new(floor.x, floor.top(), floor.width, depth),
            ]
        };
        for flank in flanks {
            blocks.push(Block::slab(
                BlockKind::HallwayWall,
                None,
                flank,
                0.0,
                config.wall_height,
            ));
        }
    }

    blocks
}

/// Plane rectangle of a wall segment, just inside the floor edge
fn wall_rect(area: &Rect, segment: &WallSegment, padding: f64, thickness: f64) -> Rect {
    match segment.side {
        Side::Left => Rect::new(
            area.left() + padding,
            area.y + segment.start,
            thickness,
            segment.length,
        ),
        Side::Right => Rect::new(
            area.right() - padding - thickness,
            area.y + segment.start,
            thickness,
            segment.length,
        ),
        Side::Bottom => Rect::new(
            area.x + segment.start,
            area.bottom() + padding,
            segment.length,
            thickness,
        ),
        Side::Top => Rect::new(
            area.x + segment.start,
            area.top() - padding - thickness,
            segment.length,
            thickness,
        ),
    }
}
