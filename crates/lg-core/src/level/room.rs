//! Rooms, doors and hallways
//!
//! A room is the full leaf rectangle. The drawn floor sits `padding` inside
//! it and walls sit inside the floor, so two neighbouring rooms are separated
//! by a `2 * padding` gap that hallways bridge.

use serde::{Deserialize, Serialize};

use super::rect::{Rect, Side};

/// Gap in one wall of a room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    /// Wall the door is cut into
    pub side: Side,
    /// Offset from the room's origin along the side's axis
    pub start: f64,
    /// Width of the gap
    pub length: f64,
}

impl Door {
    pub fn new(side: Side, start: f64, length: f64) -> Self {
        Self {
            side,
            start,
            length,
        }
    }

    /// Local offset where the gap ends
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

/// One generated room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Position in the leaf registry
    pub id: usize,
    /// Leaf rectangle the room occupies
    pub area: Rect,
    /// Doors, in the order they were cut
    pub doors: Vec<Door>,
}

impl Room {
    /// Create a room without doors
    pub fn new(id: usize, area: Rect) -> Self {
        Self {
            id,
            area,
            doors: Vec::new(),
        }
    }

    pub fn add_door(&mut self, door: Door) {
        self.doors.push(door);
    }

    /// Placeable interior: the room inset by padding and wall thickness
    pub fn usable_area(&self, padding: f64, wall_thickness: f64) -> Option<Rect> {
        self.area.inset(padding + wall_thickness)
    }

    /// Doors on one side, sorted by start
    pub fn doors_on(&self, side: Side) -> Vec<Door> {
        let mut doors: Vec<Door> = self
            .doors
            .iter()
            .copied()
            .filter(|d| d.side == side)
            .collect();
        doors.sort_by(|a, b| a.start.total_cmp(&b.start));
        doors
    }

    /// Check if a door fits entirely within its side
    pub fn door_within_side(&self, door: &Door) -> bool {
        door.start >= -1e-9 && door.end() <= self.area.side_length(door.side) + 1e-9
    }
}

/// Connector between two rooms
///
/// The anchor lies on the shared boundary line at the hallway's start offset.
/// A vertical hallway crosses a horizontal boundary (rooms stacked along y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hallway {
    /// Anchor point in world space (y up)
    pub position: (f64, f64, f64),
    pub is_vertical: bool,
}

impl Hallway {
    pub fn new(position: (f64, f64, f64), is_vertical: bool) -> Self {
        Self {
            position,
            is_vertical,
        }
    }

    /// Plane rectangle the hallway floor covers: `2 * padding` across the
    /// boundary and `width` along it
    pub fn footprint(&self, padding: f64, width: f64) -> Rect {
        let (x, _, y) = self.position;
        if self.is_vertical {
            Rect::new(x, y - padding, width, 2.0 * padding)
        } else {
            Rect::new(x - padding, y, 2.0 * padding, width)
        }
    }
}

/// Per-room population state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRuntimeData {
    pub melee_count: usize,
    pub shooter_count: usize,
    pub is_player_start: bool,
    pub gun_count: usize,
    pub pickable_count: usize,
    pub static_prop_count: usize,
}

impl RoomRuntimeData {
    /// Entities placed in the room
    pub fn enemy_count(&self) -> usize {
        self.melee_count + self.shooter_count
    }
}
