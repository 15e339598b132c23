//! Default generation parameters
//!
//! Units are world units (one unit is one meter). These are the
//! values `GeneratorConfig::default()` starts from.

/// Side length of the square world
pub const WORLD_SIZE: f64 = 100.0;

/// No room side may end up shorter than this
pub const MIN_ROOM_SIDE: f64 = 5.0;

/// Gap between a leaf's rectangle and the room drawn inside it
pub const PADDING: f64 = 1.0;

/// Wall depth
pub const WALL_THICKNESS: f64 = 0.5;

/// Wall height (y-up)
pub const WALL_HEIGHT: f64 = 6.0;

/// Floor slab height
pub const FLOOR_THICKNESS: f64 = 0.5;

/// Door / hallway opening width
pub const HALLWAY_WIDTH: f64 = 4.0;

/// Candidate positions tried per bounded placement
pub const PLACEMENT_RETRIES: usize = 10;

/// Relative tolerance used when comparing rectangle edges
pub const EDGE_EPSILON: f64 = 1e-6;

/// Approximate float equality, scaled by magnitude
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EDGE_EPSILON * a.abs().max(b.abs()).max(1.0)
}
