//! Generation errors
//!
//! Two fatal layers are kept apart so callers can tell which one misbehaved:
//! [`ConfigError`] is raised by the upfront parameter check before any work
//! starts, [`GeometryError`] means the partition/connectivity output broke an
//! invariant. Individual placement failures are not errors; they are logged
//! and skipped by the populator.

use thiserror::Error;

/// Inconsistent generator parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error(
        "padding and wall thickness ({margin}) must be less than the minimal room side ({min_room_side})"
    )]
    SizesInconsistent { margin: f64, min_room_side: f64 },

    #[error("hallway width too big for room dimensions: {hallway_width} >= {min_room_side}")]
    HallwayTooWide {
        hallway_width: f64,
        min_room_side: f64,
    },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("world size {world_size} is smaller than the minimal room side {min_room_side}")]
    WorldTooSmall { world_size: f64, min_room_side: f64 },

    #[error("without room configurations rooms cannot be populated")]
    NoRoomConfigurations,

    #[error("room configuration #{index} is invalid: {reason}")]
    InvalidRoomConfiguration { index: usize, reason: &'static str },

    #[error("placement retries must be at least 1")]
    NoPlacementRetries,

    #[error(
        "player start footprint {width}x{height} does not fit the smallest usable room area {usable}x{usable}"
    )]
    PlayerStartTooLarge { width: f64, height: f64, usable: f64 },
}

/// Broken partition or connectivity invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("no leaves of node {first} share an edge with leaves of its sibling {second}")]
    NoBridgeEdge { first: usize, second: usize },

    #[error("rooms {a} and {b} are connected but share no edge")]
    MissingSharedEdge { a: usize, b: usize },

    #[error("rooms {a} and {b} disagree on their shared edge")]
    AsymmetricEdge { a: usize, b: usize },

    #[error("only {reached} of {total} rooms are reachable")]
    Disconnected { reached: usize, total: usize },
}

/// Any fatal generation failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("geometry invariant violated: {0}")]
    Geometry(#[from] GeometryError),
}

impl GenerationError {
    /// True when the parameters were rejected before generation started
    pub fn is_config(&self) -> bool {
        matches!(self, GenerationError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hallway_message() {
        let err = ConfigError::HallwayTooWide {
            hallway_width: 6.0,
            min_room_side: 5.0,
        };
        assert!(err.to_string().contains("hallway width too big"));
    }

    #[test]
    fn test_layers_are_distinguishable() {
        let config: GenerationError = ConfigError::NoRoomConfigurations.into();
        let geometry: GenerationError = GeometryError::NoBridgeEdge { first: 1, second: 4 }.into();

        assert!(config.is_config());
        assert!(!geometry.is_config());
        assert!(geometry.to_string().starts_with("geometry invariant violated"));
    }
}
