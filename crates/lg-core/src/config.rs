//! Generator configuration
//!
//! Everything here deserializes with defaults, so a partial JSON object is a
//! valid configuration. [`GeneratorConfig::validate`] runs before any
//! generation work and rejects parameter sets that cannot produce a level.

use serde::{Deserialize, Serialize};

use crate::consts::{
    FLOOR_THICKNESS, HALLWAY_WIDTH, MIN_ROOM_SIDE, PADDING, PLACEMENT_RETRIES, WALL_HEIGHT,
    WALL_THICKNESS, WORLD_SIZE,
};
use crate::error::ConfigError;
use crate::level::populate::{CollisionMask, PropCatalog};
use crate::level::rect::Rect;

/// Population density for rooms of at least `min_area`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSizeConfiguration {
    pub min_area: f64,
    pub min_shooters: usize,
    pub max_shooters: usize,
    pub min_melees: usize,
    pub max_melees: usize,
    pub min_guns: usize,
    pub min_pickables: usize,
    pub min_static_props: usize,
}

impl RoomSizeConfiguration {
    fn check(&self, index: usize) -> Result<(), ConfigError> {
        let reason = if !(self.min_area >= 0.0) {
            "min_area must be a non-negative number"
        } else if self.min_shooters > self.max_shooters {
            "min_shooters exceeds max_shooters"
        } else if self.min_melees > self.max_melees {
            "min_melees exceeds max_melees"
        } else {
            return Ok(());
        };
        Err(ConfigError::InvalidRoomConfiguration { index, reason })
    }
}

/// Default density table, ascending by `min_area`
pub fn default_room_configs() -> Vec<RoomSizeConfiguration> {
    vec![
        RoomSizeConfiguration {
            min_area: 0.0,
            min_shooters: 0,
            max_shooters: 0,
            min_melees: 0,
            max_melees: 1,
            min_guns: 1,
            min_pickables: 1,
            min_static_props: 1,
        },
        RoomSizeConfiguration {
            min_area: 50.0,
            min_shooters: 0,
            max_shooters: 1,
            min_melees: 1,
            max_melees: 2,
            min_guns: 1,
            min_pickables: 1,
            min_static_props: 2,
        },
        RoomSizeConfiguration {
            min_area: 150.0,
            min_shooters: 1,
            max_shooters: 2,
            min_melees: 1,
            max_melees: 3,
            min_guns: 2,
            min_pickables: 2,
            min_static_props: 3,
        },
        RoomSizeConfiguration {
            min_area: 400.0,
            min_shooters: 2,
            max_shooters: 3,
            min_melees: 2,
            max_melees: 4,
            min_guns: 2,
            min_pickables: 3,
            min_static_props: 5,
        },
    ]
}

/// Parameters of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Side of the square world
    pub world_size: f64,
    pub min_room_side: f64,
    /// Gap between the leaf rectangle and the drawn floor
    pub padding: f64,
    pub wall_thickness: f64,
    pub wall_height: f64,
    pub floor_thickness: f64,
    /// Door and hallway width
    pub hallway_width: f64,
    /// Candidate positions per bounded placement
    pub placement_retries: usize,
    /// Density table, kept ascending by `min_area`
    pub room_configs: Vec<RoomSizeConfiguration>,
    /// Categories that may not overlap
    pub collision: CollisionMask,
    pub generate_enemies: bool,
    pub generate_statics: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            world_size: WORLD_SIZE,
            min_room_side: MIN_ROOM_SIDE,
            padding: PADDING,
            wall_thickness: WALL_THICKNESS,
            wall_height: WALL_HEIGHT,
            floor_thickness: FLOOR_THICKNESS,
            hallway_width: HALLWAY_WIDTH,
            placement_retries: PLACEMENT_RETRIES,
            room_configs: default_room_configs(),
            collision: CollisionMask::default(),
            generate_enemies: true,
            generate_statics: true,
        }
    }
}

impl GeneratorConfig {
    /// The square world, anchored at the origin
    pub fn world_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.world_size, self.world_size)
    }

    /// Space lost to padding and walls across a room
    pub fn margin(&self) -> f64 {
        2.0 * self.padding + 2.0 * self.wall_thickness
    }

    /// Distance a door keeps from the ends of a shared edge
    pub fn door_inset(&self) -> f64 {
        self.padding + self.wall_thickness
    }

    /// Shortest shared boundary that may carry a hallway
    pub fn min_overlap(&self) -> f64 {
        self.margin().max(self.hallway_width)
    }

    /// Side of the usable interior of the smallest possible room
    pub fn min_usable_side(&self) -> f64 {
        self.min_room_side - self.margin()
    }

    /// Keep the density table ascending by `min_area`
    pub fn sort_room_configs(&mut self) {
        self.room_configs.sort_by(|a, b| a.min_area.total_cmp(&b.min_area));
    }

    /// Reject parameter sets that cannot produce a level
    pub fn validate(&self, catalog: &PropCatalog) -> Result<(), ConfigError> {
        for (name, value) in [
            ("world_size", self.world_size),
            ("min_room_side", self.min_room_side),
            ("hallway_width", self.hallway_width),
            ("wall_height", self.wall_height),
            ("floor_thickness", self.floor_thickness),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        for (name, value) in [
            ("padding", self.padding),
            ("wall_thickness", self.wall_thickness),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if self.world_size < self.min_room_side {
            return Err(ConfigError::WorldTooSmall {
                world_size: self.world_size,
                min_room_side: self.min_room_side,
            });
        }
        if self.margin() >= self.min_room_side {
            return Err(ConfigError::SizesInconsistent {
                margin: self.margin(),
                min_room_side: self.min_room_side,
            });
        }
        if self.hallway_width >= self.min_room_side {
            return Err(ConfigError::HallwayTooWide {
                hallway_width: self.hallway_width,
                min_room_side: self.min_room_side,
            });
        }
        if self.placement_retries == 0 {
            return Err(ConfigError::NoPlacementRetries);
        }

        if self.room_configs.is_empty() {
            return Err(ConfigError::NoRoomConfigurations);
        }
        for (index, row) in self.room_configs.iter().enumerate() {
            row.check(index)?;
        }

        let usable = self.min_usable_side();
        let marker = &catalog.player_start;
        if marker.width > usable || marker.height > usable {
            return Err(ConfigError::PlayerStartTooLarge {
                width: marker.width,
                height: marker.height,
                usable,
            });
        }

        Ok(())
    }
}
