//! lg-core: BSP level generation
//!
//! Partitions a square world into rectangular rooms, connects every room,
//! cuts doors and hallways between neighbours and populates the rooms.
//! Pure logic, no I/O; all randomness comes from an injected [`RandomSource`].
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`rng`] | Random source trait and seeded rng |
//! | [`config`] | Generator parameters and upfront validation |
//! | [`error`] | Configuration and geometry errors |
//! | [`level`] | Partition, connectivity, rooms, blocks, population |
//! | [`generator`] | The full pipeline and its hooks |

pub mod config;
pub mod error;
pub mod generator;
pub mod level;
pub mod rng;

mod consts;

pub use config::{GeneratorConfig, RoomSizeConfiguration, default_room_configs};
pub use consts::*;
pub use error::{ConfigError, GenerationError, GeometryError};
pub use generator::{GeneratedLevel, GenerationHooks, LevelGenerator, NoHooks, generate};
pub use rng::{GameRng, RandomSource};
