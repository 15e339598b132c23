//! Level geometry and population
//!
//! Contains the partition tree, connectivity, rooms with their doors and
//! hallways, renderer blocks and the room populator.

pub mod blocks;
pub mod connectivity;
pub mod materialize;
pub mod partition;
pub mod populate;
pub mod rect;
pub mod room;

pub use blocks::{Block, BlockKind, build_blocks};
pub use connectivity::{RoomGraph, adjacency_edges, connect_partition, connect_rooms};
pub use materialize::{PartitionContext, WallSegment, choose_hallway_start, wall_segments};
pub use partition::{LeafId, NodeId, PartitionNode, PartitionTree, partition_space, split_rect};
pub use populate::{
    CollisionMask, PlacedProp, PlacementPolicy, PropCatalog, PropCategory, PropSpec,
    RoomPlacer, RoomPopulation, choose_configuration, choose_player_start, populate_room,
    random_position_inside,
};
pub use rect::{EdgeShare, Rect, Side};
pub use room::{Door, Hallway, Room, RoomRuntimeData};
