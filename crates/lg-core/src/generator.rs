//! Level generation pipeline
//!
//! validate → partition → connect → reachability check → materialize rooms,
//! doors and hallways → build blocks → navigation hook → populate →
//! completion hooks.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::error::{GenerationError, GeometryError};
use crate::level::blocks::{Block, build_blocks};
use crate::level::connectivity::{RoomGraph, adjacency_edges, connect_partition};
use crate::level::materialize::PartitionContext;
use crate::level::partition::partition_space;
use crate::level::populate::{
    PlacedProp, PropCatalog, PropCategory, choose_player_start, populate_room,
};
use crate::level::rect::Rect;
use crate::level::room::{Hallway, Room, RoomRuntimeData};
use crate::rng::{GameRng, RandomSource};

/// Callbacks into whatever consumes the generated level
///
/// Every method defaults to doing nothing.
pub trait GenerationHooks {
    /// Geometry is final; called once before population
    fn rebuild_navigation(&mut self, _rooms: &[Room], _hallways: &[Hallway], _blocks: &[Block]) {}

    /// First completion phase
    fn on_generation_complete(&mut self, _level: &GeneratedLevel) {}

    /// Called once for the player-start room with the placed marker
    fn spawn_at_room(&mut self, _room: &Room, _marker: Option<&PlacedProp>) {}

    /// Second completion phase, after the spawn
    fn on_post_generation_setup(&mut self, _level: &GeneratedLevel) {}
}

/// Hooks that ignore every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl GenerationHooks for NoHooks {}

/// Output of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLevel {
    /// Seed, when the run was driven by a seeded [`GameRng`]
    pub seed: Option<u64>,
    pub world: Rect,
    pub rooms: Vec<Room>,
    pub hallways: Vec<Hallway>,
    /// Room pair joined by each hallway, same order as `hallways`
    pub connections: Vec<(usize, usize)>,
    pub blocks: Vec<Block>,
    pub props: Vec<PlacedProp>,
    /// Population counters, indexed by room id
    pub runtime: Vec<RoomRuntimeData>,
    pub player_start_room: Option<usize>,
}

impl GeneratedLevel {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// The placed player start marker
    pub fn player_start(&self) -> Option<&PlacedProp> {
        self.props
            .iter()
            .find(|p| p.category == PropCategory::PlayerStart)
    }

    /// Props of one room, in placement order
    pub fn props_in(&self, room: usize) -> impl Iterator<Item = &PlacedProp> {
        self.props.iter().filter(move |p| p.room_id == room)
    }

    /// Props grouped by room
    pub fn props_by_room(&self) -> HashMap<usize, Vec<&PlacedProp>> {
        let mut map: HashMap<usize, Vec<&PlacedProp>> = HashMap::new();
        for prop in &self.props {
            map.entry(prop.room_id).or_default().push(prop);
        }
        map
    }

    /// Rooms reachable through hallways from `room`, including itself
    pub fn reachable_from(&self, room: usize) -> usize {
        RoomGraph::from_edges(self.rooms.len(), &self.connections).reachable_from(room)
    }
}

/// Owns the configuration and the current level
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    config: GeneratorConfig,
    catalog: PropCatalog,
    level: Option<GeneratedLevel>,
}

impl LevelGenerator {
    pub fn new(mut config: GeneratorConfig, catalog: PropCatalog) -> Self {
        config.sort_room_configs();
        Self {
            config,
            catalog,
            level: None,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PropCatalog {
        &self.catalog
    }

    /// Current level, if one has been generated since the last reset
    pub fn level(&self) -> Option<&GeneratedLevel> {
        self.level.as_ref()
    }

    /// Drop the current level and everything generated with it
    pub fn reset(&mut self) {
        if let Some(level) = self.level.take() {
            debug!(
                rooms = level.rooms.len(),
                blocks = level.blocks.len(),
                props = level.props.len(),
                "level reset"
            );
        }
    }

    /// Generate from a seed, without hooks
    pub fn generate(&mut self, seed: u64) -> Result<&GeneratedLevel, GenerationError> {
        let mut rng = GameRng::new(seed);
        self.generate_seeded(&mut rng, &mut NoHooks)
    }

    /// Generate from a seeded rng, keeping its seed on the level
    pub fn generate_seeded<H: GenerationHooks>(
        &mut self,
        rng: &mut GameRng,
        hooks: &mut H,
    ) -> Result<&GeneratedLevel, GenerationError> {
        let seed = rng.seed();
        self.run(rng, hooks, Some(seed))
    }

    /// Generate with any random source and hooks
    pub fn generate_with<R: RandomSource, H: GenerationHooks>(
        &mut self,
        rng: &mut R,
        hooks: &mut H,
    ) -> Result<&GeneratedLevel, GenerationError> {
        self.run(rng, hooks, None)
    }

    fn run<R: RandomSource, H: GenerationHooks>(
        &mut self,
        rng: &mut R,
        hooks: &mut H,
        seed: Option<u64>,
    ) -> Result<&GeneratedLevel, GenerationError> {
        self.reset();
        let level = build_level(&self.config, &self.catalog, rng, hooks, seed)?;
        let level: &GeneratedLevel = self.level.insert(level);
        Ok(level)
    }
}

/// One-shot generation
pub fn generate(
    config: &GeneratorConfig,
    catalog: &PropCatalog,
    seed: u64,
) -> Result<GeneratedLevel, GenerationError> {
    let mut rng = GameRng::new(seed);
    build_level(config, catalog, &mut rng, &mut NoHooks, Some(seed))
}

fn build_level<R: RandomSource, H: GenerationHooks>(
    config: &GeneratorConfig,
    catalog: &PropCatalog,
    rng: &mut R,
    hooks: &mut H,
    seed: Option<u64>,
) -> Result<GeneratedLevel, GenerationError> {
    config.validate(catalog)?;
    warn_on_empty_catalog(config, catalog);

    let mut tree = partition_space(config.world_rect(), config.min_room_side, rng);
    tree.set_up_intervals();
    let edge_count = connect_partition(&mut tree, config.min_overlap())?;
    let connections = adjacency_edges(&tree);
    ensure_reachable(tree.leaf_count(), &connections)?;
    info!(
        rooms = tree.leaf_count(),
        edges = edge_count,
        "partition connected"
    );

    let mut context = PartitionContext::new(tree);
    context.rooms(config, rng)?;
    let (rooms, hallways) = context.into_parts();
    let blocks = build_blocks(&rooms, &hallways, config);
    hooks.rebuild_navigation(&rooms, &hallways, &blocks);

    let player_start_room = choose_player_start(&rooms);
    let mut props = Vec::new();
    let mut runtime = Vec::with_capacity(rooms.len());
    for room in &rooms {
        let population = populate_room(
            room,
            player_start_room == Some(room.id),
            config,
            catalog,
            rng,
        );
        runtime.push(population.runtime);
        props.extend(population.props);
    }

    let level = GeneratedLevel {
        seed,
        world: config.world_rect(),
        rooms,
        hallways,
        connections,
        blocks,
        props,
        runtime,
        player_start_room,
    };
    info!(
        seed = ?level.seed,
        rooms = level.rooms.len(),
        hallways = level.hallways.len(),
        blocks = level.blocks.len(),
        props = level.props.len(),
        player_start = ?level.player_start_room,
        "level generated"
    );

    hooks.on_generation_complete(&level);
    if let Some(id) = level.player_start_room
        && let Some(room) = level.rooms.get(id)
    {
        hooks.spawn_at_room(room, level.player_start());
    }
    hooks.on_post_generation_setup(&level);

    Ok(level)
}

/// Every room must be reachable from room 0 over the hallway edges
fn ensure_reachable(
    room_count: usize,
    connections: &[(usize, usize)],
) -> Result<(), GeometryError> {
    let graph = RoomGraph::from_edges(room_count, connections);
    if graph.all_connected() {
        Ok(())
    } else {
        Err(GeometryError::Disconnected {
            reached: graph.reachable_from(0),
            total: room_count,
        })
    }
}

fn warn_on_empty_catalog(config: &GeneratorConfig, catalog: &PropCatalog) {
    if config.generate_statics && catalog.static_props.is_empty() {
        warn!("static prop catalog is empty, rooms get no static props");
    }
    if catalog.guns.is_empty() {
        warn!("gun catalog is empty, rooms get no guns");
    }
    if catalog.pickables.is_empty() {
        warn!("pickable catalog is empty, rooms get no pickables");
    }
}
