//! Room population
//!
//! Fills each room's usable interior with the player start marker, enemies,
//! static props, guns and pickables. Candidate positions are drawn uniformly
//! so the footprint stays inside the interior; categories flagged in the
//! [`CollisionMask`] are rejected when they would overlap anything already
//! placed in the room.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, warn};

use crate::config::{GeneratorConfig, RoomSizeConfiguration};
use crate::rng::RandomSource;

use super::rect::Rect;
use super::room::{Room, RoomRuntimeData};

bitflags! {
    /// Prop categories whose footprints must not overlap
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionMask: u8 {
        const PLAYER_START = 0x01;
        const SHOOTER = 0x02;
        const MELEE = 0x04;
        const STATIC_PROP = 0x08;
        const GUN = 0x10;
        const PICKABLE = 0x20;
    }
}

impl Default for CollisionMask {
    fn default() -> Self {
        CollisionMask::PLAYER_START | CollisionMask::MELEE | CollisionMask::STATIC_PROP
    }
}

// Manual serde impl for CollisionMask
impl Serialize for CollisionMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CollisionMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(CollisionMask::from_bits_truncate(bits))
    }
}

/// Kind of thing placed in a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum PropCategory {
    PlayerStart,
    Shooter,
    Melee,
    StaticProp,
    Gun,
    Pickable,
}

impl PropCategory {
    /// Collision flag for this category
    pub const fn mask(self) -> CollisionMask {
        match self {
            PropCategory::PlayerStart => CollisionMask::PLAYER_START,
            PropCategory::Shooter => CollisionMask::SHOOTER,
            PropCategory::Melee => CollisionMask::MELEE,
            PropCategory::StaticProp => CollisionMask::STATIC_PROP,
            PropCategory::Gun => CollisionMask::GUN,
            PropCategory::Pickable => CollisionMask::PICKABLE,
        }
    }

    pub const fn is_enemy(self) -> bool {
        matches!(self, PropCategory::Shooter | PropCategory::Melee)
    }
}

/// Footprint of one prop kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropSpec {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

impl PropSpec {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Footprint anchored at the origin
    pub fn footprint(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Everything the populator can place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropCatalog {
    pub player_start: PropSpec,
    pub shooter: PropSpec,
    pub melee: PropSpec,
    pub static_props: Vec<PropSpec>,
    pub guns: Vec<PropSpec>,
    pub pickables: Vec<PropSpec>,
}

impl Default for PropCatalog {
    fn default() -> Self {
        Self {
            player_start: PropSpec::new("player_start", 1.0, 1.0),
            shooter: PropSpec::new("shooter", 1.0, 1.0),
            melee: PropSpec::new("melee", 1.0, 1.0),
            static_props: vec![
                PropSpec::new("crate", 1.0, 1.0),
                PropSpec::new("barrel", 0.8, 0.8),
                PropSpec::new("table", 2.0, 1.0),
                PropSpec::new("shelf", 3.0, 0.6),
                PropSpec::new("container", 6.0, 2.5),
            ],
            guns: vec![
                PropSpec::new("pistol", 0.5, 0.5),
                PropSpec::new("rifle", 1.0, 0.4),
            ],
            pickables: vec![
                PropSpec::new("medkit", 0.5, 0.5),
                PropSpec::new("ammo", 0.4, 0.4),
            ],
        }
    }
}

/// How hard to try before giving up on a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPolicy {
    /// At most this many candidate positions
    Bounded(usize),
    /// Keep drawing candidates until one is free
    Unbounded,
}

/// A prop that found a spot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedProp {
    pub room_id: usize,
    pub category: PropCategory,
    pub name: String,
    /// Final footprint on the level plane
    pub footprint: Rect,
}

impl PlacedProp {
    /// Footprint center in world space
    pub fn world_position(&self) -> (f64, f64, f64) {
        self.footprint.world_center()
    }
}

/// Uniform position for `footprint` so that it stays inside `container`
pub fn random_position_inside<R: RandomSource>(
    container: &Rect,
    footprint: &Rect,
    rng: &mut R,
) -> (f64, f64) {
    let x = rng.range_f64(container.left(), container.right() - footprint.width);
    let y = rng.range_f64(container.bottom(), container.top() - footprint.height);
    (x, y)
}

/// Size row for a room: the highest `min_area` not above `area`, or the
/// lowest row when none qualifies
pub fn choose_configuration(
    configs: &[RoomSizeConfiguration],
    area: f64,
) -> Option<&RoomSizeConfiguration> {
    configs
        .iter()
        .filter(|c| c.min_area <= area)
        .max_by(|a, b| a.min_area.total_cmp(&b.min_area))
        .or_else(|| configs.iter().min_by(|a, b| a.min_area.total_cmp(&b.min_area)))
}

/// Room that holds the player start: the smallest one, first on ties
pub fn choose_player_start(rooms: &[Room]) -> Option<usize> {
    rooms
        .iter()
        .fold(None::<&Room>, |best, room| match best {
            Some(b) if b.area.area() <= room.area.area() => Some(b),
            _ => Some(room),
        })
        .map(|room| room.id)
}

/// Placement state for one room
#[derive(Debug, Clone)]
pub struct RoomPlacer {
    room_id: usize,
    container: Rect,
    collision: CollisionMask,
    placed: Vec<PlacedProp>,
}

impl RoomPlacer {
    pub fn new(room_id: usize, container: Rect, collision: CollisionMask) -> Self {
        Self {
            room_id,
            container,
            collision,
            placed: Vec::new(),
        }
    }

    pub fn placed(&self) -> &[PlacedProp] {
        &self.placed
    }

    pub fn into_props(self) -> Vec<PlacedProp> {
        self.placed
    }

    fn is_free(&self, rect: &Rect) -> bool {
        self.placed.iter().all(|p| !p.footprint.intersects(rect))
    }

    /// Try to put one prop in the room. Returns false when no free spot was
    /// found within the policy's budget.
    pub fn try_place<R: RandomSource>(
        &mut self,
        spec: &PropSpec,
        category: PropCategory,
        policy: PlacementPolicy,
        rng: &mut R,
    ) -> bool {
        let footprint = spec.footprint();
        if !footprint.can_fit_in(&self.container) {
            warn!(
                room = self.room_id,
                prop = %spec.name,
                "footprint larger than the room interior"
            );
            return false;
        }

        let checks = self.collision.contains(category.mask());
        let mut attempt = 0usize;
        loop {
            if let PlacementPolicy::Bounded(retries) = policy
                && attempt >= retries
            {
                warn!(
                    room = self.room_id,
                    prop = %spec.name,
                    %category,
                    retries,
                    "no free spot found, skipping"
                );
                return false;
            }
            attempt += 1;

            let (x, y) = random_position_inside(&self.container, &footprint, rng);
            let candidate = footprint.at(x, y);
            if !checks || self.is_free(&candidate) {
                self.placed.push(PlacedProp {
                    room_id: self.room_id,
                    category,
                    name: spec.name.clone(),
                    footprint: candidate,
                });
                return true;
            }
        }
    }
}

/// Props and counters produced for one room
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomPopulation {
    pub runtime: RoomRuntimeData,
    pub props: Vec<PlacedProp>,
}

/// Populate one room
pub fn populate_room<R: RandomSource>(
    room: &Room,
    is_player_start: bool,
    config: &GeneratorConfig,
    catalog: &PropCatalog,
    rng: &mut R,
) -> RoomPopulation {
    let mut runtime = RoomRuntimeData {
        is_player_start,
        ..Default::default()
    };

    let Some(usable) = room.usable_area(config.padding, config.wall_thickness) else {
        warn!(room = room.id, "room has no usable interior");
        return RoomPopulation {
            runtime,
            props: Vec::new(),
        };
    };
    let Some(size) = choose_configuration(&config.room_configs, room.area.area()) else {
        return RoomPopulation {
            runtime,
            props: Vec::new(),
        };
    };

    let bounded = PlacementPolicy::Bounded(config.placement_retries);
    let mut placer = RoomPlacer::new(room.id, usable, config.collision);

    if is_player_start {
        placer.try_place(
            &catalog.player_start,
            PropCategory::PlayerStart,
            PlacementPolicy::Unbounded,
            rng,
        );
    }

    if !is_player_start && config.generate_enemies {
        let shooters = rng.range_usize(size.min_shooters, size.max_shooters);
        let melees = rng.range_usize(size.min_melees, size.max_melees);

        for _ in 0..shooters {
            if placer.try_place(&catalog.shooter, PropCategory::Shooter, bounded, rng) {
                runtime.shooter_count += 1;
            }
        }
        for _ in 0..melees {
            if placer.try_place(&catalog.melee, PropCategory::Melee, bounded, rng) {
                runtime.melee_count += 1;
            }
        }
    }

    if config.generate_statics {
        let fitting: Vec<&PropSpec> = catalog
            .static_props
            .iter()
            .filter(|p| p.footprint().can_fit_in(&usable))
            .collect();
        if !fitting.is_empty() {
            for _ in 0..size.min_static_props {
                if let Some(&spec) = rng.choose(&fitting)
                    && placer.try_place(spec, PropCategory::StaticProp, bounded, rng)
                {
                    runtime.static_prop_count += 1;
                }
            }
        }
    }

    let guns = size.min_guns.max(runtime.melee_count);
    for _ in 0..guns {
        if let Some(spec) = rng.choose(&catalog.guns)
            && placer.try_place(spec, PropCategory::Gun, bounded, rng)
        {
            runtime.gun_count += 1;
        }
    }
    for _ in 0..size.min_pickables {
        if let Some(spec) = rng.choose(&catalog.pickables)
            && placer.try_place(spec, PropCategory::Pickable, bounded, rng)
        {
            runtime.pickable_count += 1;
        }
    }

    debug!(
        room = room.id,
        area = room.area.area(),
        shooters = runtime.shooter_count,
        melees = runtime.melee_count,
        statics = runtime.static_prop_count,
        guns = runtime.gun_count,
        pickables = runtime.pickable_count,
        player_start = is_player_start,
        "room populated"
    );

    RoomPopulation {
        runtime,
        props: placer.into_props(),
    }
}
