use lg_core::level::{PropCatalog, PropCategory, Rect};
use lg_core::{
    ConfigError, GenerationError, GeneratorConfig, LevelGenerator, NoHooks, RandomSource,
    RoomSizeConfiguration, generate,
};

/// Always picks the middle of every range
struct Midpoint;

impl RandomSource for Midpoint {
    fn value(&mut self) -> f64 {
        0.25
    }

    fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo { (lo + hi) / 2.0 } else { lo }
    }

    fn range_usize(&mut self, lo: usize, _hi: usize) -> usize {
        lo
    }
}

fn row(min_area: f64, shooters: usize) -> RoomSizeConfiguration {
    RoomSizeConfiguration {
        min_area,
        min_shooters: shooters,
        max_shooters: shooters,
        ..Default::default()
    }
}

#[test]
fn test_default_parameters_generate_connected_level() {
    let config = GeneratorConfig::default();
    assert_eq!(config.world_size, 100.0);
    assert_eq!(config.min_room_side, 5.0);
    assert_eq!(config.padding, 1.0);
    assert_eq!(config.wall_thickness, 0.5);
    assert_eq!(config.hallway_width, 4.0);

    let level = generate(&config, &PropCatalog::default(), 2024).unwrap();
    assert!(level.room_count() >= 1);
    let start = level.player_start_room.unwrap();
    assert_eq!(level.reachable_from(start), level.room_count());
}

#[test]
fn test_hallway_too_wide_fails_before_generation() {
    let config = GeneratorConfig {
        min_room_side: 5.0,
        hallway_width: 6.0,
        ..Default::default()
    };
    let err = generate(&config, &PropCatalog::default(), 1).unwrap_err();
    assert_eq!(
        err,
        GenerationError::Config(ConfigError::HallwayTooWide {
            hallway_width: 6.0,
            min_room_side: 5.0,
        })
    );
    assert!(err.to_string().contains("hallway width too big for room dimensions"));
}

#[test]
fn test_large_rooms_use_top_configuration() {
    // Every room is at least 5x5 = 25, above all thresholds
    let config = GeneratorConfig {
        world_size: 60.0,
        room_configs: vec![row(20.0, 3), row(0.0, 0), row(10.0, 1)],
        generate_statics: false,
        ..Default::default()
    };
    let mut generator = LevelGenerator::new(config, PropCatalog::default());
    let level = generator.generate(11).unwrap();

    for (id, data) in level.runtime.iter().enumerate() {
        if data.is_player_start {
            assert_eq!(data.shooter_count, 0);
        } else {
            assert_eq!(data.shooter_count, 3, "room {}", id);
        }
    }
}

#[test]
fn test_scripted_source_builds_grid() {
    let config = GeneratorConfig {
        world_size: 20.0,
        ..Default::default()
    };
    let mut generator = LevelGenerator::new(config, PropCatalog::default());
    let level = generator.generate_with(&mut Midpoint, &mut NoHooks).unwrap();

    // Every cut lands in the middle, leaving a 4x4 grid of 5x5 rooms
    assert_eq!(level.room_count(), 16);
    assert!(level.rooms.iter().all(|r| r.area.width == 5.0 && r.area.height == 5.0));
    assert_eq!(level.hallways.len(), 15);
    assert_eq!(level.seed, None);
    assert_eq!(level.player_start_room, Some(0));

    let marker = level.player_start().unwrap();
    assert_eq!(marker.footprint, Rect::new(2.0, 2.0, 1.0, 1.0));
}

#[test]
fn test_reset_then_regenerate_is_identical() {
    let mut generator = LevelGenerator::new(GeneratorConfig::default(), PropCatalog::default());
    let first = generator.generate(99).unwrap().clone();
    generator.reset();
    let second = generator.generate(99).unwrap().clone();
    assert_eq!(first, second);
}

#[test]
fn test_pickups_may_overlap_but_solids_do_not() {
    let config = GeneratorConfig::default();
    let level = generate(&config, &PropCatalog::default(), 7).unwrap();

    for room in &level.rooms {
        let solid: Vec<Rect> = level
            .props_in(room.id)
            .filter(|p| config.collision.contains(p.category.mask()))
            .map(|p| p.footprint)
            .collect();
        for (i, a) in solid.iter().enumerate() {
            for b in &solid[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }
    assert!(level.props.iter().any(|p| p.category == PropCategory::Pickable));
}

#[test]
fn test_level_serializes_to_json() {
    let level = generate(&GeneratorConfig::default(), &PropCatalog::default(), 5).unwrap();
    let json = serde_json::to_string(&level).unwrap();
    let back: lg_core::GeneratedLevel = serde_json::from_str(&json).unwrap();
    assert_eq!(back.rooms.len(), level.rooms.len());
    assert_eq!(back.connections, level.connections);
}
