//src/dungeon/src/lib.rs
//! Procedural dungeon floors: room layout, corridors, and population.
//!
//! Generation runs in two passes. [`DungeonGenerator`] carves rooms and
//! corridors into an all-wall grid, then [`EncounterSpawner`] places enemies,
//! treasures, the boss and traps using a difficulty-bound entity factory.

use combat::{Difficulty, DifficultyEntityFactory};
use rand::Rng;

pub mod config;
pub mod generator;
pub mod level;
pub mod spawner;

pub use crate::config::MapConfig;
pub use crate::generator::DungeonGenerator;
pub use crate::level::rooms::Room;
pub use crate::level::tiles::Tile;
pub use crate::level::{DungeonLevel, EntityRef};
pub use crate::spawner::EncounterSpawner;

/// 使用给定配置生成并填充一层地牢
pub fn generate_level_with<R: Rng + ?Sized>(
    config: &MapConfig,
    depth: u32,
    difficulty: Difficulty,
    rng: &mut R,
) -> error::Result<DungeonLevel> {
    let generator = DungeonGenerator::new(config.clone())?;
    let mut level = generator.generate(depth, difficulty, rng)?;
    let factory = DifficultyEntityFactory::new(difficulty, level.depth);
    EncounterSpawner::new(&factory).populate(&mut level, rng);
    Ok(level)
}

/// 使用默认 60x20 地图生成一层
pub fn generate_level<R: Rng + ?Sized>(
    depth: u32,
    difficulty: Difficulty,
    rng: &mut R,
) -> error::Result<DungeonLevel> {
    generate_level_with(&MapConfig::default(), depth, difficulty, rng)
}
