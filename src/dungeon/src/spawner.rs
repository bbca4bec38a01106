// src/dungeon/src/spawner.rs

use combat::{DifficultyEntityFactory, EntityFactory};
use rand::Rng;
use tracing::debug;

use crate::level::DungeonLevel;
use crate::level::rooms::Room;
use crate::level::tiles::Tile;

/// 每隔几层出现一次 Boss
pub const BOSS_EVERY: u32 = 3;

/// 从第几层开始出现陷阱与精英
pub const HAZARD_DEPTH: u32 = 2;

/// 精英出现概率，随层数增长，上限 30%
pub fn elite_chance(depth: u32) -> f64 {
    (0.1 + (depth as f64 - 1.0) * 0.05).min(0.3)
}

/// Populates a laid-out level with enemies, treasures, a boss and traps.
pub struct EncounterSpawner<'a, F: EntityFactory = DifficultyEntityFactory> {
    factory: &'a F,
}

impl<'a, F: EntityFactory> EncounterSpawner<'a, F> {
    pub fn new(factory: &'a F) -> Self {
        Self { factory }
    }

    /// Spawns everything in a fixed order: enemies, treasures, boss, traps.
    pub fn populate<R: Rng + ?Sized>(&self, level: &mut DungeonLevel, rng: &mut R) {
        if level.rooms.is_empty() {
            return;
        }
        self.spawn_enemies(level, rng);
        self.spawn_treasures(level, rng);
        if level.depth % BOSS_EVERY == 0 {
            self.spawn_boss(level, rng);
        }
        if level.depth >= HAZARD_DEPTH {
            self.spawn_traps(level, rng);
        }
        debug!(
            depth = level.depth,
            enemies = level.enemies.len(),
            elites = level.enemies.iter().filter(|e| e.is_elite()).count(),
            treasures = level.treasures.len(),
            traps = level.traps.len(),
            boss = level.boss.is_some(),
            "level populated"
        );
    }

    /// 敌人不会出现在起始房间（只有一个房间时除外）
    pub fn spawn_enemies<R: Rng + ?Sized>(&self, level: &mut DungeonLevel, rng: &mut R) {
        let depth = level.depth;
        let count = rng.random_range(3..=3 + depth.saturating_mul(2).min(10));
        let chance = elite_chance(depth);

        for _ in 0..count {
            let Some(room) = pick_room(&level.rooms, true, rng) else {
                return;
            };
            let (x, y) = room.random_tile(level.width, level.height, rng);
            let elite = rng.random::<f64>() < chance && depth >= HAZARD_DEPTH;
            let enemy = if elite {
                self.factory.create_elite_enemy(x, y, rng)
            } else {
                self.factory.create_normal_enemy(x, y, rng)
            };
            level.enemies.push(enemy);
        }
    }

    /// 宝藏可以出现在任何房间
    pub fn spawn_treasures<R: Rng + ?Sized>(&self, level: &mut DungeonLevel, rng: &mut R) {
        let half = level.depth / 2;
        let count = rng.random_range(2 + half..=5 + half);
        for _ in 0..count {
            let Some(room) = pick_room(&level.rooms, false, rng) else {
                return;
            };
            let pos = room.random_tile(level.width, level.height, rng);
            level.treasures.insert(pos);
        }
    }

    /// Boss 位于最后一个房间的中心
    pub fn spawn_boss<R: Rng + ?Sized>(&self, level: &mut DungeonLevel, rng: &mut R) {
        if let Some((x, y)) = level.rooms.last().map(Room::center) {
            let boss = self.factory.create_boss(x, y, rng);
            debug!(boss = %boss.stats.name, x, y, "boss spawned");
            level.boss = Some(boss);
        }
    }

    /// 陷阱只在非起始房间，且至少要有两个房间
    pub fn spawn_traps<R: Rng + ?Sized>(&self, level: &mut DungeonLevel, rng: &mut R) {
        let count = rng.random_range(1..=2 + level.depth / 2);
        for _ in 0..count {
            if level.rooms.len() < 2 {
                return;
            }
            let Some(room) = pick_room(&level.rooms, true, rng) else {
                return;
            };
            let (x, y) = room.random_tile(level.width, level.height, rng);
            level.traps.insert((x, y));
            level.set_tile(x, y, Tile::Trap);
        }
    }
}

/// `skip_start` 时避开第一个房间；只有一个房间时仍返回它
fn pick_room<'r, R: Rng + ?Sized>(
    rooms: &'r [Room],
    skip_start: bool,
    rng: &mut R,
) -> Option<&'r Room> {
    let pool = if skip_start && rooms.len() > 1 {
        &rooms[1..]
    } else {
        rooms
    };
    if pool.is_empty() {
        return None;
    }
    Some(&pool[rng.random_range(0..pool.len())])
}
