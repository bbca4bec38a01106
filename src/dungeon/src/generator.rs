// src/dungeon/src/generator.rs

use combat::Difficulty;
use error::GameError;
use rand::Rng;
use tracing::{debug, trace};

use crate::config::MapConfig;
use crate::level::DungeonLevel;
use crate::level::rooms::{Room, TREASURE_ROOM_CHANCE};
use crate::level::tiles::Tile;

/// Lays out rooms and corridors. Knows nothing about entities.
#[derive(Clone, Debug)]
pub struct DungeonGenerator {
    config: MapConfig,
}

impl DungeonGenerator {
    pub fn new(config: MapConfig) -> error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// 生成一层的房间与走廊（未放置实体）
    pub fn generate<R: Rng + ?Sized>(
        &self,
        depth: u32,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> error::Result<DungeonLevel> {
        let depth = depth.max(1);
        let cfg = &self.config;
        let mut level = DungeonLevel::new(cfg.width, cfg.height, depth, difficulty);

        let d = i32::try_from(depth).unwrap_or(i32::MAX);
        let room_count = rng.random_range(4 + d / 2..=d.saturating_add(7));
        let (min_size, max_size) = cfg.room_size_bounds(depth);

        for _ in 0..room_count {
            let Some(room) = self.place_room(&level.rooms, min_size, max_size, rng) else {
                trace!(depth, "room skipped after {} attempts", cfg.room_attempts);
                continue;
            };
            carve_room(&mut level, &room);
            if let Some(prev) = level.rooms.last().copied() {
                carve_tunnel(&mut level, &prev, &room, rng.random_bool(0.5));
            }
            level.rooms.push(room);
        }

        if level.rooms.is_empty() {
            return Err(GameError::NoRooms);
        }
        debug!(
            depth,
            requested = room_count,
            placed = level.rooms.len(),
            "dungeon layout generated"
        );
        Ok(level)
    }

    /// 随机尝试放置房间，全部失败时返回 None
    fn place_room<R: Rng + ?Sized>(
        &self,
        existing: &[Room],
        min_size: i32,
        max_size: i32,
        rng: &mut R,
    ) -> Option<Room> {
        let cfg = &self.config;
        for _ in 0..cfg.room_attempts {
            let w = rng.random_range(min_size..=max_size);
            let h = rng.random_range(min_size..=max_size);
            let x = rng.random_range(1..=cfg.width - w - 2);
            let y = rng.random_range(1..=cfg.height - h - 2);
            let candidate = Room::new(x, y, w, h, rng.random::<f64>() < TREASURE_ROOM_CHANCE);

            if !existing.iter().any(|r| candidate.overlaps(r, cfg.room_padding)) {
                return Some(candidate);
            }
        }
        None
    }
}

fn carve_room(level: &mut DungeonLevel, room: &Room) {
    for y in room.y..room.y + room.height {
        for x in room.x..room.x + room.width {
            level.set_tile(x, y, Tile::Floor);
        }
    }
}

/// L 形走廊，`horizontal_first` 决定拐角位置
fn carve_tunnel(level: &mut DungeonLevel, from: &Room, to: &Room, horizontal_first: bool) {
    let (x1, y1) = from.center();
    let (x2, y2) = to.center();
    if horizontal_first {
        carve_h(level, x1, x2, y1);
        carve_v(level, y1, y2, x2);
    } else {
        carve_v(level, y1, y2, x1);
        carve_h(level, x1, x2, y2);
    }
}

fn carve_h(level: &mut DungeonLevel, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        level.set_tile(x, y, Tile::Floor);
    }
}

fn carve_v(level: &mut DungeonLevel, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        level.set_tile(x, y, Tile::Floor);
    }
}
