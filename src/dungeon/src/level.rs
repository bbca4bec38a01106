// src/dungeon/src/level.rs

use std::collections::BTreeSet;

use combat::{BossEntity, Difficulty, EntityStats};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod rooms;
pub mod tiles;

use crate::level::rooms::Room;
use crate::level::tiles::Tile;

/// 某格上的存活实体
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityRef {
    /// `DungeonLevel::enemies` 中的下标
    Enemy(usize),
    Boss,
}

/// One generated floor. Owns every tile and entity on it; only the player
/// lives outside and is passed in where needed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DungeonLevel {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    /// 按创建顺序排列，也是走廊的连接顺序
    pub rooms: Vec<Room>,
    pub enemies: Vec<EntityStats>,
    pub boss: Option<BossEntity>,
    pub treasures: BTreeSet<(i32, i32)>,
    pub traps: BTreeSet<(i32, i32)>,
    pub depth: u32,
    pub difficulty: Difficulty,
}

impl DungeonLevel {
    /// 全部为墙壁的空地图
    pub fn new(width: i32, height: i32, depth: u32, difficulty: Difficulty) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; size],
            rooms: Vec::new(),
            enemies: Vec::new(),
            boss: None,
            treasures: BTreeSet::new(),
            traps: BTreeSet::new(),
            depth,
            difficulty,
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    /// 越界写入会被忽略
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// 检查位置是否可通行
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(Tile::is_passable)
    }

    /// 获取指定位置的存活敌人或 Boss
    pub fn entity_at(&self, x: i32, y: i32) -> Option<EntityRef> {
        if let Some(i) = self
            .enemies
            .iter()
            .position(|e| e.is_alive() && e.position() == (x, y))
        {
            return Some(EntityRef::Enemy(i));
        }
        match &self.boss {
            Some(boss) if boss.is_alive() && boss.stats.position() == (x, y) => {
                Some(EntityRef::Boss)
            }
            _ => None,
        }
    }

    pub fn enemy_mut(&mut self, index: usize) -> Option<&mut EntityStats> {
        self.enemies.get_mut(index)
    }

    pub fn boss_mut(&mut self) -> Option<&mut BossEntity> {
        self.boss.as_mut()
    }

    /// 检查指定位置是否有宝藏
    pub fn treasure_at(&self, x: i32, y: i32) -> bool {
        self.treasures.contains(&(x, y))
    }

    /// 拾取宝藏，返回该位置是否真的有宝藏
    pub fn collect_treasure(&mut self, x: i32, y: i32) -> bool {
        self.treasures.remove(&(x, y))
    }

    /// 陷阱伤害随深度增长
    pub fn trap_damage(&self) -> u32 {
        5 + self.depth * 2
    }

    /// Springs the trap at (x, y), if any. The trap is consumed and the tile
    /// turns back into floor.
    pub fn trigger_trap(&mut self, x: i32, y: i32, player: &mut EntityStats) -> Option<u32> {
        if !self.traps.remove(&(x, y)) {
            return None;
        }
        let damage = self.trap_damage();
        player.take_damage(damage);
        self.set_tile(x, y, Tile::Floor);
        Some(damage)
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// 所有敌人和 Boss 都被击败
    pub fn is_cleared(&self) -> bool {
        self.live_enemy_count() == 0 && self.boss.as_ref().is_none_or(|b| !b.is_alive())
    }

    /// 第一个房间的中心
    pub fn start_position(&self) -> Option<(i32, i32)> {
        self.rooms.first().map(Room::center)
    }

    /// 随机房间中的随机一格（传送用）；没有房间时返回 None
    pub fn random_room_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(i32, i32)> {
        if self.rooms.is_empty() {
            return None;
        }
        let room = &self.rooms[rng.random_range(0..self.rooms.len())];
        Some(room.random_tile(self.width, self.height, rng))
    }

    /// 每行一个字符串，仅用于调试输出
    pub fn ascii_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.tile(x, y).unwrap_or_default().glyph())
                    .collect()
            })
            .collect()
    }
}
