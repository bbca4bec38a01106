// src/dungeon/src/config.rs

use error::GameError;
use serde::{Deserialize, Serialize};

/// 房间的最小边长
pub const MIN_ROOM_SIZE: i32 = 3;

/// Map dimensions and room-placement limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
    /// 每个房间的最大尝试次数
    pub room_attempts: u32,
    /// 房间之间的最小间隔
    pub room_padding: i32,
    /// 房间边长上限（会再受层数限制）
    pub max_room_size: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 20,
            room_attempts: 100,
            room_padding: 2,
            max_room_size: 10,
        }
    }
}

impl MapConfig {
    /// 最大房间加上四周边框所需的边长
    pub fn min_side(&self) -> i32 {
        self.max_room_size + 3
    }

    pub fn validate(&self) -> error::Result<()> {
        if self.max_room_size < MIN_ROOM_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "max_room_size must be at least {}, got {}",
                MIN_ROOM_SIZE, self.max_room_size
            )));
        }
        if self.room_padding < 0 {
            return Err(GameError::InvalidConfig(
                "room_padding cannot be negative".to_string(),
            ));
        }
        if self.room_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "room_attempts must be positive".to_string(),
            ));
        }
        let min = self.min_side();
        if self.width < min || self.height < min {
            return Err(GameError::MapTooSmall {
                width: self.width,
                height: self.height,
                min_width: min,
                min_height: min,
            });
        }
        Ok(())
    }

    /// (min, max) room side for a depth; min never exceeds max.
    pub fn room_size_bounds(&self, depth: u32) -> (i32, i32) {
        let depth = i32::try_from(depth).unwrap_or(i32::MAX);
        let max = (7 + depth / 2).min(self.max_room_size);
        let min = (3 + depth / 3).max(MIN_ROOM_SIZE).min(max);
        (min, max)
    }
}
