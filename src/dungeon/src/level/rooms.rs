//src/dungeon/src/level/rooms.rs
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 房间带有宝藏标记的概率
pub const TREASURE_ROOM_CHANCE: f64 = 0.3;

/// 矩形房间
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub has_treasure: bool,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32, has_treasure: bool) -> Self {
        Self {
            x,
            y,
            width,
            height,
            has_treasure,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Whether the two rooms, each grown by `padding`, touch or overlap.
    pub fn overlaps(&self, other: &Room, padding: i32) -> bool {
        !(self.x + self.width + padding < other.x
            || other.x + other.width + padding < self.x
            || self.y + self.height + padding < other.y
            || other.y + other.height + padding < self.y)
    }

    /// 房间内随机一格，坐标夹在地图范围内
    pub fn random_tile<R: Rng + ?Sized>(
        &self,
        map_width: i32,
        map_height: i32,
        rng: &mut R,
    ) -> (i32, i32) {
        let x = rng.random_range(self.x.max(0)..=(self.x + self.width - 1).min(map_width - 1));
        let y = rng.random_range(self.y.max(0)..=(self.y + self.height - 1).min(map_height - 1));
        (x, y)
    }
}
