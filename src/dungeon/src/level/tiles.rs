//src/dungeon/src/level/tiles.rs
use serde::{Deserialize, Serialize};

/// 地图图块
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Wall,
    Floor,
    Trap,
}

impl Tile {
    /// 陷阱也可以踩上去
    pub fn is_passable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
            Tile::Trap => '^',
        }
    }
}
