//src/items/src/loot.rs
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// 掉落稀有度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Rarity {
    Rare,
    Legendary,
}

/// Elite enemies drop one of these.
pub const RARE_DROPS: [&str; 3] = ["Rune of Strength", "Amulet of Protection", "Mana Sapphire"];

/// 每种 Boss 的传奇掉落，每件独立判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendarySet {
    pub items: [&'static str; 3],
}

impl LegendarySet {
    pub const DRAGON: Self = Self {
        items: ["Dragon Heart", "Dragon Scale", "Ancient Claw"],
    };
    pub const LICH: Self = Self {
        items: ["Phylactery", "Necromancer's Staff", "Ring of Darkness"],
    };
    pub const TITAN: Self = Self {
        items: ["Stone of Eternity", "Heart of the Mountain", "Hand of the Titan"],
    };
}
