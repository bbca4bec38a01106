// src/combat/src/enemy.rs

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// 敌人种类，决定基础属性
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum EnemyArchetype {
    Golem,
    Elemental,
    Lich,
    Troll,
    #[default]
    Wanderer,
}

/// 未经缩放的基础属性
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u32,
    pub strength: u32,
    pub armor: u32,
    pub glyph: char,
}

impl EnemyArchetype {
    pub fn base_stats(self) -> BaseStats {
        let (hp, strength, armor, glyph) = match self {
            Self::Golem => (40, 8, 6, 'G'),
            Self::Elemental => (30, 12, 2, 'E'),
            Self::Lich => (25, 15, 4, 'L'),
            Self::Troll => (50, 10, 3, 'T'),
            Self::Wanderer => (20, 6, 2, 'O'),
        };
        BaseStats {
            hp,
            strength,
            armor,
            glyph,
        }
    }
}

/// Every regular enemy that can spawn, drawn uniformly.
pub const ENEMY_ROSTER: [(&str, EnemyArchetype); 12] = [
    ("Phantom Warden", EnemyArchetype::Wanderer),
    ("Crystal Golem", EnemyArchetype::Golem),
    ("Forest Werewolf", EnemyArchetype::Wanderer),
    ("Cave Troll", EnemyArchetype::Troll),
    ("Ancient Lich", EnemyArchetype::Lich),
    ("Fire Elemental", EnemyArchetype::Elemental),
    ("Shadow Assassin", EnemyArchetype::Wanderer),
    ("Giant Venom Spider", EnemyArchetype::Wanderer),
    ("Bone Knight", EnemyArchetype::Wanderer),
    ("Mountain Troll", EnemyArchetype::Troll),
    ("Frost Phoenix", EnemyArchetype::Wanderer),
    ("Stone Golem", EnemyArchetype::Golem),
];

/// Prefix given to promoted enemies.
pub const ELITE_PREFIX: &str = "ELITE ";
