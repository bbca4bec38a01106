// src/hero/src/player.rs
use combat::{Difficulty, EntityStats};
use dungeon::DungeonLevel;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 可选的英雄名字
pub const HERO_NAMES: [&str; 7] = [
    "Arthas", "Elowen", "Brann", "Seraphine", "Tharok", "Lyra", "Corwin",
];

pub const BASE_HP: u32 = 100;
pub const BASE_STRENGTH: u32 = 10;
pub const BASE_ARMOR: u32 = 5;
pub const PLAYER_GLYPH: char = '@';

/// 献祭：消耗的生命与获得的力量
pub const SACRIFICE_HP: u32 = 10;
pub const SACRIFICE_STRENGTH: u32 = 2;
/// 生命值必须高于此值才能献祭
pub const SACRIFICE_MIN_HP: u32 = 20;

/// Player-side multipliers for a difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub hp_multiplier: f64,
    pub heal_multiplier: f64,
}

impl DifficultyProfile {
    pub fn of(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                hp_multiplier: 1.2,
                heal_multiplier: 1.5,
            },
            Difficulty::Normal => Self {
                hp_multiplier: 1.0,
                heal_multiplier: 1.0,
            },
            Difficulty::Hard => Self {
                hp_multiplier: 0.9,
                heal_multiplier: 0.5,
            },
        }
    }

    pub fn starting_hp(&self) -> u32 {
        (BASE_HP as f64 * self.hp_multiplier) as u32
    }

    /// 按难度缩放治疗量（向下取整）
    pub fn scale_heal(&self, base: u32) -> u32 {
        (base as f64 * self.heal_multiplier) as u32
    }
}

pub fn random_hero_name<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    HERO_NAMES[rng.random_range(0..HERO_NAMES.len())]
}

/// Creates a level-1 hero. A blank name is replaced by one from
/// [`HERO_NAMES`].
pub fn new_player<R: Rng + ?Sized>(name: &str, difficulty: Difficulty, rng: &mut R) -> EntityStats {
    let name = match name.trim() {
        "" => random_hero_name(rng),
        trimmed => trimmed,
    };
    let hp = DifficultyProfile::of(difficulty).starting_hp();
    let player = EntityStats::new(name, 0, 0, PLAYER_GLYPH, hp, BASE_STRENGTH, BASE_ARMOR);
    debug!(name = %player.name, %difficulty, hp, "player created");
    player
}

/// 用10点生命换2点力量；生命不足时拒绝
pub fn sacrifice_health(player: &mut EntityStats) -> bool {
    if player.hp <= SACRIFICE_MIN_HP {
        return false;
    }
    player.hp -= SACRIFICE_HP;
    player.strength += SACRIFICE_STRENGTH;
    true
}

/// 进入新一层前的休整，返回实际恢复量
pub fn rest_between_levels(player: &mut EntityStats, difficulty: Difficulty, base: u32) -> u32 {
    player.heal(DifficultyProfile::of(difficulty).scale_heal(base))
}

/// 把玩家放到第一个房间的中心；没有房间时返回 false
pub fn place_at_start(player: &mut EntityStats, level: &DungeonLevel) -> bool {
    match level.start_position() {
        Some((x, y)) => {
            player.set_position(x, y);
            true
        }
        None => false,
    }
}

/// 传送到随机房间的随机一格
pub fn teleport<R: Rng + ?Sized>(
    player: &mut EntityStats,
    level: &DungeonLevel,
    rng: &mut R,
) -> Option<(i32, i32)> {
    let (x, y) = level.random_room_tile(rng)?;
    player.set_position(x, y);
    Some((x, y))
}
