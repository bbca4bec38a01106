// src/hero/src/lib.rs
//! The player side of a run: creation, difficulty profiles, resting,
//! sacrifices, treasure application and the seedable game RNG.

pub mod player;
pub mod rng;
pub mod treasure;

// 重新导出主要类型
pub use self::{
    player::{
        DifficultyProfile, HERO_NAMES, new_player, place_at_start, random_hero_name,
        rest_between_levels, sacrifice_health, teleport,
    },
    rng::GameRng,
    treasure::{AppliedTreasure, apply_treasure_effect, open_treasure},
};
