// src/combat/src/factory.rs

use items::{TreasureEffect, TreasureTable};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::boss::{BossArchetype, BossEntity, Resistances};
use crate::enemy::{ELITE_PREFIX, ENEMY_ROSTER};
use crate::stats::{EnemyTier, EntityStats};

/// 难度等级
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
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn treasure_table(self) -> TreasureTable {
        match self {
            Self::Easy => TreasureTable::easy(),
            Self::Normal => TreasureTable::normal(),
            Self::Hard => TreasureTable::hard(),
        }
    }

    fn profile(self) -> &'static TierProfile {
        match self {
            Self::Easy => &EASY,
            Self::Normal => &NORMAL,
            Self::Hard => &HARD,
        }
    }
}

/// Abstract factory for everything that appears on a dungeon floor.
pub trait EntityFactory {
    fn create_normal_enemy<R: Rng + ?Sized>(&self, x: i32, y: i32, rng: &mut R) -> EntityStats;

    fn create_elite_enemy<R: Rng + ?Sized>(&self, x: i32, y: i32, rng: &mut R) -> EntityStats;

    fn create_boss<R: Rng + ?Sized>(&self, x: i32, y: i32, rng: &mut R) -> BossEntity;

    fn create_treasure<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<TreasureEffect>;
}

/// (hp, strength, armor)
type Triple = [f64; 3];

/// 每个难度的全部缩放参数
struct TierProfile {
    multiplier: f64,
    growth: Triple,
    /// exp = hp * a + strength * b
    reward: (f64, f64),
    elite: Triple,
    elite_reward: (f64, f64),
    /// Dragon, Lich, Titan
    bosses: [[u32; 3]; 3],
    boss_growth: Triple,
    boss_reward: i64,
    /// 是否设置次要抗性并追加第四个技能
    extended_boss: bool,
    /// 是否设置主抗性
    boss_resistances: bool,
}

const EASY: TierProfile = TierProfile {
    multiplier: 0.8,
    growth: [0.10, 0.05, 0.0],
    reward: (0.4, 1.5),
    elite: [1.3, 1.2, 1.1],
    elite_reward: (0.6, 2.0),
    bosses: [[250, 25, 15], [180, 20, 12], [350, 35, 25]],
    boss_growth: [0.15, 0.10, 0.05],
    boss_reward: 800,
    extended_boss: false,
    boss_resistances: false,
};

const NORMAL: TierProfile = TierProfile {
    multiplier: 1.0,
    growth: [0.15, 0.10, 0.05],
    reward: (0.5, 2.0),
    elite: [1.5, 1.3, 1.2],
    elite_reward: (0.8, 3.0),
    bosses: [[300, 30, 20], [200, 25, 15], [400, 40, 30]],
    boss_growth: [0.20, 0.15, 0.10],
    boss_reward: 1000,
    extended_boss: false,
    boss_resistances: true,
};

const HARD: TierProfile = TierProfile {
    multiplier: 1.3,
    growth: [0.20, 0.15, 0.10],
    reward: (0.6, 2.5),
    elite: [1.7, 1.5, 1.4],
    elite_reward: (1.0, 4.0),
    bosses: [[350, 35, 25], [250, 30, 20], [450, 45, 35]],
    boss_growth: [0.25, 0.20, 0.15],
    boss_reward: 1200,
    extended_boss: true,
    boss_resistances: true,
};

/// 困难难度泰坦的被动眩晕几率
const HARD_TITAN_STUN_CHANCE: f32 = 0.3;

/// Factory bound to one difficulty and one dungeon depth.
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyEntityFactory {
    difficulty: Difficulty,
    level: u32,
    treasures: TreasureTable,
}

impl DifficultyEntityFactory {
    /// 深度 0 按 1 处理
    pub fn new(difficulty: Difficulty, level: u32) -> Self {
        Self {
            difficulty,
            level: level.max(1),
            treasures: difficulty.treasure_table(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn multiplier(&self) -> f64 {
        self.difficulty.profile().multiplier
    }

    pub fn treasure_table(&self) -> &TreasureTable {
        &self.treasures
    }

    /// 根据名单下标创建普通敌人（不涉及随机数）
    pub fn normal_enemy_from_roster(&self, index: usize, x: i32, y: i32) -> EntityStats {
        let p = self.difficulty.profile();
        let (name, archetype) = ENEMY_ROSTER[index % ENEMY_ROSTER.len()];
        let base = archetype.base_stats();
        let steps = (self.level - 1) as f64;
        let multiplier = self.multiplier();
        let scale =
            |base: u32, rate: f64| (base as f64 * multiplier * (1.0 + steps * rate)) as u32;

        let hp = scale(base.hp, p.growth[0]);
        let strength = scale(base.strength, p.growth[1]);
        let armor = scale(base.armor, p.growth[2]);

        let mut enemy = EntityStats::new(name, x, y, base.glyph, hp, strength, armor);
        enemy.tier = EnemyTier::Normal;
        enemy.exp_reward = Some(reward(hp, strength, p.reward));
        enemy
    }

    /// 将普通敌人提升为精英
    pub fn promote(&self, mut enemy: EntityStats) -> EntityStats {
        let p = self.difficulty.profile();
        enemy.name = format!("{}{}", ELITE_PREFIX, enemy.name);
        enemy.max_hp = (enemy.max_hp as f64 * p.elite[0]) as u32;
        enemy.hp = enemy.max_hp;
        enemy.strength = (enemy.strength as f64 * p.elite[1]) as u32;
        enemy.armor = (enemy.armor as f64 * p.elite[2]) as u32;
        enemy.tier = EnemyTier::Elite;
        enemy.exp_reward = Some(reward(enemy.max_hp, enemy.strength, p.elite_reward));
        enemy
    }

    /// 根据 Boss 类型创建 Boss（不涉及随机数）
    pub fn boss_of(&self, archetype: BossArchetype, x: i32, y: i32) -> BossEntity {
        let p = self.difficulty.profile();
        let idx = BossArchetype::iter().position(|a| a == archetype).unwrap_or(0);
        let [hp, strength, armor] = p.bosses[idx];
        // 每三层出现一次 Boss，第几个 Boss 决定成长
        let boss_index = (self.level / 3) as i64;
        let steps = (boss_index - 1) as f64;
        let scale = |base: u32, rate: f64| (base as f64 * (1.0 + steps * rate)) as u32;

        let mut stats = EntityStats::new(
            archetype.title(),
            x,
            y,
            archetype.glyph(),
            scale(hp, p.boss_growth[0]),
            scale(strength, p.boss_growth[1]),
            scale(armor, p.boss_growth[2]),
        );
        stats.exp_reward = Some((p.boss_reward * boss_index).max(0) as u32);

        let resistances = if p.boss_resistances {
            boss_resistances(archetype, p.extended_boss)
        } else {
            Resistances::empty()
        };
        let mut boss = BossEntity::new(
            archetype,
            stats,
            archetype.abilities(p.extended_boss),
            resistances,
        );
        if p.extended_boss && archetype == BossArchetype::Titan {
            boss.details.stun_chance = HARD_TITAN_STUN_CHANCE;
        }
        boss
    }
}

fn reward(hp: u32, strength: u32, (a, b): (f64, f64)) -> u32 {
    (hp as f64 * a + strength as f64 * b) as u32
}

fn boss_resistances(archetype: BossArchetype, both: bool) -> Resistances {
    let (primary, secondary) = match archetype {
        BossArchetype::Dragon => (Resistances::FIRE_RESISTANT, Resistances::FLYING),
        BossArchetype::Lich => (Resistances::UNDEAD, Resistances::MAGIC_IMMUNE),
        BossArchetype::Titan => (Resistances::STONE_SKIN, Resistances::empty()),
    };
    if both { primary | secondary } else { primary }
}

impl EntityFactory for DifficultyEntityFactory {
    fn create_normal_enemy<R: Rng + ?Sized>(&self, x: i32, y: i32, rng: &mut R) -> EntityStats {
        let index = rng.random_range(0..ENEMY_ROSTER.len());
        self.normal_enemy_from_roster(index, x, y)
    }

    fn create_elite_enemy<R: Rng + ?Sized>(&self, x: i32, y: i32, rng: &mut R) -> EntityStats {
        let base = self.create_normal_enemy(x, y, rng);
        self.promote(base)
    }

    fn create_boss<R: Rng + ?Sized>(&self, x: i32, y: i32, rng: &mut R) -> BossEntity {
        let archetypes: Vec<BossArchetype> = BossArchetype::iter().collect();
        let archetype = archetypes[rng.random_range(0..archetypes.len())];
        self.boss_of(archetype, x, y)
    }

    fn create_treasure<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<TreasureEffect> {
        self.treasures.pick(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_normal_enemy_scaling() {
        // Crystal Golem: 40/8/6
        let f = DifficultyEntityFactory::new(Difficulty::Normal, 3);
        let golem = f.normal_enemy_from_roster(1, 4, 5);
        assert_eq!(golem.name, "Crystal Golem");
        assert_eq!(golem.glyph, 'G');
        // 40 * 1.3 = 52, 8 * 1.2 = 9.6, 6 * 1.1 = 6.6
        assert_eq!((golem.hp, golem.strength, golem.armor), (52, 9, 6));
        assert_eq!(golem.exp_reward, Some(26 + 18));
        assert_eq!(golem.position(), (4, 5));
        assert_eq!(f.multiplier(), 1.0);
        assert_eq!(DifficultyEntityFactory::new(Difficulty::Hard, 1).multiplier(), 1.3);
    }

    #[test]
    fn test_easy_armor_does_not_grow() {
        let f1 = DifficultyEntityFactory::new(Difficulty::Easy, 1);
        let f9 = DifficultyEntityFactory::new(Difficulty::Easy, 9);
        assert_eq!(
            f1.normal_enemy_from_roster(3, 0, 0).armor,
            f9.normal_enemy_from_roster(3, 0, 0).armor
        );
    }

    #[test]
    fn test_elite_promotion() {
        let f = DifficultyEntityFactory::new(Difficulty::Hard, 1);
        let base = f.normal_enemy_from_roster(0, 0, 0);
        let elite = f.promote(base.clone());
        assert!(elite.name.starts_with(ELITE_PREFIX));
        assert_eq!(elite.tier, EnemyTier::Elite);
        assert_eq!(elite.max_hp, (base.max_hp as f64 * 1.7) as u32);
        assert_eq!(elite.hp, elite.max_hp);
        assert_eq!(
            elite.exp_reward,
            Some((elite.max_hp as f64 + elite.strength as f64 * 4.0) as u32)
        );
    }

    #[test]
    fn test_boss_stats_and_flags() {
        let normal = DifficultyEntityFactory::new(Difficulty::Normal, 6);
        let dragon = normal.boss_of(BossArchetype::Dragon, 1, 1);
        // growth = 1 + (2 - 1) * rate
        assert_eq!(dragon.stats.max_hp, 360);
        assert_eq!(dragon.stats.strength, 34);
        assert_eq!(dragon.stats.armor, 22);
        assert_eq!(dragon.stats.exp_reward, Some(2000));
        assert_eq!(dragon.details.resistances, Resistances::FIRE_RESISTANT);
        assert_eq!(dragon.details.abilities.len(), 3);

        let easy = DifficultyEntityFactory::new(Difficulty::Easy, 3);
        let lich = easy.boss_of(BossArchetype::Lich, 0, 0);
        assert_eq!((lich.stats.hp, lich.stats.strength, lich.stats.armor), (180, 20, 12));
        assert!(lich.details.resistances.is_empty());

        let hard = DifficultyEntityFactory::new(Difficulty::Hard, 3);
        let titan = hard.boss_of(BossArchetype::Titan, 0, 0);
        assert_eq!(titan.details.abilities.len(), 4);
        assert!(titan.has_resistance(Resistances::STONE_SKIN));
        assert_eq!(titan.details.stun_chance, HARD_TITAN_STUN_CHANCE);
        let lich = hard.boss_of(BossArchetype::Lich, 0, 0);
        assert_eq!(
            lich.details.resistances,
            Resistances::UNDEAD | Resistances::MAGIC_IMMUNE
        );
    }

    #[test]
    fn test_level_zero_is_level_one() {
        assert_eq!(DifficultyEntityFactory::new(Difficulty::Normal, 0).level(), 1);
    }

    #[test]
    fn test_random_creation_is_seeded() {
        let f = DifficultyEntityFactory::new(Difficulty::Normal, 4);
        let mut a = Pcg32::seed_from_u64(11);
        let mut b = Pcg32::seed_from_u64(11);
        for _ in 0..10 {
            assert_eq!(f.create_normal_enemy(0, 0, &mut a), f.create_normal_enemy(0, 0, &mut b));
        }
        assert_eq!(f.create_boss(0, 0, &mut a), f.create_boss(0, 0, &mut b));
        assert!(f.create_treasure(&mut a).is_some());
    }
}
