// src/combat/src/boss.rs

use arrayvec::ArrayVec;
use bitflags::bitflags;
use items::LegendarySet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::stats::{EnemyTier, EntityStats};

/// 一个 Boss 最多同时拥有的召唤物数量
pub const MAX_MINIONS: usize = 3;

/// Boss 类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum BossArchetype {
    Dragon,
    Lich,
    Titan,
}

impl BossArchetype {
    /// 获取 Boss 名称
    pub fn title(&self) -> &'static str {
        match self {
            Self::Dragon => "ANCIENT DRAGON IGNIS",
            Self::Lich => "ARCHLICH MORTOK",
            Self::Titan => "STONE TITANUS",
        }
    }

    /// 获取 Boss 符号
    pub fn glyph(&self) -> char {
        match self {
            Self::Dragon => 'D',
            Self::Lich => 'L',
            Self::Titan => 'T',
        }
    }

    /// 技能名列表；`extended` 为困难难度追加的第四个技能
    pub fn abilities(&self, extended: bool) -> Vec<String> {
        let (base, extra): ([&str; 3], &str) = match self {
            Self::Dragon => (["Fire Breath", "Flight", "Tail Swipe"], "Lava"),
            Self::Lich => (["Curse", "Summon Skeletons", "Dark Magic"], "Terror"),
            Self::Titan => (["Earthquake", "Stone Armor", "Crushing Blow"], "Rift"),
        };
        let mut abilities: Vec<String> = base.iter().map(|s| s.to_string()).collect();
        if extended {
            abilities.push(extra.to_string());
        }
        abilities
    }

    /// 击败后的传奇掉落池
    pub fn legendary_set(&self) -> LegendarySet {
        match self {
            Self::Dragon => LegendarySet::DRAGON,
            Self::Lich => LegendarySet::LICH,
            Self::Titan => LegendarySet::TITAN,
        }
    }

    /// 击败后一次性获得的永久加成
    pub fn permanent_bonus(&self) -> PermanentBonus {
        match self {
            Self::Dragon => PermanentBonus {
                max_hp: 30,
                strength: 0,
                armor: 0,
            },
            Self::Lich => PermanentBonus {
                max_hp: 0,
                strength: 5,
                armor: 0,
            },
            Self::Titan => PermanentBonus {
                max_hp: 0,
                strength: 0,
                armor: 5,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermanentBonus {
    pub max_hp: u32,
    pub strength: u32,
    pub armor: u32,
}

/// Boss 阶段，只能前进不能后退
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
)]
pub enum BossPhase {
    /// 第一阶段：血量 > 60%
    #[default]
    #[strum(serialize = "I")]
    Phase1,
    /// 第二阶段：血量 > 30%，进入时狂暴
    #[strum(serialize = "II")]
    Phase2,
    /// 最终阶段：以护甲换攻击
    #[strum(serialize = "III")]
    Phase3,
}

impl BossPhase {
    /// 根据血量确定阶段（整数比较，避免浮点误差）
    pub fn from_health(hp: u32, max_hp: u32) -> Self {
        let hp = hp as u64 * 10;
        let max_hp = max_hp as u64;
        if hp > max_hp * 6 {
            Self::Phase1
        } else if hp > max_hp * 3 {
            Self::Phase2
        } else {
            Self::Phase3
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Phase1 => Some(Self::Phase2),
            Self::Phase2 => Some(Self::Phase3),
            Self::Phase3 => None,
        }
    }
}

/// Result of entering a phase: the boss's stats right after the entry bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseShift {
    pub phase: BossPhase,
    pub strength: u32,
    pub armor: u32,
}

/// Phases to enter, in order, when a boss currently in `current` sits at
/// `hp / max_hp`. Empty when no transition is due. Never goes backwards.
pub fn phases_to_enter(current: BossPhase, hp: u32, max_hp: u32) -> Vec<BossPhase> {
    let target = BossPhase::from_health(hp, max_hp);
    let mut entered = Vec::new();
    let mut phase = current;
    while phase < target {
        match phase.next() {
            Some(next) => {
                entered.push(next);
                phase = next;
            }
            None => break,
        }
    }
    entered
}

/// (strength, armor) after the one-time bonus for entering `phase`.
pub fn phase_entry_stats(phase: BossPhase, strength: u32, armor: u32) -> (u32, u32) {
    match phase {
        BossPhase::Phase1 => (strength, armor),
        BossPhase::Phase2 => ((strength as f64 * 1.3) as u32, armor),
        BossPhase::Phase3 => ((strength as f64 * 1.5) as u32, (armor as f64 * 0.7) as u32),
    }
}

bitflags! {
    /// 抗性标记
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Resistances: u8 {
        const FIRE_RESISTANT = 1 << 0;
        const FLYING = 1 << 1;
        const UNDEAD = 1 << 2;
        const MAGIC_IMMUNE = 1 << 3;
        const STONE_SKIN = 1 << 4;
    }
}

/// Boss-only state carried alongside the shared stat block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossDetails {
    pub archetype: BossArchetype,
    pub abilities: Vec<String>,
    pub phase: BossPhase,
    pub enraged: bool,
    pub minions: ArrayVec<EntityStats, MAX_MINIONS>,
    pub resistances: Resistances,
    /// 困难难度泰坦的被动眩晕几率（目前仅作为数据展示）
    pub stun_chance: f32,
    /// 已进入过的阶段（按顺序记录）
    pub entered_phases: Vec<BossPhase>,
}

/// Boss 实体
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossEntity {
    pub stats: EntityStats,
    pub details: BossDetails,
}

impl BossEntity {
    pub fn new(
        archetype: BossArchetype,
        mut stats: EntityStats,
        abilities: Vec<String>,
        resistances: Resistances,
    ) -> Self {
        stats.tier = EnemyTier::Boss;
        Self {
            stats,
            details: BossDetails {
                archetype,
                abilities,
                phase: BossPhase::Phase1,
                enraged: false,
                minions: ArrayVec::new(),
                resistances,
                stun_chance: 0.0,
                entered_phases: Vec::new(),
            },
        }
    }

    pub fn archetype(&self) -> BossArchetype {
        self.details.archetype
    }

    pub fn phase(&self) -> BossPhase {
        self.details.phase
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn name(&self) -> &str {
        &self.stats.name
    }

    /// 更新阶段，每个阶段的加成只会生效一次
    pub fn update_phase(&mut self) -> Vec<PhaseShift> {
        let entered = phases_to_enter(self.details.phase, self.stats.hp, self.stats.max_hp);
        let mut shifts = Vec::with_capacity(entered.len());
        for phase in entered {
            let (strength, armor) = phase_entry_stats(phase, self.stats.strength, self.stats.armor);
            self.stats.strength = strength;
            self.stats.armor = armor;
            if phase == BossPhase::Phase2 {
                self.details.enraged = true;
            }
            self.details.phase = phase;
            self.details.entered_phases.push(phase);
            shifts.push(PhaseShift {
                phase,
                strength,
                armor,
            });
        }
        shifts
    }

    /// 召唤骷髅仆从；已满时返回 None
    pub fn summon_minion(&mut self) -> Option<&EntityStats> {
        if self.details.minions.is_full() {
            return None;
        }
        self.details.minions.push(skeleton_servant());
        self.details.minions.last()
    }

    /// 移除已死亡的召唤物
    pub fn prune_minions(&mut self) {
        self.details.minions.retain(|m| m.is_alive());
    }

    pub fn has_resistance(&self, flag: Resistances) -> bool {
        self.details.resistances.contains(flag)
    }
}

/// The lich's summon: fixed stats regardless of tier or depth.
pub fn skeleton_servant() -> EntityStats {
    EntityStats::new("Skeleton Servant", 0, 0, 's', 30, 8, 3)
}
