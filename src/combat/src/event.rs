// src/combat/src/event.rs

use items::Rarity;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::boss::{PermanentBonus, PhaseShift};

/// 战斗类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum EncounterKind {
    Regular,
    Boss,
}

/// 战斗结果
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum EncounterOutcome {
    Victory,
    Defeat,
    /// 只可能出现在普通战斗中
    Fled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum EliteAbility {
    PowerStrike,
    Regenerate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum BossAbility {
    FireBreath,
    Curse,
    Earthquake,
}

/// One thing that happened during an encounter, in order.
///
/// The resolver never prints; rendering these is up to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    EncounterStarted {
        kind: EncounterKind,
        opponent: String,
    },
    TurnStarted {
        turn: u32,
    },
    Attack {
        attacker: String,
        defender: String,
        damage: u32,
        critical: bool,
    },
    Healed {
        target: String,
        amount: u32,
    },
    /// 满血时喝药，回合被浪费
    HealWasted,
    Defending,
    FleeAttempt {
        success: bool,
    },
    /// 无效指令，跳过回合
    InvalidIntent,
    /// 被眩晕，跳过回合
    TurnSkipped,
    EliteAbility {
        enemy: String,
        /// 受到效果的一方：强击是玩家，再生是敌人自己
        target: String,
        ability: EliteAbility,
        amount: u32,
    },
    PhaseShift {
        boss: String,
        shift: PhaseShift,
    },
    AbilityUsed {
        boss: String,
        target: String,
        ability: BossAbility,
        damage: u32,
    },
    Stunned,
    MinionSummoned {
        name: String,
    },
    MinionAttack {
        name: String,
        target: String,
        damage: u32,
    },
    /// 诅咒后玩家剩余力量
    PlayerWeakened {
        strength: u32,
    },
    Defeated {
        name: String,
    },
    ExperienceGained {
        amount: u32,
    },
    LevelUp {
        level: u32,
    },
    ItemDropped {
        item: String,
        rarity: Rarity,
    },
    PermanentBonus(PermanentBonus),
    /// 临时加成在战斗结束时被消耗
    ModifiersExpired {
        count: usize,
    },
}

/// Everything a caller needs after an encounter finishes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterReport {
    pub kind: EncounterKind,
    pub outcome: EncounterOutcome,
    pub turns: u32,
    pub events: Vec<CombatEvent>,
}

impl EncounterReport {
    pub fn is_victory(&self) -> bool {
        self.outcome == EncounterOutcome::Victory
    }

    /// Total damage that landed on `name` during the encounter. Every
    /// damage event records the HP actually removed, so overkill is not
    /// counted.
    pub fn damage_taken_by(&self, name: &str) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                CombatEvent::Attack {
                    defender, damage, ..
                } if defender == name => *damage,
                CombatEvent::EliteAbility {
                    target,
                    ability: EliteAbility::PowerStrike,
                    amount,
                    ..
                } if target == name => *amount,
                CombatEvent::AbilityUsed { target, damage, .. } if target == name => *damage,
                CombatEvent::MinionAttack { target, damage, .. } if target == name => *damage,
                _ => 0,
            })
            .sum()
    }

    pub fn items_dropped(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::ItemDropped { item, .. } => Some(item.as_str()),
                _ => None,
            })
            .collect()
    }
}
