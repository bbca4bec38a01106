//src/items/src/treasure.rs
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 宝藏效果（带数值的标签，而不是回调）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasureKind {
    /// 获得经验
    Experience(u32),
    /// 恢复生命值
    Heal(u32),
    /// 永久属性提升；`heal` 是附带的即时治疗
    StatBoost {
        strength: u32,
        armor: u32,
        max_hp: u32,
        heal: u32,
    },
    /// 下一场战斗的临时加成
    CombatBuff { strength: u32, armor: u32 },
    /// 传送到随机房间（由调用方决定落点）
    Teleport,
    /// 诅咒：力量提升但损失生命（最低保留1点）
    Cursed { strength: u32, hp_cost: u32 },
}

/// A named treasure as found on the dungeon floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureEffect {
    pub name: String,
    pub description: String,
    pub kind: TreasureKind,
}

impl TreasureEffect {
    pub fn new(name: &str, description: &str, kind: TreasureKind) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
        }
    }

    pub fn is_teleport(&self) -> bool {
        matches!(self.kind, TreasureKind::Teleport)
    }
}

impl fmt::Display for TreasureEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.description)
    }
}

/// 某个难度下可能出现的宝藏列表，均匀抽取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureTable {
    entries: Vec<TreasureEffect>,
}

impl TreasureTable {
    pub fn new(entries: Vec<TreasureEffect>) -> Self {
        Self { entries }
    }

    /// Generous table: bigger numbers plus the royal amulet.
    pub fn easy() -> Self {
        let mut entries = Self::standard(StandardValues {
            experience: 70,
            small_heal: 30,
            large_heal: 70,
            strength: 3,
            armor: 4,
            max_hp: 10,
            buff_strength: 4,
            buff_armor: 5,
        });
        entries.push(TreasureEffect::new(
            "Royal Amulet",
            "+1 to every attribute",
            TreasureKind::StatBoost {
                strength: 1,
                armor: 1,
                max_hp: 5,
                heal: 5,
            },
        ));
        Self::new(entries)
    }

    pub fn normal() -> Self {
        Self::new(Self::standard(StandardValues {
            experience: 50,
            small_heal: 20,
            large_heal: 50,
            strength: 2,
            armor: 3,
            max_hp: 5,
            buff_strength: 3,
            buff_armor: 4,
        }))
    }

    /// Stingy table with a cursed artifact.
    pub fn hard() -> Self {
        let mut entries = Self::standard(StandardValues {
            experience: 30,
            small_heal: 15,
            large_heal: 40,
            strength: 1,
            armor: 2,
            max_hp: 3,
            buff_strength: 2,
            buff_armor: 3,
        });
        entries.push(TreasureEffect::new(
            "Cursed Artifact",
            "+5 strength, but -20 HP",
            TreasureKind::Cursed {
                strength: 5,
                hp_cost: 20,
            },
        ));
        Self::new(entries)
    }

    fn standard(v: StandardValues) -> Vec<TreasureEffect> {
        vec![
            TreasureEffect::new(
                "Gold Ingot",
                &format!("Grants {} experience", v.experience),
                TreasureKind::Experience(v.experience),
            ),
            TreasureEffect::new(
                "Lesser Healing Potion",
                &format!("Restores {} HP", v.small_heal),
                TreasureKind::Heal(v.small_heal),
            ),
            TreasureEffect::new(
                "Greater Healing Potion",
                &format!("Restores {} HP", v.large_heal),
                TreasureKind::Heal(v.large_heal),
            ),
            TreasureEffect::new(
                "Elixir of Strength",
                &format!("+{} strength", v.strength),
                TreasureKind::StatBoost {
                    strength: v.strength,
                    armor: 0,
                    max_hp: 0,
                    heal: 0,
                },
            ),
            TreasureEffect::new(
                "Elixir of Protection",
                &format!("+{} armor", v.armor),
                TreasureKind::StatBoost {
                    strength: 0,
                    armor: v.armor,
                    max_hp: 0,
                    heal: 0,
                },
            ),
            TreasureEffect::new(
                "Dragon Mail",
                &format!("+{} max HP", v.max_hp),
                TreasureKind::StatBoost {
                    strength: 0,
                    armor: 0,
                    max_hp: v.max_hp,
                    heal: 0,
                },
            ),
            TreasureEffect::new(
                "Scroll of Teleportation",
                "Carries you to a random room",
                TreasureKind::Teleport,
            ),
            TreasureEffect::new(
                "Enchanted Sword",
                &format!("+{} strength for the next fight", v.buff_strength),
                TreasureKind::CombatBuff {
                    strength: v.buff_strength,
                    armor: 0,
                },
            ),
            TreasureEffect::new(
                "Warden's Shield",
                &format!("+{} armor for the next fight", v.buff_armor),
                TreasureKind::CombatBuff {
                    strength: 0,
                    armor: v.buff_armor,
                },
            ),
        ]
    }

    pub fn entries(&self) -> &[TreasureEffect] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 均匀抽取一个宝藏；空表返回 None
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<TreasureEffect> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.entries.len());
        Some(self.entries[idx].clone())
    }
}

struct StandardValues {
    experience: u32,
    small_heal: u32,
    large_heal: u32,
    strength: u32,
    armor: u32,
    max_hp: u32,
    buff_strength: u32,
    buff_armor: u32,
}
