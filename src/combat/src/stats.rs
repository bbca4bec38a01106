// src/combat/src/stats.rs

use serde::{Deserialize, Serialize};
use strum::Display;

/// Experience needed for the first level-up.
pub const BASE_EXP_TO_LEVEL: u32 = 100;

/// 敌人等级标签
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EnemyTier {
    #[default]
    Normal,
    Elite,
    Boss,
}

/// 临时加成作用的属性
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ModifiedStat {
    Strength,
    Armor,
}

/// 仅持续一场战斗的加成
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatModifier {
    pub stat: ModifiedStat,
    pub amount: u32,
    pub source: String,
}

/// Attribute block shared by the player, enemies, bosses and minions.
///
/// `hp` never exceeds `max_hp` and never goes below zero; damage saturates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub glyph: char,
    pub hp: u32,
    pub max_hp: u32,
    pub strength: u32,
    pub armor: u32,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub items: Vec<String>,
    pub modifiers: Vec<CombatModifier>,
    pub tier: EnemyTier,
    /// 击败后给予的经验；None 时战斗结算使用兜底公式
    pub exp_reward: Option<u32>,
}

impl EntityStats {
    pub fn new(
        name: &str,
        x: i32,
        y: i32,
        glyph: char,
        hp: u32,
        strength: u32,
        armor: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            glyph,
            hp,
            max_hp: hp,
            strength,
            armor,
            level: 1,
            experience: 0,
            experience_to_next_level: BASE_EXP_TO_LEVEL,
            items: Vec::new(),
            modifiers: Vec::new(),
            tier: EnemyTier::Normal,
            exp_reward: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn is_elite(&self) -> bool {
        self.tier == EnemyTier::Elite
    }

    /// 扣除生命值，返回实际扣除量
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// 治疗（不超过最大HP），返回实际恢复量
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    /// Experience granted when this entity is defeated.
    pub fn experience_value(&self) -> u32 {
        self.exp_reward
            .unwrap_or(self.max_hp / 2 + self.strength * 2)
    }

    /// 获得经验；升级时返回新等级。一次最多升一级。
    pub fn gain_exp(&mut self, amount: u32) -> Option<u32> {
        self.experience = self.experience.saturating_add(amount);
        if self.experience >= self.experience_to_next_level {
            self.level_up();
            Some(self.level)
        } else {
            None
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.experience = 0;
        self.experience_to_next_level = (self.experience_to_next_level as f64 * 1.5) as u32;
        self.max_hp += 20;
        self.hp = self.max_hp;
        self.strength += 3;
        self.armor += 1;
    }

    /// Permanently raise max HP, healing by the same amount.
    pub fn raise_max_hp(&mut self, amount: u32, heal: u32) {
        self.max_hp += amount;
        self.heal(heal);
    }

    /// 添加临时加成；同一属性的新加成覆盖旧加成
    pub fn add_modifier(&mut self, modifier: CombatModifier) {
        self.modifiers.retain(|m| m.stat != modifier.stat);
        self.modifiers.push(modifier);
    }

    /// 战斗结束后清空临时加成，返回被消耗的加成
    pub fn clear_modifiers(&mut self) -> Vec<CombatModifier> {
        std::mem::take(&mut self.modifiers)
    }

    fn modifier_total(&self, stat: ModifiedStat) -> u32 {
        self.modifiers
            .iter()
            .filter(|m| m.stat == stat)
            .map(|m| m.amount)
            .sum()
    }

    /// 含临时加成的力量
    pub fn effective_strength(&self) -> u32 {
        self.strength + self.modifier_total(ModifiedStat::Strength)
    }

    /// 含临时加成的护甲
    pub fn effective_armor(&self) -> u32 {
        self.armor + self.modifier_total(ModifiedStat::Armor)
    }
}
