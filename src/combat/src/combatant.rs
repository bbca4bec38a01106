// src/combat/src/combatant.rs

use crate::boss::BossEntity;
use crate::stats::{EnemyTier, EntityStats};

/// 表示可以参加战斗的活体
pub trait Combatant {
    /// 获取名称
    fn name(&self) -> &str;

    /// 获取当前生命值
    fn hp(&self) -> u32;

    /// 获取最大生命值
    fn max_hp(&self) -> u32;

    /// 获取攻击力（含临时加成）
    fn attack_power(&self) -> u32;

    /// 获取防御力（含临时加成）
    fn defense(&self) -> u32;

    /// 是否为 Boss（影响暴击倍率）
    fn is_boss(&self) -> bool {
        false
    }

    /// 是否为精英
    fn is_elite(&self) -> bool {
        false
    }

    /// 是否存活
    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    /// 造成伤害，返回实际扣除量
    fn take_damage(&mut self, amount: u32) -> u32;

    /// 治疗，返回实际恢复量
    fn heal(&mut self, amount: u32) -> u32;

    /// 获取击败后提供的经验值
    fn experience_value(&self) -> u32;
}

impl Combatant for EntityStats {
    fn name(&self) -> &str {
        &self.name
    }

    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn attack_power(&self) -> u32 {
        self.effective_strength()
    }

    fn defense(&self) -> u32 {
        self.effective_armor()
    }

    fn is_boss(&self) -> bool {
        self.tier == EnemyTier::Boss
    }

    fn is_elite(&self) -> bool {
        EntityStats::is_elite(self)
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        EntityStats::take_damage(self, amount)
    }

    fn heal(&mut self, amount: u32) -> u32 {
        EntityStats::heal(self, amount)
    }

    fn experience_value(&self) -> u32 {
        EntityStats::experience_value(self)
    }
}

// Boss 委托给内部的属性块
impl Combatant for BossEntity {
    fn name(&self) -> &str {
        &self.stats.name
    }

    fn hp(&self) -> u32 {
        self.stats.hp
    }

    fn max_hp(&self) -> u32 {
        self.stats.max_hp
    }

    fn attack_power(&self) -> u32 {
        self.stats.effective_strength()
    }

    fn defense(&self) -> u32 {
        self.stats.effective_armor()
    }

    fn is_boss(&self) -> bool {
        true
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        self.stats.take_damage(amount)
    }

    fn heal(&mut self, amount: u32) -> u32 {
        self.stats.heal(amount)
    }

    fn experience_value(&self) -> u32 {
        self.stats.experience_value()
    }
}
