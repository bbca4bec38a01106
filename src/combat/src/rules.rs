// src/combat/src/rules.rs

use serde::{Deserialize, Serialize};

/// Tunable numbers used by the combat resolver.
///
/// Defaults reproduce the classic balance; a config file may override any
/// subset of fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// 暴击几率
    pub crit_chance: f64,
    /// 暴击时力量倍数
    pub crit_multiplier: u32,
    /// Boss 暴击的额外倍数
    pub boss_crit_multiplier: f64,
    /// 伤害浮动范围 [-v, v]
    pub damage_variance: i32,
    /// 普通战斗药水恢复量
    pub regular_potion: u32,
    /// Boss 战药水恢复量
    pub boss_potion: u32,
    pub flee_chance: f64,
    pub elite_flee_chance: f64,
    /// 精英每回合触发特殊能力的几率
    pub elite_ability_chance: f64,
    pub rare_drop_chance: f64,
    /// 每件传奇物品独立的掉落几率
    pub legendary_drop_chance: f64,
    /// 泰坦地震造成眩晕的几率
    pub titan_stun_chance: f64,
    /// Boss 回合之间的停顿（毫秒），仅用于观感
    pub boss_turn_pause_ms: u64,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            crit_chance: 0.15,
            crit_multiplier: 2,
            boss_crit_multiplier: 1.5,
            damage_variance: 2,
            regular_potion: 30,
            boss_potion: 50,
            flee_chance: 0.4,
            elite_flee_chance: 0.2,
            elite_ability_chance: 0.3,
            rare_drop_chance: 0.5,
            legendary_drop_chance: 0.5,
            titan_stun_chance: 0.5,
            boss_turn_pause_ms: 0,
        }
    }
}

impl CombatRules {
    /// 关闭所有随机浮动与暴击，便于推演
    pub fn deterministic() -> Self {
        Self {
            crit_chance: 0.0,
            damage_variance: 0,
            ..Self::default()
        }
    }

    /// Returns the name of the first out-of-range field, if any.
    pub fn invalid_field(&self) -> Option<&'static str> {
        let chances = [
            ("crit_chance", self.crit_chance),
            ("flee_chance", self.flee_chance),
            ("elite_flee_chance", self.elite_flee_chance),
            ("elite_ability_chance", self.elite_ability_chance),
            ("rare_drop_chance", self.rare_drop_chance),
            ("legendary_drop_chance", self.legendary_drop_chance),
            ("titan_stun_chance", self.titan_stun_chance),
        ];
        if let Some((name, _)) = chances.iter().find(|(_, p)| !(0.0..=1.0).contains(p)) {
            return Some(*name);
        }
        if self.damage_variance < 0 {
            return Some("damage_variance");
        }
        if self.boss_crit_multiplier < 1.0 {
            return Some("boss_crit_multiplier");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(CombatRules::default().invalid_field(), None);
        assert_eq!(CombatRules::deterministic().invalid_field(), None);
    }

    #[test]
    fn test_out_of_range_chance() {
        let rules = CombatRules {
            flee_chance: 1.5,
            ..CombatRules::default()
        };
        assert_eq!(rules.invalid_field(), Some("flee_chance"));
    }
}
