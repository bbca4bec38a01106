// src/combat/src/lib.rs

use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod boss;
pub mod combatant;
pub mod enemy;
pub mod event;
pub mod factory;
pub mod intent;
pub mod resolver;
pub mod rules;
pub mod stats;

pub use crate::boss::{
    BossArchetype, BossDetails, BossEntity, BossPhase, PermanentBonus, PhaseShift, Resistances,
};
pub use crate::combatant::Combatant;
pub use crate::enemy::EnemyArchetype;
pub use crate::event::{
    BossAbility, CombatEvent, EliteAbility, EncounterKind, EncounterOutcome, EncounterReport,
};
pub use crate::factory::{Difficulty, DifficultyEntityFactory, EntityFactory};
pub use crate::intent::{ChoiceProvider, PlayerIntent, ScriptedChoices, TurnContext};
pub use crate::resolver::CombatResolver;
pub use crate::rules::CombatRules;
pub use crate::stats::{CombatModifier, EnemyTier, EntityStats, ModifiedStat};

/// Handles single blows between combatants
pub struct Combat;

/// Combat configuration constants
mod constants {
    pub const MIN_DAMAGE: i64 = 1; // Minimum damage dealt
    pub const ARMOR_DIVISOR: i64 = 3; // Armor mitigates armor/3 per hit
}

/// 单次攻击的结果
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub damage: u32,
    pub critical: bool,
}

impl Combat {
    /// 暴击判定
    pub fn is_critical<R: Rng + ?Sized>(rules: &CombatRules, rng: &mut R) -> bool {
        rng.random::<f64>() < rules.crit_chance
    }

    /// Damage before the variance roll: strength, doubled on a critical and
    /// boosted again when a boss lands it.
    pub fn base_damage(strength: u32, critical: bool, is_boss: bool, rules: &CombatRules) -> i64 {
        let mut base = strength as i64;
        if critical {
            base *= rules.crit_multiplier as i64;
            if is_boss {
                base = (base as f64 * rules.boss_crit_multiplier) as i64;
            }
        }
        base
    }

    /// Final damage after variance and armor, never below 1.
    pub fn mitigate(base: i64, variance: i32, armor: u32) -> u32 {
        let damage = base + variance as i64 - armor as i64 / constants::ARMOR_DIVISOR;
        damage.max(constants::MIN_DAMAGE) as u32
    }

    /// 计算伤害（包含暴击与浮动）
    pub fn calculate_damage<A, D, R>(
        attacker: &A,
        defender: &D,
        rules: &CombatRules,
        rng: &mut R,
    ) -> AttackOutcome
    where
        A: Combatant + ?Sized,
        D: Combatant + ?Sized,
        R: Rng + ?Sized,
    {
        let critical = Self::is_critical(rules, rng);
        let base = Self::base_damage(attacker.attack_power(), critical, attacker.is_boss(), rules);
        let spread = rules.damage_variance.max(0);
        let variance = rng.random_range(-spread..=spread);
        AttackOutcome {
            damage: Self::mitigate(base, variance, defender.defense()),
            critical,
        }
    }

    /// Resolve a single attack and apply it to the defender. The returned
    /// damage is what actually landed, so it drops to 0 against a corpse.
    pub fn resolve_attack<A, D, R>(
        attacker: &A,
        defender: &mut D,
        rules: &CombatRules,
        rng: &mut R,
    ) -> AttackOutcome
    where
        A: Combatant + ?Sized,
        D: Combatant + ?Sized,
        R: Rng + ?Sized,
    {
        let mut outcome = Self::calculate_damage(attacker, defender, rules, rng);
        outcome.damage = defender.take_damage(outcome.damage);
        outcome
    }
}

/// Runs a regular fight with the default rules.
pub fn resolve_regular_combat<P, R>(
    player: &mut EntityStats,
    enemy: &mut EntityStats,
    provider: &mut P,
    rng: &mut R,
) -> EncounterReport
where
    P: ChoiceProvider + ?Sized,
    R: Rng + ?Sized,
{
    CombatResolver::default().resolve_regular(player, enemy, provider, rng)
}

/// Runs a boss fight with the default rules.
pub fn resolve_boss_combat<P, R>(
    player: &mut EntityStats,
    boss: &mut BossEntity,
    provider: &mut P,
    rng: &mut R,
) -> EncounterReport
where
    P: ChoiceProvider + ?Sized,
    R: Rng + ?Sized,
{
    CombatResolver::default().resolve_boss(player, boss, provider, rng)
}

#[cfg(test)]
mod tests;
