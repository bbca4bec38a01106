// src/hero/src/treasure.rs
use combat::{CombatModifier, EntityStats, ModifiedStat};
use items::{TreasureEffect, TreasureKind, TreasureTable};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 宝藏生效后的结果
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTreasure {
    pub name: String,
    pub summary: String,
    /// 实际恢复的生命值
    pub healed: u32,
    /// 调用方需要把玩家传送到随机房间
    pub teleport: bool,
    pub level_up: Option<u32>,
}

impl AppliedTreasure {
    fn new(effect: &TreasureEffect, summary: String) -> Self {
        Self {
            name: effect.name.clone(),
            summary,
            healed: 0,
            teleport: false,
            level_up: None,
        }
    }
}

/// Applies a treasure to the player.
///
/// Teleport only sets the flag; the destination is chosen by the caller
/// because it depends on the current level.
pub fn apply_treasure_effect(player: &mut EntityStats, effect: &TreasureEffect) -> AppliedTreasure {
    let applied = match effect.kind {
        TreasureKind::Experience(amount) => {
            let level_up = player.gain_exp(amount);
            AppliedTreasure {
                level_up,
                ..AppliedTreasure::new(effect, format!("gained {} experience", amount))
            }
        }
        TreasureKind::Heal(amount) => {
            let healed = player.heal(amount);
            AppliedTreasure {
                healed,
                ..AppliedTreasure::new(effect, format!("restored {} HP", healed))
            }
        }
        TreasureKind::StatBoost {
            strength,
            armor,
            max_hp,
            heal,
        } => {
            player.strength += strength;
            player.armor += armor;
            let before = player.hp;
            player.raise_max_hp(max_hp, heal);
            AppliedTreasure {
                healed: player.hp - before,
                ..AppliedTreasure::new(
                    effect,
                    format!("+{} strength, +{} armor, +{} max HP", strength, armor, max_hp),
                )
            }
        }
        TreasureKind::CombatBuff { strength, armor } => {
            let boosts = [(ModifiedStat::Strength, strength), (ModifiedStat::Armor, armor)];
            for (stat, amount) in boosts {
                if amount > 0 {
                    player.add_modifier(CombatModifier {
                        stat,
                        amount,
                        source: effect.name.clone(),
                    });
                }
            }
            AppliedTreasure::new(
                effect,
                format!("+{} strength, +{} armor for the next fight", strength, armor),
            )
        }
        TreasureKind::Teleport => AppliedTreasure {
            teleport: true,
            ..AppliedTreasure::new(effect, "teleported to a random room".to_string())
        },
        TreasureKind::Cursed { strength, hp_cost } => {
            player.strength += strength;
            // 诅咒不会致死
            let lost = hp_cost.min(player.hp.saturating_sub(1));
            player.hp -= lost;
            AppliedTreasure::new(effect, format!("+{} strength, lost {} HP", strength, lost))
        }
    };
    debug!(
        player = %player.name,
        treasure = %applied.name,
        summary = %applied.summary,
        "treasure applied"
    );
    applied
}

/// 从宝藏表中抽取一件并立即生效；表为空时返回 None
pub fn open_treasure<R: Rng + ?Sized>(
    player: &mut EntityStats,
    table: &TreasureTable,
    rng: &mut R,
) -> Option<AppliedTreasure> {
    let effect = table.pick(rng)?;
    Some(apply_treasure_effect(player, &effect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn hero() -> EntityStats {
        EntityStats::new("Hero", 0, 0, '@', 100, 10, 5)
    }

    fn heal(amount: u32) -> TreasureEffect {
        TreasureEffect::new("Potion", "heals", TreasureKind::Heal(amount))
    }

    #[test]
    fn test_heal_clamped_to_max() {
        let mut player = hero();
        player.hp = player.max_hp - 10;
        let applied = apply_treasure_effect(&mut player, &heal(50));
        assert_eq!(player.hp, player.max_hp);
        assert_eq!(applied.healed, 10);

        let applied = apply_treasure_effect(&mut player, &heal(50));
        assert_eq!(applied.healed, 0);
        assert_eq!(player.hp, player.max_hp);
    }

    #[test]
    fn test_experience_can_level_up() {
        let mut player = hero();
        player.experience = 60;
        let gold = TreasureEffect::new("Gold", "exp", TreasureKind::Experience(50));
        let applied = apply_treasure_effect(&mut player, &gold);
        assert_eq!(applied.level_up, Some(2));
        assert_eq!((player.max_hp, player.strength, player.armor), (120, 13, 6));
    }

    #[test]
    fn test_stat_boost_raises_max_hp() {
        let mut player = hero();
        player.hp = 50;
        let amulet = TreasureEffect::new(
            "Royal Amulet",
            "all",
            TreasureKind::StatBoost {
                strength: 1,
                armor: 1,
                max_hp: 5,
                heal: 5,
            },
        );
        let applied = apply_treasure_effect(&mut player, &amulet);
        assert_eq!((player.strength, player.armor, player.max_hp, player.hp), (11, 6, 105, 55));
        assert_eq!(applied.healed, 5);
    }

    #[test]
    fn test_combat_buff_becomes_modifier() {
        let mut player = hero();
        let buff = |strength| TreasureKind::CombatBuff { strength, armor: 0 };
        let sword = TreasureEffect::new("Enchanted Sword", "buff", buff(3));
        let better = TreasureEffect::new("Enchanted Sword", "buff", buff(4));
        apply_treasure_effect(&mut player, &sword);
        apply_treasure_effect(&mut player, &better);
        assert_eq!(player.modifiers.len(), 1);
        assert_eq!(player.effective_strength(), 14);
        assert_eq!(player.strength, 10);
    }

    #[test]
    fn test_curse_never_kills() {
        let mut player = hero();
        player.hp = 15;
        let kind = TreasureKind::Cursed {
            strength: 5,
            hp_cost: 20,
        };
        let curse = TreasureEffect::new("Cursed Artifact", "curse", kind);
        apply_treasure_effect(&mut player, &curse);
        assert_eq!((player.hp, player.strength), (1, 15));
    }

    #[test]
    fn test_teleport_only_flags() {
        let mut player = hero();
        let before = player.clone();
        let scroll = TreasureEffect::new("Scroll", "tp", TreasureKind::Teleport);
        assert!(apply_treasure_effect(&mut player, &scroll).teleport);
        assert_eq!(player, before);
    }

    #[test]
    fn test_open_treasure_from_table() {
        let mut player = hero();
        let mut rng = Pcg32::seed_from_u64(11);
        let table = Difficulty::Hard.treasure_table();
        let applied = open_treasure(&mut player, &table, &mut rng).unwrap();
        assert!(table.entries().iter().any(|e| e.name == applied.name));
        assert!(open_treasure(&mut player, &TreasureTable::new(Vec::new()), &mut rng).is_none());
    }
}
