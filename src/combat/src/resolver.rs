// src/combat/src/resolver.rs

use std::thread;
use std::time::Duration;

use items::{RARE_DROPS, Rarity};
use rand::Rng;
use tracing::{debug, info, trace};

use crate::boss::{BossArchetype, BossEntity};
use crate::event::{
    BossAbility, CombatEvent, EliteAbility, EncounterKind, EncounterOutcome, EncounterReport,
};
use crate::intent::{ChoiceProvider, PlayerIntent, TurnContext};
use crate::rules::CombatRules;
use crate::stats::EntityStats;
use crate::Combat;

/// Boss 每隔几回合使用一次特殊能力
const SPECIAL_EVERY: u32 = 3;

/// Runs encounters to completion. Holds no state between encounters.
#[derive(Clone, Debug, Default)]
pub struct CombatResolver {
    rules: CombatRules,
}

impl CombatResolver {
    pub fn new(rules: CombatRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    /// 普通战斗：可以逃跑
    pub fn resolve_regular<P, R>(
        &self,
        player: &mut EntityStats,
        enemy: &mut EntityStats,
        provider: &mut P,
        rng: &mut R,
    ) -> EncounterReport
    where
        P: ChoiceProvider + ?Sized,
        R: Rng + ?Sized,
    {
        let rules = &self.rules;
        let mut events = vec![CombatEvent::EncounterStarted {
            kind: EncounterKind::Regular,
            opponent: enemy.name.clone(),
        }];
        debug!(enemy = %enemy.name, elite = enemy.is_elite(), "regular encounter started");

        let mut turn = 0;
        let mut fled = false;

        while player.is_alive() && enemy.is_alive() {
            turn += 1;
            events.push(CombatEvent::TurnStarted { turn });

            let ctx = TurnContext {
                kind: EncounterKind::Regular,
                turn,
                player_hp: player.hp,
                player_max_hp: player.max_hp,
                opponent: enemy.name.clone(),
                opponent_hp: enemy.hp,
                opponent_max_hp: enemy.max_hp,
                boss_phase: None,
            };

            match provider.choose(&ctx) {
                PlayerIntent::Attack => {
                    let hit = Combat::resolve_attack(&*player, enemy, rules, rng);
                    events.push(CombatEvent::Attack {
                        attacker: player.name.clone(),
                        defender: enemy.name.clone(),
                        damage: hit.damage,
                        critical: hit.critical,
                    });
                    if !enemy.is_alive() {
                        break;
                    }
                }
                PlayerIntent::Heal => {
                    // 满血喝药：回合数照常增加，但敌人不行动
                    if !self.drink(player, rules.regular_potion, &mut events) {
                        continue;
                    }
                }
                PlayerIntent::Flee => {
                    let chance = if enemy.is_elite() {
                        rules.elite_flee_chance
                    } else {
                        rules.flee_chance
                    };
                    let success = rng.random::<f64>() < chance;
                    events.push(CombatEvent::FleeAttempt { success });
                    if success {
                        fled = true;
                        break;
                    }
                }
                PlayerIntent::Defend | PlayerIntent::Invalid => {
                    events.push(CombatEvent::InvalidIntent);
                }
            }

            // 敌人回合
            if enemy.is_alive() {
                let hit = Combat::resolve_attack(&*enemy, player, rules, rng);
                events.push(CombatEvent::Attack {
                    attacker: enemy.name.clone(),
                    defender: player.name.clone(),
                    damage: hit.damage,
                    critical: hit.critical,
                });

                if enemy.is_elite() && rng.random::<f64>() < rules.elite_ability_chance {
                    if rng.random_bool(0.5) {
                        let bonus = player.take_damage(enemy.strength / 2);
                        events.push(CombatEvent::EliteAbility {
                            enemy: enemy.name.clone(),
                            target: player.name.clone(),
                            ability: EliteAbility::PowerStrike,
                            amount: bonus,
                        });
                    } else {
                        let healed = enemy.heal(enemy.max_hp / 10);
                        events.push(CombatEvent::EliteAbility {
                            enemy: enemy.name.clone(),
                            target: enemy.name.clone(),
                            ability: EliteAbility::Regenerate,
                            amount: healed,
                        });
                    }
                }
            }
            trace!(turn, player_hp = player.hp, enemy_hp = enemy.hp, "turn resolved");
        }

        let outcome = if !enemy.is_alive() {
            events.push(CombatEvent::Defeated {
                name: enemy.name.clone(),
            });
            self.award_experience(player, enemy.experience_value(), &mut events);
            if enemy.is_elite() && rng.random::<f64>() < rules.rare_drop_chance {
                let item = RARE_DROPS[rng.random_range(0..RARE_DROPS.len())];
                player.items.push(item.to_string());
                events.push(CombatEvent::ItemDropped {
                    item: item.to_string(),
                    rarity: Rarity::Rare,
                });
            }
            EncounterOutcome::Victory
        } else if fled {
            EncounterOutcome::Fled
        } else {
            events.push(CombatEvent::Defeated {
                name: player.name.clone(),
            });
            EncounterOutcome::Defeat
        };

        self.expire_modifiers(player, &mut events);
        info!(enemy = %enemy.name, %outcome, turns = turn, "regular encounter finished");

        EncounterReport {
            kind: EncounterKind::Regular,
            outcome,
            turns: turn,
            events,
        }
    }

    /// Boss 战：不能逃跑，阶段在每回合开始时重新计算
    pub fn resolve_boss<P, R>(
        &self,
        player: &mut EntityStats,
        boss: &mut BossEntity,
        provider: &mut P,
        rng: &mut R,
    ) -> EncounterReport
    where
        P: ChoiceProvider + ?Sized,
        R: Rng + ?Sized,
    {
        let rules = &self.rules;
        let mut events = vec![CombatEvent::EncounterStarted {
            kind: EncounterKind::Boss,
            opponent: boss.stats.name.clone(),
        }];
        debug!(boss = %boss.stats.name, archetype = %boss.archetype(), "boss encounter started");

        let mut turn = 0;
        let mut stunned = false;

        while player.is_alive() && boss.is_alive() {
            turn += 1;
            events.push(CombatEvent::TurnStarted { turn });

            for shift in boss.update_phase() {
                debug!(boss = %boss.stats.name, phase = %shift.phase, "phase shift");
                events.push(CombatEvent::PhaseShift {
                    boss: boss.stats.name.clone(),
                    shift,
                });
            }

            let mut defending = false;
            if stunned {
                stunned = false;
                events.push(CombatEvent::TurnSkipped);
            } else {
                let ctx = TurnContext {
                    kind: EncounterKind::Boss,
                    turn,
                    player_hp: player.hp,
                    player_max_hp: player.max_hp,
                    opponent: boss.stats.name.clone(),
                    opponent_hp: boss.stats.hp,
                    opponent_max_hp: boss.stats.max_hp,
                    boss_phase: Some(boss.phase()),
                };
                match provider.choose(&ctx) {
                    PlayerIntent::Attack => {
                        let hit = Combat::resolve_attack(&*player, boss, rules, rng);
                        events.push(CombatEvent::Attack {
                            attacker: player.name.clone(),
                            defender: boss.stats.name.clone(),
                            damage: hit.damage,
                            critical: hit.critical,
                        });
                    }
                    PlayerIntent::Heal => {
                        if !self.drink(player, rules.boss_potion, &mut events) {
                            continue;
                        }
                    }
                    PlayerIntent::Defend => {
                        defending = true;
                        events.push(CombatEvent::Defending);
                    }
                    // 不能从 Boss 战中逃跑
                    PlayerIntent::Flee | PlayerIntent::Invalid => {
                        events.push(CombatEvent::InvalidIntent);
                    }
                }
            }

            if boss.is_alive() {
                if turn % SPECIAL_EVERY == 0 {
                    stunned = self.boss_special(player, boss, defending, rng, &mut events);
                } else {
                    let raw = boss_basic_damage(&boss.stats, player, defending);
                    let damage = player.take_damage(raw);
                    events.push(CombatEvent::Attack {
                        attacker: boss.stats.name.clone(),
                        defender: player.name.clone(),
                        damage,
                        critical: false,
                    });
                }

                boss.prune_minions();
                for minion in boss.details.minions.iter() {
                    let raw = Combat::mitigate(minion.strength as i64, 0, player.effective_armor());
                    let damage = player.take_damage(raw);
                    events.push(CombatEvent::MinionAttack {
                        name: minion.name.clone(),
                        target: player.name.clone(),
                        damage,
                    });
                }

                if rules.boss_turn_pause_ms > 0 {
                    thread::sleep(Duration::from_millis(rules.boss_turn_pause_ms));
                }
            }
            trace!(turn, player_hp = player.hp, boss_hp = boss.stats.hp, "boss turn resolved");
        }

        let outcome = if !boss.is_alive() {
            events.push(CombatEvent::Defeated {
                name: boss.stats.name.clone(),
            });
            self.award_experience(player, boss.stats.experience_value(), &mut events);

            for item in boss.archetype().legendary_set().items {
                if rng.random::<f64>() < rules.legendary_drop_chance {
                    player.items.push(item.to_string());
                    events.push(CombatEvent::ItemDropped {
                        item: item.to_string(),
                        rarity: Rarity::Legendary,
                    });
                }
            }

            let bonus = boss.archetype().permanent_bonus();
            player.raise_max_hp(bonus.max_hp, bonus.max_hp);
            player.strength += bonus.strength;
            player.armor += bonus.armor;
            events.push(CombatEvent::PermanentBonus(bonus));
            EncounterOutcome::Victory
        } else {
            events.push(CombatEvent::Defeated {
                name: player.name.clone(),
            });
            EncounterOutcome::Defeat
        };

        self.expire_modifiers(player, &mut events);
        info!(boss = %boss.stats.name, %outcome, turns = turn, "boss encounter finished");

        EncounterReport {
            kind: EncounterKind::Boss,
            outcome,
            turns: turn,
            events,
        }
    }

    /// 使用特殊能力，返回玩家是否被眩晕
    fn boss_special<R: Rng + ?Sized>(
        &self,
        player: &mut EntityStats,
        boss: &mut BossEntity,
        defending: bool,
        rng: &mut R,
        events: &mut Vec<CombatEvent>,
    ) -> bool {
        let name = boss.stats.name.clone();
        match boss.archetype() {
            BossArchetype::Dragon => {
                let damage = player.take_damage(boss.stats.strength * 2);
                events.push(CombatEvent::AbilityUsed {
                    boss: name,
                    target: player.name.clone(),
                    ability: BossAbility::FireBreath,
                    damage,
                });
                false
            }
            BossArchetype::Lich => {
                if let Some(minion) = boss.summon_minion() {
                    events.push(CombatEvent::MinionSummoned {
                        name: minion.name.clone(),
                    });
                }
                let damage = player.take_damage(boss.stats.strength / 2);
                player.strength = player.strength.saturating_sub(2).max(1);
                events.push(CombatEvent::AbilityUsed {
                    boss: name,
                    target: player.name.clone(),
                    ability: BossAbility::Curse,
                    damage,
                });
                events.push(CombatEvent::PlayerWeakened {
                    strength: player.strength,
                });
                false
            }
            BossArchetype::Titan => {
                let mut damage = boss.stats.strength * 3;
                if defending {
                    damage /= 2;
                }
                let damage = player.take_damage(damage);
                events.push(CombatEvent::AbilityUsed {
                    boss: name,
                    target: player.name.clone(),
                    ability: BossAbility::Earthquake,
                    damage,
                });
                let stunned = rng.random::<f64>() < self.rules.titan_stun_chance;
                if stunned {
                    events.push(CombatEvent::Stunned);
                }
                stunned
            }
        }
    }

    /// 返回 false 表示已满血，药水没有喝下
    fn drink(&self, player: &mut EntityStats, potion: u32, events: &mut Vec<CombatEvent>) -> bool {
        if player.hp < player.max_hp {
            let amount = player.heal(potion);
            events.push(CombatEvent::Healed {
                target: player.name.clone(),
                amount,
            });
            true
        } else {
            events.push(CombatEvent::HealWasted);
            false
        }
    }

    fn award_experience(
        &self,
        player: &mut EntityStats,
        amount: u32,
        events: &mut Vec<CombatEvent>,
    ) {
        events.push(CombatEvent::ExperienceGained { amount });
        if let Some(level) = player.gain_exp(amount) {
            info!(player = %player.name, level, "level up");
            events.push(CombatEvent::LevelUp { level });
        }
    }

    fn expire_modifiers(&self, player: &mut EntityStats, events: &mut Vec<CombatEvent>) {
        let expired = player.clear_modifiers();
        if !expired.is_empty() {
            events.push(CombatEvent::ModifiersExpired {
                count: expired.len(),
            });
        }
    }
}

/// Boss 普通攻击：固定公式，无浮动与暴击
pub fn boss_basic_damage(boss: &EntityStats, player: &EntityStats, defending: bool) -> u32 {
    let strength = if defending {
        boss.strength / 2
    } else {
        boss.strength
    };
    Combat::mitigate(strength as i64, 0, player.effective_armor())
}
