#[cfg(test)]
mod combat_tests {
    use crate::*;
    use items::RARE_DROPS;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use strum::IntoEnumIterator;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn hero() -> EntityStats {
        EntityStats::new("Hero", 0, 0, '@', 100, 10, 5)
    }

    fn orc() -> EntityStats {
        EntityStats::new("Orc", 1, 0, 'O', 20, 6, 2)
    }

    fn boss(archetype: BossArchetype, hp: u32, strength: u32, armor: u32) -> BossEntity {
        BossEntity::new(
            archetype,
            EntityStats::new(archetype.title(), 5, 5, archetype.glyph(), hp, strength, armor),
            archetype.abilities(false),
            Resistances::empty(),
        )
    }

    fn count(report: &EncounterReport, pred: impl Fn(&CombatEvent) -> bool) -> usize {
        report.events.iter().filter(|e| pred(e)).count()
    }

    /// (turn, phase) for every phase shift in the report
    fn phase_shifts(report: &EncounterReport) -> Vec<(u32, BossPhase)> {
        let mut turn = 0;
        let mut shifts = Vec::new();
        for event in &report.events {
            match event {
                CombatEvent::TurnStarted { turn: t } => turn = *t,
                CombatEvent::PhaseShift { shift, .. } => shifts.push((turn, shift.phase)),
                _ => {}
            }
        }
        shifts
    }

    #[test]
    fn test_damage_range_without_crits() {
        let rules = CombatRules {
            crit_chance: 0.0,
            ..CombatRules::default()
        };
        let attacker = EntityStats::new("A", 0, 0, 'a', 10, 10, 0);
        let mut seen = std::collections::BTreeSet::new();
        let mut r = rng();
        for _ in 0..500 {
            let defender = EntityStats::new("D", 0, 0, 'd', 1000, 1, 0);
            let out = Combat::calculate_damage(&attacker, &defender, &rules, &mut r);
            assert!(!out.critical);
            assert!((8..=12).contains(&out.damage), "damage {}", out.damage);
            seen.insert(out.damage);
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_heavy_armor_still_takes_one() {
        let attacker = EntityStats::new("A", 0, 0, 'a', 10, 10, 0);
        let mut defender = EntityStats::new("D", 0, 0, 'd', 50, 1, 1000);
        let mut r = rng();
        let rules = CombatRules::default();
        let landed: Vec<u32> = (0..60)
            .map(|_| Combat::resolve_attack(&attacker, &mut defender, &rules, &mut r).damage)
            .collect();
        // 每次 1 点，打空之后不再计入
        assert!(landed[..50].iter().all(|&d| d == 1));
        assert!(landed[50..].iter().all(|&d| d == 0));
        assert_eq!(defender.hp, 0);
    }

    #[test]
    fn test_critical_multipliers() {
        let rules = CombatRules::default();
        assert_eq!(Combat::base_damage(10, false, true, &rules), 10);
        assert_eq!(Combat::base_damage(10, true, false, &rules), 20);
        assert_eq!(Combat::base_damage(10, true, true, &rules), 30);
        assert_eq!(Combat::base_damage(7, true, true, &rules), 21);
    }

    #[test]
    fn test_scripted_regular_fight() {
        let mut player = hero();
        let mut enemy = orc();
        let mut choices = ScriptedChoices::always(PlayerIntent::Attack);
        let resolver = CombatResolver::new(CombatRules::deterministic());

        let report = resolver.resolve_regular(&mut player, &mut enemy, &mut choices, &mut rng());

        // 10 - 2/3 = 10 per hit, 6 - 5/3 = 5 back
        assert_eq!(report.outcome, EncounterOutcome::Victory);
        assert_eq!(report.turns, 2);
        assert_eq!(choices.consulted(), 2);
        assert_eq!(enemy.hp, 0);
        assert_eq!(player.hp, 95);
        assert_eq!(report.damage_taken_by("Hero"), 5);
        // fallback: 20/2 + 6*2
        assert_eq!(player.experience, 22);
    }

    #[test]
    fn test_flee_ends_without_loot() {
        let mut player = hero();
        let mut enemy = orc();
        let rules = CombatRules {
            flee_chance: 1.0,
            ..CombatRules::deterministic()
        };
        let report = CombatResolver::new(rules).resolve_regular(
            &mut player,
            &mut enemy,
            &mut ScriptedChoices::always(PlayerIntent::Flee),
            &mut rng(),
        );
        assert_eq!(report.outcome, EncounterOutcome::Fled);
        assert_eq!(report.turns, 1);
        assert_eq!(player.hp, 100);
        assert_eq!(player.experience, 0);
        assert_eq!(enemy.hp, 20);
    }

    #[test]
    fn test_failed_flee_lets_enemy_act() {
        let mut player = hero();
        let mut enemy = orc();
        let rules = CombatRules {
            flee_chance: 0.0,
            ..CombatRules::deterministic()
        };
        let mut choices = ScriptedChoices::new([PlayerIntent::Flee]);
        let report = CombatResolver::new(rules).resolve_regular(
            &mut player,
            &mut enemy,
            &mut choices,
            &mut rng(),
        );
        assert_eq!(report.events[2], CombatEvent::FleeAttempt { success: false });
        assert_eq!(report.outcome, EncounterOutcome::Victory);
        // 一次逃跑失败 + 两次攻击，敌人出手两次
        assert_eq!(player.hp, 90);
    }

    #[test]
    fn test_heal_at_full_hp_skips_enemy_turn() {
        let mut player = hero();
        let mut enemy = orc();
        let mut choices = ScriptedChoices::new([PlayerIntent::Heal]);
        let report = CombatResolver::new(CombatRules::deterministic()).resolve_regular(
            &mut player,
            &mut enemy,
            &mut choices,
            &mut rng(),
        );
        assert_eq!(report.events[2], CombatEvent::HealWasted);
        assert_eq!(report.events[3], CombatEvent::TurnStarted { turn: 2 });
        // 敌人只在第 2 回合出手一次
        assert_eq!(report.turns, 3);
        assert_eq!(player.hp, 95);
        assert_eq!(choices.consulted(), 3);
    }

    #[test]
    fn test_invalid_intent_still_passes_turn() {
        let mut player = hero();
        let mut enemy = orc();
        let mut choices = ScriptedChoices::new([PlayerIntent::Invalid, PlayerIntent::Heal]);
        let report = CombatResolver::new(CombatRules::deterministic()).resolve_regular(
            &mut player,
            &mut enemy,
            &mut choices,
            &mut rng(),
        );
        assert_eq!(count(&report, |e| *e == CombatEvent::InvalidIntent), 1);
        assert_eq!(
            count(&report, |e| matches!(e, CombatEvent::Healed { amount: 5, .. })),
            1
        );
        // heal on turn 2 restores turn 1's hit, then two attacks
        assert_eq!(report.turns, 4);
        assert_eq!(player.hp, 90);
    }

    #[test]
    fn test_heal_at_full_hp_in_boss_fight() {
        let mut b = boss(BossArchetype::Dragon, 1000, 4, 0);
        let name = b.stats.name.clone();
        let mut player = EntityStats::new("Hero", 0, 0, '@', 1000, 1, 0);
        let mut choices = ScriptedChoices::new([PlayerIntent::Heal]);
        let report = CombatResolver::new(CombatRules::deterministic()).resolve_boss(
            &mut player,
            &mut b,
            &mut choices,
            &mut rng(),
        );

        let mut turn = 0;
        let mut boss_actions = Vec::new();
        for event in &report.events {
            match event {
                CombatEvent::TurnStarted { turn: t } => turn = *t,
                CombatEvent::Attack { attacker, .. } if *attacker == name && turn <= 3 => {
                    boss_actions.push(turn)
                }
                CombatEvent::AbilityUsed { .. } if turn <= 3 => boss_actions.push(turn),
                _ => {}
            }
        }
        // 第 1 回合满血喝药，Boss 不行动；第 3 回合的特殊能力不顺延
        assert_eq!(boss_actions, vec![2, 3]);
        assert_eq!(count(&report, |e| *e == CombatEvent::HealWasted), 1);
    }

    #[test]
    fn test_elite_rare_drop() {
        let factory = DifficultyEntityFactory::new(Difficulty::Normal, 1);
        let mut enemy = factory.promote(orc());
        let mut player = EntityStats::new("Hero", 0, 0, '@', 500, 60, 5);
        let rules = CombatRules {
            rare_drop_chance: 1.0,
            elite_ability_chance: 0.0,
            ..CombatRules::deterministic()
        };
        let report = CombatResolver::new(rules).resolve_regular(
            &mut player,
            &mut enemy,
            &mut ScriptedChoices::always(PlayerIntent::Attack),
            &mut rng(),
        );
        assert!(report.is_victory());
        assert_eq!(player.items.len(), 1);
        assert!(RARE_DROPS.contains(&player.items[0].as_str()));
        assert_eq!(report.items_dropped().len(), 1);
    }

    #[test]
    fn test_elite_abilities_fire() {
        let factory = DifficultyEntityFactory::new(Difficulty::Normal, 1);
        let mut enemy = factory.promote(EntityStats::new("Wall", 0, 0, 'W', 400, 6, 0));
        let mut player = EntityStats::new("Hero", 0, 0, '@', 10_000, 100, 5);
        let rules = CombatRules {
            elite_ability_chance: 1.0,
            ..CombatRules::deterministic()
        };
        let report = CombatResolver::new(rules).resolve_regular(
            &mut player,
            &mut enemy,
            &mut ScriptedChoices::always(PlayerIntent::Attack),
            &mut rng(),
        );
        let abilities = count(&report, |e| matches!(e, CombatEvent::EliteAbility { .. }));
        // every surviving enemy turn triggers one
        assert_eq!(abilities as u32, report.turns - 1);
    }

    #[test]
    fn test_modifiers_consumed_after_fight() {
        let mut player = hero();
        player.add_modifier(CombatModifier {
            stat: ModifiedStat::Strength,
            amount: 5,
            source: "Enchanted Sword".into(),
        });
        let mut enemy = EntityStats::new("Slime", 0, 0, 's', 30, 1, 0);
        let report = resolve_regular_combat(
            &mut player,
            &mut enemy,
            &mut |_: &TurnContext| PlayerIntent::Attack,
            &mut rng(),
        );
        assert!(report.is_victory());
        assert!(player.modifiers.is_empty());
        assert_eq!(player.effective_strength(), 10);
        assert_eq!(
            report.events.last(),
            Some(&CombatEvent::ModifiersExpired { count: 1 })
        );
    }

    #[test]
    fn test_boss_phase_crossings_fire_once() {
        // 200 -> 110 (55%) -> 20 (10%), then two defend turns before the kill
        let mut b = boss(BossArchetype::Dragon, 200, 1, 0);
        let mut player = EntityStats::new("Hero", 0, 0, '@', 1000, 90, 0);
        let mut choices = ScriptedChoices::new([
            PlayerIntent::Attack,
            PlayerIntent::Attack,
            PlayerIntent::Defend,
            PlayerIntent::Defend,
            PlayerIntent::Attack,
        ]);
        let report = CombatResolver::new(CombatRules::deterministic()).resolve_boss(
            &mut player,
            &mut b,
            &mut choices,
            &mut rng(),
        );

        assert_eq!(
            phase_shifts(&report),
            vec![(2, BossPhase::Phase2), (3, BossPhase::Phase3)]
        );
        assert_eq!(report.turns, 5);
        assert!(report.is_victory());
        assert!(b.details.enraged);
        assert_eq!(b.details.entered_phases, vec![BossPhase::Phase2, BossPhase::Phase3]);
    }

    #[test]
    fn test_boss_cannot_be_fled() {
        let mut b = boss(BossArchetype::Dragon, 20, 1, 0);
        let mut player = EntityStats::new("Hero", 0, 0, '@', 100, 10, 0);
        let mut choices = ScriptedChoices::new([PlayerIntent::Flee]);
        let report = CombatResolver::new(CombatRules::deterministic()).resolve_boss(
            &mut player,
            &mut b,
            &mut choices,
            &mut rng(),
        );
        assert_eq!(count(&report, |e| matches!(e, CombatEvent::FleeAttempt { .. })), 0);
        assert_eq!(count(&report, |e| *e == CombatEvent::InvalidIntent), 1);
        assert_eq!(report.outcome, EncounterOutcome::Victory);
    }

    #[test]
    fn test_titan_stun_skips_player_turn() {
        let mut b = boss(BossArchetype::Titan, 6, 1, 0);
        let mut player = EntityStats::new("Hero", 0, 0, '@', 100, 1, 0);
        let rules = CombatRules {
            titan_stun_chance: 1.0,
            ..CombatRules::deterministic()
        };
        let mut choices = ScriptedChoices::always(PlayerIntent::Attack);
        let report =
            CombatResolver::new(rules).resolve_boss(&mut player, &mut b, &mut choices, &mut rng());

        // earthquakes on turns 3 and 6 stun; turns 4 and 7 are skipped
        assert_eq!(report.turns, 8);
        assert_eq!(count(&report, |e| *e == CombatEvent::TurnSkipped), 2);
        assert_eq!(count(&report, |e| *e == CombatEvent::Stunned), 2);
        assert_eq!(choices.consulted(), 6);
        assert!(report.is_victory());
    }

    #[test]
    fn test_defending_halves_earthquake() {
        let mut b = boss(BossArchetype::Titan, 1000, 10, 0);
        let mut player = EntityStats::new("Hero", 0, 0, '@', 1000, 1, 0);
        let rules = CombatRules {
            titan_stun_chance: 0.0,
            ..CombatRules::deterministic()
        };
        let mut choices = ScriptedChoices::new([
            PlayerIntent::Defend,
            PlayerIntent::Attack,
            PlayerIntent::Defend,
        ]);
        let report =
            CombatResolver::new(rules).resolve_boss(&mut player, &mut b, &mut choices, &mut rng());
        let quakes: Vec<u32> = report
            .events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::AbilityUsed { damage, .. } => Some(*damage),
                _ => None,
            })
            .collect();
        assert_eq!(quakes[0], 15);
        assert_eq!(quakes[1], 30);
    }

    #[test]
    fn test_lich_summons_at_most_three() {
        let mut b = boss(BossArchetype::Lich, 10_000, 2, 0);
        let mut player = EntityStats::new("Hero", 0, 0, '@', 200, 3, 0);
        let report = CombatResolver::new(CombatRules::deterministic()).resolve_boss(
            &mut player,
            &mut b,
            &mut ScriptedChoices::always(PlayerIntent::Attack),
            &mut rng(),
        );
        assert_eq!(report.outcome, EncounterOutcome::Defeat);
        assert_eq!(report.turns, 13);
        assert_eq!(count(&report, |e| matches!(e, CombatEvent::MinionSummoned { .. })), 3);
        assert_eq!(b.details.minions.len(), 3);
        // 3 -> 1, then floored at 1
        assert_eq!(player.strength, 1);
        assert_eq!(player.hp, 0);
    }

    #[test]
    fn test_damage_taken_counts_only_what_landed() {
        let mut b = boss(BossArchetype::Lich, 10_000, 2, 0);
        let mut player = EntityStats::new("Hero", 0, 0, '@', 200, 3, 0);
        let report = CombatResolver::new(CombatRules::deterministic()).resolve_boss(
            &mut player,
            &mut b,
            &mut ScriptedChoices::always(PlayerIntent::Attack),
            &mut rng(),
        );
        // 咒术、召唤物和普通攻击都算在玩家头上，但不超过其生命值
        assert_eq!(report.damage_taken_by("Hero"), 200);
        assert_eq!(report.damage_taken_by(&b.stats.name), 10_000 - b.stats.hp);
        let minion = b.details.minions[0].name.clone();
        assert_eq!(report.damage_taken_by(&minion), 0);
    }

    #[test]
    fn test_boss_victory_rewards() {
        let mut b = boss(BossArchetype::Titan, 10, 1, 0);
        b.stats.exp_reward = Some(30);
        let mut player = hero();
        let rules = CombatRules {
            legendary_drop_chance: 1.0,
            ..CombatRules::deterministic()
        };
        let report = CombatResolver::new(rules).resolve_boss(
            &mut player,
            &mut b,
            &mut ScriptedChoices::always(PlayerIntent::Attack),
            &mut rng(),
        );
        assert!(report.is_victory());
        assert_eq!(player.armor, 10);
        assert_eq!(player.experience, 30);
        assert_eq!(player.items.len(), 3);
        assert!(report.events.contains(&CombatEvent::PermanentBonus(PermanentBonus {
            max_hp: 0,
            strength: 0,
            armor: 5,
        })));
    }

    #[test]
    fn test_dragon_bonus_raises_and_heals() {
        let mut b = boss(BossArchetype::Dragon, 10, 1, 0);
        let mut player = hero();
        let report = resolve_boss_combat(
            &mut player,
            &mut b,
            &mut ScriptedChoices::always(PlayerIntent::Attack),
            &mut rng(),
        );
        assert!(report.is_victory());
        assert_eq!(player.max_hp, 130);
        assert!(player.hp <= player.max_hp);
    }

    proptest! {
        #[test]
        fn prop_factory_stats_positive(level in 1u32..60, index in 0usize..12) {
            for difficulty in Difficulty::iter() {
                let f = DifficultyEntityFactory::new(difficulty, level);
                let normal = f.normal_enemy_from_roster(index, 0, 0);
                prop_assert!(normal.hp >= 1 && normal.strength >= 1 && normal.armor >= 1);
                let elite = f.promote(normal.clone());
                prop_assert!(elite.max_hp >= normal.max_hp);
                prop_assert!(elite.strength >= normal.strength);
                prop_assert!(elite.armor >= normal.armor);
                prop_assert!(elite.exp_reward >= normal.exp_reward);
            }
        }

        #[test]
        fn prop_phase_is_monotonic(steps in proptest::collection::vec(0u32..=300, 1..20)) {
            let mut b = boss(BossArchetype::Lich, 300, 40, 30);
            let mut last = b.phase();
            let mut shifts = 0;
            for hp in steps {
                b.stats.hp = hp;
                shifts += b.update_phase().len();
                prop_assert!(b.phase() >= last);
                last = b.phase();
            }
            prop_assert!(shifts <= 2);
            prop_assert_eq!(shifts, b.details.entered_phases.len());
        }
    }
}
