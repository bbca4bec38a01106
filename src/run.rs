// src/run.rs
//! 一局游戏：逐层生成地牢、移动、战斗与通关结算

use combat::{
    ChoiceProvider, CombatResolver, Difficulty, EncounterOutcome, EncounterReport, EntityStats,
};
use dungeon::{DungeonLevel, EntityRef};
use hero::{AppliedTreasure, GameRng};
use items::TreasureTable;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info};

use crate::config::GameConfig;

/// 整局状态
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum RunStatus {
    InProgress,
    Won,
    Lost,
}

/// What a single movement attempt did, in the order it happened.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    /// 目标格不可通行，什么都没发生
    pub blocked: bool,
    pub trap_damage: Option<u32>,
    pub encounter: Option<EncounterReport>,
    pub treasure: Option<AppliedTreasure>,
    /// 玩家最终所在位置发生变化时为新坐标
    pub moved_to: Option<(i32, i32)>,
}

impl StepOutcome {
    fn blocked() -> Self {
        Self {
            blocked: true,
            ..Self::default()
        }
    }
}

/// 清空一层后的结算
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCleared {
    pub depth: u32,
    pub experience: u32,
    pub level_up: Option<u32>,
}

/// One play-through. Owns the player, the current level and the RNG; the
/// caller drives it with [`Run::step`] and decides what to do with the
/// returned outcomes.
pub struct Run {
    pub player: EntityStats,
    difficulty: Difficulty,
    config: GameConfig,
    resolver: CombatResolver,
    treasures: TreasureTable,
    rng: GameRng,
    depth: u32,
    level: Option<DungeonLevel>,
    status: RunStatus,
}

impl Run {
    pub fn new(player: EntityStats, difficulty: Difficulty, config: GameConfig, seed: u64) -> Self {
        Self {
            player,
            difficulty,
            resolver: CombatResolver::new(config.combat.clone()),
            treasures: difficulty.treasure_table(),
            config,
            rng: GameRng::new(seed),
            depth: 1,
            level: None,
            status: RunStatus::InProgress,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn level(&self) -> Option<&DungeonLevel> {
        self.level.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Generates the current depth, puts the player in the first room and
    /// lets them rest. Returns the HP restored.
    pub fn enter_level(&mut self) -> error::Result<u32> {
        let level = dungeon::generate_level_with(
            &self.config.map,
            self.depth,
            self.difficulty,
            &mut self.rng,
        )?;
        hero::place_at_start(&mut self.player, &level);
        let healed =
            hero::rest_between_levels(&mut self.player, self.difficulty, self.config.run.rest_heal);
        info!(
            depth = self.depth,
            rooms = level.rooms.len(),
            enemies = level.enemies.len(),
            boss = level.boss.is_some(),
            healed,
            "entered level"
        );
        self.level = Some(level);
        Ok(healed)
    }

    /// 当前层的敌人和 Boss 都已被击败
    pub fn is_level_cleared(&self) -> bool {
        self.level.as_ref().is_some_and(DungeonLevel::is_cleared)
    }

    /// Grants the clear reward and advances to the next depth. The run is
    /// won once `max_depth` is cleared.
    pub fn complete_level(&mut self) -> Option<LevelCleared> {
        if self.status != RunStatus::InProgress || !self.is_level_cleared() {
            return None;
        }
        let depth = self.depth;
        let experience = self.config.run.clear_reward_per_depth.saturating_mul(depth);
        let level_up = self.player.gain_exp(experience);
        self.level = None;
        if depth >= self.config.run.max_depth {
            self.status = RunStatus::Won;
            info!(depth, "run won");
        } else {
            self.depth += 1;
        }
        Some(LevelCleared {
            depth,
            experience,
            level_up,
        })
    }

    /// 献祭生命换取力量
    pub fn sacrifice(&mut self) -> bool {
        hero::sacrifice_health(&mut self.player)
    }

    /// Tries to move the player by (dx, dy).
    ///
    /// Order: walls block; a trap springs; a live enemy or boss is fought
    /// (fleeing keeps the player in place); otherwise a treasure is opened
    /// (teleport relocates the player); finally the player moves.
    pub fn step<P>(&mut self, dx: i32, dy: i32, provider: &mut P) -> StepOutcome
    where
        P: ChoiceProvider + ?Sized,
    {
        if self.status != RunStatus::InProgress {
            return StepOutcome::blocked();
        }
        let Some(level) = self.level.as_mut() else {
            return StepOutcome::blocked();
        };
        let (x, y) = (self.player.x + dx, self.player.y + dy);
        if !level.is_walkable(x, y) {
            return StepOutcome::blocked();
        }

        let mut outcome = StepOutcome {
            trap_damage: level.trigger_trap(x, y, &mut self.player),
            ..StepOutcome::default()
        };
        if !self.player.is_alive() {
            self.status = RunStatus::Lost;
            return outcome;
        }

        match level.entity_at(x, y) {
            Some(EntityRef::Enemy(index)) => {
                let Some(enemy) = level.enemy_mut(index) else {
                    return outcome;
                };
                let report =
                    self.resolver.resolve_regular(&mut self.player, enemy, provider, &mut self.rng);
                let fled = report.outcome == EncounterOutcome::Fled;
                outcome.encounter = Some(report);
                if fled {
                    return outcome;
                }
            }
            Some(EntityRef::Boss) => {
                let Some(boss) = level.boss_mut() else {
                    return outcome;
                };
                let report =
                    self.resolver.resolve_boss(&mut self.player, boss, provider, &mut self.rng);
                outcome.encounter = Some(report);
            }
            None => {
                if level.collect_treasure(x, y) {
                    let applied =
                        hero::open_treasure(&mut self.player, &self.treasures, &mut self.rng);
                    let teleport = applied.as_ref().is_some_and(|a| a.teleport);
                    outcome.treasure = applied;
                    if teleport {
                        outcome.moved_to = hero::teleport(&mut self.player, level, &mut self.rng);
                        return outcome;
                    }
                }
            }
        }

        if !self.player.is_alive() {
            self.status = RunStatus::Lost;
            info!(depth = self.depth, "player defeated");
            return outcome;
        }
        self.player.set_position(x, y);
        outcome.moved_to = Some((x, y));
        debug!(x, y, "player moved");
        outcome
    }
}
