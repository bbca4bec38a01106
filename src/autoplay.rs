// src/autoplay.rs
//! 无界面自动游玩：寻路到最近的敌人并战斗

use std::collections::{HashMap, VecDeque};

use combat::{ChoiceProvider, Difficulty, EncounterKind, PlayerIntent, TurnContext};
use dungeon::DungeonLevel;
use serde::Serialize;
use tracing::{info, warn};

use crate::run::{Run, RunStatus};

const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// 单层最多移动的步数，超出视为卡住
pub const STEP_LIMIT_PER_LEVEL: u32 = 5_000;

/// Always attacks, drinks a potion when HP falls under `heal_below`, and
/// gives up on a regular fight that drags past `flee_after` turns.
#[derive(Clone, Copy, Debug)]
pub struct AutoPilot {
    pub heal_below: f64,
    pub flee_after: u32,
}

impl Default for AutoPilot {
    fn default() -> Self {
        Self {
            heal_below: 0.35,
            flee_after: 100,
        }
    }
}

impl ChoiceProvider for AutoPilot {
    fn choose(&mut self, ctx: &TurnContext) -> PlayerIntent {
        if ctx.kind == EncounterKind::Regular && ctx.turn > self.flee_after {
            return PlayerIntent::Flee;
        }
        let threshold = ctx.player_max_hp as f64 * self.heal_below;
        if (ctx.player_hp as f64) < threshold {
            PlayerIntent::Heal
        } else {
            PlayerIntent::Attack
        }
    }
}

/// First step of a shortest walkable path from `from` to the nearest live
/// enemy or boss. `None` when nothing is reachable.
pub fn next_direction(level: &DungeonLevel, from: (i32, i32)) -> Option<(i32, i32)> {
    // 敌人可能与玩家重叠（同格生成），先让开一步再回来
    if level.entity_at(from.0, from.1).is_some() {
        return DIRECTIONS
            .into_iter()
            .find(|&(dx, dy)| level.is_walkable(from.0 + dx, from.1 + dy));
    }
    let mut came_from: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
    let mut queue = VecDeque::from([from]);

    while let Some(pos) = queue.pop_front() {
        if pos != from && level.entity_at(pos.0, pos.1).is_some() {
            // 回溯到起点后的第一步
            let mut step = pos;
            while let Some(&prev) = came_from.get(&step) {
                if prev == from {
                    return Some((step.0 - from.0, step.1 - from.1));
                }
                step = prev;
            }
            return None;
        }
        for (dx, dy) in DIRECTIONS {
            let next = (pos.0 + dx, pos.1 + dy);
            if next != from && level.is_walkable(next.0, next.1) && !came_from.contains_key(&next) {
                came_from.insert(next, pos);
                queue.push_back(next);
            }
        }
    }
    None
}

/// 自动游玩结束后输出的统计
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub difficulty: Difficulty,
    pub status: RunStatus,
    /// 玩家卡住时为 true（找不到敌人或步数用尽）
    pub stalled: bool,
    pub depth: u32,
    pub hero: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub strength: u32,
    pub armor: u32,
    pub items: Vec<String>,
    pub encounters_won: u32,
    pub treasures_opened: u32,
    pub traps_sprung: u32,
}

/// Plays `run` to the end with an [`AutoPilot`].
pub fn play(run: &mut Run, pilot: &mut AutoPilot) -> error::Result<RunSummary> {
    let mut encounters_won = 0;
    let mut treasures_opened = 0;
    let mut traps_sprung = 0;
    let mut stalled = false;

    'levels: while run.status() == RunStatus::InProgress {
        run.enter_level()?;
        let mut steps = 0;
        while !run.is_level_cleared() {
            let direction = run
                .level()
                .and_then(|level| next_direction(level, run.player.position()));
            let Some((dx, dy)) = direction else {
                warn!(depth = run.depth(), "no reachable enemy left");
                stalled = true;
                break 'levels;
            };
            let outcome = run.step(dx, dy, pilot);
            encounters_won += outcome.encounter.as_ref().is_some_and(|r| r.is_victory()) as u32;
            treasures_opened += outcome.treasure.is_some() as u32;
            traps_sprung += outcome.trap_damage.is_some() as u32;

            steps += 1;
            if run.status() != RunStatus::InProgress {
                break 'levels;
            }
            if steps >= STEP_LIMIT_PER_LEVEL {
                warn!(depth = run.depth(), steps, "step limit reached");
                stalled = true;
                break 'levels;
            }
        }
        if let Some(cleared) = run.complete_level() {
            info!(depth = cleared.depth, exp = cleared.experience, "level cleared");
        }
    }

    let player = &run.player;
    Ok(RunSummary {
        seed: run.seed(),
        difficulty: run.difficulty(),
        status: run.status(),
        stalled,
        depth: run.depth(),
        hero: player.name.clone(),
        level: player.level,
        hp: player.hp,
        max_hp: player.max_hp,
        strength: player.strength,
        armor: player.armor,
        items: player.items.clone(),
        encounters_won,
        treasures_opened,
        traps_sprung,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat::{Difficulty, EntityStats};
    use dungeon::Tile;

    fn ctx(kind: EncounterKind, turn: u32, hp: u32) -> TurnContext {
        TurnContext {
            kind,
            turn,
            player_hp: hp,
            player_max_hp: 100,
            opponent: "Rat".into(),
            opponent_hp: 10,
            opponent_max_hp: 10,
            boss_phase: None,
        }
    }

    #[test]
    fn test_pilot_choices() {
        let mut pilot = AutoPilot::default();
        assert_eq!(pilot.choose(&ctx(EncounterKind::Regular, 1, 80)), PlayerIntent::Attack);
        assert_eq!(pilot.choose(&ctx(EncounterKind::Boss, 1, 34)), PlayerIntent::Heal);
        assert_eq!(pilot.choose(&ctx(EncounterKind::Boss, 1, 36)), PlayerIntent::Attack);
        assert_eq!(pilot.choose(&ctx(EncounterKind::Regular, 101, 80)), PlayerIntent::Flee);
        assert_eq!(pilot.choose(&ctx(EncounterKind::Boss, 500, 80)), PlayerIntent::Attack);
    }

    #[test]
    fn test_path_around_wall() {
        // ....
        // .#E.
        // @#..
        let mut level = DungeonLevel::new(4, 3, 1, Difficulty::Normal);
        for y in 0..3 {
            for x in 0..4 {
                level.set_tile(x, y, Tile::Floor);
            }
        }
        level.set_tile(1, 1, Tile::Wall);
        level.set_tile(1, 2, Tile::Wall);
        level.enemies.push(EntityStats::new("Rat", 2, 1, 'r', 5, 1, 0));

        assert_eq!(next_direction(&level, (0, 2)), Some((0, -1)));
        assert_eq!(next_direction(&level, (2, 2)), Some((0, -1)));

        level.enemies[0].hp = 0;
        assert_eq!(next_direction(&level, (0, 2)), None);
    }

    #[test]
    fn test_steps_off_shared_tile() {
        let mut level = DungeonLevel::new(3, 1, 1, Difficulty::Normal);
        for x in 0..3 {
            level.set_tile(x, 0, Tile::Floor);
        }
        level.enemies.push(EntityStats::new("Rat", 0, 0, 'r', 5, 1, 0));
        assert_eq!(next_direction(&level, (0, 0)), Some((1, 0)));
        assert_eq!(next_direction(&level, (1, 0)), Some((-1, 0)));
    }
}
