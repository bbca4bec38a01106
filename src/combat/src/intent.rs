// src/combat/src/intent.rs

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::boss::BossPhase;
use crate::event::EncounterKind;

/// 玩家每回合的选择
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum PlayerIntent {
    Attack,
    Heal,
    /// 仅普通战斗有效
    Flee,
    /// 仅 Boss 战有效
    Defend,
    /// 无法识别的输入，回合作废
    Invalid,
}

impl PlayerIntent {
    /// Maps the classic numbered menu (1/2/3) to an intent.
    pub fn from_menu(kind: EncounterKind, input: &str) -> Self {
        match (kind, input.trim()) {
            (_, "1") => Self::Attack,
            (_, "2") => Self::Heal,
            (EncounterKind::Regular, "3") => Self::Flee,
            (EncounterKind::Boss, "3") => Self::Defend,
            _ => Self::Invalid,
        }
    }
}

/// Snapshot handed to the choice provider before each player turn.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnContext {
    pub kind: EncounterKind,
    pub turn: u32,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub opponent: String,
    pub opponent_hp: u32,
    pub opponent_max_hp: u32,
    /// Boss 战中的当前阶段
    pub boss_phase: Option<BossPhase>,
}

/// 每回合被调用且仅被调用一次
pub trait ChoiceProvider {
    fn choose(&mut self, ctx: &TurnContext) -> PlayerIntent;
}

impl<F> ChoiceProvider for F
where
    F: FnMut(&TurnContext) -> PlayerIntent,
{
    fn choose(&mut self, ctx: &TurnContext) -> PlayerIntent {
        self(ctx)
    }
}

/// Replays a fixed list of intents, then repeats `fallback` forever.
#[derive(Clone, Debug)]
pub struct ScriptedChoices {
    script: VecDeque<PlayerIntent>,
    fallback: PlayerIntent,
    consulted: u32,
}

impl ScriptedChoices {
    pub fn new(script: impl IntoIterator<Item = PlayerIntent>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: PlayerIntent::Attack,
            consulted: 0,
        }
    }

    pub fn always(intent: PlayerIntent) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: intent,
            consulted: 0,
        }
    }

    pub fn with_fallback(mut self, fallback: PlayerIntent) -> Self {
        self.fallback = fallback;
        self
    }

    /// 被询问的次数
    pub fn consulted(&self) -> u32 {
        self.consulted
    }
}

impl ChoiceProvider for ScriptedChoices {
    fn choose(&mut self, _ctx: &TurnContext) -> PlayerIntent {
        self.consulted += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }
}
