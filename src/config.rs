// src/config.rs
//! 游戏配置：地图、战斗数值与整局流程，均可由 JSON 文件部分覆盖

use std::fs;
use std::path::Path;

use combat::{CombatRules, Difficulty};
use dungeon::MapConfig;
use error::GameError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Level progression settings for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// 通关所需层数
    pub max_depth: u32,
    /// 清空一层获得的经验 = 此值 × 层数
    pub clear_reward_per_depth: u32,
    /// 进入新层时的基础恢复量（再乘以难度系数）
    pub rest_heal: u32,
    pub difficulty: Difficulty,
    /// 为空时随机选择
    pub player_name: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            clear_reward_per_depth: 50,
            rest_heal: 30,
            difficulty: Difficulty::Normal,
            player_name: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map: MapConfig,
    pub combat: CombatRules,
    pub run: RunConfig,
}

impl GameConfig {
    /// 读取并校验配置文件；缺省字段使用默认值
    pub fn load(path: impl AsRef<Path>) -> error::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_json(text: &str) -> error::Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> error::Result<()> {
        self.map.validate()?;
        if let Some(field) = self.combat.invalid_field() {
            return Err(GameError::InvalidConfig(format!("combat.{} is out of range", field)));
        }
        if self.run.max_depth == 0 {
            return Err(GameError::InvalidConfig("run.max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

/// 解析命令行传入的种子
pub fn parse_seed(raw: &str) -> error::Result<u64> {
    raw.trim().parse().map_err(|_| {
        GameError::InvalidInput(format!("seed must be an unsigned integer, got {:?}", raw))
    })
}
