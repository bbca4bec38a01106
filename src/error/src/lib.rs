//! 游戏错误处理模块
//!
//! Errors are confined to configuration and I/O. Gameplay outcomes (defeat,
//! a fled encounter, a room that could not be placed) are never errors.

use thiserror::Error;

/// 游戏运行过程中可能出现的错误类型
#[derive(Debug, Error)]
pub enum GameError {
    /// IO操作错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 配置文件解析错误
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// 配置数值无效
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// 地图太小，放不下最大尺寸的房间
    #[error("Map {width}x{height} is too small, need at least {min_width}x{min_height}")]
    MapTooSmall {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },

    /// 生成器没有放下任何房间
    #[error("Dungeon generation produced no rooms")]
    NoRooms,

    /// 用户输入错误
    #[error("Input error: {0}")]
    InvalidInput(String),
}

/// 处理游戏错误并转换为用户友好的消息
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::IoError(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "Config file not found".to_string(),
            std::io::ErrorKind::PermissionDenied => {
                "No permission to read the config file".to_string()
            }
            _ => format!("IO error: {}", e),
        },
        GameError::ConfigParse(e) => format!("Config file is malformed: {}", e),
        GameError::MapTooSmall { .. } => {
            format!("{}. Increase width/height in the config.", error)
        }
        _ => error.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
