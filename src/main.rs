// src/main.rs
use std::time::{SystemTime, UNIX_EPOCH};
use std::{env, process};

use ancient_dungeons::{AutoPilot, GameConfig, Run, autoplay, parse_seed};
use anyhow::{Context, Result};
use hero::GameRng;
use tracing::info;

/// 用法: ancient_dungeons [seed] [config.json]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => parse_seed(&raw).map_err(|e| anyhow::anyhow!(error::handle_error(&e)))?,
        None => {
            let time = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
            (time ^ process::id() as u128) as u64
        }
    };
    let config = match args.next() {
        Some(path) => GameConfig::load(&path)
            .map_err(|e| anyhow::anyhow!(error::handle_error(&e)))
            .with_context(|| format!("failed to load {}", path))?,
        None => GameConfig::default(),
    };

    let difficulty = config.run.difficulty;
    // 名字使用独立的随机流，不影响地牢生成
    let mut name_rng = GameRng::new(seed.rotate_left(17));
    let player = hero::new_player(&config.run.player_name, difficulty, &mut name_rng);
    info!(seed, %difficulty, hero = %player.name, "starting headless run");

    let mut run = Run::new(player, difficulty, config, seed);
    let summary = autoplay::play(&mut run, &mut AutoPilot::default())?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
