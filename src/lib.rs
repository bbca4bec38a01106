// src/lib.rs
//! Ancient Dungeons: a turn-based roguelike core.
//!
//! The member crates do the work: `dungeon` generates and populates floors,
//! `combat` builds and fights entities, `hero` owns the player side. This
//! crate ties them into a [`Run`] driven by a configuration file.

pub mod autoplay;
pub mod config;
pub mod run;

pub use crate::autoplay::{AutoPilot, RunSummary};
pub use crate::config::{GameConfig, RunConfig, parse_seed};
pub use crate::run::{LevelCleared, Run, RunStatus, StepOutcome};
