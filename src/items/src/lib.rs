//src/items/src/lib.rs
//! Treasure effects and loot tables.
//!
//! This crate only describes *what* a treasure or a drop is. Applying a
//! treasure to the player lives in the `hero` crate; rolling drops lives in
//! the combat resolver.

pub mod loot;
pub mod treasure;

pub use crate::loot::{LegendarySet, RARE_DROPS, Rarity};
pub use crate::treasure::{TreasureEffect, TreasureKind, TreasureTable};
