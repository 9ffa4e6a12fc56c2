//! jetpalette - chat palette conversion and buff composition for TRPG sheets
//!
//! This library provides functionality to:
//! - Convert a pasted macro palette (assignments, judges, attacks) into sheet data
//! - Expand `{variable}` references with cycle-safe resolution
//! - Compose buff effects into judge/attack commands, as plain text or colored markup
//! - Manage buff turns, categories and the user dictionary

pub mod assignments;
pub mod cli;
pub mod color;
pub mod compositor;
pub mod config;
pub mod converter;
pub mod dictionary;
pub mod matcher;
pub mod models;
pub mod render;
pub mod store;
pub mod target;
pub mod terminal;
pub mod variables;

#[cfg(feature = "wasm")]
pub mod wasm;
