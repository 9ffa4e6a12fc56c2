//! Configuration module for the jetpalette CLI
//!
//! Provides types and loading for `jetpalette.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
