//! Configuration loading and schema definitions
//!
//! Settings come from a TOML file (`.dealzsta.toml` and friends) with
//! `DEALZSTA_*` environment overrides on top.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
