//! File-system persistence: the TOML agent configuration and fitted timing
//! models stored as JSON.

pub mod config;
pub mod model_store;
