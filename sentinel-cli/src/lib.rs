//! # sentinel-cli
//!
//! Argument parsing, environment config and command handlers for the `sentinel` binary.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands};
pub use commands::{build_service, run};
pub use config::SentinelConfig;
