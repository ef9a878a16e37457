//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConvertArgs};
pub use commands::handle_config_action;
pub use enums::OutputFormat;
