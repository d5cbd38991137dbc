//! CLI command definitions and handlers
//!
//! This module organizes the CLI into logical submodules:
//! - [`commands`] - Command and argument definitions
//! - [`handlers`] - Configuration loading and rendering per command

mod commands;
mod handlers;

pub use commands::*;
pub use handlers::*;
