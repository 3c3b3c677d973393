//! CLI Module Organization
//!
//! - args: CLI argument structures and output formats
//! - commands: command execution and report rendering

pub mod args;
pub mod commands;

// Re-export commonly used items for convenience
pub use args::*;
pub use commands::*;
