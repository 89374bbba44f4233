//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands, WalkArgs};
pub use output::{format_lines, format_merge_report, format_paths};
