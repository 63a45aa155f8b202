//! Subcommand implementations for the `boxscore` binary.

pub mod aggregate_cmd;
pub mod crawl_cmd;
pub mod output;
pub mod teams_cmd;
