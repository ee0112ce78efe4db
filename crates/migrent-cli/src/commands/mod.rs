//! Subcommand implementations for the `migrent` binary.

pub mod check_access;
pub mod config;
pub mod export;
pub mod serve;
