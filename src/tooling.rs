//! Tooling
//!
//! Command-line surface over the namespace API.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
