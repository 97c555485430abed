//! CLI subcommand implementations.

pub mod products;
pub mod seed;
