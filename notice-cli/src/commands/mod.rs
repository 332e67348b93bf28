//! CLI command implementations.

pub mod interactive;
pub mod search;
