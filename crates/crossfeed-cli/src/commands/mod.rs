//! CLI command implementations.

pub mod info;
pub mod process;
