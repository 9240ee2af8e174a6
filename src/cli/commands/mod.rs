//! Command implementations.

pub mod completions;
pub mod config;
pub mod folders;
pub mod reset;
pub mod status;
pub mod sync;
