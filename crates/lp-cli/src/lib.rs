//! CLI library components for the Lyrics Plus settings tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
