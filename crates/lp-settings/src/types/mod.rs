//! Core types for settings handling.
//!
//! This module provides the settings map, codec options, and the record
//! view produced when a buffer is inspected.

mod map;
mod options;
mod record;

pub use map::SettingsMap;
pub use options::{CodecOptions, TextPolicy};
pub use record::{BufferLayout, KeySource, SettingsRecord, ValueSource};
