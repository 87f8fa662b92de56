//! Lyrics Plus settings codec.
//!
//! This crate converts the plugin's key/value configuration to and from the
//! compact binary buffer used for settings export and import.
//!
//! # Features
//!
//! - Append-only key schema: known keys are stored as a 2-byte index
//! - Predefined value table: common values are stored as a single byte
//! - Escape paths for unknown keys (per-buffer custom-key table) and
//!   arbitrary values (length-prefixed literals)
//! - Buffers written against an older schema decode with a newer one
//!
//! # Example
//!
//! ```
//! use lp_settings::{SettingsMap, deserialize, serialize};
//!
//! let mut settings = SettingsMap::new();
//! settings.insert("lyrics-plus:visual:alignment", "center");
//! settings.insert("lyrics-plus:visual:background-color", "#101820");
//! settings.insert("my-theme:accent", "teal");
//!
//! let bytes = serialize(&settings).unwrap();
//! let decoded = deserialize(&bytes).unwrap();
//! assert_eq!(decoded, settings);
//! ```
//!
//! # Custom Schemas
//!
//! ```
//! use lp_settings::{SettingsMap, SettingsReader, SettingsSchema, SettingsWriter};
//!
//! let old = SettingsSchema::new(["a", "b"], ["true", "false"]).unwrap();
//! let settings: SettingsMap = [("a", "true"), ("zzz", "custom-value-1")]
//!     .into_iter()
//!     .collect();
//! let bytes = SettingsWriter::new(&old).serialize(&settings).unwrap();
//!
//! // Appending keys never changes existing positions.
//! let new = old.extended(["c"]).unwrap();
//! let decoded = SettingsReader::new(&new).deserialize(&bytes).unwrap();
//! assert_eq!(decoded, settings);
//! ```

mod error;
mod reader;
pub mod schema;
mod types;
pub mod wire;
mod writer;

// Re-export error types
pub use error::{Result, SettingsError};

// Re-export schema
pub use schema::{IGNORED_KEYS, KNOWN_KEYS, PREDEFINED_VALUES, SettingsSchema};

// Re-export core types
pub use types::{
    BufferLayout, CodecOptions, KeySource, SettingsMap, SettingsRecord, TextPolicy, ValueSource,
};

// Re-export reader functionality
pub use reader::{SettingsReader, deserialize};

// Re-export writer functionality
pub use writer::{SettingsWriter, serialize, serialize_json};
