//! Persistent storage for Lyrics Plus settings.
//!
//! This crate is the load/persist boundary around the settings codec:
//! settings files, settings export/import, and the text form used to share
//! settings through the clipboard.
//!
//! # Features
//!
//! - **Atomic writes** to prevent half-written settings files
//! - **All-or-nothing imports**: a damaged export never partially applies
//! - **Text envelope**: hex text for copy and paste
//!
//! # File Format
//!
//! A settings file is exactly one encoded settings buffer (see
//! `lp_settings::wire`); there is no extra header.
//!
//! # Example
//!
//! ```ignore
//! use lp_persistence::{ImportMode, SettingsStore};
//!
//! let mut store = SettingsStore::open("settings.lps")?;
//! store.settings_mut().insert("lyrics-plus:visual:alignment", "left");
//! store.persist()?;
//!
//! let shared = store.export_text()?;
//! let mut other = SettingsStore::default();
//! other.import_text(&shared, ImportMode::Replace)?;
//! ```

mod error;
mod io;
mod store;

pub use error::{PersistenceError, Result};
pub use io::{
    decode_text, encode_text, load_settings, load_settings_with, save_settings,
    save_settings_with, write_atomic,
};
pub use store::{ImportMode, ImportReport, SettingsStore};
