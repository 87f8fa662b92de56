//! File I/O operations for settings persistence.

mod load;
mod save;
mod text;

pub use load::{load_settings, load_settings_with};
pub use save::{save_settings, save_settings_with, write_atomic};
pub use text::{decode_text, encode_text};
