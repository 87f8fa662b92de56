//! Error types for settings encoding and decoding.

use thiserror::Error;

/// Errors that can occur when building a schema or converting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Buffer ended before a field could be read.
    #[error("unexpected end of buffer at offset {offset}: needed {needed} more byte(s)")]
    UnexpectedEof { offset: usize, needed: usize },

    /// Known-key index outside the schema.
    #[error("invalid key index: {index}")]
    InvalidKeyIndex { index: u16 },

    /// Custom-key index outside the buffer's custom-key table.
    #[error("invalid custom key index: {index} (table has {count} entries)")]
    InvalidCustomKeyIndex { index: u16, count: usize },

    /// Value byte outside the predefined value table.
    #[error("invalid predefined value index: {index}")]
    InvalidValueIndex { index: u8 },

    /// Bytes left over after the last record (strict mode only).
    #[error("unexpected {remaining} trailing byte(s) at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },

    /// A setting value that is not a string.
    #[error("only string values are supported: '{key}' holds {found}")]
    NonStringValue { key: String, found: &'static str },

    /// Settings document that is not a key/value object.
    #[error("settings must be an object, found {found}")]
    NotAnObject { found: &'static str },

    /// String longer than a length prefix can hold.
    #[error("string length out of bounds: {length} (maximum 65535)")]
    StringTooLong { length: usize },

    /// Too many keys outside the schema.
    #[error("custom key count exceeds 65535: {count}")]
    TooManyCustomKeys { count: usize },

    /// Too many records for the record count field.
    #[error("record count exceeds 65535: {count}")]
    TooManyRecords { count: usize },

    /// Number that does not fit its index field.
    #[error("index out of bounds: {value}")]
    IndexOverflow { value: usize },

    /// UTF-16 code unit above 0xFF under the strict text policy.
    #[error("character U+{unit:04X} at position {position} cannot be stored in one byte")]
    UnencodableCharacter { unit: u16, position: usize },

    /// Key listed twice in a schema.
    #[error("duplicate key in schema: {key}")]
    DuplicateKey { key: String },

    /// Value listed twice in the predefined value table.
    #[error("duplicate predefined value: {value}")]
    DuplicateValue { value: String },

    /// Predefined value table reaches the reserved marker byte.
    #[error("predefined value table has {count} entries (must be fewer than 255)")]
    TooManyValues { count: usize },

    /// Key table larger than the index field supports.
    #[error("schema has {count} keys (maximum 65535)")]
    TooManyKeys { count: usize },

    /// A key index would read back as the custom-key marker.
    #[error("{key_count} keys do not fit a {width}-byte custom key marker")]
    MarkerCollision { key_count: usize, width: usize },

    /// Marker width of zero.
    #[error("custom key marker width must be at least 1, got {width}")]
    InvalidMarkerWidth { width: usize },

    /// Malformed JSON settings document.
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

impl SettingsError {
    /// Create a NonStringValue error.
    pub fn non_string_value(key: impl Into<String>, found: &'static str) -> Self {
        Self::NonStringValue {
            key: key.into(),
            found,
        }
    }

    /// Create a DuplicateKey error.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Create a DuplicateValue error.
    pub fn duplicate_value(value: impl Into<String>) -> Self {
        Self::DuplicateValue {
            value: value.into(),
        }
    }

    /// Whether the error means the buffer itself is damaged or foreign.
    ///
    /// Callers importing user files treat these as "discard and notify".
    pub fn is_corrupt_buffer(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEof { .. }
                | Self::InvalidKeyIndex { .. }
                | Self::InvalidCustomKeyIndex { .. }
                | Self::InvalidValueIndex { .. }
                | Self::TrailingBytes { .. }
        )
    }
}
