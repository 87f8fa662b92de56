//! Decoded buffer layout.

use std::fmt;

use super::SettingsMap;

/// Where a record's key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Position in the known-key schema.
    Schema(u16),
    /// Position in the buffer's own custom-key table.
    Custom(u16),
}

/// How a record's value was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Single-byte index into the predefined value table.
    Predefined(u8),
    /// Length-prefixed literal.
    Literal,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(index) => write!(f, "schema #{index}"),
            Self::Custom(index) => write!(f, "custom #{index}"),
        }
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predefined(index) => write!(f, "predefined #{index}"),
            Self::Literal => write!(f, "literal"),
        }
    }
}

/// A single decoded key/value record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRecord {
    pub key: String,
    pub key_source: KeySource,
    pub value: String,
    pub value_source: ValueSource,
    /// Offset of the record's first byte in the buffer.
    pub offset: usize,
    /// Encoded size of the record in bytes.
    pub encoded_len: usize,
}

/// Full structure of a decoded buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BufferLayout {
    /// The buffer's custom-key table, in table order.
    pub custom_keys: Vec<String>,
    /// Records in buffer order.
    pub records: Vec<SettingsRecord>,
    /// Bytes consumed by the decoder.
    pub consumed: usize,
    /// Total buffer length.
    pub total_len: usize,
}

impl BufferLayout {
    /// Number of records whose value used the one-byte form.
    pub fn predefined_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| matches!(record.value_source, ValueSource::Predefined(_)))
            .count()
    }

    /// Collapse the records into a settings map; later duplicates win.
    pub fn into_settings(self) -> SettingsMap {
        let mut settings = SettingsMap::new();
        for record in self.records {
            settings.insert(record.key, record.value);
        }
        settings
    }
}
