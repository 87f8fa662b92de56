//! Settings buffer writer.
//!
//! Encodes a [`SettingsMap`] into the compact binary form used for
//! settings export.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Result, SettingsError};
use crate::schema::SettingsSchema;
use crate::types::{CodecOptions, SettingsMap};
use crate::wire::{MARKER_BYTE, MAX_CUSTOM_KEYS, MAX_RECORDS, put_text, put_u16};

/// Settings buffer writer bound to a schema snapshot.
#[derive(Debug, Clone)]
pub struct SettingsWriter<'s> {
    schema: &'s SettingsSchema,
    options: CodecOptions,
}

impl Default for SettingsWriter<'static> {
    fn default() -> Self {
        Self::new(SettingsSchema::builtin())
    }
}

impl<'s> SettingsWriter<'s> {
    /// Create a writer with default options.
    pub fn new(schema: &'s SettingsSchema) -> Self {
        Self {
            schema,
            options: CodecOptions::default(),
        }
    }

    /// Create a writer with options.
    pub fn with_options(schema: &'s SettingsSchema, options: CodecOptions) -> Self {
        Self { schema, options }
    }

    /// Encode settings into a byte buffer.
    ///
    /// Ignored keys are skipped. Keys outside the schema go into the
    /// buffer's custom-key table; values outside the predefined table are
    /// written as literals.
    ///
    /// # Errors
    ///
    /// Fails when a count or string exceeds 65535, or when a value holds a
    /// character the text policy cannot store.
    pub fn serialize(&self, settings: &SettingsMap) -> Result<Vec<u8>> {
        let entries: Vec<(&str, &str)> = settings
            .iter()
            .filter(|(key, _)| !self.options.is_ignored(key))
            .collect();

        let mut custom_keys: Vec<&str> = Vec::new();
        let mut custom_index: HashMap<&str, usize> = HashMap::new();
        for &(key, _) in &entries {
            if !self.schema.is_known_key(key) {
                custom_index.insert(key, custom_keys.len());
                custom_keys.push(key);
            }
        }

        if custom_keys.len() > MAX_CUSTOM_KEYS {
            return Err(SettingsError::TooManyCustomKeys {
                count: custom_keys.len(),
            });
        }
        if entries.len() > MAX_RECORDS {
            return Err(SettingsError::TooManyRecords {
                count: entries.len(),
            });
        }

        let mut out = Vec::new();

        put_u16(&mut out, custom_keys.len())?;
        for key in &custom_keys {
            put_text(&mut out, key, self.options.text_policy)?;
        }

        put_u16(&mut out, entries.len())?;
        for &(key, value) in &entries {
            match self.schema.key_index(key) {
                Some(index) => {
                    out.extend_from_slice(&index.to_be_bytes());
                }
                None => {
                    let index = custom_index[key];
                    out.extend(std::iter::repeat_n(MARKER_BYTE, self.schema.marker_width()));
                    put_u16(&mut out, index)?;
                }
            }

            match self.schema.value_index(value) {
                Some(index) => out.push(index),
                None => {
                    out.push(MARKER_BYTE);
                    put_text(&mut out, value, self.options.text_policy)?;
                }
            }
            trace!(key = %key, "encoded setting");
        }

        debug!(
            records = entries.len(),
            custom_keys = custom_keys.len(),
            skipped = settings.len() - entries.len(),
            bytes = out.len(),
            "serialized settings"
        );
        Ok(out)
    }

    /// Encode a JSON settings object.
    ///
    /// # Errors
    ///
    /// Fails when `value` is not an object or holds a non-string value, in
    /// addition to the errors of [`SettingsWriter::serialize`].
    pub fn serialize_json(&self, value: &Value) -> Result<Vec<u8>> {
        let settings = SettingsMap::try_from(value)?;
        self.serialize(&settings)
    }
}

/// Encode settings with the built-in schema and default options.
pub fn serialize(settings: &SettingsMap) -> Result<Vec<u8>> {
    SettingsWriter::default().serialize(settings)
}

/// Encode a JSON settings object with the built-in schema.
pub fn serialize_json(value: &Value) -> Result<Vec<u8>> {
    SettingsWriter::default().serialize_json(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextPolicy;

    fn tiny_schema() -> SettingsSchema {
        SettingsSchema::new(["a", "b"], ["true", "false"]).unwrap()
    }

    #[test]
    fn test_empty_settings() {
        let bytes = serialize(&SettingsMap::new()).unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_known_key_predefined_value() {
        let schema = tiny_schema();
        let settings: SettingsMap = [("b", "false")].into_iter().collect();
        let bytes = SettingsWriter::new(&schema).serialize(&settings).unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x01]);
    }

    #[test]
    fn test_custom_key_and_literal() {
        let schema = tiny_schema();
        let settings: SettingsMap = [("zzz", "x")].into_iter().collect();
        let bytes = SettingsWriter::new(&schema).serialize(&settings).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x00, 0x01, 0x00, 0x03, b'z', b'z', b'z', // custom keys
                0x00, 0x01, // record count
                0xFF, 0x00, 0x00, // custom key #0
                0xFF, 0x00, 0x01, b'x', // literal value
            ]
        );
    }

    #[test]
    fn test_ignored_keys_are_skipped() {
        let mut settings = SettingsMap::new();
        settings.insert("lyrics-plus:local-lyrics", "{\"huge\":\"blob\"}");
        settings.insert("lyrics-plus:lock-mode", "true");
        let bytes = serialize(&settings).unwrap();
        // No custom keys, one record.
        assert_eq!(&bytes[..4], &[0x00, 0x00, 0x00, 0x01]);
        assert_eq!(bytes.len(), 4 + 2 + 1);
    }

    #[test]
    fn test_custom_ignore_set() {
        let schema = tiny_schema();
        let options = CodecOptions::new().with_ignored_keys(["a"]);
        let settings: SettingsMap = [("a", "true"), ("b", "true")].into_iter().collect();
        let bytes = SettingsWriter::with_options(&schema, options)
            .serialize(&settings)
            .unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_serialize_json_rejects_non_string() {
        let err = serialize_json(&serde_json::json!({
            "lyrics-plus:visual:font-size": 32,
        }))
        .unwrap_err();
        assert!(matches!(err, SettingsError::NonStringValue { .. }));
    }

    #[test]
    fn test_strict_text_rejects_wide_characters() {
        let settings: SettingsMap = [("lyrics-plus:visual:font-family", "나눔고딕")]
            .into_iter()
            .collect();
        let err = serialize(&settings).unwrap_err();
        assert!(matches!(err, SettingsError::UnencodableCharacter { .. }));

        let options = CodecOptions::new().with_text_policy(TextPolicy::Truncate);
        let bytes = SettingsWriter::with_options(SettingsSchema::builtin(), options)
            .serialize(&settings)
            .unwrap();
        // Four code units written as four bytes.
        assert_eq!(bytes.len(), 4 + 2 + 1 + 2 + 4);
    }
}
