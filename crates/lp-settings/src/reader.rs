//! Settings buffer reader.
//!
//! Decodes buffers produced by [`SettingsWriter`](crate::SettingsWriter),
//! including buffers written against an older, shorter key schema.

use tracing::{debug, trace};

use crate::error::{Result, SettingsError};
use crate::schema::SettingsSchema;
use crate::types::{
    BufferLayout, CodecOptions, KeySource, SettingsMap, SettingsRecord, ValueSource,
};
use crate::wire::{ByteCursor, MARKER_BYTE};

/// Settings buffer reader bound to a schema snapshot.
#[derive(Debug, Clone)]
pub struct SettingsReader<'s> {
    schema: &'s SettingsSchema,
    options: CodecOptions,
}

impl Default for SettingsReader<'static> {
    fn default() -> Self {
        Self::new(SettingsSchema::builtin())
    }
}

impl<'s> SettingsReader<'s> {
    /// Create a reader with default options.
    pub fn new(schema: &'s SettingsSchema) -> Self {
        Self {
            schema,
            options: CodecOptions::default(),
        }
    }

    /// Create a reader with options.
    pub fn with_options(schema: &'s SettingsSchema, options: CodecOptions) -> Self {
        Self { schema, options }
    }

    /// Decode a buffer into settings.
    ///
    /// When the buffer repeats a key, the last record wins.
    ///
    /// # Errors
    ///
    /// Fails on truncated buffers and on key, custom-key or value indices
    /// outside their tables. Nothing is returned unless the whole buffer
    /// decoded.
    pub fn deserialize(&self, data: &[u8]) -> Result<SettingsMap> {
        Ok(self.layout(data)?.into_settings())
    }

    /// Decode a buffer, keeping where every key and value came from.
    pub fn layout(&self, data: &[u8]) -> Result<BufferLayout> {
        let mut cursor = ByteCursor::new(data);

        let custom_count = cursor.read_u16()? as usize;
        let mut custom_keys = Vec::with_capacity(custom_count);
        for _ in 0..custom_count {
            custom_keys.push(cursor.read_text()?);
        }

        let record_count = cursor.read_u16()? as usize;
        let mut records = Vec::with_capacity(record_count);
        for _ in 0..record_count {
            let record = self.read_record(&mut cursor, &custom_keys)?;
            trace!(key = %record.key, source = %record.key_source, "decoded setting");
            records.push(record);
        }

        let consumed = cursor.offset();
        if self.options.strict && cursor.remaining() > 0 {
            return Err(SettingsError::TrailingBytes {
                offset: consumed,
                remaining: cursor.remaining(),
            });
        }

        debug!(
            records = records.len(),
            custom_keys = custom_keys.len(),
            bytes = data.len(),
            "deserialized settings"
        );
        Ok(BufferLayout {
            custom_keys,
            records,
            consumed,
            total_len: data.len(),
        })
    }

    fn read_record(
        &self,
        cursor: &mut ByteCursor<'_>,
        custom_keys: &[String],
    ) -> Result<SettingsRecord> {
        let offset = cursor.offset();

        let (key, key_source) = if cursor.eat_marker(self.schema.marker_width()) {
            let index = cursor.read_u16()?;
            let key = custom_keys.get(index as usize).ok_or(
                SettingsError::InvalidCustomKeyIndex {
                    index,
                    count: custom_keys.len(),
                },
            )?;
            (key.clone(), KeySource::Custom(index))
        } else {
            let index = cursor.read_u16()?;
            let key = self
                .schema
                .key_at(index as usize)
                .ok_or(SettingsError::InvalidKeyIndex { index })?;
            (key.to_string(), KeySource::Schema(index))
        };

        let indicator = cursor.read_u8()?;
        let (value, value_source) = if indicator == MARKER_BYTE {
            (cursor.read_text()?, ValueSource::Literal)
        } else {
            let value = self
                .schema
                .value_at(indicator as usize)
                .ok_or(SettingsError::InvalidValueIndex { index: indicator })?;
            (value.to_string(), ValueSource::Predefined(indicator))
        };

        Ok(SettingsRecord {
            key,
            key_source,
            value,
            value_source,
            offset,
            encoded_len: cursor.offset() - offset,
        })
    }
}

/// Decode a buffer with the built-in schema and default options.
pub fn deserialize(data: &[u8]) -> Result<SettingsMap> {
    SettingsReader::default().deserialize(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_schema() -> SettingsSchema {
        SettingsSchema::new(["a", "b"], ["true", "false"]).unwrap()
    }

    #[test]
    fn test_empty_buffer_fails() {
        let err = deserialize(&[]).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::UnexpectedEof {
                offset: 0,
                needed: 2
            }
        ));
    }

    #[test]
    fn test_empty_settings() {
        let settings = deserialize(&[0x00, 0x00, 0x00, 0x00]).unwrap();
        assert!(settings.is_empty());
    }

    #[test]
    fn test_invalid_key_index() {
        let schema = tiny_schema();
        let err = SettingsReader::new(&schema)
            .deserialize(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x02, 0x00])
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidKeyIndex { index: 2 }));
    }

    #[test]
    fn test_invalid_value_index() {
        let schema = tiny_schema();
        let err = SettingsReader::new(&schema)
            .deserialize(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x02])
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValueIndex { index: 2 }));
    }

    #[test]
    fn test_invalid_custom_key_index() {
        let schema = tiny_schema();
        let err = SettingsReader::new(&schema)
            .deserialize(&[0x00, 0x00, 0x00, 0x01, 0xFF, 0x00, 0x00, 0x00])
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidCustomKeyIndex { index: 0, count: 0 }
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let buffer = [0x00, 0x00, 0x00, 0x00, 0xAB];
        assert!(deserialize(&buffer).unwrap().is_empty());

        let reader =
            SettingsReader::with_options(SettingsSchema::builtin(), CodecOptions::new().strict());
        let err = reader.deserialize(&buffer).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::TrailingBytes {
                offset: 4,
                remaining: 1
            }
        ));
    }

    #[test]
    fn test_duplicate_records_last_wins() {
        let schema = tiny_schema();
        let buffer = [
            0x00, 0x00, 0x00, 0x02, // no custom keys, two records
            0x00, 0x00, 0x00, // a = true
            0x00, 0x00, 0x01, // a = false
        ];
        let settings = SettingsReader::new(&schema).deserialize(&buffer).unwrap();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings.get("a"), Some("false"));
    }

    #[test]
    fn test_layout_offsets() {
        let schema = tiny_schema();
        let buffer = [
            0x00, 0x01, 0x00, 0x01, b'k', // custom keys: ["k"]
            0x00, 0x02, // two records
            0x00, 0x01, 0x00, // b = true
            0xFF, 0x00, 0x00, 0xFF, 0x00, 0x02, b'h', b'i', // k = "hi"
        ];
        let layout = SettingsReader::new(&schema).layout(&buffer).unwrap();
        assert_eq!(layout.custom_keys, vec!["k".to_string()]);
        assert_eq!(layout.records.len(), 2);
        assert_eq!(layout.records[0].offset, 7);
        assert_eq!(layout.records[0].encoded_len, 3);
        assert_eq!(layout.records[0].key_source, KeySource::Schema(1));
        assert_eq!(layout.records[1].offset, 10);
        assert_eq!(layout.records[1].encoded_len, 8);
        assert_eq!(layout.records[1].key_source, KeySource::Custom(0));
        assert_eq!(layout.records[1].value_source, ValueSource::Literal);
        assert_eq!(layout.consumed, buffer.len());
        assert_eq!(layout.predefined_count(), 1);
    }
}
