//! Low-level wire primitives.
//!
//! # Buffer Layout
//!
//! | Section       | Field            | Encoding                                |
//! |---------------|------------------|-----------------------------------------|
//! | Custom keys   | count            | u16 BE                                  |
//! |               | key              | u16 BE length + one byte per code unit  |
//! | Records       | count            | u16 BE                                  |
//! |               | known key        | u16 BE schema index                     |
//! |               | custom key       | `0xFF` x marker width + u16 BE index    |
//! |               | predefined value | u8 index (0..=254)                      |
//! |               | literal value    | `0xFF` + u16 BE length + code units     |

use crate::error::{Result, SettingsError};
use crate::types::TextPolicy;

/// Byte used for the custom-key marker run and the literal-value marker.
pub const MARKER_BYTE: u8 = 0xFF;

/// Width in bytes of a known-key index.
pub const KEY_INDEX_WIDTH: usize = 2;

/// Longest string (in UTF-16 code units) a length prefix can describe.
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Most custom keys a single buffer can carry.
pub const MAX_CUSTOM_KEYS: usize = u16::MAX as usize;

/// Most records a single buffer can carry.
pub const MAX_RECORDS: usize = u16::MAX as usize;

/// Largest key table whose indices never read as a two-byte marker.
pub const MAX_KEY_COUNT: usize = u16::MAX as usize;

/// Marker width derived from a key count: `ceil(count / 255)`, at least 1.
pub const fn marker_width_for(key_count: usize) -> usize {
    let width = key_count.div_ceil(255);
    if width == 0 { 1 } else { width }
}

/// Whether a known-key index would be read back as the custom-key marker.
///
/// Only the first `min(width, 2)` bytes of an index come from the index
/// itself; a marker wider than the index can never be matched by one.
pub const fn marker_collides(index: u16, width: usize) -> bool {
    let bytes = index.to_be_bytes();
    if width == 1 {
        bytes[0] == MARKER_BYTE
    } else {
        bytes[0] == MARKER_BYTE && bytes[1] == MARKER_BYTE
    }
}

/// Append a u16 big-endian count, rejecting values that do not fit.
pub(crate) fn put_u16(out: &mut Vec<u8>, value: usize) -> Result<()> {
    let value = u16::try_from(value).map_err(|_| SettingsError::IndexOverflow { value })?;
    out.extend_from_slice(&value.to_be_bytes());
    Ok(())
}

/// Append a length-prefixed string, one byte per UTF-16 code unit.
pub(crate) fn put_text(out: &mut Vec<u8>, text: &str, policy: TextPolicy) -> Result<()> {
    let length = text.encode_utf16().count();
    if length > MAX_STRING_LEN {
        return Err(SettingsError::StringTooLong { length });
    }
    out.reserve(KEY_INDEX_WIDTH + length);
    out.extend_from_slice(&(length as u16).to_be_bytes());

    match policy {
        TextPolicy::Strict => {
            for (position, unit) in text.encode_utf16().enumerate() {
                let byte = u8::try_from(unit)
                    .map_err(|_| SettingsError::UnencodableCharacter { unit, position })?;
                out.push(byte);
            }
        }
        TextPolicy::Truncate => {
            out.extend(text.encode_utf16().map(|unit| (unit & 0xFF) as u8));
        }
    }
    Ok(())
}

/// Bounds-checked cursor over a serialized buffer.
pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(SettingsError::UnexpectedEof {
                offset: self.offset,
                needed: len,
            })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Consume the custom-key marker if the next `width` bytes are all `0xFF`.
    ///
    /// Fewer than `width` remaining bytes never form a marker.
    pub(crate) fn eat_marker(&mut self, width: usize) -> bool {
        let is_marker = self
            .data
            .get(self.offset..self.offset + width)
            .is_some_and(|run| run.iter().all(|&b| b == MARKER_BYTE));
        if is_marker {
            self.offset += width;
        }
        is_marker
    }

    /// Read a length-prefixed string; each byte is one Latin-1 character.
    pub(crate) fn read_text(&mut self) -> Result<String> {
        let length = self.read_u16()? as usize;
        let bytes = self.take(length)?;
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }
}
