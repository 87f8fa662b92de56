//! Text envelope for sharing settings through the clipboard.

use crate::error::{PersistenceError, Result};

/// Encode a settings buffer as lowercase hex.
pub fn encode_text(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex settings text; surrounding whitespace is ignored.
pub fn decode_text(text: &str) -> Result<Vec<u8>> {
    hex::decode(text.trim()).map_err(|source| PersistenceError::InvalidText { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip() {
        let bytes = [0x00, 0x00, 0x00, 0x01, 0x00, 0x0B, 0x0F];
        let text = encode_text(&bytes);
        assert_eq!(text, "00000001000b0f");
        assert_eq!(decode_text(&format!("  {text}\n")).unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_text("not hex"),
            Err(PersistenceError::InvalidText { .. })
        ));
        assert!(matches!(
            decode_text("abc"),
            Err(PersistenceError::InvalidText { .. })
        ));
    }
}
