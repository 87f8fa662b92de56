//! Codec options.

use std::collections::BTreeSet;

use crate::schema::IGNORED_KEYS;

/// How strings with UTF-16 code units above `0xFF` are written.
///
/// The wire format stores one byte per code unit, so only Latin-1 text
/// survives a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextPolicy {
    /// Reject wide code units (default).
    #[default]
    Strict,
    /// Keep the low byte of each code unit. Lossy, but byte-compatible
    /// with buffers exported by the plugin itself.
    Truncate,
}

/// Options for encoding and decoding settings buffers.
#[derive(Debug, Clone)]
pub struct CodecOptions {
    /// Keys excluded from encoding.
    pub ignored_keys: BTreeSet<String>,
    /// Handling of characters that do not fit one byte.
    pub text_policy: TextPolicy,
    /// Reject bytes after the last record when decoding.
    pub strict: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            ignored_keys: IGNORED_KEYS.iter().map(|key| (*key).to_string()).collect(),
            text_policy: TextPolicy::default(),
            strict: false,
        }
    }
}

impl CodecOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable strict decoding.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Set the text policy.
    #[must_use]
    pub fn with_text_policy(mut self, policy: TextPolicy) -> Self {
        self.text_policy = policy;
        self
    }

    /// Add a key to the ignore set.
    #[must_use]
    pub fn ignore_key(mut self, key: impl Into<String>) -> Self {
        self.ignored_keys.insert(key.into());
        self
    }

    /// Replace the ignore set.
    #[must_use]
    pub fn with_ignored_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `key` is excluded from encoding.
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored_keys.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CodecOptions::default();
        assert!(options.is_ignored("lyrics-plus:local-lyrics"));
        assert!(!options.is_ignored("lyrics-plus:lock-mode"));
        assert_eq!(options.text_policy, TextPolicy::Strict);
        assert!(!options.strict);
    }

    #[test]
    fn test_builder() {
        let options = CodecOptions::new()
            .strict()
            .with_text_policy(TextPolicy::Truncate)
            .with_ignored_keys(["a"])
            .ignore_key("b");
        assert!(options.strict);
        assert_eq!(options.text_policy, TextPolicy::Truncate);
        assert!(options.is_ignored("a"));
        assert!(options.is_ignored("b"));
        assert!(!options.is_ignored("lyrics-plus:local-lyrics"));
    }
}
