//! Known setting keys and interned values.
//!
//! Both tables are append-only contracts: the position of an entry is its
//! identifier on the wire. Never reorder or delete entries, only append.
//! Reordering silently remaps every previously exported buffer.
//!
//! | Table               | ID width                    | Reserved           |
//! |---------------------|-----------------------------|--------------------|
//! | `KNOWN_KEYS`        | 2 bytes, big-endian         | `0xFF` marker run  |
//! | `PREDEFINED_VALUES` | 1 byte                      | `0xFF`             |

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Result, SettingsError};
use crate::wire::{MARKER_BYTE, MAX_KEY_COUNT, marker_collides, marker_width_for};

/// Setting keys understood by the plugin, in wire order.
pub const KNOWN_KEYS: &[&str] = &[
    "lyrics-plus:visual:playbar-button",
    "lyrics-plus:visual:colorful",
    "lyrics-plus:visual:gradient-background",
    "lyrics-plus:visual:background-brightness",
    "lyrics-plus:visual:solid-background",
    "lyrics-plus:visual:solid-background-color",
    "lyrics-plus:visual:noise",
    "lyrics-plus:visual:background-color",
    "lyrics-plus:visual:active-color",
    "lyrics-plus:visual:inactive-color",
    "lyrics-plus:visual:highlight-color",
    "lyrics-plus:visual:alignment",
    "lyrics-plus:visual:lines-before",
    "lyrics-plus:visual:lines-after",
    "lyrics-plus:visual:font-size",
    "lyrics-plus:visual:font-family",
    "lyrics-plus:visual:original-font-family",
    "lyrics-plus:visual:phonetic-font-family",
    "lyrics-plus:visual:translation-font-family",
    "lyrics-plus:visual:original-font-weight",
    "lyrics-plus:visual:original-font-size",
    "lyrics-plus:visual:translation-font-weight",
    "lyrics-plus:visual:translation-font-size",
    "lyrics-plus:visual:translation-spacing",
    "lyrics-plus:visual:phonetic-font-weight",
    "lyrics-plus:visual:phonetic-font-size",
    "lyrics-plus:visual:phonetic-opacity",
    "lyrics-plus:visual:phonetic-spacing",
    "lyrics-plus:visual:furigana-font-weight",
    "lyrics-plus:visual:furigana-font-size",
    "lyrics-plus:visual:furigana-opacity",
    "lyrics-plus:visual:furigana-spacing",
    "lyrics-plus:visual:text-shadow-enabled",
    "lyrics-plus:visual:text-shadow-color",
    "lyrics-plus:visual:text-shadow-opacity",
    "lyrics-plus:visual:text-shadow-blur",
    "lyrics-plus:visual:original-opacity",
    "lyrics-plus:visual:translation-opacity",
    "lyrics-plus:visual:translate:translated-lyrics-source",
    "lyrics-plus:visual:translate:display-mode",
    "lyrics-plus:visual:translate:detect-language-override",
    "lyrics-plus:visual:translation-mode:english",
    "lyrics-plus:visual:translation-mode:japanese",
    "lyrics-plus:visual:translation-mode:korean",
    "lyrics-plus:visual:translation-mode:chinese",
    "lyrics-plus:visual:translation-mode:russian",
    "lyrics-plus:visual:translation-mode:vietnamese",
    "lyrics-plus:visual:translation-mode:german",
    "lyrics-plus:visual:translation-mode:spanish",
    "lyrics-plus:visual:translation-mode:french",
    "lyrics-plus:visual:translation-mode:italian",
    "lyrics-plus:visual:translation-mode:portuguese",
    "lyrics-plus:visual:translation-mode:dutch",
    "lyrics-plus:visual:translation-mode:polish",
    "lyrics-plus:visual:translation-mode:turkish",
    "lyrics-plus:visual:translation-mode:arabic",
    "lyrics-plus:visual:translation-mode:hindi",
    "lyrics-plus:visual:translation-mode:thai",
    "lyrics-plus:visual:translation-mode:indonesian",
    "lyrics-plus:visual:translation-mode:gemini",
    "lyrics-plus:visual:translation-mode-2:english",
    "lyrics-plus:visual:translation-mode-2:japanese",
    "lyrics-plus:visual:translation-mode-2:korean",
    "lyrics-plus:visual:translation-mode-2:chinese",
    "lyrics-plus:visual:translation-mode-2:russian",
    "lyrics-plus:visual:translation-mode-2:vietnamese",
    "lyrics-plus:visual:translation-mode-2:german",
    "lyrics-plus:visual:translation-mode-2:spanish",
    "lyrics-plus:visual:translation-mode-2:french",
    "lyrics-plus:visual:translation-mode-2:italian",
    "lyrics-plus:visual:translation-mode-2:portuguese",
    "lyrics-plus:visual:translation-mode-2:dutch",
    "lyrics-plus:visual:translation-mode-2:polish",
    "lyrics-plus:visual:translation-mode-2:turkish",
    "lyrics-plus:visual:translation-mode-2:arabic",
    "lyrics-plus:visual:translation-mode-2:hindi",
    "lyrics-plus:visual:translation-mode-2:thai",
    "lyrics-plus:visual:translation-mode-2:indonesian",
    "lyrics-plus:visual:translation-mode-2:gemini",
    "lyrics-plus:visual:gemini-api-key",
    "lyrics-plus:visual:gemini-api-key-romaji",
    "lyrics-plus:visual:translate",
    "lyrics-plus:visual:furigana-enabled",
    "lyrics-plus:visual:ja-detect-threshold",
    "lyrics-plus:visual:hans-detect-threshold",
    "lyrics-plus:visual:fade-blur",
    "lyrics-plus:visual:karaoke-bounce",
    "lyrics-plus:visual:karaoke-mode-enabled",
    "lyrics-plus:visual:fullscreen-key",
    "lyrics-plus:visual:synced-compact",
    "lyrics-plus:visual:global-delay",
    "lyrics-plus:provider:lrclib:on",
    "lyrics-plus:provider:ivlyrics:on",
    "lyrics-plus:provider:spotify:on",
    "lyrics-plus:provider:local:on",
    "lyrics-plus:services-order",
    "lyrics-plus:lock-mode",
    "lyrics-plus:local-lyrics",
    "lyrics-plus:track-sync-offsets",
    "lyrics-plus:visual:video-background",
    "lyrics-plus:visual:video-blur",
    "lyrics-plus:visual:fullscreen-two-column",
    "lyrics-plus:visual:fullscreen-show-album",
    "lyrics-plus:visual:fullscreen-show-info",
    "lyrics-plus:visual:fullscreen-center-when-no-lyrics",
    "lyrics-plus:visual:fullscreen-album-size",
    "lyrics-plus:visual:fullscreen-album-radius",
    "lyrics-plus:visual:fullscreen-title-size",
    "lyrics-plus:visual:fullscreen-artist-size",
    "lyrics-plus:visual:fullscreen-lyrics-right-padding",
    "lyrics-plus:visual:fullscreen-show-clock",
    "lyrics-plus:visual:fullscreen-clock-size",
    "lyrics-plus:visual:fullscreen-show-context",
    "lyrics-plus:visual:fullscreen-show-next-track",
    "lyrics-plus:visual:fullscreen-next-track-seconds",
    "lyrics-plus:visual:fullscreen-show-controls",
    "lyrics-plus:visual:fullscreen-show-volume",
    "lyrics-plus:visual:fullscreen-show-progress",
    "lyrics-plus:visual:fullscreen-show-lyrics-progress",
    "lyrics-plus:visual:fullscreen-control-button-size",
    "lyrics-plus:visual:fullscreen-controls-background",
    "lyrics-plus:visual:fullscreen-auto-hide-ui",
    "lyrics-plus:visual:fullscreen-auto-hide-delay",
    "lyrics-plus:visual:video-cover",
    "lyrics-plus:visual:prefetch-enabled",
    "lyrics-plus:visual:prefetch-video-enabled",
    "lyrics-plus:visual:fullscreen-layout-reverse",
    "lyrics-plus:visual:language",
];

/// Common values stored as a single byte.
pub const PREDEFINED_VALUES: &[&str] = &[
    // Booleans
    "true",
    "false",

    // Translation sources
    "geminiKo",
    "gemini_ko",
    "geminiJa",
    "gemini_ja",
    "geminiZh",
    "gemini_zh",
    "geminiEn",
    "gemini_en",
    "geminiRomaji",
    "gemini_romaji",

    // Alignment and display position
    "below",
    "above",
    "auto",
    "center",
    "left",
    "right",

    // Font weights
    "100",
    "200",
    "300",
    "400",
    "500",
    "600",
    "700",
    "800",
    "900",

    // Font families
    "Pretendard Variable",
    "Noto Sans KR",
    "Nanum Gothic",
    "Nanum Myeongjo",
    "Black Han Sans",
    "Do Hyeon",
    "Jua",
    "Nanum Gothic Coding",
    "Gowun Batang",
    "Gowun Dodum",
    "IBM Plex Sans KR",
    "Roboto",
    "Open Sans",
    "Lato",
    "Montserrat",
    "Poppins",
    "Inter",
    "Raleway",
    "Oswald",
    "Merriweather",
    "Playfair Display",
];

/// Keys never written to a buffer (large locally cached blobs).
pub const IGNORED_KEYS: &[&str] = &["lyrics-plus:local-lyrics"];

/// Custom-key marker width of the built-in schema.
///
/// Buffers in the wild use a one-byte marker, so `KNOWN_KEYS` must stay at
/// 255 entries or fewer.
pub const BUILTIN_MARKER_WIDTH: usize = 1;

const _: () = assert!(PREDEFINED_VALUES.len() < MARKER_BYTE as usize);
const _: () = assert!(KNOWN_KEYS.len().div_ceil(255) == BUILTIN_MARKER_WIDTH);

static BUILTIN: LazyLock<SettingsSchema> = LazyLock::new(|| SettingsSchema {
    keys: KNOWN_KEYS.iter().map(|key| Cow::Borrowed(*key)).collect(),
    values: PREDEFINED_VALUES.iter().map(|value| Cow::Borrowed(*value)).collect(),
    key_lookup: KNOWN_KEYS
        .iter()
        .enumerate()
        .map(|(index, key)| (Cow::Borrowed(*key), index as u16))
        .collect(),
    value_lookup: PREDEFINED_VALUES
        .iter()
        .enumerate()
        .map(|(index, value)| (Cow::Borrowed(*value), index as u8))
        .collect(),
    marker_width: BUILTIN_MARKER_WIDTH,
});

/// An immutable snapshot of the key schema and the predefined value table.
///
/// Lookups are exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct SettingsSchema {
    keys: Vec<Cow<'static, str>>,
    values: Vec<Cow<'static, str>>,
    key_lookup: HashMap<Cow<'static, str>, u16>,
    value_lookup: HashMap<Cow<'static, str>, u8>,
    marker_width: usize,
}

impl SettingsSchema {
    /// The schema shipped with the plugin.
    pub fn builtin() -> &'static SettingsSchema {
        &BUILTIN
    }

    /// Build a schema from ordered key and value tables.
    ///
    /// The custom-key marker width is derived from the key count
    /// (`ceil(keys / 255)`, at least one byte).
    ///
    /// # Errors
    ///
    /// Fails on duplicate entries, on 255 or more values, or on a key count
    /// whose indices could be mistaken for the custom-key marker.
    pub fn new<K, V>(keys: K, values: V) -> Result<Self>
    where
        K: IntoIterator,
        K::Item: Into<Cow<'static, str>>,
        V: IntoIterator,
        V::Item: Into<Cow<'static, str>>,
    {
        let keys: Vec<Cow<'static, str>> = keys.into_iter().map(Into::into).collect();
        let values: Vec<Cow<'static, str>> = values.into_iter().map(Into::into).collect();
        let marker_width = marker_width_for(keys.len());
        Self::from_tables(keys, values, marker_width)
    }

    /// Pin the custom-key marker width.
    ///
    /// Readers must use the width that was in effect when a buffer was
    /// written; pinning keeps it stable while the key table grows.
    ///
    /// # Errors
    ///
    /// Fails when `width` is zero or when a key index would collide with the
    /// marker at that width.
    pub fn with_marker_width(self, width: usize) -> Result<Self> {
        Self::from_tables(self.keys, self.values, width)
    }

    /// Append keys to the end of the key table.
    ///
    /// The marker width of `self` is kept, so buffers written against `self`
    /// stay readable with the extended schema.
    ///
    /// # Errors
    ///
    /// Fails when an appended key duplicates an existing one or the grown
    /// table no longer fits the marker width.
    pub fn extended<I>(&self, extra_keys: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Cow<'static, str>>,
    {
        let mut keys = self.keys.clone();
        keys.extend(extra_keys.into_iter().map(Into::into));
        Self::from_tables(keys, self.values.clone(), self.marker_width)
    }

    fn from_tables(
        keys: Vec<Cow<'static, str>>,
        values: Vec<Cow<'static, str>>,
        marker_width: usize,
    ) -> Result<Self> {
        if marker_width == 0 {
            return Err(SettingsError::InvalidMarkerWidth { width: marker_width });
        }
        if keys.len() > MAX_KEY_COUNT {
            return Err(SettingsError::TooManyKeys { count: keys.len() });
        }
        if values.len() >= MARKER_BYTE as usize {
            return Err(SettingsError::TooManyValues {
                count: values.len(),
            });
        }
        // Indices grow monotonically, so checking the last one is enough.
        if let Some(last) = keys.len().checked_sub(1)
            && marker_collides(last as u16, marker_width)
        {
            return Err(SettingsError::MarkerCollision {
                key_count: keys.len(),
                width: marker_width,
            });
        }

        let mut key_lookup = HashMap::with_capacity(keys.len());
        for (index, key) in keys.iter().enumerate() {
            if key_lookup.insert(key.clone(), index as u16).is_some() {
                return Err(SettingsError::duplicate_key(key.as_ref()));
            }
        }

        let mut value_lookup = HashMap::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            if value_lookup.insert(value.clone(), index as u8).is_some() {
                return Err(SettingsError::duplicate_value(value.as_ref()));
            }
        }

        Ok(Self {
            keys,
            values,
            key_lookup,
            value_lookup,
            marker_width,
        })
    }

    /// Wire index of a known key.
    pub fn key_index(&self, key: &str) -> Option<u16> {
        self.key_lookup.get(key).copied()
    }

    /// Key stored at a wire index.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(AsRef::as_ref)
    }

    /// Whether `key` is part of the schema.
    pub fn is_known_key(&self, key: &str) -> bool {
        self.key_lookup.contains_key(key)
    }

    /// Single-byte index of a predefined value.
    pub fn value_index(&self, value: &str) -> Option<u8> {
        self.value_lookup.get(value).copied()
    }

    /// Predefined value stored at an index.
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(AsRef::as_ref)
    }

    /// Number of `0xFF` bytes that mark a custom key.
    pub fn marker_width(&self) -> usize {
        self.marker_width
    }

    /// Number of known keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of predefined values.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Known keys in wire order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(AsRef::as_ref)
    }

    /// Predefined values in wire order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(AsRef::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_valid() {
        let schema =
            SettingsSchema::new(KNOWN_KEYS.iter().copied(), PREDEFINED_VALUES.iter().copied())
                .unwrap();
        assert_eq!(schema.key_count(), 128);
        assert_eq!(schema.value_count(), 48);
        assert_eq!(schema.marker_width(), BUILTIN_MARKER_WIDTH);
    }

    #[test]
    fn test_builtin_positions_are_stable() {
        let schema = SettingsSchema::builtin();
        assert_eq!(schema.key_index("lyrics-plus:visual:playbar-button"), Some(0));
        assert_eq!(schema.key_index("lyrics-plus:visual:alignment"), Some(11));
        assert_eq!(schema.key_index("lyrics-plus:local-lyrics"), Some(97));
        assert_eq!(schema.key_index("lyrics-plus:visual:language"), Some(127));
        assert_eq!(schema.value_index("true"), Some(0));
        assert_eq!(schema.value_index("false"), Some(1));
        assert_eq!(schema.value_index("center"), Some(15));
        assert_eq!(schema.value_index("Playfair Display"), Some(47));
    }

    #[test]
    fn test_lookups_are_case_sensitive() {
        let schema = SettingsSchema::builtin();
        assert_eq!(schema.value_index("True"), None);
        assert_eq!(schema.value_index("true "), None);
        assert!(!schema.is_known_key("LYRICS-PLUS:LOCK-MODE"));
    }

    #[test]
    fn test_derived_marker_width() {
        let keys: Vec<String> = (0..256).map(|i| format!("k{i}")).collect();
        let schema = SettingsSchema::new(keys, ["x"]).unwrap();
        assert_eq!(schema.marker_width(), 2);

        let empty = SettingsSchema::new(Vec::<String>::new(), Vec::<String>::new()).unwrap();
        assert_eq!(empty.marker_width(), 1);
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = SettingsSchema::new(["a", "b", "a"], ["true"]).unwrap_err();
        assert!(matches!(err, SettingsError::DuplicateKey { .. }));

        let err = SettingsSchema::new(["a"], ["true", "true"]).unwrap_err();
        assert!(matches!(err, SettingsError::DuplicateValue { .. }));
    }

    #[test]
    fn test_rejects_too_many_values() {
        let values: Vec<String> = (0..255).map(|i| format!("v{i}")).collect();
        let err = SettingsSchema::new(["a"], values).unwrap_err();
        assert!(matches!(err, SettingsError::TooManyValues { count: 255 }));

        let values: Vec<String> = (0..254).map(|i| format!("v{i}")).collect();
        assert!(SettingsSchema::new(["a"], values).is_ok());
    }

    #[test]
    fn test_pinned_width_rejects_collision() {
        // With a one-byte marker, index 0xFF00 starts with 0xFF.
        let keys: Vec<String> = (0..0xFF01).map(|i| format!("k{i}")).collect();
        let schema = SettingsSchema::new(keys, ["x"]).unwrap();
        let err = schema.with_marker_width(1).unwrap_err();
        assert!(matches!(err, SettingsError::MarkerCollision { width: 1, .. }));
    }

    #[test]
    fn test_extended_keeps_positions_and_width() {
        let base = SettingsSchema::new(["a", "b"], ["true", "false"]).unwrap();
        let grown = base.extended(["c", "d"]).unwrap();
        assert_eq!(grown.key_index("a"), Some(0));
        assert_eq!(grown.key_index("b"), Some(1));
        assert_eq!(grown.key_index("d"), Some(3));
        assert_eq!(grown.marker_width(), base.marker_width());

        let err = base.extended(["a"]).unwrap_err();
        assert!(matches!(err, SettingsError::DuplicateKey { .. }));
    }
}
