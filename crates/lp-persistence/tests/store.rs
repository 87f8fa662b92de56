//! Integration tests for settings files and import/export.

use std::fs;

use lp_persistence::{
    ImportMode, PersistenceError, SettingsStore, decode_text, load_settings, save_settings,
};
use lp_settings::{SettingsMap, serialize};
use tempfile::tempdir;

fn plugin_settings() -> SettingsMap {
    let mut settings = SettingsMap::new();
    settings.set_bool("lyrics-plus:visual:playbar-button", false);
    settings.set_bool("lyrics-plus:visual:gradient-background", true);
    settings.set_number("lyrics-plus:visual:background-brightness", 80);
    settings.insert("lyrics-plus:visual:active-color", "var(--spice-text)");
    settings.insert("lyrics-plus:visual:translate:translated-lyrics-source", "geminiKo");
    settings.insert("lyrics-plus:visual:gemini-api-key", "AIza-example-key");
    settings.insert("lyrics-plus:services-order", r#"["spotify","lrclib","local"]"#);
    settings.insert("lyrics-plus:local-lyrics", r#"{"track":"cached"}"#);
    settings
}

#[test]
fn settings_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lyrics-plus.lps");

    save_settings(&plugin_settings(), &path).unwrap();
    let loaded = load_settings(&path).unwrap();

    let mut expected = plugin_settings();
    expected.remove("lyrics-plus:local-lyrics");
    assert_eq!(loaded, expected);
    assert!(!loaded.get_bool("lyrics-plus:visual:playbar-button", true));
    assert_eq!(
        loaded.get_number::<u8>("lyrics-plus:visual:background-brightness"),
        Some(80)
    );
}

#[test]
fn file_bytes_match_codec_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lyrics-plus.lps");

    save_settings(&plugin_settings(), &path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), serialize(&plugin_settings()).unwrap());
}

#[test]
fn exported_text_imports_into_fresh_store() {
    let source = SettingsStore::new(plugin_settings());
    let text = source.export_text().unwrap();
    assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(decode_text(&text).unwrap(), source.export_bytes().unwrap());

    let mut target = SettingsStore::default();
    let report = target.import_text(&text, ImportMode::Replace).unwrap();
    assert_eq!(report.imported, plugin_settings().len() - 1);
    assert_eq!(report.added, report.imported);
    assert!(!target.settings().contains_key("lyrics-plus:local-lyrics"));
}

#[test]
fn corrupt_file_fails_to_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lyrics-plus.lps");
    fs::write(&path, [0x00, 0x00, 0x00, 0x01, 0x03, 0x00, 0x00]).unwrap();

    let err = SettingsStore::open(&path).unwrap_err();
    assert!(matches!(err, PersistenceError::Decode { .. }));
    assert!(err.user_message().contains("lyrics-plus.lps"));
}

#[test]
fn corrupt_import_is_discarded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lyrics-plus.lps");
    save_settings(&plugin_settings(), &path).unwrap();
    let mut store = SettingsStore::open(&path).unwrap();
    let before = store.settings().clone();

    let mut bytes = serialize(&plugin_settings()).unwrap();
    for len in (0..bytes.len()).step_by(7) {
        assert!(store.import_bytes(&bytes[..len], ImportMode::Replace).is_err());
        assert_eq!(store.settings(), &before);
    }

    // Out-of-range value index in the last record.
    let last = bytes.len() - 1;
    bytes[last] = 0xFE;
    let err = store.import_bytes(&bytes, ImportMode::Merge).unwrap_err();
    assert!(err.suggestion().is_some());
    assert_eq!(store.settings(), &before);
}

#[test]
fn persisted_store_keeps_local_lyrics() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lyrics-plus.lps");

    let mut store = SettingsStore::open(&path).unwrap();
    store.settings_mut().extend(plugin_settings());
    store.persist().unwrap();

    let reopened = SettingsStore::open(&path).unwrap();
    assert_eq!(reopened.settings(), &plugin_settings());
    assert_eq!(
        reopened.settings().get("lyrics-plus:local-lyrics"),
        Some(r#"{"track":"cached"}"#)
    );

    // Exports still leave the cache out.
    let exported = lp_settings::deserialize(&reopened.export_bytes().unwrap()).unwrap();
    assert!(!exported.contains_key("lyrics-plus:local-lyrics"));
    assert_eq!(exported.len(), reopened.exported_len());
}

#[test]
fn replace_import_keeps_local_lyrics() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lyrics-plus.lps");
    let mut store = SettingsStore::open(&path).unwrap();
    store
        .settings_mut()
        .insert("lyrics-plus:visual:alignment", "left");
    store
        .settings_mut()
        .insert("lyrics-plus:local-lyrics", r#"{"track":"cached"}"#);
    store.persist().unwrap();

    let mut incoming = SettingsMap::new();
    incoming.insert("lyrics-plus:visual:alignment", "right");
    let text = SettingsStore::new(incoming).export_text().unwrap();

    let mut store = SettingsStore::open(&path).unwrap();
    let report = store.import_text(&text, ImportMode::Replace).unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.changed, 1);
    assert_eq!(report.removed, 0);
    store.persist().unwrap();

    let reopened = SettingsStore::open(&path).unwrap();
    assert_eq!(
        reopened.settings().get("lyrics-plus:visual:alignment"),
        Some("right")
    );
    assert_eq!(
        reopened.settings().get("lyrics-plus:local-lyrics"),
        Some(r#"{"track":"cached"}"#)
    );
}
