//! Settings loading operations.

use std::fs;
use std::path::Path;

use lp_settings::{SettingsMap, SettingsReader};

use crate::error::{PersistenceError, Result};

/// Load settings from a file with the built-in schema.
pub fn load_settings(path: &Path) -> Result<SettingsMap> {
    load_settings_with(&SettingsReader::default(), path)
}

/// Load settings from a file with a specific reader.
pub fn load_settings_with(reader: &SettingsReader<'_>, path: &Path) -> Result<SettingsMap> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    let settings = reader
        .deserialize(&bytes)
        .map_err(|source| PersistenceError::Decode {
            path: Some(path.to_path_buf()),
            source,
        })?;

    tracing::info!(
        entries = settings.len(),
        "Loaded settings from {}",
        path.display()
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save::save_settings;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.lps");

        let mut settings = SettingsMap::new();
        settings.insert("lyrics-plus:visual:font-size", "32");
        settings.insert("lyrics-plus:visual:alignment", "left");
        settings.insert("lyrics-plus:local-lyrics", "{}");
        save_settings(&settings, &path).unwrap();

        let loaded = load_settings(&path).unwrap();
        settings.remove("lyrics-plus:local-lyrics");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_truncated_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.lps");
        fs::write(&path, [0x00, 0x01, 0x00]).unwrap();

        let result = load_settings(&path);
        assert!(matches!(
            result,
            Err(PersistenceError::Decode { path: Some(_), .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_settings(&dir.path().join("missing.lps"));
        assert!(matches!(
            result,
            Err(PersistenceError::Io {
                operation: "read",
                ..
            })
        ));
    }
}
