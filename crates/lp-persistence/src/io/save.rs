//! Settings saving operations.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use lp_settings::{SettingsMap, SettingsWriter};

use crate::error::{PersistenceError, Result};

/// Save settings to a file with the built-in schema.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a
/// half-written settings file behind.
pub fn save_settings(settings: &SettingsMap, path: &Path) -> Result<()> {
    save_settings_with(&SettingsWriter::default(), settings, path)
}

/// Save settings to a file with a specific writer.
pub fn save_settings_with(
    writer: &SettingsWriter<'_>,
    settings: &SettingsMap,
    path: &Path,
) -> Result<()> {
    let bytes = writer
        .serialize(settings)
        .map_err(|source| PersistenceError::Encode { source })?;
    write_atomic(path, &bytes)?;
    tracing::info!(
        entries = settings.len(),
        bytes = bytes.len(),
        "Saved settings to {}",
        path.display()
    );
    Ok(())
}

/// Write bytes to `path` through a temp file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("lps.tmp");

    // Create parent directory if needed
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let result = write_temp(&temp_path, bytes).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        })
    });
    if result.is_err()
        && temp_path.exists()
        && let Err(e) = fs::remove_file(&temp_path)
    {
        tracing::warn!("Could not remove {}: {e}", temp_path.display());
    }
    result
}

fn write_temp(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.to_path_buf(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.to_path_buf(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.to_path_buf(),
        source: e,
    })
}
