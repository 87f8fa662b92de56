//! The in-memory settings object and its load/persist boundary.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lp_settings::{CodecOptions, SettingsMap, SettingsReader, SettingsSchema, SettingsWriter};

use crate::error::{PersistenceError, Result};
use crate::io::{decode_text, encode_text, load_settings_with, save_settings_with};

/// How imported settings are applied to the current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Imported settings replace the current map entirely.
    #[default]
    Replace,
    /// Imported entries overwrite matching keys; others are kept.
    Merge,
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Entries decoded from the buffer.
    pub imported: usize,
    /// Imported entries whose key did not exist before.
    pub added: usize,
    /// Imported entries that changed an existing value.
    pub changed: usize,
    /// Previous entries dropped by a replace.
    pub removed: usize,
}

/// Plugin settings together with where they are persisted.
///
/// All mutation through imports is all-or-nothing: a buffer is decoded in
/// full before the current settings are touched.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: SettingsMap,
    path: Option<PathBuf>,
    schema: &'static SettingsSchema,
    options: CodecOptions,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(SettingsMap::new())
    }
}

impl SettingsStore {
    /// In-memory store with no backing file.
    pub fn new(settings: SettingsMap) -> Self {
        Self {
            settings,
            path: None,
            schema: SettingsSchema::builtin(),
            options: CodecOptions::default(),
        }
    }

    /// Open a store backed by `path`; a missing file means empty settings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_options(path, CodecOptions::default())
    }

    /// Open a store with codec options.
    pub fn open_with_options(path: impl Into<PathBuf>, options: CodecOptions) -> Result<Self> {
        let path = path.into();
        let schema = SettingsSchema::builtin();
        let reader = SettingsReader::with_options(schema, storage_options(&options));
        let settings = match load_settings_with(&reader, &path) {
            Ok(settings) => settings,
            Err(PersistenceError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::debug!("No settings file at {}, starting empty", path.display());
                SettingsMap::new()
            }
            Err(err) => return Err(err),
        };
        Ok(Self {
            settings,
            path: Some(path),
            schema,
            options,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn settings(&self) -> &SettingsMap {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsMap {
        &mut self.settings
    }

    pub fn into_settings(self) -> SettingsMap {
        self.settings
    }

    /// Write the current settings to the backing file.
    ///
    /// Unlike an export, the file keeps every entry, ignored keys included.
    pub fn persist(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or(PersistenceError::NoBackingFile)?;
        let writer = SettingsWriter::with_options(self.schema, storage_options(&self.options));
        save_settings_with(&writer, &self.settings, path)
    }

    /// Number of entries an export carries.
    pub fn exported_len(&self) -> usize {
        self.settings
            .keys()
            .filter(|key| !self.options.is_ignored(key))
            .count()
    }

    /// Encode the current settings for export; ignored keys are left out.
    pub fn export_bytes(&self) -> Result<Vec<u8>> {
        self.writer()
            .serialize(&self.settings)
            .map_err(|source| PersistenceError::Encode { source })
    }

    /// Encode the current settings as shareable text.
    pub fn export_text(&self) -> Result<String> {
        Ok(encode_text(&self.export_bytes()?))
    }

    /// Apply an exported buffer.
    ///
    /// Exports never carry ignored keys, so a replace keeps the current
    /// entries for them. On error the current settings are left untouched.
    pub fn import_bytes(&mut self, bytes: &[u8], mode: ImportMode) -> Result<ImportReport> {
        let imported = self
            .reader()
            .deserialize(bytes)
            .map_err(|source| PersistenceError::Decode { path: None, source })?;

        let mut report = ImportReport {
            imported: imported.len(),
            added: 0,
            changed: 0,
            removed: 0,
        };
        for (key, value) in imported.iter() {
            match self.settings.get(key) {
                None => report.added += 1,
                Some(current) if current != value => report.changed += 1,
                Some(_) => {}
            }
        }

        match mode {
            ImportMode::Replace => {
                let mut replaced = imported;
                for (key, value) in self.settings.iter() {
                    if replaced.contains_key(key) {
                        continue;
                    }
                    if self.options.is_ignored(key) {
                        replaced.insert(key, value);
                    } else {
                        report.removed += 1;
                    }
                }
                self.settings = replaced;
            }
            ImportMode::Merge => self.settings.merge(imported),
        }

        tracing::info!(
            imported = report.imported,
            added = report.added,
            changed = report.changed,
            removed = report.removed,
            "Imported settings"
        );
        Ok(report)
    }

    /// Apply shared settings text.
    ///
    /// On error the current settings are left untouched.
    pub fn import_text(&mut self, text: &str, mode: ImportMode) -> Result<ImportReport> {
        let bytes = decode_text(text)?;
        self.import_bytes(&bytes, mode)
    }

    fn writer(&self) -> SettingsWriter<'static> {
        SettingsWriter::with_options(self.schema, self.options.clone())
    }

    fn reader(&self) -> SettingsReader<'static> {
        SettingsReader::with_options(self.schema, self.options.clone())
    }
}

/// Options for the backing file: same text policy, nothing ignored.
fn storage_options(options: &CodecOptions) -> CodecOptions {
    options.clone().with_ignored_keys(Vec::<String>::new())
}
