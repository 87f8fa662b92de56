//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;

use lp_settings::SettingsError;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be encoded.
    #[error("Failed to encode settings")]
    Encode {
        #[source]
        source: SettingsError,
    },

    /// Buffer could not be decoded.
    #[error("Failed to decode settings")]
    Decode {
        path: Option<PathBuf>,
        #[source]
        source: SettingsError,
    },

    /// Shared settings text is not a hex-encoded buffer.
    #[error("Settings text is not valid")]
    InvalidText {
        #[source]
        source: hex::FromHexError,
    },

    /// Store has no file to persist to.
    #[error("Settings store has no backing file")]
    NoBackingFile,

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::Encode { source } => {
                format!("The current settings could not be exported: {source}")
            }
            Self::Decode { path, .. } => match path {
                Some(path) => format!(
                    "The settings file at {} is damaged or was not exported by Lyrics Plus.",
                    path.display()
                ),
                None => "The imported settings are damaged or were not exported by Lyrics Plus."
                    .to_string(),
            },
            Self::InvalidText { .. } => {
                "The pasted text is not a Lyrics Plus settings export.".to_string()
            }
            Self::NoBackingFile => "These settings are not linked to a file.".to_string(),
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::Encode { source } => match source {
                SettingsError::UnencodableCharacter { .. } => Some(
                    "Settings containing non-Latin characters cannot be exported; \
                     replace them and try again."
                        .into(),
                ),
                _ => None,
            },
            Self::Decode { .. } | Self::InvalidText { .. } => Some(
                "Your current settings were left unchanged. Export them again from the source."
                    .into(),
            ),
            Self::NoBackingFile => Some("Choose a file to save the settings to.".into()),
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_messages() {
        let err = PersistenceError::Decode {
            path: None,
            source: SettingsError::InvalidKeyIndex { index: 900 },
        };
        assert_eq!(format!("{err}"), "Failed to decode settings");
        assert!(err.user_message().contains("damaged"));
        assert!(err.suggestion().unwrap().contains("unchanged"));
    }

    #[test]
    fn test_encode_suggestion() {
        let err = PersistenceError::Encode {
            source: SettingsError::UnencodableCharacter {
                unit: 0xAC00,
                position: 0,
            },
        };
        assert!(err.suggestion().is_some());

        let err = PersistenceError::Encode {
            source: SettingsError::TooManyRecords { count: 70000 },
        };
        assert!(err.suggestion().is_none());
    }
}
