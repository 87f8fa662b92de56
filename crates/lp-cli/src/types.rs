use std::path::PathBuf;

use lp_persistence::ImportReport;

/// Result of a command that moved settings from one form to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    /// What happened, for the status line ("Encoded", "Decoded", "Exported").
    pub action: &'static str,
    /// Settings written.
    pub entries: usize,
    /// Bytes written.
    pub bytes: usize,
    /// `None` when the output went to stdout.
    pub destination: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub store: PathBuf,
    pub report: ImportReport,
    /// Entries in the store after the import.
    pub total: usize,
}
