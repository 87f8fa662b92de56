//! CLI argument definitions for the settings tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "lyrics-settings",
    version,
    about = "Lyrics Plus settings tool - encode, decode and inspect settings exports",
    long_about = "Encode, decode and inspect Lyrics Plus settings exports.\n\n\
                  Reads and writes the compact binary export format as well as\n\
                  its hex text form used for copy and paste."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include setting values in trace logs (they may contain API keys).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Truncate characters above U+00FF instead of rejecting them.
    ///
    /// Matches the lossy behavior of older plugin exports.
    #[arg(long = "truncate-text", global = true)]
    pub truncate_text: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Encode a JSON settings object into an export buffer.
    Encode(EncodeArgs),

    /// Decode an export buffer into a JSON settings object.
    Decode(DecodeArgs),

    /// Show every record of an export buffer and how it was stored.
    Inspect(InspectArgs),

    /// List the known keys or predefined values.
    Schema(SchemaArgs),

    /// Apply an export to a settings file.
    Import(ImportArgs),

    /// Export a settings file.
    Export(ExportArgs),
}

#[derive(Args)]
pub struct EncodeArgs {
    /// JSON file with a flat object of string values ("-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (default: stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write hex text instead of raw bytes.
    #[arg(long = "text")]
    pub text: bool,
}

#[derive(Args)]
pub struct DecodeArgs {
    /// Export buffer ("-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output JSON file (default: stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Input is hex text.
    #[arg(long = "text")]
    pub text: bool,

    /// Reject buffers with trailing bytes.
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Export buffer ("-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input is hex text.
    #[arg(long = "text")]
    pub text: bool,
}

#[derive(Args)]
pub struct SchemaArgs {
    /// List predefined values instead of known keys.
    #[arg(long = "values")]
    pub values: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Settings file to update (created if missing).
    #[arg(value_name = "STORE")]
    pub store: PathBuf,

    /// Export to apply ("-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input is hex text.
    #[arg(long = "text")]
    pub text: bool,

    /// Keep settings the export does not mention.
    #[arg(long = "merge")]
    pub merge: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Settings file to export.
    #[arg(value_name = "STORE")]
    pub store: PathBuf,

    /// Output file (default: stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write hex text instead of raw bytes.
    #[arg(long = "text")]
    pub text: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decode_with_global_flags() {
        let cli = Cli::try_parse_from([
            "lyrics-settings",
            "decode",
            "export.txt",
            "--text",
            "--strict",
            "--truncate-text",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert!(cli.truncate_text);
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        let Command::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert!(args.text && args.strict);
        assert_eq!(args.input, PathBuf::from("export.txt"));
    }

    #[test]
    fn test_import_requires_store_and_input() {
        assert!(Cli::try_parse_from(["lyrics-settings", "import", "settings.lps"]).is_err());
        let cli =
            Cli::try_parse_from(["lyrics-settings", "import", "settings.lps", "-", "--merge"])
                .unwrap();
        let Command::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert!(args.merge);
        assert_eq!(args.input, PathBuf::from("-"));
    }
}
