//! Lyrics Plus settings CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use lp_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use lp_cli::commands::{
    codec_options, run_decode, run_encode, run_export, run_import, run_inspect, run_schema,
};
use lp_cli::logging::{LogConfig, LogFormat, init_logging};
use lp_cli::summary::{print_import, print_layout, print_transfer};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let options = codec_options(cli.truncate_text);
    let mut stdout = io::stdout();
    let result = match &cli.command {
        Command::Encode(args) => {
            run_encode(args, &options, &mut stdout).map(|summary| print_transfer(&summary))
        }
        Command::Decode(args) => {
            run_decode(args, &options, &mut stdout).map(|summary| print_transfer(&summary))
        }
        Command::Inspect(args) => run_inspect(args, &options).map(|layout| print_layout(&layout)),
        Command::Schema(args) => run_schema(args),
        Command::Import(args) => run_import(args, &options).map(|outcome| print_import(&outcome)),
        Command::Export(args) => {
            run_export(args, &options, &mut stdout).map(|summary| print_transfer(&summary))
        }
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
