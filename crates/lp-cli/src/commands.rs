use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{info_span, trace};

use lp_persistence::{ImportMode, SettingsStore, decode_text, encode_text, write_atomic};
use lp_settings::{
    BufferLayout, CodecOptions, SettingsMap, SettingsReader, SettingsSchema, SettingsWriter,
    TextPolicy,
};

use crate::cli::{DecodeArgs, EncodeArgs, ExportArgs, ImportArgs, InspectArgs, SchemaArgs};
use crate::logging::redact_value;
use crate::summary::{align_column, apply_table_style, header_cell};
use crate::types::{ImportOutcome, TransferSummary};

/// Path argument that stands for stdin or stdout.
const STDIO_PATH: &str = "-";

/// Codec options shared by every command.
pub fn codec_options(truncate_text: bool) -> CodecOptions {
    let policy = if truncate_text {
        TextPolicy::Truncate
    } else {
        TextPolicy::Strict
    };
    CodecOptions::new().with_text_policy(policy)
}

pub fn run_encode<W: Write>(
    args: &EncodeArgs,
    options: &CodecOptions,
    stdout: &mut W,
) -> Result<TransferSummary> {
    let _span = info_span!("encode", input = %args.input.display()).entered();
    let json = String::from_utf8(read_input(&args.input)?)
        .with_context(|| format!("{} is not UTF-8 text", args.input.display()))?;
    let settings = SettingsMap::from_json_str(&json)
        .with_context(|| format!("parse settings from {}", args.input.display()))?;
    log_values(&settings);

    let writer = SettingsWriter::with_options(SettingsSchema::builtin(), options.clone());
    let bytes = writer.serialize(&settings).context("encode settings")?;
    let entries = settings
        .keys()
        .filter(|key| !options.is_ignored(key))
        .count();

    let payload = buffer_payload(bytes, args.text);
    let destination = write_output(args.output.as_deref(), &payload, stdout)?;
    Ok(TransferSummary {
        action: "Encoded",
        entries,
        bytes: payload.len(),
        destination,
    })
}

pub fn run_decode<W: Write>(
    args: &DecodeArgs,
    options: &CodecOptions,
    stdout: &mut W,
) -> Result<TransferSummary> {
    let _span = info_span!("decode", input = %args.input.display()).entered();
    let bytes = read_buffer(&args.input, args.text)?;
    let mut options = options.clone();
    options.strict = args.strict;
    let settings = SettingsReader::with_options(SettingsSchema::builtin(), options)
        .deserialize(&bytes)
        .with_context(|| format!("decode settings from {}", args.input.display()))?;
    log_values(&settings);

    let mut json = serde_json::to_string_pretty(&settings.to_json_value())
        .context("format settings as JSON")?;
    json.push('\n');
    let destination = write_output(args.output.as_deref(), json.as_bytes(), stdout)?;
    Ok(TransferSummary {
        action: "Decoded",
        entries: settings.len(),
        bytes: json.len(),
        destination,
    })
}

pub fn run_inspect(args: &InspectArgs, options: &CodecOptions) -> Result<BufferLayout> {
    let _span = info_span!("inspect", input = %args.input.display()).entered();
    let bytes = read_buffer(&args.input, args.text)?;
    SettingsReader::with_options(SettingsSchema::builtin(), options.clone())
        .layout(&bytes)
        .with_context(|| format!("decode settings from {}", args.input.display()))
}

/// Table of the built-in keys or predefined values by wire index.
pub fn schema_table(args: &SchemaArgs) -> Table {
    let schema = SettingsSchema::builtin();
    let mut table = Table::new();
    if args.values {
        table.set_header(vec![header_cell("Index"), header_cell("Value")]);
        for (index, value) in schema.values().enumerate() {
            table.add_row(vec![Cell::new(index), Cell::new(format!("{value:?}"))]);
        }
    } else {
        table.set_header(vec![
            header_cell("Index"),
            header_cell("Key"),
            header_cell("Exported"),
        ]);
        let options = CodecOptions::default();
        for (index, key) in schema.keys().enumerate() {
            let exported = if options.is_ignored(key) { "no" } else { "yes" };
            table.add_row(vec![Cell::new(index), Cell::new(key), Cell::new(exported)]);
        }
        align_column(&mut table, 2, CellAlignment::Center);
    }
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    table
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    println!("{}", schema_table(args));
    Ok(())
}

pub fn run_import(args: &ImportArgs, options: &CodecOptions) -> Result<ImportOutcome> {
    let _span = info_span!("import", store = %args.store.display()).entered();
    let mut store = SettingsStore::open_with_options(&args.store, options.clone())
        .with_context(|| format!("open {}", args.store.display()))?;

    let mode = if args.merge {
        ImportMode::Merge
    } else {
        ImportMode::Replace
    };
    let input = read_input(&args.input)?;
    let imported = if args.text {
        let text = String::from_utf8(input)
            .with_context(|| format!("{} is not UTF-8 text", args.input.display()))?;
        store.import_text(&text, mode)
    } else {
        store.import_bytes(&input, mode)
    };
    let report = imported.map_err(|err| {
        let message = match err.suggestion() {
            Some(hint) => format!("{} {hint}", err.user_message()),
            None => err.user_message(),
        };
        anyhow::Error::new(err).context(message)
    })?;

    store.persist().context("save settings")?;
    Ok(ImportOutcome {
        store: args.store.clone(),
        report,
        total: store.settings().len(),
    })
}

pub fn run_export<W: Write>(
    args: &ExportArgs,
    options: &CodecOptions,
    stdout: &mut W,
) -> Result<TransferSummary> {
    let _span = info_span!("export", store = %args.store.display()).entered();
    if !args.store.exists() {
        anyhow::bail!("settings file {} does not exist", args.store.display());
    }
    let store = SettingsStore::open_with_options(&args.store, options.clone())
        .with_context(|| format!("open {}", args.store.display()))?;
    let bytes = store.export_bytes().context("encode settings")?;

    let payload = buffer_payload(bytes, args.text);
    let destination = write_output(args.output.as_deref(), &payload, stdout)?;
    Ok(TransferSummary {
        action: "Exported",
        entries: store.exported_len(),
        bytes: payload.len(),
        destination,
    })
}

fn log_values(settings: &SettingsMap) {
    for (key, value) in settings.iter() {
        trace!(key, value = redact_value(value), "setting");
    }
}

fn buffer_payload(bytes: Vec<u8>, text: bool) -> Vec<u8> {
    if text {
        let mut text = encode_text(&bytes);
        text.push('\n');
        text.into_bytes()
    } else {
        bytes
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == STDIO_PATH {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes).context("read stdin")?;
        return Ok(bytes);
    }
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

fn read_buffer(path: &Path, text: bool) -> Result<Vec<u8>> {
    let input = read_input(path)?;
    if !text {
        return Ok(input);
    }
    let text = String::from_utf8(input)
        .with_context(|| format!("{} is not UTF-8 text", path.display()))?;
    decode_text(&text).with_context(|| format!("decode hex text from {}", path.display()))
}

/// Write to `path`, or to `stdout` when no path (or `-`) is given.
fn write_output<W: Write>(
    path: Option<&Path>,
    payload: &[u8],
    stdout: &mut W,
) -> Result<Option<PathBuf>> {
    match path {
        Some(path) if path.as_os_str() != STDIO_PATH => {
            write_atomic(path, payload).with_context(|| format!("write {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        _ => {
            stdout.write_all(payload).context("write stdout")?;
            stdout.flush().context("flush stdout")?;
            Ok(None)
        }
    }
}
