use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use lp_settings::{BufferLayout, KeySource, SettingsRecord, ValueSource};

use crate::types::{ImportOutcome, TransferSummary};

/// Status lines go to stderr so stdout can carry the payload.
pub fn print_transfer(summary: &TransferSummary) {
    match &summary.destination {
        Some(path) => eprintln!(
            "{} {} settings ({} bytes) to {}",
            summary.action,
            summary.entries,
            summary.bytes,
            path.display()
        ),
        None => eprintln!(
            "{} {} settings ({} bytes)",
            summary.action, summary.entries, summary.bytes
        ),
    }
}

pub fn print_import(outcome: &ImportOutcome) {
    println!("Store: {}", outcome.store.display());
    let report = &outcome.report;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Imported"),
        header_cell("Added"),
        header_cell("Changed"),
        header_cell("Removed"),
        header_cell("Total"),
    ]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new(report.imported).add_attribute(Attribute::Bold),
        count_cell(report.added, Color::Green),
        count_cell(report.changed, Color::Yellow),
        count_cell(report.removed, Color::Red),
        Cell::new(outcome.total),
    ]);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    println!("{table}");
}

pub fn print_layout(layout: &BufferLayout) {
    println!(
        "Buffer: {} bytes, {} records, {} custom keys",
        layout.total_len,
        layout.records.len(),
        layout.custom_keys.len()
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Offset"),
        header_cell("Size"),
        header_cell("Key"),
        header_cell("Key source"),
        header_cell("Value"),
        header_cell("Value source"),
    ]);
    apply_layout_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    for record in &layout.records {
        table.add_row(record_row(record));
    }

    let literal_count = layout.records.len() - layout.predefined_count();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(layout.consumed).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell(format!("{} custom", layout.custom_keys.len())),
        dim_cell("-"),
        dim_cell(format!(
            "{} predefined, {literal_count} literal",
            layout.predefined_count()
        )),
    ]);
    println!("{table}");

    let trailing = layout.total_len - layout.consumed;
    if trailing > 0 {
        eprintln!("warning: {trailing} trailing bytes after the last record");
    }
}

fn record_row(record: &SettingsRecord) -> Vec<Cell> {
    let key_cell = match record.key_source {
        KeySource::Schema(_) => Cell::new(&record.key),
        KeySource::Custom(_) => Cell::new(&record.key).fg(Color::Yellow),
    };
    let value_cell = match record.value_source {
        ValueSource::Predefined(_) => Cell::new(&record.value).fg(Color::Green),
        ValueSource::Literal => Cell::new(&record.value),
    };
    vec![
        dim_cell(record.offset),
        Cell::new(record.encoded_len),
        key_cell,
        Cell::new(record.key_source),
        value_cell,
        Cell::new(record.value_source),
    ]
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_layout_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::LowerBoundary(Width::Fixed(14)),
        ]);
    }
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
