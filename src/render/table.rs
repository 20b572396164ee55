//! Tabular rendering.
//!
//! Column widths are computed per batch, which is why records are printed in
//! batches at all: every row in a batch lines up with its header.

use std::io::{self, Write};

use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use super::value::{format_field, lookup};
use crate::output::PrintOptions;
use crate::styling::TABLE_HEADER;

/// Gap between aligned columns when no separator is configured.
const COLUMN_GAP: &str = "  ";

/// Columns to use when the caller declared none: the keys of the first
/// object record, in input order.
pub fn default_columns(records: &[Value]) -> Vec<String> {
    records
        .iter()
        .find_map(Value::as_object)
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

pub fn render_table(out: &mut dyn Write, records: &[Value], opts: &PrintOptions) -> io::Result<()> {
    if opts.fields.is_empty() {
        // Nothing to tabulate; print each record as a single cell
        for record in records {
            writeln!(out, "{}", format_field(record, opts.time_format))?;
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            opts.fields
                .iter()
                .map(|field| {
                    lookup(record, field)
                        .map(|v| format_field(v, opts.time_format))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let show_header = !opts.no_header;
    let mut widths: Vec<usize> = if show_header {
        opts.fields.iter().map(|f| f.width()).collect()
    } else {
        vec![0; opts.fields.len()]
    };
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    if show_header {
        let line = join_cells(&opts.fields, &widths, &opts.separator);
        if opts.color {
            writeln!(out, "{TABLE_HEADER}{line}{TABLE_HEADER:#}")?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    for row in &rows {
        writeln!(out, "{}", join_cells(row, &widths, &opts.separator))?;
    }
    Ok(())
}

fn join_cells(cells: &[String], widths: &[usize], separator: &str) -> String {
    if !separator.is_empty() {
        return cells.join(separator);
    }

    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(cell);
        let pad = width.saturating_sub(cell.width());
        line.extend(std::iter::repeat_n(' ', pad));
    }
    line.truncate(line.trim_end().len());
    line
}
