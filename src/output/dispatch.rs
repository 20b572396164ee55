//! Format dispatch for one batch.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use super::mode::OutputMode;
use super::options::{PrintFlags, PrintOptions, resolve_fields, resolve_output};
use crate::error::PrintError;
use crate::render::{default_columns, render_cards, render_json, render_table};

/// Render one batch with the renderer selected by the options and flags.
///
/// Applies the `--fields` override (idempotent), resolves the output mode and
/// writes to `sink`. An unrecognized mode prints nothing and is not an error.
pub fn print_items<T: Serialize>(
    sink: &mut dyn Write,
    items: &[T],
    opts: &mut PrintOptions,
    flags: &PrintFlags,
) -> Result<(), PrintError> {
    resolve_fields(opts, flags);
    let mode = resolve_output(opts, flags);
    let records = to_records(items)?;
    render_batch(sink, &records, opts, &mode)
}

pub(crate) fn to_records<T: Serialize>(items: &[T]) -> Result<Vec<Value>, PrintError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::to_value(item).map_err(|source| PrintError::Encode { index, source })
        })
        .collect()
}

pub(crate) fn render_batch(
    sink: &mut dyn Write,
    records: &[Value],
    opts: &mut PrintOptions,
    mode: &OutputMode,
) -> Result<(), PrintError> {
    match mode {
        OutputMode::Table => {
            if opts.fields.is_empty() {
                // Pin the columns so later batches share this header
                opts.fields = default_columns(records);
            }
            render_table(sink, records, opts)?;
        }
        OutputMode::Json => render_json(sink, records, opts)?,
        OutputMode::Card => render_cards(sink, records, opts)?,
        OutputMode::Other(name) => {
            log::debug!("Unknown output mode `{name}`; nothing printed");
        }
    }
    Ok(())
}
