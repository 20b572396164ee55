//! Card rendering: one block of `name  value` lines per record.

use std::io::{self, Write};

use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use super::value::{format_field, lookup};
use crate::output::PrintOptions;
use crate::styling::CARD_LABEL;

pub fn render_cards(out: &mut dyn Write, records: &[Value], opts: &PrintOptions) -> io::Result<()> {
    for record in records {
        let Some(map) = record.as_object() else {
            writeln!(out, "{}", format_field(record, opts.time_format))?;
            writeln!(out)?;
            continue;
        };

        let lines: Vec<(&str, String)> = if opts.fields.is_empty() {
            map.iter()
                .map(|(k, v)| (k.as_str(), format_field(v, opts.time_format)))
                .collect()
        } else {
            opts.fields
                .iter()
                .map(|field| {
                    let value = lookup(record, field)
                        .map(|v| format_field(v, opts.time_format))
                        .unwrap_or_default();
                    (field.as_str(), value)
                })
                .collect()
        };

        let label_width = lines.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
        for (label, value) in lines {
            let pad = " ".repeat(label_width - label.width());
            let line = if opts.color {
                format!("{CARD_LABEL}{label}{CARD_LABEL:#}{pad}  {value}")
            } else {
                format!("{label}{pad}  {value}")
            };
            writeln!(out, "{}", line.trim_end())?;
        }
        writeln!(out)?;
    }
    Ok(())
}
