//! JSON rendering: one pretty-printed document per record.

use std::io::{self, Write};

use serde_json::{Map, Value};

use super::value::lookup;
use crate::output::PrintOptions;

pub fn render_json(out: &mut dyn Write, records: &[Value], opts: &PrintOptions) -> io::Result<()> {
    for record in records {
        let projected;
        let value = if opts.fields.is_empty() || !record.is_object() {
            record
        } else {
            projected = project(record, &opts.fields);
            &projected
        };
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Keep only the named fields, in field order. Missing fields are omitted.
fn project(record: &Value, fields: &[String]) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .filter_map(|field| lookup(record, field).map(|v| (field.clone(), v.clone())))
        .collect();
    Value::Object(map)
}
