//! Print options and the caller overrides applied on top of them.

use super::mode::OutputMode;
use crate::render::TimeFormat;

/// Sentinel accepted by `--fields` meaning "also show the long field set".
pub const FIELDS_LONG: &str = "long";

/// Per-invocation print configuration.
///
/// Built by the caller, then mutated in place over a paging session: the
/// field override is merged once and `no_header` flips after the first batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintOptions {
    /// Fields shown by default, in display order
    pub fields: Vec<String>,
    /// Extra fields shown only when the caller asks for the long set
    pub fields_long: Vec<String>,
    /// Ignore caller overrides for fields and output mode
    pub ignore_flags: bool,
    /// Requested output mode; `None` means table
    pub output: Option<OutputMode>,
    pub no_pager: bool,
    pub no_header: bool,
    /// Table cell separator. Empty means aligned columns.
    pub separator: String,
    pub time_format: TimeFormat,
    /// Renderers may emit ANSI styling
    pub color: bool,
}

impl PrintOptions {
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fields_long<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields_long = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = Some(output);
        self
    }
}

/// Already-parsed CLI values that may override [`PrintOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintFlags {
    /// `--output`, verbatim
    pub output: Option<String>,
    /// `--fields`, verbatim
    pub fields: Option<String>,
    /// `--limit`; `Some(0)` is treated the same as unset
    pub limit: Option<usize>,
}

impl PrintFlags {
    /// Effective item limit, `None` when unbounded.
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|&limit| limit > 0)
    }
}

/// A parsed `--fields` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOverride {
    /// Append the long field set to the defaults
    Long,
    /// Replace the field list
    Explicit(Vec<String>),
}

impl FieldOverride {
    pub fn parse(raw: &str) -> Self {
        if raw == FIELDS_LONG {
            return FieldOverride::Long;
        }
        FieldOverride::Explicit(raw.split(',').map(|f| f.trim().to_string()).collect())
    }
}

/// Merge a `--fields` override into the options.
///
/// Idempotent: once merged, `fields_long` is empty, so applying the same
/// override again leaves the options unchanged.
pub fn resolve_fields(opts: &mut PrintOptions, flags: &PrintFlags) {
    if opts.ignore_flags {
        return;
    }
    let Some(raw) = flags.fields.as_deref() else {
        return;
    };

    match FieldOverride::parse(raw) {
        FieldOverride::Long => {
            let long = std::mem::take(&mut opts.fields_long);
            opts.fields.extend(long);
        }
        FieldOverride::Explicit(fields) => {
            opts.fields = fields;
            opts.fields_long.clear();
        }
    }
}

/// Pick the output mode: the `--output` flag wins unless flags are ignored,
/// then the options, then table.
pub fn resolve_output(opts: &PrintOptions, flags: &PrintFlags) -> OutputMode {
    if !opts.ignore_flags
        && let Some(raw) = flags.output.as_deref()
    {
        return OutputMode::from_name(raw);
    }
    opts.output.clone().unwrap_or_default()
}
