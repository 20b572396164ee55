//! Field lookup and value formatting shared by all renderers.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use strum::{Display, EnumString};

/// How temporal values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// "3 hours ago"
    #[default]
    Relative,
    /// RFC 3339 in UTC, second precision
    Iso,
    /// The input string untouched
    Raw,
}

/// A field value classified once for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// A string that parses as an RFC 3339 timestamp
    Temporal {
        time: DateTime<FixedOffset>,
        raw: &'a str,
    },
    /// Objects and arrays
    Structured(&'a Value),
    /// Everything else, including null
    Scalar(&'a Value),
}

impl<'a> FieldValue<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) => match DateTime::parse_from_rfc3339(s) {
                Ok(time) => FieldValue::Temporal { time, raw: s },
                Err(_) => FieldValue::Scalar(value),
            },
            Value::Object(_) | Value::Array(_) => FieldValue::Structured(value),
            _ => FieldValue::Scalar(value),
        }
    }

    pub fn render(&self, time_format: TimeFormat, now: DateTime<Utc>) -> String {
        match self {
            FieldValue::Temporal { time, raw } => match time_format {
                TimeFormat::Relative => format_relative_time(time.with_timezone(&Utc), now),
                TimeFormat::Iso => time
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
                TimeFormat::Raw => raw.to_string(),
            },
            // Compact JSON never fails for an in-memory Value
            FieldValue::Structured(value) => value.to_string(),
            FieldValue::Scalar(Value::Null) => String::new(),
            FieldValue::Scalar(Value::String(s)) => s.clone(),
            FieldValue::Scalar(value) => value.to_string(),
        }
    }
}

/// Format a single field value for table and card cells.
pub fn format_field(value: &Value, time_format: TimeFormat) -> String {
    FieldValue::classify(value).render(time_format, Utc::now())
}

/// Look up a field by name, descending into nested objects on `.`.
///
/// An exact key match wins over path traversal, so keys that contain dots
/// stay addressable.
pub fn lookup<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    let map = record.as_object()?;
    if let Some(value) = map.get(field) {
        return Some(value);
    }
    if !field.contains('.') {
        return None;
    }
    field
        .split('.')
        .try_fold(record, |current, segment| current.as_object()?.get(segment))
}

/// Describe how long ago `time` was, relative to `now`.
pub fn format_relative_time(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds_ago = (now - time).num_seconds();

    if seconds_ago < 0 {
        return "in the future".to_string();
    }

    let minutes = seconds_ago / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;
    let months = days / 30;
    let years = days / 365;

    let (count, unit) = if years > 0 {
        (years, "year")
    } else if months > 0 {
        (months, "month")
    } else if weeks > 0 {
        (weeks, "week")
    } else if days > 0 {
        (days, "day")
    } else if hours > 0 {
        (hours, "hour")
    } else if minutes > 0 {
        (minutes, "minute")
    } else {
        return "just now".to_string();
    };

    format!("{count} {unit}{} ago", if count == 1 { "" } else { "s" })
}
