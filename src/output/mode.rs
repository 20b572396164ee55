//! Output modes and pager styles.

use std::fmt;

use strum::{Display, EnumString};

/// Rendering encoding for a batch of records.
///
/// The three known modes each map to one renderer. Anything else parses into
/// [`OutputMode::Other`], which the dispatcher treats as a silent no-op rather
/// than an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Table,
    Json,
    Card,
    /// Unrecognized mode, kept verbatim
    #[strum(default)]
    Other(String),
}

impl OutputMode {
    /// Parse a user-supplied mode. Never fails: unknown names become `Other`.
    pub fn from_name(name: &str) -> Self {
        name.parse()
            .unwrap_or_else(|_| OutputMode::Other(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            OutputMode::Table => "table",
            OutputMode::Json => "json",
            OutputMode::Card => "card",
            OutputMode::Other(name) => name,
        }
    }

    /// Pager style preferred for this mode.
    ///
    /// Tables get a pager that can scroll backwards; everything else streams
    /// forward only.
    pub fn pager_style(&self) -> PagerStyle {
        match self {
            OutputMode::Table => PagerStyle::Less,
            _ => PagerStyle::More,
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of interactive pager to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PagerStyle {
    /// Supports backward scrolling
    Less,
    /// Forward-only
    More,
}

impl PagerStyle {
    /// Command used when neither flags, env nor config name a pager.
    pub fn default_command(self) -> &'static str {
        match self {
            // -F quits when output fits one screen, -R passes colors, -X keeps
            // the output on screen after exit
            PagerStyle::Less => "less -FRX",
            PagerStyle::More => "more",
        }
    }
}
