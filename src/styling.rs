//! Styling for terminal output.
//!
//! Uses the anstyle ecosystem:
//! - anstream for auto-detecting color support on stderr
//! - anstyle for the semantic style constants below
//!
//! Renderers write to the paging sink, not through anstream, so they only
//! apply these styles when the session says color is allowed.

use anstyle::{AnsiColor, Color, Style};

/// Auto-detecting eprintln that respects NO_COLOR, CLICOLOR_FORCE, and terminal capabilities
pub use anstream::eprintln;

/// Error style (red) - use as `{ERROR}text{ERROR:#}`
pub const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Error emoji - use with ERROR style: `eprintln!("{ERROR_EMOJI} {ERROR}message{ERROR:#}");`
pub const ERROR_EMOJI: &str = "❌";

/// Hint style (dimmed) - use as `{HINT}text{HINT:#}`
pub const HINT: Style = Style::new().dimmed();

/// Table header row (bold)
pub const TABLE_HEADER: Style = Style::new().bold();

/// Field names in card output (cyan)
pub const CARD_LABEL: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

/// Format an error and its causes for stderr.
///
/// The top-level message is red; each cause follows on its own dimmed line.
pub fn format_error(err: &anyhow::Error) -> String {
    let mut message = format!("{ERROR_EMOJI} {ERROR}{err}{ERROR:#}");
    for cause in err.chain().skip(1) {
        message.push_str(&format!("\n   {HINT}{cause}{HINT:#}"));
    }
    message
}
