//! Paging sinks.
//!
//! A session writes all of its output to one [`PagingSink`]. The sink is
//! either stdout or the stdin of a pager process; in the pager case it owns a
//! release hook that waits for the pager to exit. The hook runs from `Drop`,
//! so it fires exactly once however the session ends.

use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};

use super::mode::PagerStyle;

/// Writer for one print session, with a release hook run on drop.
pub struct PagingSink {
    writer: Option<Box<dyn Write>>,
    release: Option<Box<dyn FnOnce()>>,
    /// Output goes to a human (pager or terminal)
    interactive: bool,
    /// Writing to a pager
    paged: bool,
    /// A broken pipe means the reader quit: end quietly instead of failing
    ends_on_broken_pipe: bool,
    /// The reader went away; further writes are discarded
    closed: bool,
}

impl PagingSink {
    /// Pass-through sink with nothing to release.
    pub fn plain(writer: impl Write + 'static) -> Self {
        Self {
            writer: Some(Box::new(writer)),
            release: None,
            interactive: false,
            paged: false,
            ends_on_broken_pipe: false,
            closed: false,
        }
    }

    /// Plain stdout. Interactive when stdout is a terminal.
    pub fn stdout() -> Self {
        Self::console(io::stdout(), io::stdout().is_terminal())
    }

    /// Process output such as stdout, where a closed pipe (`| head`) ends the
    /// session rather than failing it.
    pub(crate) fn console(writer: impl Write + 'static, interactive: bool) -> Self {
        let mut sink = Self::plain(writer);
        sink.interactive = interactive;
        sink.ends_on_broken_pipe = true;
        sink
    }

    /// Sink backed by a pager: `release` runs once, after the writer is
    /// flushed and dropped.
    pub fn paged(writer: impl Write + 'static, release: impl FnOnce() + 'static) -> Self {
        Self {
            writer: Some(Box::new(writer)),
            release: Some(Box::new(release)),
            interactive: true,
            paged: true,
            ends_on_broken_pipe: true,
            closed: false,
        }
    }

    /// Run `release` once when the sink is dropped, after the writer is
    /// flushed and dropped.
    pub fn on_release(mut self, release: impl FnOnce() + 'static) -> Self {
        self.release = Some(Box::new(release));
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_paged(&self) -> bool {
        self.paged
    }

    /// Whether the reader has gone away. Nothing written after this is seen.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether renderers may style their output.
    pub fn supports_color(&self) -> bool {
        self.interactive && std::env::var_os("NO_COLOR").is_none()
    }

    fn absorb_broken_pipe<T>(&mut self, result: io::Result<T>, fallback: T) -> io::Result<T> {
        match result {
            Err(e) if self.ends_on_broken_pipe && e.kind() == io::ErrorKind::BrokenPipe => {
                log::debug!("Output closed by its reader; discarding remaining output");
                self.closed = true;
                Ok(fallback)
            }
            other => other,
        }
    }
}

impl Write for PagingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Ok(buf.len());
        }
        let Some(writer) = self.writer.as_mut() else {
            return Ok(buf.len());
        };
        let result = writer.write(buf);
        self.absorb_broken_pipe(result, buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        let result = writer.flush();
        self.absorb_broken_pipe(result, ())
    }
}

impl Drop for PagingSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if !self.closed
                && let Err(e) = writer.flush()
            {
                log::debug!("Failed to flush output: {e}");
            }
            // Closing the pager's stdin lets it see EOF before we wait on it
            drop(writer);
        }
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Opens the sink for a print session.
///
/// `no_pager` comes from the print options; factories that page must honour
/// it by returning a plain sink.
pub trait SinkFactory {
    fn open(&self, style: PagerStyle, no_pager: bool) -> PagingSink;
}

/// Pager sources, highest priority first: `--pager`, `PAGEPRINT_PAGER`,
/// config `[pager] command`, `PAGER`, then the style default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalPager {
    /// `--pager` flag
    pub flag: Option<String>,
    /// `[pager] command` from config
    pub configured: Option<String>,
    /// `--no-pager` or `[pager] disabled`
    pub disabled: bool,
}

impl TerminalPager {
    fn command_for(&self, style: PagerStyle) -> Option<String> {
        let app_env = std::env::var("PAGEPRINT_PAGER").ok();
        let env = std::env::var("PAGER").ok();
        select_pager_command(
            [
                self.flag.as_deref(),
                app_env.as_deref(),
                self.configured.as_deref(),
                env.as_deref(),
            ],
            style,
        )
    }
}

impl SinkFactory for TerminalPager {
    fn open(&self, style: PagerStyle, no_pager: bool) -> PagingSink {
        if self.disabled || no_pager {
            log::debug!("Paging disabled");
            return PagingSink::stdout();
        }
        if !io::stdout().is_terminal() {
            log::debug!("stdout is not a terminal; not paging");
            return PagingSink::stdout();
        }
        let Some(command) = self.command_for(style) else {
            log::debug!("Pager command is empty or cat; not paging");
            return PagingSink::stdout();
        };

        match spawn_pager(&command) {
            Ok(sink) => sink,
            Err(e) => {
                log::debug!("Failed to spawn pager `{command}`: {e}");
                PagingSink::stdout()
            }
        }
    }
}

/// First configured pager wins; with none configured, the style default.
///
/// Returns `None` when paging is switched off by an empty value or `cat`.
pub fn select_pager_command<'a>(
    candidates: impl IntoIterator<Item = Option<&'a str>>,
    style: PagerStyle,
) -> Option<String> {
    match candidates.into_iter().flatten().next() {
        Some(value) => parse_pager_value(value),
        None => Some(style.default_command().to_string()),
    }
}

fn parse_pager_value(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "cat" {
        None
    } else {
        Some(value.to_string())
    }
}

fn spawn_pager(command: &str) -> io::Result<PagingSink> {
    log::debug!("Starting pager: {command}");

    let mut child = shell_command(command).stdin(Stdio::piped()).spawn()?;
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("pager stdin was not captured"))?;

    let command = command.to_string();
    Ok(PagingSink::paged(stdin, move || match child.wait() {
        Ok(status) if !status.success() => {
            log::debug!("Pager `{command}` exited with {status}");
        }
        Ok(_) => {}
        Err(e) => log::debug!("Failed to wait for pager `{command}`: {e}"),
    }))
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
