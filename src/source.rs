//! Pull-based record sources.
//!
//! The batcher drives a source with `has_next` / `next_record` rather than
//! `Iterator::next`, because it has to decide whether to flush *after* taking
//! an item but *before* pulling the next one.

use std::io::BufRead;
use std::iter::Peekable;

use anyhow::bail;
use serde_json::Value;

use crate::error::SourceError;

/// A lazy, possibly failing sequence of records.
pub trait RecordSource {
    type Item;

    /// Whether another record is available. Must be safe to call any number of
    /// times; implementations may buffer one record to answer it.
    fn has_next(&mut self) -> bool;

    /// Take the next record. Only called after `has_next` returned true.
    fn next_record(&mut self) -> anyhow::Result<Self::Item>;
}

impl<S: RecordSource + ?Sized> RecordSource for &mut S {
    type Item = S::Item;

    fn has_next(&mut self) -> bool {
        (**self).has_next()
    }

    fn next_record(&mut self) -> anyhow::Result<Self::Item> {
        (**self).next_record()
    }
}

/// Source over an infallible iterator.
pub struct IterSource<I: Iterator> {
    inner: Peekable<I>,
}

impl<I: Iterator> IterSource<I> {
    pub fn new(items: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: items.into_iter().peekable(),
        }
    }
}

impl<I: Iterator> RecordSource for IterSource<I> {
    type Item = I::Item;

    fn has_next(&mut self) -> bool {
        self.inner.peek().is_some()
    }

    fn next_record(&mut self) -> anyhow::Result<Self::Item> {
        match self.inner.next() {
            Some(item) => Ok(item),
            None => bail!("record source is exhausted"),
        }
    }
}

/// Source over an iterator of results. Errors are surfaced as-is.
pub struct FallibleSource<I: Iterator> {
    inner: Peekable<I>,
}

impl<I: Iterator> FallibleSource<I> {
    pub fn new(items: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: items.into_iter().peekable(),
        }
    }
}

impl<I, T, E> RecordSource for FallibleSource<I>
where
    I: Iterator<Item = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    type Item = T;

    fn has_next(&mut self) -> bool {
        self.inner.peek().is_some()
    }

    fn next_record(&mut self) -> anyhow::Result<T> {
        match self.inner.next() {
            Some(result) => result.map_err(Into::into),
            None => bail!("record source is exhausted"),
        }
    }
}

/// JSON Lines reader. Blank lines are skipped.
///
/// Reads one line ahead to answer `has_next`. A malformed line is reported
/// with its 1-based line number when it is pulled.
pub struct JsonLines<R> {
    reader: R,
    line: usize,
    pending: Option<Result<Value, SourceError>>,
    eof: bool,
}

impl<R: BufRead> JsonLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            pending: None,
            eof: false,
        }
    }

    fn fill(&mut self) {
        if self.pending.is_some() || self.eof {
            return;
        }
        let mut buf = Vec::new();
        loop {
            buf.clear();
            // Bytes, so a badly encoded line is a parse error like any other
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    self.eof = true;
                    return;
                }
                Ok(_) => {
                    self.line += 1;
                    let text = buf.trim_ascii();
                    if text.is_empty() {
                        continue;
                    }
                    let line = self.line;
                    self.pending = Some(
                        serde_json::from_slice(text)
                            .map_err(|source| SourceError::Parse { line, source }),
                    );
                    return;
                }
                Err(e) => {
                    // Report once, then stop
                    self.eof = true;
                    self.pending = Some(Err(SourceError::Read(e)));
                    return;
                }
            }
        }
    }
}

impl<R: BufRead> RecordSource for JsonLines<R> {
    type Item = Value;

    fn has_next(&mut self) -> bool {
        self.fill();
        self.pending.is_some()
    }

    fn next_record(&mut self) -> anyhow::Result<Value> {
        self.fill();
        match self.pending.take() {
            Some(result) => Ok(result?),
            None => bail!("record source is exhausted"),
        }
    }
}
