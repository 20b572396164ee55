//! Stream batching: drain a record source into bounded batches and print each
//! one through a single paging sink.

use serde::Serialize;

use super::dispatch::{render_batch, to_records};
use super::mode::OutputMode;
use super::options::{PrintFlags, PrintOptions, resolve_fields, resolve_output};
use super::pager::{PagingSink, SinkFactory};
use crate::error::PrintError;
use crate::source::RecordSource;

/// Records rendered together. Table columns are aligned within a batch.
pub const BATCH_PRINT_SIZE: usize = 100;

/// What a session printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub items: usize,
    /// Size of each dispatched batch, in order
    pub batch_sizes: Vec<usize>,
}

/// State owned by one print session: the options as mutated so far, the
/// resolved output mode and the sink.
///
/// Dropping the session releases the sink (and waits for the pager, if any).
pub struct PrintSession {
    opts: PrintOptions,
    mode: OutputMode,
    sink: PagingSink,
    summary: SessionSummary,
}

impl PrintSession {
    /// Resolve the output mode, merge the field override and acquire a sink.
    pub fn open(mut opts: PrintOptions, flags: &PrintFlags, factory: &dyn SinkFactory) -> Self {
        let mode = resolve_output(&opts, flags);
        resolve_fields(&mut opts, flags);

        let sink = factory.open(mode.pager_style(), opts.no_pager);
        log::debug!(
            "Print session: mode={mode}, paged={}, fields={:?}",
            sink.is_paged(),
            opts.fields
        );
        opts.color |= sink.supports_color();

        Self {
            opts,
            mode,
            sink,
            summary: SessionSummary::default(),
        }
    }

    pub fn options(&self) -> &PrintOptions {
        &self.opts
    }

    pub fn mode(&self) -> &OutputMode {
        &self.mode
    }

    /// Whether the reader of the output has gone away.
    pub fn is_closed(&self) -> bool {
        self.sink.is_closed()
    }

    /// Render one batch. Once a header has been printed, later batches are
    /// printed without one.
    pub fn dispatch<T: Serialize>(&mut self, batch: &[T]) -> Result<(), PrintError> {
        let records = to_records(batch)?;
        render_batch(&mut self.sink, &records, &mut self.opts, &self.mode)?;
        log::trace!(
            "Flushed batch {} ({} records, no_header={})",
            self.summary.batch_sizes.len() + 1,
            batch.len(),
            self.opts.no_header
        );

        self.summary.items += batch.len();
        self.summary.batch_sizes.push(batch.len());
        // A table header is only written once columns are known
        if self.mode != OutputMode::Table || !self.opts.fields.is_empty() {
            self.opts.no_header = true;
        }
        Ok(())
    }

    /// End the session, releasing the sink.
    pub fn finish(self) -> SessionSummary {
        self.summary
    }
}

/// Print a record source in batches, honouring `--limit`.
///
/// The sink is acquired once and released when this returns, on every path.
/// A failed pull ends the session with that error, unchanged; records already
/// collected into the unfinished batch are not printed.
pub fn print_paged<S>(
    mut source: S,
    opts: Option<PrintOptions>,
    flags: &PrintFlags,
    factory: &dyn SinkFactory,
) -> anyhow::Result<SessionSummary>
where
    S: RecordSource,
    S::Item: Serialize,
{
    let limit = flags.effective_limit();
    let mut session = PrintSession::open(opts.unwrap_or_default(), flags, factory);

    let mut items_printed = 0;
    let mut batch = Vec::with_capacity(BATCH_PRINT_SIZE);
    while source.has_next() {
        if limit.is_some_and(|limit| items_printed >= limit) {
            break;
        }

        let item = source.next_record()?;
        batch.push(item);
        items_printed += 1;

        if is_batch_filled(batch.len(), items_printed, limit) || !source.has_next() {
            session.dispatch(&batch)?;
            batch.clear();
            if session.is_closed() {
                log::debug!("Output closed after {items_printed} records; stopping");
                break;
            }
        }
    }

    Ok(session.finish())
}

/// Print a slice in one go through a freshly acquired sink.
pub fn print_once<T: Serialize>(
    items: &[T],
    opts: PrintOptions,
    flags: &PrintFlags,
    factory: &dyn SinkFactory,
) -> Result<SessionSummary, PrintError> {
    let mut session = PrintSession::open(opts, flags, factory);
    session.dispatch(items)?;
    Ok(session.finish())
}

/// Whether the batch should be flushed now.
///
/// A batch is full at `BATCH_PRINT_SIZE`. Within the last window before the
/// limit it is also full once it holds `limit % BATCH_PRINT_SIZE` records, so
/// the final partial batch is printed without pulling past the limit. With no
/// limit only the size rule applies.
fn is_batch_filled(batch_len: usize, items_printed: usize, limit: Option<usize>) -> bool {
    if batch_len == BATCH_PRINT_SIZE {
        return true;
    }
    let Some(limit) = limit else {
        return false;
    };
    let is_last_batch = limit.saturating_sub(items_printed) < BATCH_PRINT_SIZE;
    is_last_batch && batch_len == limit % BATCH_PRINT_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PagerStyle;
    use crate::source::{FallibleSource, IterSource};
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::cell::{Cell, RefCell};
    use std::io::{self, Write};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Captures output and counts sink acquisitions and releases.
    #[derive(Default)]
    struct RecordingFactory {
        buffer: SharedBuffer,
        opened: Cell<usize>,
        released: Rc<Cell<usize>>,
        styles: RefCell<Vec<PagerStyle>>,
    }

    impl RecordingFactory {
        fn output(&self) -> String {
            String::from_utf8(self.buffer.0.borrow().clone()).unwrap()
        }
    }

    impl SinkFactory for RecordingFactory {
        fn open(&self, style: PagerStyle, _no_pager: bool) -> PagingSink {
            self.opened.set(self.opened.get() + 1);
            self.styles.borrow_mut().push(style);
            let released = self.released.clone();
            PagingSink::plain(self.buffer.clone())
                .on_release(move || released.set(released.get() + 1))
        }
    }

    /// Counts pulls so tests can check nothing is read past the limit.
    struct CountingSource {
        next: usize,
        total: usize,
        pulls: Rc<Cell<usize>>,
    }

    impl CountingSource {
        fn new(total: usize) -> (Self, Rc<Cell<usize>>) {
            let pulls = Rc::new(Cell::new(0));
            let source = Self {
                next: 0,
                total,
                pulls: pulls.clone(),
            };
            (source, pulls)
        }
    }

    impl RecordSource for CountingSource {
        type Item = Value;

        fn has_next(&mut self) -> bool {
            self.next < self.total
        }

        fn next_record(&mut self) -> anyhow::Result<Value> {
            self.pulls.set(self.pulls.get() + 1);
            self.next += 1;
            Ok(json!({"n": self.next}))
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("stream broke at item {at}")]
    struct StreamBroken {
        at: usize,
    }

    fn failing_at(fail_at: usize, total: usize) -> impl RecordSource<Item = Value> {
        FallibleSource::new((1..=total).map(move |n| {
            if n == fail_at {
                Err(StreamBroken { at: n })
            } else {
                Ok(json!({"n": n}))
            }
        }))
    }

    fn with_limit(limit: Option<usize>) -> PrintFlags {
        PrintFlags {
            limit,
            ..Default::default()
        }
    }

    #[rstest]
    #[case::unbounded_partial(None, 250, vec![100, 100, 50])]
    #[case::unbounded_exact(None, 200, vec![100, 100])]
    #[case::unbounded_small(None, 7, vec![7])]
    #[case::empty(None, 0, vec![])]
    #[case::limit_not_multiple(Some(250), 1000, vec![100, 100, 50])]
    #[case::limit_exact_multiple(Some(100), 1000, vec![100])]
    #[case::limit_equals_available(Some(100), 100, vec![100])]
    #[case::limit_150(Some(150), 1000, vec![100, 50])]
    #[case::limit_below_batch(Some(7), 1000, vec![7])]
    #[case::limit_above_available(Some(250), 130, vec![100, 30])]
    #[case::limit_two_batches_exact(Some(200), 1000, vec![100, 100])]
    #[case::zero_limit_is_unbounded(Some(0), 120, vec![100, 20])]
    fn test_batch_sizes(
        #[case] limit: Option<usize>,
        #[case] available: usize,
        #[case] expected: Vec<usize>,
    ) {
        let factory = RecordingFactory::default();
        let (source, pulls) = CountingSource::new(available);

        let summary = print_paged(source, None, &with_limit(limit), &factory).unwrap();

        let expected_items: usize = expected.iter().sum();
        assert_eq!(summary.batch_sizes, expected);
        assert_eq!(summary.items, expected_items);
        // Never pulled past the limit
        assert_eq!(pulls.get(), expected_items);
        assert_eq!(factory.opened.get(), 1);
        assert_eq!(factory.released.get(), 1);
    }

    #[test]
    fn test_header_only_on_first_batch() {
        let factory = RecordingFactory::default();
        let summary = print_paged(
            IterSource::new((1..=250).map(|n| json!({"n": n}))),
            None,
            &PrintFlags::default(),
            &factory,
        )
        .unwrap();
        assert_eq!(summary.batch_sizes.len(), 3);

        let output = factory.output();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 251);
        assert_eq!(lines[0], "n");
        assert_eq!(lines.iter().filter(|l| **l == "n").count(), 1);
        assert_eq!(lines[1], "1");
        assert_eq!(lines[250], "250");
    }

    #[test]
    fn test_header_columns_pinned_across_batches() {
        let factory = RecordingFactory::default();
        // Later records carry an extra key; the header from batch one sticks
        let records = (1..=150).map(|n| {
            if n <= 100 {
                json!({"id": n})
            } else {
                json!({"extra": true, "id": n})
            }
        });
        print_paged(IterSource::new(records), None, &PrintFlags::default(), &factory).unwrap();

        let output = factory.output();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "id");
        assert_eq!(lines[101], "101");
        assert!(!output.contains("extra"));
    }

    #[test]
    fn test_iteration_error_discards_partial_batch() {
        let factory = RecordingFactory::default();
        let err = print_paged(failing_at(37, 500), None, &PrintFlags::default(), &factory)
            .unwrap_err();

        let broken = err.downcast_ref::<StreamBroken>().unwrap();
        assert_eq!(broken.at, 37);
        assert!(factory.output().is_empty());
        assert_eq!(factory.released.get(), 1);
    }

    #[test]
    fn test_iteration_error_after_full_batch() {
        let factory = RecordingFactory::default();
        let err = print_paged(failing_at(150, 500), None, &PrintFlags::default(), &factory)
            .unwrap_err();

        assert!(err.downcast_ref::<StreamBroken>().is_some());
        // Header plus the first full batch only
        assert_eq!(factory.output().lines().count(), 101);
        assert_eq!(factory.released.get(), 1);
    }

    #[test]
    fn test_release_once_when_first_pull_fails() {
        let factory = RecordingFactory::default();
        let result = print_paged(failing_at(1, 10), None, &with_limit(Some(5)), &factory);
        assert!(result.is_err());
        assert_eq!(factory.opened.get(), 1);
        assert_eq!(factory.released.get(), 1);
    }

    #[test]
    fn test_pager_style_follows_resolved_mode() {
        let factory = RecordingFactory::default();
        let flags = PrintFlags {
            output: Some("json".into()),
            ..Default::default()
        };
        print_paged(IterSource::new([json!(1)]), None, &flags, &factory).unwrap();

        let opts = PrintOptions::default().with_output(OutputMode::Card);
        print_paged(
            IterSource::new([json!(1)]),
            Some(opts),
            &PrintFlags::default(),
            &factory,
        )
        .unwrap();

        print_paged(
            IterSource::new([json!(1)]),
            None,
            &PrintFlags::default(),
            &factory,
        )
        .unwrap();

        assert_eq!(
            *factory.styles.borrow(),
            vec![PagerStyle::More, PagerStyle::More, PagerStyle::Less]
        );
    }

    #[test]
    fn test_unknown_mode_prints_nothing_but_drains() {
        let factory = RecordingFactory::default();
        let flags = PrintFlags {
            output: Some("xml".into()),
            limit: Some(120),
            ..Default::default()
        };
        let summary = print_paged(
            IterSource::new((0..500).map(|n| json!(n))),
            None,
            &flags,
            &factory,
        )
        .unwrap();
        assert_eq!(summary.batch_sizes, vec![100, 20]);
        assert!(factory.output().is_empty());
    }

    #[test]
    fn test_long_fields_merge_once() {
        let factory = RecordingFactory::default();
        let opts = PrintOptions::default()
            .with_fields(["a"])
            .with_fields_long(["b"]);
        let flags = PrintFlags {
            fields: Some("long".into()),
            ..Default::default()
        };
        let records = (0..150).map(|n| json!({"a": n, "b": n * 2}));
        print_paged(IterSource::new(records), Some(opts), &flags, &factory).unwrap();

        let output = factory.output();
        let first = output.lines().next().unwrap();
        assert_eq!(first, "a   b");
        assert_eq!(output.lines().nth(101).unwrap(), "100  200");
    }

    #[test]
    fn test_session_flips_no_header_after_first_dispatch() {
        let factory = RecordingFactory::default();
        let mut session = PrintSession::open(
            PrintOptions::default(),
            &PrintFlags::default(),
            &factory,
        );
        assert_eq!(*session.mode(), OutputMode::Table);
        assert!(!session.options().no_header);

        session.dispatch(&[json!({"k": 1})]).unwrap();
        assert!(session.options().no_header);
        session.dispatch(&[json!({"k": 2})]).unwrap();
        assert!(session.options().no_header);
        assert_eq!(factory.released.get(), 0);

        let summary = session.finish();
        assert_eq!(summary.batch_sizes, vec![1, 1]);
        assert_eq!(factory.released.get(), 1);
        assert_eq!(factory.output(), "k\n1\n2\n");
    }

    #[test]
    fn test_header_waits_for_first_batch_with_columns() {
        let factory = RecordingFactory::default();
        let mut session = PrintSession::open(
            PrintOptions::default(),
            &PrintFlags::default(),
            &factory,
        );

        session.dispatch(&[json!("plain"), json!(7)]).unwrap();
        assert!(!session.options().no_header);
        assert!(session.options().fields.is_empty());

        session.dispatch(&[json!({"k": 1})]).unwrap();
        assert!(session.options().no_header);
        session.dispatch(&[json!({"k": 2})]).unwrap();
        drop(session);

        assert_eq!(factory.output(), "plain\n7\nk\n1\n2\n");
    }

    /// Stdout whose reader has already exited, as with `| head`.
    struct ClosedStdout;

    impl SinkFactory for ClosedStdout {
        fn open(&self, _style: PagerStyle, _no_pager: bool) -> PagingSink {
            struct Gone;
            impl Write for Gone {
                fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                    Err(io::ErrorKind::BrokenPipe.into())
                }
                fn flush(&mut self) -> io::Result<()> {
                    Err(io::ErrorKind::BrokenPipe.into())
                }
            }
            PagingSink::console(Gone, false)
        }
    }

    #[test]
    fn test_closed_stdout_ends_session_quietly() {
        let (source, pulls) = CountingSource::new(1000);
        let summary = print_paged(source, None, &PrintFlags::default(), &ClosedStdout).unwrap();
        assert_eq!(summary.batch_sizes, vec![100]);
        assert_eq!(pulls.get(), 100);
    }

    #[test]
    fn test_print_once() {
        let factory = RecordingFactory::default();
        let summary = print_once(
            &[json!({"k": "v"})],
            PrintOptions::default(),
            &PrintFlags::default(),
            &factory,
        )
        .unwrap();
        assert_eq!(summary.items, 1);
        assert_eq!(factory.output(), "k\nv\n");
        assert_eq!(factory.released.get(), 1);
    }

    #[rstest]
    #[case(100, 100, None, true)]
    #[case(99, 99, None, false)]
    #[case(50, 250, Some(250), true)]
    #[case(49, 249, Some(250), false)]
    #[case(51, 51, Some(150), false)]
    #[case(50, 150, Some(150), true)]
    #[case(1, 1, Some(100), false)]
    fn test_is_batch_filled(
        #[case] batch_len: usize,
        #[case] items_printed: usize,
        #[case] limit: Option<usize>,
        #[case] expected: bool,
    ) {
        assert_eq!(is_batch_filled(batch_len, items_printed, limit), expected);
    }
}
