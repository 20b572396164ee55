//! Batched, paged printing of record streams.
//!
//! # Architecture
//!
//! ```text
//! RecordSource ──pull──▶ print_paged ──batch──▶ render_batch ──▶ PagingSink
//!                        (batcher.rs)           (dispatch.rs)     (pager.rs)
//! ```
//!
//! A session acquires one [`PagingSink`] from a [`SinkFactory`], pulls records
//! until the source is exhausted or `--limit` is reached, and renders them in
//! batches of [`BATCH_PRINT_SIZE`]. Only the first batch carries a table
//! header. The sink is released when the session ends, on every path.
//!
//! ## Usage Pattern
//!
//! ```rust,ignore
//! use pageprint::output::{PrintFlags, PrintOptions, TerminalPager, print_paged};
//! use pageprint::source::JsonLines;
//!
//! let opts = PrintOptions::default().with_fields(["id", "status"]);
//! let flags = PrintFlags { limit: Some(250), ..Default::default() };
//! let summary = print_paged(JsonLines::new(stdin.lock()), Some(opts), &flags, &TerminalPager::default())?;
//! ```
//!
//! ## Output Modes
//!
//! - **Table**: aligned columns per batch, header on the first batch only
//! - **JSON**: one pretty-printed document per record
//! - **Card**: one `name  value` block per record
//! - anything else: accepted, prints nothing

mod batcher;
mod dispatch;
mod mode;
mod options;
mod pager;

pub use batcher::{BATCH_PRINT_SIZE, PrintSession, SessionSummary, print_once, print_paged};
pub use dispatch::print_items;
pub use mode::{OutputMode, PagerStyle};
pub use options::{
    FIELDS_LONG, FieldOverride, PrintFlags, PrintOptions, resolve_fields, resolve_output,
};
pub use pager::{PagingSink, SinkFactory, TerminalPager, select_pager_command};
