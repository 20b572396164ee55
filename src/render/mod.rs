//! Renderers for the three output modes.
//!
//! Each renderer takes the whole batch plus the resolved options and writes
//! finished bytes to the sink. Only the table renderer has a header, so it is
//! the only one that looks at `no_header`.

mod card;
mod json;
mod table;
mod value;

pub use card::render_cards;
pub use json::render_json;
pub use table::{default_columns, render_table};
pub use value::{FieldValue, TimeFormat, format_field, format_relative_time, lookup};
