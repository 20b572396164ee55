pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod source;
pub mod styling;

// Re-export the entry points most callers need
pub use output::{PrintFlags, PrintOptions, print_paged};
pub use source::RecordSource;
