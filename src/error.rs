//! Error types for the printing pipeline.
//!
//! - **`PrintError`** - failures while turning a batch into bytes on the sink.
//! - **`SourceError`** - failures reading records from the bundled sources.
//! - **`ConfigError`** - failures loading the user config file.
//!
//! Session functions return `anyhow::Result`. Errors raised by a record
//! source are passed through untouched, so callers can recover the original
//! type with `downcast_ref`:
//!
//! ```ignore
//! if let Some(SourceError::Parse { line, .. }) = err.downcast_ref() {
//!     eprintln!("bad input on line {line}");
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// Failures while rendering a batch.
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    /// A record could not be represented as a JSON value
    #[error("failed to encode record {index} of batch")]
    Encode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Writing to the sink failed
    #[error("failed to write output")]
    Write(#[from] io::Error),
}

/// Failures reading records from the bundled sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read input")]
    Read(#[from] io::Error),

    /// A JSON Lines input line was not valid JSON
    #[error("invalid JSON on line {line}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures loading the user config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
