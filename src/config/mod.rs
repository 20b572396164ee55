//! User configuration.
//!
//! Loaded from `config.toml` (see [`path::get_config_path`]). Every key is
//! optional; CLI flags override whatever the file sets.
//!
//! ```toml
//! [output]
//! format = "table"
//! separator = ""
//! time-format = "relative"
//! no-header = false
//!
//! [pager]
//! command = "less -FRX"
//! disabled = false
//! ```

pub mod path;

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::output::{OutputMode, PrintOptions};
use crate::render::TimeFormat;

pub use path::{get_config_path, set_config_path};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserConfig {
    pub output: OutputConfig,
    pub pager: PagerConfig,
}

/// `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output mode name. Unknown names are kept and print nothing.
    pub format: Option<String>,
    pub separator: Option<String>,
    pub time_format: Option<TimeFormat>,
    pub no_header: Option<bool>,
}

/// `[pager]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PagerConfig {
    pub command: Option<String>,
    pub disabled: Option<bool>,
}

impl PagerConfig {
    pub fn disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }
}

impl UserConfig {
    /// Load from the resolved config path. No path or no file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No config at {}; using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        log::debug!("Loading config from {}", path.display());
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fill print options from the `[output]` section.
    pub fn apply_to(&self, opts: &mut PrintOptions) {
        if let Some(format) = &self.output.format {
            opts.output = Some(OutputMode::from_name(format));
        }
        if let Some(separator) = &self.output.separator {
            opts.separator = separator.clone();
        }
        if let Some(time_format) = self.output.time_format {
            opts.time_format = time_format;
        }
        if let Some(no_header) = self.output.no_header {
            opts.no_header = no_header;
        }
        opts.no_pager |= self.pager.disabled();
    }
}
