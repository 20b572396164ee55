use std::path::{Path, PathBuf};

use clap::Parser;
use pageprint::output::{PrintFlags, PrintOptions};
use pageprint::render::TimeFormat;

#[derive(Parser, Debug)]
#[command(name = "pageprint")]
#[command(about = "Print JSON Lines records as paged tables, JSON or cards", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON Lines input; `-` or omitted reads stdin
    pub input: Option<PathBuf>,

    /// Output mode: table, json or card
    #[arg(short, long, value_name = "MODE")]
    pub output: Option<String>,

    /// Comma-separated fields to show, or `long` for the extended set
    #[arg(short, long, value_name = "LIST")]
    pub fields: Option<String>,

    /// Stop after this many records (0 means no limit)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Never start a pager
    #[arg(long)]
    pub no_pager: bool,

    /// Pager command (overrides PAGEPRINT_PAGER, config and PAGER)
    #[arg(long, value_name = "CMD")]
    pub pager: Option<String>,

    /// Omit the table header
    #[arg(long)]
    pub no_header: bool,

    /// Table cell separator instead of aligned columns
    #[arg(long, value_name = "SEP")]
    pub separator: Option<String>,

    /// How timestamps are shown
    #[arg(long, value_enum, value_name = "FMT")]
    pub time_format: Option<TimeFormat>,

    /// Config file (defaults to PAGEPRINT_CONFIG_PATH, then the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Input path, or `None` for stdin.
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| *path != Path::new("-"))
    }

    pub fn print_flags(&self) -> PrintFlags {
        PrintFlags {
            output: self.output.clone(),
            fields: self.fields.clone(),
            limit: self.limit,
        }
    }

    /// Layer flag values over options already filled from config.
    pub fn apply_to(&self, opts: &mut PrintOptions) {
        if let Some(separator) = &self.separator {
            opts.separator = separator.clone();
        }
        if let Some(time_format) = self.time_format {
            opts.time_format = time_format;
        }
        opts.no_header |= self.no_header;
        opts.no_pager |= self.no_pager;
    }
}
