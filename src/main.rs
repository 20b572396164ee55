use std::fs::File;
use std::io::{self, BufReader};
use std::process;

use anyhow::Context;
use clap::Parser;
use pageprint::config::{UserConfig, set_config_path};
use pageprint::output::{PrintOptions, TerminalPager, print_paged};
use pageprint::source::JsonLines;
use pageprint::styling::{eprintln, format_error};

mod cli;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}", format_error(&e));
        process::exit(1);
    }
}

/// Logs go to stderr so they never mix with paged stdout.
/// `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "off",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Some(path) = &cli.config {
        set_config_path(path.clone());
    }
    let config = UserConfig::load()?;

    let mut opts = PrintOptions::default();
    config.apply_to(&mut opts);
    cli.apply_to(&mut opts);

    let flags = cli.print_flags();
    let pager = TerminalPager {
        flag: cli.pager.clone(),
        configured: config.pager.command.clone(),
        disabled: opts.no_pager,
    };

    let summary = match cli.input_path() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            print_paged(JsonLines::new(BufReader::new(file)), Some(opts), &flags, &pager)?
        }
        None => print_paged(JsonLines::new(io::stdin().lock()), Some(opts), &flags, &pager)?,
    };

    log::info!(
        "Printed {} records in {} batches",
        summary.items,
        summary.batch_sizes.len()
    );
    Ok(())
}
