//! Prospector CLI: rank discussion contributors into an outreach list.
//!
//! Reads scraped contributor records, scores them by seniority, topic and
//! engagement, and writes Markdown, CSV and JSON reports.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
