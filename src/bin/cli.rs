//! codemap CLI entry point.
//!
//! Usage:
//!   codemap scan                 # Index the project
//!   codemap format dsl           # Render the index
//!   codemap update src/app.ts    # Patch one file
//!   codemap stats                # Graph statistics

use clap::Parser;
use codemap::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
