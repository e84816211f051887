//! # Kustomem CLI
//!
//! Binary entry point. Parses the ambient flags, sets up logging, runs the
//! pipeline over the embedded fixtures and prints the merged YAML to stdout.
//! Any failure is logged and turned into a non-zero exit status.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
