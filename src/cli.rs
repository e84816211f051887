//! CLI argument parsing and execution

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, LevelFilter};

use kustomem::{fixtures, output, pipeline};

/// Kustomem - Run a kustomization over embedded manifests held in memory
#[derive(Parser, Debug)]
#[command(name = "kustomem")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    /// Execute the pipeline and print its output
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .filter_level(self.log_level)
            .target(env_logger::Target::Stderr)
            .init();

        let yaml = match pipeline::execute(&fixtures::fixtures()) {
            Ok(yaml) => yaml,
            Err(e) => {
                error!("{}", e);
                return Err(e).context("failed to run kustomization");
            }
        };

        let stdout = std::io::stdout();
        output::emit(&mut stdout.lock(), &yaml).context("failed to write YAML to stdout")
    }
}
