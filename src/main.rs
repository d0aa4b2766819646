//! Command-line interface for fixture-gen
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate one Person
//! fixture-gen populate --schema schema.yaml --type Person
//!
//! # Generate 100 orders with a fixed seed and a fixture config
//! fixture-gen populate \
//!   --schema schema.yaml \
//!   --config fixtures.yaml \
//!   --type Order \
//!   --count 100 \
//!   --seed 42 \
//!   --format jsonl \
//!   --output orders.jsonl
//!
//! # Validate a schema and config
//! fixture-gen validate --schema schema.yaml --config fixtures.yaml
//! ```
//!
//! Logging is controlled with `RUST_LOG` (for example `RUST_LOG=debug`).

use clap::{Parser, Subcommand};
use fixture_gen::{run_populate, run_validate, PopulateArgs};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "fixture-gen")]
#[command(about = "Generate randomly populated test fixtures from YAML type schemas")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate populated instances of a schema type
    Populate(PopulateArgs),

    /// Validate a schema and an optional fixture config
    Validate {
        /// Path to schema YAML file
        #[arg(long, short = 's')]
        schema: PathBuf,

        /// Path to fixture configuration YAML file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Populate(args) => {
            let metrics = run_populate(&args)?;
            info!(
                "Generated {} instances in {:?} (seed {})",
                metrics.instances_written, metrics.total_duration, metrics.seed
            );
        }
        Commands::Validate { schema, config } => {
            let types = run_validate(&schema, config.as_deref())?;
            println!("Schema is valid: {} types ({})", types.len(), types.join(", "));
        }
    }

    Ok(())
}
