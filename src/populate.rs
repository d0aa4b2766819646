//! The `populate` and `validate` commands.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use fixture_core::TypeSchema;
use fixture_populator::{FixtureConfig, PopulateOptions, Populator, PopulatorBuilder};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Output encoding of generated instances.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON array holding every instance
    #[default]
    Json,
    /// One JSON document per line
    Jsonl,
}

/// Arguments of the `populate` command.
#[derive(Args, Clone, Debug)]
pub struct PopulateArgs {
    /// Path to schema YAML file
    #[arg(long, short = 's')]
    pub schema: PathBuf,

    /// Path to fixture configuration YAML file (parameters, strategies, exclusions)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Name of the type to generate
    #[arg(long = "type", short = 't')]
    pub type_name: String,

    /// Number of instances to generate
    #[arg(long, default_value = "1")]
    pub count: usize,

    /// Random seed for deterministic generation (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pick concrete subtypes for abstract fields
    #[arg(long)]
    pub scan_for_concrete_types: bool,

    /// Dot-separated field paths to leave untouched (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude_paths: Vec<String>,

    /// Output file (stdout when absent)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty-print the JSON array output
    #[arg(long)]
    pub pretty: bool,
}

/// Metrics from a populate run.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of instances written.
    pub instances_written: usize,
    /// Seed the populator ran with.
    pub seed: u64,
    /// Total time taken.
    pub total_duration: Duration,
}

/// Load the schema and configuration and return a configured builder.
pub fn load_builder(
    schema_path: &Path,
    config_path: Option<&Path>,
) -> Result<(PopulatorBuilder, PopulateOptions)> {
    let schema = TypeSchema::from_file(schema_path)
        .with_context(|| format!("Failed to load schema from {}", schema_path.display()))?;
    let builder = Populator::builder(schema);

    match config_path {
        Some(path) => {
            let config = FixtureConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            debug!(
                "Loaded config with {} strategies and {} exclusions",
                config.randomize.len(),
                config.exclude.len()
            );
            let builder = config.apply(builder)?;
            Ok((builder, config.populate_options()))
        }
        None => Ok((builder, PopulateOptions::new())),
    }
}

/// Generate instances and write them out.
pub fn run_populate(args: &PopulateArgs) -> Result<PopulateMetrics> {
    let start_time = Instant::now();

    let (mut builder, mut options) = load_builder(&args.schema, args.config.as_deref())?;
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if args.scan_for_concrete_types {
        builder = builder.scan_for_concrete_types(true);
    }
    for path in &args.exclude_paths {
        options = options.exclude_path(path.clone());
    }
    let mut populator = builder.build()?;

    info!(
        "Generating {} instances of '{}' with seed {}",
        args.count,
        args.type_name,
        populator.seed()
    );

    let values = (0..args.count)
        .map(|_| {
            populator
                .populate_with(&args.type_name, &options)
                .map(|value| value.to_json())
        })
        .collect::<Result<Vec<_>, _>>()?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_values(BufWriter::new(file), &values, args.format, args.pretty)?;
            info!("Wrote {} instances to {}", values.len(), path.display());
        }
        None => write_values(io::stdout().lock(), &values, args.format, args.pretty)?,
    }

    Ok(PopulateMetrics {
        instances_written: values.len(),
        seed: populator.seed(),
        total_duration: start_time.elapsed(),
    })
}

/// Write generated instances in the requested format.
///
/// `pretty` only affects the JSON array format; JSON lines are always compact.
pub fn write_values<W: Write>(
    mut writer: W,
    values: &[serde_json::Value],
    format: OutputFormat,
    pretty: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json if pretty => {
            serde_json::to_writer_pretty(&mut writer, values)?;
            writeln!(writer)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut writer, values)?;
            writeln!(writer)?;
        }
        OutputFormat::Jsonl => {
            for value in values {
                serde_json::to_writer(&mut writer, value)?;
                writeln!(writer)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Check that a schema (and optional config) produce a valid populator.
///
/// Returns the names of the schema types.
pub fn run_validate(schema_path: &Path, config_path: Option<&Path>) -> Result<Vec<String>> {
    let (builder, _) = load_builder(schema_path, config_path)?;
    let populator = builder.build()?;
    Ok(populator
        .schema()
        .type_names()
        .into_iter()
        .map(str::to_string)
        .collect())
}
