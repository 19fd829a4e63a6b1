//! hexplot CLI

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod pipeline;

use pipeline::PipelineConfig;

#[derive(Parser)]
#[command(name = "hexplot")]
#[command(about = "hexplot - hexagonal-binning density plot from a CSV file")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    /// Pipeline config (YAML). Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV with `x` and `y` columns [default: data.csv]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output image, `.png` or `.svg` [default: Grid.png]
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_yaml_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(input) = cli.input {
        config.input = input;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }

    let summary = pipeline::run(&config)?;
    tracing::info!(
        rows = summary.rows,
        binned = summary.binned,
        dropped = summary.dropped,
        max_count = summary.max_count,
        output = %summary.output.display(),
        "done"
    );
    Ok(())
}
