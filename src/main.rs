use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use retropunker::{config::ProcessConfig, run, utils::image};

#[derive(Parser)]
#[command(name = "retropunker")]
#[command(about = "Convert images to the color models of 8-bit home computers", long_about = None)]
struct Cli {
    /// Image to convert
    input: PathBuf,
    /// Where to write the result, format from the extension
    output: PathBuf,
    /// JSON process configuration
    config: PathBuf,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = ProcessConfig::read_config(&cli.config)
        .with_context(|| format!("reading config {}", cli.config.display()))?;
    let input = image::read_image(&cli.input)
        .with_context(|| format!("reading image {}", cli.input.display()))?;

    let processed_image = run(config, input)?;

    image::write_image(&processed_image, &cli.output)
        .with_context(|| format!("writing image {}", cli.output.display()))?;
    tracing::info!(output = %cli.output.display(), "done");
    Ok(())
}
